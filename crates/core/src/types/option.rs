//! Variant option signatures.
//!
//! Every variant in the catalog is identified within its product by the value
//! it carries on each option dimension (ring size, metal color, stone, and a
//! catch-all). Line items record the customer's selection with the same shape,
//! where a missing dimension means "not chosen".

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing option data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OptionError {
    /// The dimension name is not one of the known dimensions.
    #[error("unknown option dimension: {0}")]
    UnknownDimension(String),
}

/// The closed set of option dimensions a variant can vary on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionDimension {
    Size,
    Color,
    Stone,
    Misc,
}

impl OptionDimension {
    /// All dimensions, in signature order.
    pub const ALL: [Self; 4] = [Self::Size, Self::Color, Self::Stone, Self::Misc];

    /// Lowercase name used in snapshots and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Color => "color",
            Self::Stone => "stone",
            Self::Misc => "misc",
        }
    }
}

impl std::fmt::Display for OptionDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OptionDimension {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "size" => Ok(Self::Size),
            "color" | "colour" | "metal" => Ok(Self::Color),
            "stone" => Ok(Self::Stone),
            "misc" => Ok(Self::Misc),
            other => Err(OptionError::UnknownDimension(other.to_owned())),
        }
    }
}

/// One value per option dimension.
///
/// Used both for a variant's own signature and for a customer's selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionSignature {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc: Option<String>,
}

impl OptionSignature {
    /// An empty signature (no dimension chosen).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, dimension: OptionDimension, value: impl Into<String>) -> Self {
        self.set(dimension, Some(value.into()));
        self
    }

    /// Value on a dimension, if any.
    #[must_use]
    pub fn get(&self, dimension: OptionDimension) -> Option<&str> {
        match dimension {
            OptionDimension::Size => self.size.as_deref(),
            OptionDimension::Color => self.color.as_deref(),
            OptionDimension::Stone => self.stone.as_deref(),
            OptionDimension::Misc => self.misc.as_deref(),
        }
    }

    /// Set or clear a dimension.
    pub fn set(&mut self, dimension: OptionDimension, value: Option<String>) {
        let slot = match dimension {
            OptionDimension::Size => &mut self.size,
            OptionDimension::Color => &mut self.color,
            OptionDimension::Stone => &mut self.stone,
            OptionDimension::Misc => &mut self.misc,
        };
        *slot = value;
    }

    /// Dimensions that carry a value, with that value.
    pub fn entries(&self) -> impl Iterator<Item = (OptionDimension, &str)> + '_ {
        OptionDimension::ALL
            .into_iter()
            .filter_map(|dim| self.get(dim).map(|value| (dim, value)))
    }

    /// True when no dimension carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    #[must_use]
    pub const fn has_size(&self) -> bool {
        self.size.is_some()
    }

    /// Whether this signature agrees with `selection` on every dimension the
    /// selection specifies. Dimensions the selection leaves open match anything.
    #[must_use]
    pub fn satisfies(&self, selection: &Self) -> bool {
        selection
            .entries()
            .all(|(dim, value)| self.get(dim) == Some(value))
    }

    /// This signature with the selection's values written over the dimensions
    /// this signature already carries. Dimensions absent here stay absent.
    #[must_use]
    pub fn overridden_by(&self, selection: &Self) -> Self {
        let mut out = self.clone();
        for (dim, value) in selection.entries() {
            if self.get(dim).is_some() {
                out.set(dim, Some(value.to_owned()));
            }
        }
        out
    }

    /// Whether the two signatures agree on every dimension except size.
    /// A dimension missing on both sides counts as agreement.
    #[must_use]
    pub fn matches_except_size(&self, other: &Self) -> bool {
        OptionDimension::ALL
            .into_iter()
            .filter(|dim| *dim != OptionDimension::Size)
            .all(|dim| self.get(dim) == other.get(dim))
    }
}
