//! Status enums for orders as they arrive from the commerce platform.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// Maps to the commerce platform's fulfillment status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    #[default]
    Unfulfilled,
    PartiallyFulfilled,
    Fulfilled,
    Restocked,
    OnHold,
}

impl FulfillmentStatus {
    /// Whether the order still has units waiting to leave the building.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Unfulfilled | Self::PartiallyFulfilled)
    }
}

impl std::fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unfulfilled => write!(f, "unfulfilled"),
            Self::PartiallyFulfilled => write!(f, "partially_fulfilled"),
            Self::Fulfilled => write!(f, "fulfilled"),
            Self::Restocked => write!(f, "restocked"),
            Self::OnHold => write!(f, "on_hold"),
        }
    }
}

impl std::str::FromStr for FulfillmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unfulfilled" => Ok(Self::Unfulfilled),
            "partially_fulfilled" => Ok(Self::PartiallyFulfilled),
            "fulfilled" => Ok(Self::Fulfilled),
            "restocked" => Ok(Self::Restocked),
            "on_hold" => Ok(Self::OnHold),
            _ => Err(format!("invalid fulfillment status: {s}")),
        }
    }
}

/// Order financial status.
///
/// Maps to the commerce platform's financial status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialStatus {
    #[default]
    Pending,
    Authorized,
    PartiallyPaid,
    Paid,
    PartiallyRefunded,
    Refunded,
    Voided,
}

impl FinancialStatus {
    /// Refunded and voided orders never ship, whatever their fulfillment status says.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Refunded | Self::Voided)
    }
}
