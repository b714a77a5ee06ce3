//! Error types for the fulfillment engine.
//!
//! Only [`FeedError`] is fatal. Resolution problems become a [`SkipReason`]
//! on the pass summary and sink failures are counted on the writeback report.

use lustre_core::{LineItemId, ProductId, VariantId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A line item could not be resolved against the catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The line item points at a product that is not in the catalog.
    #[error("line item {line_item} references unknown product {product}")]
    UnknownProduct {
        line_item: LineItemId,
        product: ProductId,
    },

    /// A bundle's default component is not in the catalog.
    #[error("bundle product {product} references unknown component variant {variant}")]
    UnknownBundleComponent {
        product: ProductId,
        variant: VariantId,
    },
}

/// Why a line item was left untouched by a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SkipReason {
    UnknownProduct { product: ProductId },
    UnknownBundleComponent { product: ProductId, variant: VariantId },
}

impl From<&ResolveError> for SkipReason {
    fn from(err: &ResolveError) -> Self {
        match *err {
            ResolveError::UnknownProduct { product, .. } => Self::UnknownProduct { product },
            ResolveError::UnknownBundleComponent { product, variant } => {
                Self::UnknownBundleComponent { product, variant }
            }
        }
    }
}

/// A single writeback failed.
#[derive(Debug, Error)]
pub enum SinkError {
    /// I/O error while writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused the record.
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Loading a snapshot failed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// I/O error while reading.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload could not be parsed in its declared format.
    #[error("parse error: {0}")]
    Parse(String),

    /// The source format is not supported.
    #[error("unsupported snapshot format: {0}")]
    UnsupportedFormat(String),
}
