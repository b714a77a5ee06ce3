//! Product catalog records.

use lustre_core::{OptionSignature, ProductId, VariantId};
use serde::{Deserialize, Serialize};

/// A product as listed on the commerce platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    #[serde(default)]
    pub title: String,
    /// Present when the product is sold as a bundle of fixed components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleComposition>,
}

impl Product {
    #[must_use]
    pub const fn is_bundle(&self) -> bool {
        self.bundle.is_some()
    }
}

/// The component variants a bundle ships by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleComposition {
    /// One variant per component, in display order.
    pub default_variant_ids: Vec<VariantId>,
}

/// A sellable SKU.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Variant ID.
    pub id: VariantId,
    /// Parent product.
    pub product_id: ProductId,
    /// Values on each option dimension.
    #[serde(default)]
    pub options: OptionSignature,
    /// On-hand count. May be negative in the upstream data.
    #[serde(default)]
    pub inventory: i32,
    /// Stock keeping unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl Variant {
    /// On-hand count clamped at zero.
    #[must_use]
    pub fn on_hand(&self) -> i32 {
        self.inventory.max(0)
    }
}
