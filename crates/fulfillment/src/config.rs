//! Engine settings.
//!
//! The engine never reads the environment itself; the CLI (or any other host)
//! builds an [`EngineConfig`] and hands it to [`crate::run_pass`].

use lustre_core::FulfillmentStatus;
use serde::{Deserialize, Serialize};

/// Vendor lead time used when a vendor has no wait time on record.
pub const DEFAULT_VENDOR_WAIT_DAYS: i64 = 21;

/// Settings for one allocation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Days added to a vendor order's order date when the vendor has no wait time.
    pub default_vendor_wait_days: i64,
    /// Order in which classified orders are listed.
    pub order_sort: OrderSort,
    /// Fulfillment statuses that make an order a candidate for the pass.
    pub candidate_statuses: Vec<FulfillmentStatus>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_vendor_wait_days: DEFAULT_VENDOR_WAIT_DAYS,
            order_sort: OrderSort::default(),
            candidate_statuses: vec![
                FulfillmentStatus::Unfulfilled,
                FulfillmentStatus::PartiallyFulfilled,
            ],
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn with_order_sort(mut self, order_sort: OrderSort) -> Self {
        self.order_sort = order_sort;
        self
    }

    #[must_use]
    pub const fn with_default_vendor_wait_days(mut self, days: i64) -> Self {
        self.default_vendor_wait_days = days;
        self
    }
}

/// Sort keys for the order listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSort {
    #[default]
    CreatedAsc,
    CreatedDesc,
    PriceAsc,
    PriceDesc,
    /// Orders without a needed date go last.
    DateNeededAsc,
    /// Orders without a needed date go last.
    DateNeededDesc,
}

impl std::fmt::Display for OrderSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CreatedAsc => "created_asc",
            Self::CreatedDesc => "created_desc",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::DateNeededAsc => "date_needed_asc",
            Self::DateNeededDesc => "date_needed_desc",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for OrderSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "created_asc" | "created" => Ok(Self::CreatedAsc),
            "created_desc" => Ok(Self::CreatedDesc),
            "price_asc" | "price" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "date_needed_asc" | "date_needed" => Ok(Self::DateNeededAsc),
            "date_needed_desc" => Ok(Self::DateNeededDesc),
            _ => Err(format!("invalid order sort: {s}")),
        }
    }
}
