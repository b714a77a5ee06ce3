//! Incoming inventory: vendor restocks and resize conversions.
//!
//! Both kinds share the `units` / `received` / `done` shape. Records are
//! created when staff commit units to a vendor or a resize, updated by
//! receiving events, and closed with `done` once fully received. They are
//! never deleted.

use chrono::{DateTime, Days, NaiveDate, Utc};
use lustre_core::{ResizeId, VariantId, VendorId, VendorOrderId, VendorOrderVariantId};
use serde::{Deserialize, Serialize};

/// A supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    /// Vendor ID.
    pub id: VendorId,
    /// Vendor name.
    #[serde(default)]
    pub name: String,
    /// Typical days between ordering and receiving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_time_days: Option<i64>,
}

/// A batch of units ordered from one vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorOrder {
    /// Vendor order ID.
    pub id: VendorOrderId,
    /// Supplier. Missing for legacy batches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<VendorId>,
    /// Date the batch was placed with the vendor.
    pub date_ordered: NaiveDate,
    /// When the batch was recorded.
    pub created_at: DateTime<Utc>,
    /// Closed batches contribute nothing to the pool.
    #[serde(default)]
    pub done: bool,
    /// Per-variant lines.
    #[serde(default)]
    pub variants: Vec<VendorOrderVariant>,
}

impl VendorOrder {
    /// Expected arrival given the vendor's lead time in days.
    #[must_use]
    pub fn expected_arrival(&self, wait_days: i64) -> Option<NaiveDate> {
        let days = u64::try_from(wait_days).ok()?;
        self.date_ordered.checked_add_days(Days::new(days))
    }
}

/// Units of one variant on order within a vendor batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorOrderVariant {
    /// Vendor order variant ID.
    pub id: VendorOrderVariantId,
    /// Variant on order.
    pub variant_id: VariantId,
    /// Units ordered.
    pub units: i32,
    /// Units received so far.
    #[serde(default)]
    pub received: i32,
    /// Fully received.
    #[serde(default)]
    pub done: bool,
    /// When the line was recorded.
    pub created_at: DateTime<Utc>,
}

impl VendorOrderVariant {
    /// Units not yet received. Negative when receipts exceed the order.
    #[must_use]
    pub const fn available(&self) -> i32 {
        self.units.saturating_sub(self.received)
    }
}

/// Units being converted from a donor variant to a target variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resize {
    /// Resize ID.
    pub id: ResizeId,
    /// Donor variant.
    pub from_variant_id: VariantId,
    /// Target variant the converted units become.
    pub to_variant_id: VariantId,
    /// Units being converted.
    pub units: i32,
    /// Units converted so far.
    #[serde(default)]
    pub received: i32,
    /// Fully converted.
    #[serde(default)]
    pub done: bool,
    /// When the resize was requested.
    pub created_at: DateTime<Utc>,
}

impl Resize {
    /// Units not yet converted. Negative when receipts exceed the request.
    #[must_use]
    pub const fn available(&self) -> i32 {
        self.units.saturating_sub(self.received)
    }
}

/// Reference to a reservable incoming-inventory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum IncomingRecordRef {
    VendorOrderVariant(VendorOrderVariantId),
    Resize(ResizeId),
}

impl std::fmt::Display for IncomingRecordRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VendorOrderVariant(id) => write!(f, "vendor_order_variant:{id}"),
            Self::Resize(id) => write!(f, "resize:{id}"),
        }
    }
}
