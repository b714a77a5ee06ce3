//! Reservations against the incoming pool.

use std::collections::HashMap;

use chrono::NaiveDate;
use lustre_core::{LineItemId, VariantId, VendorId, VendorOrderId};
use serde::{Deserialize, Serialize};

use super::pool::IncomingPool;
use crate::models::{IncomingRecordRef, Vendor, VendorOrder};

/// Units of one incoming record earmarked for one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub line_item_id: LineItemId,
    pub record: IncomingRecordRef,
    pub quantity: i32,
}

/// What a line item is waiting on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwaitingInventory {
    /// Records reserved for the line item, in reservation order.
    pub records: Vec<IncomingRecordRef>,
    /// Vendor batches behind those records.
    pub vendor_orders: Vec<VendorOrderId>,
    /// Earliest expected arrival across the vendor batches.
    pub expected_date: Option<NaiveDate>,
}

impl AwaitingInventory {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Allocation state for one pass.
///
/// Owns the pool; every reservation decrements it, so line items processed
/// later see what earlier ones took.
#[derive(Debug)]
pub struct AllocationContext<'a> {
    pool: IncomingPool,
    vendor_orders: HashMap<VendorOrderId, &'a VendorOrder>,
    vendors: HashMap<VendorId, &'a Vendor>,
    default_wait_days: i64,
    reservations: Vec<Reservation>,
}

impl<'a> AllocationContext<'a> {
    #[must_use]
    pub fn new(
        pool: IncomingPool,
        vendor_orders: &'a [VendorOrder],
        vendors: &'a [Vendor],
        default_wait_days: i64,
    ) -> Self {
        Self {
            pool,
            vendor_orders: vendor_orders.iter().map(|b| (b.id, b)).collect(),
            vendors: vendors.iter().map(|v| (v.id, v)).collect(),
            default_wait_days,
            reservations: Vec::new(),
        }
    }

    /// Reserve incoming units for a line item.
    ///
    /// `demand` is the line item's unshipped quantity. Variants are scanned in
    /// order and records in pool order. The need is shared across the line
    /// item's variants: once `demand` units are reserved in total, later
    /// variants reserve nothing.
    pub fn reserve(
        &mut self,
        line_item_id: LineItemId,
        demand: i32,
        variants: &[VariantId],
    ) -> AwaitingInventory {
        let mut made: Vec<Reservation> = Vec::new();

        for &variant in variants {
            for entry in self
                .pool
                .entries_mut()
                .iter_mut()
                .filter(|e| e.target_variant == variant)
            {
                let already: i32 = made.iter().map(|r| r.quantity).sum();
                let need = demand - already;
                if need <= 0 {
                    break;
                }
                if entry.available <= 0 {
                    continue;
                }

                let quantity = need.min(entry.available);
                entry.available -= quantity;
                made.push(Reservation {
                    line_item_id,
                    record: entry.record,
                    quantity,
                });
            }
        }

        if made.is_empty() {
            return AwaitingInventory::default();
        }

        let mut awaiting = AwaitingInventory::default();
        for reservation in &made {
            awaiting.records.push(reservation.record);
        }
        for entry in self.pool.entries() {
            if let Some(batch) = entry.vendor_order {
                let reserved_here = made.iter().any(|r| r.record == entry.record);
                if reserved_here && !awaiting.vendor_orders.contains(&batch) {
                    awaiting.vendor_orders.push(batch);
                }
            }
        }
        awaiting.expected_date = self.expected_date(&awaiting.vendor_orders);

        tracing::debug!(
            line_item_id = %line_item_id,
            records = made.len(),
            units = made.iter().map(|r| r.quantity).sum::<i32>(),
            "Reserved incoming inventory"
        );
        self.reservations.extend(made);
        awaiting
    }

    fn expected_date(&self, batches: &[VendorOrderId]) -> Option<NaiveDate> {
        batches
            .iter()
            .filter_map(|id| self.vendor_orders.get(id))
            .filter_map(|batch| batch.expected_arrival(self.wait_days(batch)))
            .min()
    }

    fn wait_days(&self, batch: &VendorOrder) -> i64 {
        let Some(vendor_id) = batch.vendor_id else {
            return self.default_wait_days;
        };
        match self.vendors.get(&vendor_id) {
            Some(vendor) => vendor.wait_time_days.unwrap_or(self.default_wait_days),
            None => {
                tracing::warn!(
                    vendor_order_id = %batch.id,
                    vendor_id = %vendor_id,
                    "Vendor order references unknown vendor, using default wait time"
                );
                self.default_wait_days
            }
        }
    }

    /// Every reservation made so far, in the order made.
    #[must_use]
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    #[must_use]
    pub const fn pool(&self) -> &IncomingPool {
        &self.pool
    }

    /// Consume the context, returning the drained pool and the reservations.
    #[must_use]
    pub fn into_parts(self) -> (IncomingPool, Vec<Reservation>) {
        (self.pool, self.reservations)
    }
}
