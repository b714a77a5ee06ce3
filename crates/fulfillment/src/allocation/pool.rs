//! The pool of open incoming-inventory records.

use chrono::{DateTime, Utc};
use lustre_core::{VariantId, VendorOrderId};
use serde::{Deserialize, Serialize};

use crate::models::{IncomingRecordRef, Resize, VendorOrder};

/// One reservable record and what is left of it in this pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    /// The record.
    pub record: IncomingRecordRef,
    /// Variant the incoming units become.
    pub target_variant: VariantId,
    /// Parent batch for vendor-order records.
    pub vendor_order: Option<VendorOrderId>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// `units - received` at pass start, clamped at zero.
    pub initial_available: i32,
    /// Units not yet reserved in this pass.
    pub available: i32,
}

impl PoolEntry {
    /// Units reserved from this record so far in this pass.
    #[must_use]
    pub const fn reserved(&self) -> i32 {
        self.initial_available - self.available
    }
}

/// A record whose receipts exceed its units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolWarning {
    pub record: IncomingRecordRef,
    /// Unclamped `units - received`, always negative.
    pub available: i32,
}

/// Open incoming-inventory records in reservation order: resizes first, then
/// vendor-order lines, each by creation time.
#[derive(Debug, Clone, Default)]
pub struct IncomingPool {
    entries: Vec<PoolEntry>,
    warnings: Vec<PoolWarning>,
}

impl IncomingPool {
    /// Seed the pool from every record that is not `done`.
    #[must_use]
    pub fn seed(resizes: &[Resize], vendor_orders: &[VendorOrder]) -> Self {
        let mut pool = Self::default();

        let mut open_resizes: Vec<&Resize> = resizes.iter().filter(|r| !r.done).collect();
        open_resizes.sort_by_key(|r| r.created_at);
        for resize in open_resizes {
            pool.push(
                IncomingRecordRef::Resize(resize.id),
                resize.to_variant_id,
                None,
                resize.created_at,
                resize.available(),
            );
        }

        let mut open_lines: Vec<_> = vendor_orders
            .iter()
            .filter(|batch| !batch.done)
            .flat_map(|batch| {
                batch
                    .variants
                    .iter()
                    .filter(|line| !line.done)
                    .map(move |line| (batch.id, line))
            })
            .collect();
        open_lines.sort_by_key(|(_, line)| line.created_at);
        for (batch_id, line) in open_lines {
            pool.push(
                IncomingRecordRef::VendorOrderVariant(line.id),
                line.variant_id,
                Some(batch_id),
                line.created_at,
                line.available(),
            );
        }

        pool
    }

    fn push(
        &mut self,
        record: IncomingRecordRef,
        target_variant: VariantId,
        vendor_order: Option<VendorOrderId>,
        created_at: DateTime<Utc>,
        raw_available: i32,
    ) {
        if raw_available < 0 {
            tracing::warn!(
                record = %record,
                available = raw_available,
                "Incoming record received more than ordered, treating as zero available"
            );
            self.warnings.push(PoolWarning {
                record,
                available: raw_available,
            });
        }
        let available = raw_available.max(0);
        self.entries.push(PoolEntry {
            record,
            target_variant,
            vendor_order,
            created_at,
            initial_available: available,
            available,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [PoolEntry] {
        &mut self.entries
    }

    /// Records that had to be clamped while seeding.
    #[must_use]
    pub fn warnings(&self) -> &[PoolWarning] {
        &self.warnings
    }

    /// Total units still unreserved for a variant.
    #[must_use]
    pub fn available_for(&self, variant: VariantId) -> i32 {
        self.entries
            .iter()
            .filter(|e| e.target_variant == variant)
            .map(|e| e.available)
            .sum()
    }
}
