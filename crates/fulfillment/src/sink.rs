//! Writeback of pass results.
//!
//! Hosts implement [`PersistenceSink`], [`ShipmentSink`] and [`MetricsSink`]
//! for their stores. [`persist`] drives them: every record is written on its
//! own, and a failed write is logged and counted while the rest carry on. The
//! next pass re-derives everything, so a partial writeback is acceptable.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Mutex;

use chrono::NaiveDate;
use lustre_core::{LineItemId, OrderId, VendorOrderId};
use serde::{Deserialize, Serialize};

use crate::allocation::{LineItemOutcome, LineItemState, LineItemStatus, OrderClassification};
use crate::error::SinkError;
use crate::metrics::TabCounts;
use crate::models::IncomingRecordRef;
use crate::pass::PassOutcome;
use crate::shipment::ShipmentPlan;

// =============================================================================
// Records
// =============================================================================

/// Classification flags stored on a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct LineItemFlags {
    pub shippable: bool,
    pub partially_shippable: bool,
    pub resizable: bool,
    pub custom: bool,
}

/// Derived fields written back for one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemUpdate {
    pub line_item_id: LineItemId,
    pub order_id: OrderId,
    /// `None` for fully shipped line items, whose flags are left as they are.
    pub flags: Option<LineItemFlags>,
    pub awaiting_inventory: Vec<IncomingRecordRef>,
    pub awaiting_inventory_vendor_orders: Vec<VendorOrderId>,
    pub awaiting_inventory_expected_date: Option<NaiveDate>,
}

impl LineItemUpdate {
    /// Build the update for an outcome. Skipped line items get none.
    #[must_use]
    pub fn from_outcome(outcome: &LineItemOutcome) -> Option<Self> {
        let flags = match outcome.state {
            LineItemState::Skipped => return None,
            LineItemState::Terminal => None,
            LineItemState::Custom => Some(LineItemFlags {
                shippable: false,
                partially_shippable: false,
                resizable: false,
                custom: true,
            }),
            LineItemState::Active(status) => Some(LineItemFlags {
                shippable: status == LineItemStatus::Shippable,
                partially_shippable: status == LineItemStatus::PartiallyShippable,
                resizable: status == LineItemStatus::Resizable,
                custom: false,
            }),
        };
        Some(Self {
            line_item_id: outcome.line_item_id,
            order_id: outcome.order_id,
            flags,
            awaiting_inventory: outcome.awaiting.records.clone(),
            awaiting_inventory_vendor_orders: outcome.awaiting.vendor_orders.clone(),
            awaiting_inventory_expected_date: outcome.awaiting.expected_date,
        })
    }
}

/// Order-level aggregates written back for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct OrderUpdate {
    pub order_id: OrderId,
    pub fully_shippable: bool,
    pub partially_shippable: bool,
    pub needs_action: bool,
    pub resizable: bool,
    pub has_custom: bool,
}

impl From<&OrderClassification> for OrderUpdate {
    fn from(c: &OrderClassification) -> Self {
        Self {
            order_id: c.order_id,
            fully_shippable: c.fully_shippable,
            partially_shippable: c.partially_shippable,
            needs_action: c.needs_action,
            resizable: c.resizable,
            has_custom: c.has_custom,
        }
    }
}

// =============================================================================
// Sink traits
// =============================================================================

/// Stores derived line-item and order fields.
pub trait PersistenceSink {
    fn save_line_item(
        &self,
        update: &LineItemUpdate,
    ) -> impl Future<Output = Result<(), SinkError>> + Send;

    fn save_order(&self, update: &OrderUpdate) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// Receives shipment plans.
pub trait ShipmentSink {
    fn save_plan(&self, plan: &ShipmentPlan) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// Receives the tab-count snapshot.
pub trait MetricsSink {
    fn save_tab_counts(
        &self,
        counts: &TabCounts,
    ) -> impl Future<Output = Result<(), SinkError>> + Send;
}

// =============================================================================
// Writeback
// =============================================================================

/// Counts from one writeback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritebackReport {
    pub line_items_written: usize,
    pub line_items_failed: usize,
    pub orders_written: usize,
    pub orders_failed: usize,
    pub shipment_plans_written: usize,
    pub shipment_plans_failed: usize,
    pub tab_counts_written: bool,
}

impl WritebackReport {
    #[must_use]
    pub const fn failures(&self) -> usize {
        self.line_items_failed
            + self.orders_failed
            + self.shipment_plans_failed
            + if self.tab_counts_written { 0 } else { 1 }
    }
}

/// Write a pass's results to the sinks.
///
/// Never stops early: each failure is logged at error level and counted.
#[tracing::instrument(skip_all, fields(run_id = %outcome.summary.run_id))]
pub async fn persist<K>(outcome: &PassOutcome, sinks: &K) -> WritebackReport
where
    K: PersistenceSink + ShipmentSink + MetricsSink + Sync,
{
    let mut report = WritebackReport::default();

    for update in outcome.line_items.iter().filter_map(LineItemUpdate::from_outcome) {
        match sinks.save_line_item(&update).await {
            Ok(()) => report.line_items_written += 1,
            Err(e) => {
                tracing::error!(
                    line_item_id = %update.line_item_id,
                    error = %e,
                    "Failed to write line item"
                );
                report.line_items_failed += 1;
            }
        }
    }

    for update in outcome.orders.iter().map(OrderUpdate::from) {
        match sinks.save_order(&update).await {
            Ok(()) => report.orders_written += 1,
            Err(e) => {
                tracing::error!(order_id = %update.order_id, error = %e, "Failed to write order");
                report.orders_failed += 1;
            }
        }
    }

    for plan in &outcome.shipments {
        match sinks.save_plan(plan).await {
            Ok(()) => report.shipment_plans_written += 1,
            Err(e) => {
                tracing::error!(
                    order_id = %plan.order_id,
                    error = %e,
                    "Failed to write shipment plan"
                );
                report.shipment_plans_failed += 1;
            }
        }
    }

    match sinks.save_tab_counts(&outcome.tab_counts).await {
        Ok(()) => report.tab_counts_written = true,
        Err(e) => tracing::error!(error = %e, "Failed to write tab counts"),
    }

    tracing::info!(
        line_items = report.line_items_written,
        orders = report.orders_written,
        shipment_plans = report.shipment_plans_written,
        failures = report.failures(),
        "Writeback complete"
    );
    report
}

// =============================================================================
// In-memory sink
// =============================================================================

/// Keeps everything written to it. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    line_items: Mutex<Vec<LineItemUpdate>>,
    orders: Mutex<Vec<OrderUpdate>>,
    plans: Mutex<Vec<ShipmentPlan>>,
    tab_counts: Mutex<Option<TabCounts>>,
    rejected: HashSet<LineItemId>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse writes for these line items.
    #[must_use]
    pub fn rejecting(line_items: impl IntoIterator<Item = LineItemId>) -> Self {
        Self {
            rejected: line_items.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn line_items(&self) -> Vec<LineItemUpdate> {
        self.line_items.lock().map(|v| v.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn orders(&self) -> Vec<OrderUpdate> {
        self.orders.lock().map(|v| v.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn plans(&self) -> Vec<ShipmentPlan> {
        self.plans.lock().map(|v| v.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn tab_counts(&self) -> Option<TabCounts> {
        self.tab_counts.lock().ok().and_then(|v| v.clone())
    }
}

fn push<T>(store: &Mutex<Vec<T>>, item: T) -> Result<(), SinkError> {
    store
        .lock()
        .map_err(|_| SinkError::Rejected("memory sink poisoned".to_string()))?
        .push(item);
    Ok(())
}

impl PersistenceSink for MemorySink {
    async fn save_line_item(&self, update: &LineItemUpdate) -> Result<(), SinkError> {
        if self.rejected.contains(&update.line_item_id) {
            return Err(SinkError::Rejected(format!(
                "line item {} is locked",
                update.line_item_id
            )));
        }
        push(&self.line_items, update.clone())
    }

    async fn save_order(&self, update: &OrderUpdate) -> Result<(), SinkError> {
        push(&self.orders, *update)
    }
}

impl ShipmentSink for MemorySink {
    async fn save_plan(&self, plan: &ShipmentPlan) -> Result<(), SinkError> {
        push(&self.plans, plan.clone())
    }
}

impl MetricsSink for MemorySink {
    async fn save_tab_counts(&self, counts: &TabCounts) -> Result<(), SinkError> {
        *self
            .tab_counts
            .lock()
            .map_err(|_| SinkError::Rejected("memory sink poisoned".to_string()))? =
            Some(counts.clone());
        Ok(())
    }
}
