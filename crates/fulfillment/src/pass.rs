//! One full allocation pass.
//!
//! The pass runs in four ordered steps over the candidate orders:
//!
//! 1. Resolve every outstanding line item and claim on-hand stock for it,
//!    oldest order first.
//! 2. Reserve incoming units for line items that could not claim, oldest line
//!    item first. The pool is drained as it goes.
//! 3. Look for resize donors where nothing else helps, then settle each line
//!    item's status.
//! 4. Aggregate orders in the requested sort order, group shippable orders
//!    into shipments and tally the dashboard tabs.
//!
//! Everything runs on one thread against data already in memory; the result
//! only depends on the snapshot and the config.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use lustre_core::{LineItemId, OrderId};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::allocation::{
    AllocationContext, AwaitingInventory, ClaimLedger, ClaimOutcome, IncomingPool,
    LineItemOutcome, LineItemState, LineItemStatus, OrderClassification, PoolWarning,
    Reservation, classify_order, sort_orders,
};
use crate::catalog::{CatalogIndex, Resolution, resolve};
use crate::config::EngineConfig;
use crate::error::SkipReason;
use crate::feed::Snapshot;
use crate::inventory::inventory_level;
use crate::metrics::{OrderTab, TabCounts};
use crate::models::{LineItem, Order, Variant};
use crate::resize::resize_candidates;
use crate::shipment::{LineReadiness, ShipmentPlan, group_shipments};

// =============================================================================
// Results
// =============================================================================

/// A line item the pass could not process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLineItem {
    pub order_id: OrderId,
    pub line_item_id: LineItemId,
    pub reason: SkipReason,
}

/// What happened during a pass, for the run log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub orders_considered: usize,
    pub line_items_classified: usize,
    pub line_items_terminal: usize,
    pub custom_line_items: usize,
    pub skipped: Vec<SkippedLineItem>,
    pub pool_warnings: Vec<PoolWarning>,
    pub reservations_made: usize,
}

/// Everything a pass derived.
#[derive(Debug, Clone)]
pub struct PassOutcome {
    pub summary: PassSummary,
    /// One entry per line item of every candidate order, in processing order.
    pub line_items: Vec<LineItemOutcome>,
    /// One entry per candidate order, in the requested sort order.
    pub orders: Vec<OrderClassification>,
    pub reservations: Vec<Reservation>,
    /// Plans for orders with at least one shippable line item, in listing order.
    pub shipments: Vec<ShipmentPlan>,
    pub tab_counts: TabCounts,
}

impl PassOutcome {
    #[must_use]
    pub fn line_item(&self, id: LineItemId) -> Option<&LineItemOutcome> {
        self.line_items.iter().find(|o| o.line_item_id == id)
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&OrderClassification> {
        self.orders.iter().find(|o| o.order_id == id)
    }

    /// Orders listed under a dashboard tab, in listing order.
    #[must_use]
    pub fn orders_in_tab(&self, tab: OrderTab) -> Vec<&OrderClassification> {
        self.orders.iter().filter(|o| tab.contains(o)).collect()
    }
}

// =============================================================================
// Pass
// =============================================================================

/// Per-line-item state between the claim and status steps.
enum Working<'a> {
    Terminal,
    Custom,
    Skipped,
    Resolved {
        variants: Vec<&'a Variant>,
        level: i32,
        claim: ClaimOutcome,
    },
}

struct Entry<'a> {
    order: &'a Order,
    line_item: &'a LineItem,
    working: Working<'a>,
}

/// Run one allocation pass over a snapshot.
#[must_use]
#[instrument(
    skip_all,
    fields(run_id = tracing::field::Empty, orders = snapshot.orders.len(), sort = %config.order_sort)
)]
pub fn run_pass(snapshot: &Snapshot, config: &EngineConfig) -> PassOutcome {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    tracing::Span::current().record("run_id", tracing::field::display(run_id));

    let index = CatalogIndex::build(&snapshot.products, &snapshot.variants);
    let candidates = snapshot.candidate_orders(config);

    // Step 1: resolve and claim.
    let mut ledger = ClaimLedger::new();
    let mut skipped = Vec::new();
    let mut entries: Vec<Entry<'_>> = Vec::new();

    for &order in &candidates {
        for line_item in &order.line_items {
            let working = if line_item.is_terminal() {
                Working::Terminal
            } else {
                match resolve(&index, line_item) {
                    Err(err) => {
                        tracing::warn!(
                            order_id = %order.id,
                            line_item_id = %line_item.id,
                            error = %err,
                            "Skipping line item with broken catalog reference"
                        );
                        skipped.push(SkippedLineItem {
                            order_id: order.id,
                            line_item_id: line_item.id,
                            reason: SkipReason::from(&err),
                        });
                        Working::Skipped
                    }
                    Ok(Resolution::Custom) => Working::Custom,
                    Ok(Resolution::Variants(variants)) => {
                        let level = inventory_level(&variants);
                        let claim = ledger.try_claim(&variants, line_item.quantity);
                        Working::Resolved {
                            variants,
                            level,
                            claim,
                        }
                    }
                }
            };
            entries.push(Entry {
                order,
                line_item,
                working,
            });
        }
    }

    // Step 2: reserve incoming units for line items that could not claim.
    let pool = IncomingPool::seed(&snapshot.resizes, &snapshot.vendor_orders);
    let pool_warnings = pool.warnings().to_vec();
    let mut ctx = AllocationContext::new(
        pool,
        &snapshot.vendor_orders,
        &snapshot.vendors,
        config.default_vendor_wait_days,
    );

    let mut needing: Vec<&Entry<'_>> = entries
        .iter()
        .filter(|e| {
            matches!(
                e.working,
                Working::Resolved {
                    claim: ClaimOutcome::Short { .. },
                    ..
                }
            )
        })
        .collect();
    needing.sort_by_key(|e| e.line_item.created_at);

    let mut awaiting: HashMap<LineItemId, AwaitingInventory> = HashMap::new();
    for entry in needing {
        if let Working::Resolved { variants, .. } = &entry.working {
            let ids: Vec<_> = variants.iter().map(|v| v.id).collect();
            let result = ctx.reserve(entry.line_item.id, entry.line_item.remaining(), &ids);
            awaiting.insert(entry.line_item.id, result);
        }
    }
    let (_, reservations) = ctx.into_parts();

    // Step 3: resize donors and final statuses.
    let line_items: Vec<LineItemOutcome> = entries
        .iter()
        .map(|entry| settle(&index, entry, awaiting.remove(&entry.line_item.id)))
        .collect();

    // Step 4: orders, shipments, tabs.
    let by_id: HashMap<LineItemId, &LineItemOutcome> =
        line_items.iter().map(|o| (o.line_item_id, o)).collect();

    let mut listing = candidates.clone();
    sort_orders(&mut listing, config.order_sort);

    let orders: Vec<OrderClassification> = listing
        .iter()
        .map(|order| classify_order(order, &by_id))
        .collect();

    let readiness: HashMap<LineItemId, LineReadiness> = line_items
        .iter()
        .map(|o| {
            (
                o.line_item_id,
                LineReadiness {
                    shippable: o.is_shippable(),
                    inventory_level: o.inventory_level,
                },
            )
        })
        .collect();

    let shipments: Vec<ShipmentPlan> = listing
        .iter()
        .zip(&orders)
        .filter(|(_, c)| c.fully_shippable || c.partially_shippable)
        .map(|(order, _)| group_shipments(order, &snapshot.shipments_for(order.id), &readiness))
        .collect();

    let tab_counts = TabCounts::tally(run_id, started_at, &orders);

    let count_state = |f: fn(&LineItemState) -> bool| line_items.iter().filter(|o| f(&o.state)).count();
    let summary = PassSummary {
        run_id,
        started_at,
        orders_considered: candidates.len(),
        line_items_classified: count_state(|s| matches!(s, LineItemState::Active(_))),
        line_items_terminal: count_state(|s| matches!(s, LineItemState::Terminal)),
        custom_line_items: count_state(|s| matches!(s, LineItemState::Custom)),
        skipped,
        pool_warnings,
        reservations_made: reservations.len(),
    };

    tracing::info!(
        run_id = %summary.run_id,
        orders = summary.orders_considered,
        classified = summary.line_items_classified,
        terminal = summary.line_items_terminal,
        custom = summary.custom_line_items,
        skipped = summary.skipped.len(),
        pool_warnings = summary.pool_warnings.len(),
        reservations = summary.reservations_made,
        fully_shippable = tab_counts.fully_shippable,
        needs_action = tab_counts.needs_action,
        "Allocation pass complete"
    );

    PassOutcome {
        summary,
        line_items,
        orders,
        reservations,
        shipments,
        tab_counts,
    }
}

fn settle(
    index: &CatalogIndex<'_>,
    entry: &Entry<'_>,
    awaiting: Option<AwaitingInventory>,
) -> LineItemOutcome {
    let mut outcome = LineItemOutcome {
        line_item_id: entry.line_item.id,
        order_id: entry.order.id,
        state: LineItemState::Skipped,
        variant_ids: Vec::new(),
        inventory_level: 0,
        awaiting: AwaitingInventory::default(),
        resize_candidates: Vec::new(),
    };

    match &entry.working {
        Working::Skipped => {}
        Working::Terminal => outcome.state = LineItemState::Terminal,
        Working::Custom => outcome.state = LineItemState::Custom,
        Working::Resolved {
            variants,
            level,
            claim,
        } => {
            let awaiting = awaiting.unwrap_or_default();
            let (claimed, unclaimed) = match *claim {
                ClaimOutcome::Claimed => (true, 0),
                ClaimOutcome::Short { unclaimed } => (false, unclaimed),
            };
            let donors = if claimed || unclaimed > 0 || !awaiting.is_empty() {
                Vec::new()
            } else {
                resize_candidates(index, variants, *level)
            };

            outcome.state = LineItemState::Active(LineItemStatus::decide(
                claimed,
                unclaimed,
                &awaiting,
                !donors.is_empty(),
            ));
            outcome.variant_ids = variants.iter().map(|v| v.id).collect();
            outcome.inventory_level = *level;
            outcome.awaiting = awaiting;
            outcome.resize_candidates = donors.iter().map(|v| v.id).collect();
        }
    }
    outcome
}
