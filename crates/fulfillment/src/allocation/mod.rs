//! Inventory allocation.
//!
//! A pass allocates in three steps, all in creation-time order:
//!
//! 1. [`ClaimLedger`] walks every outstanding line item and claims on-hand
//!    units for it when the running total per variant still fits the level.
//! 2. [`AllocationContext`] walks the line items that could not claim stock
//!    and reserves units from the [`IncomingPool`] of open resizes and vendor
//!    orders.
//! 3. [`classify`] turns both results into a per-line-item status and
//!    per-order aggregates.
//!
//! The pool is owned by the context, which is created fresh for every pass, so
//! no unit can be handed to two line items.

pub mod classify;
pub mod ledger;
pub mod pool;
pub mod reservation;

pub use classify::{
    LineItemOutcome, LineItemState, LineItemStatus, OrderClassification, OrderShippability,
    classify_order, sort_orders,
};
pub use ledger::{ClaimLedger, ClaimOutcome};
pub use pool::{IncomingPool, PoolEntry, PoolWarning};
pub use reservation::{AllocationContext, AwaitingInventory, Reservation};
