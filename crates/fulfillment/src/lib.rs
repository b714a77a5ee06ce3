//! Lustre Fulfillment - inventory allocation and fulfillment classification.
//!
//! Given a snapshot of open orders, the variant catalog and the incoming
//! inventory (vendor restocks and resize conversions), a pass decides for
//! every outstanding line item whether it can ship now, partially ship, is
//! waiting on a reserved incoming unit, could be resized from a sibling
//! variant, or is blocked. Orders are then aggregated for the dashboard tabs
//! and shippable orders are grouped into shipment batches.
//!
//! # Architecture
//!
//! The engine is a pure computation over data loaded up front. Everything that
//! touches the outside world goes through the traits in [`feed`] and [`sink`].
//!
//! # Modules
//!
//! - [`models`] - Data contracts consumed from the feeds
//! - [`catalog`] - Catalog index and variant resolution
//! - [`inventory`] - On-hand inventory level for resolved variants
//! - [`allocation`] - Claim ledger, incoming pool, reservations, classification
//! - [`resize`] - Resize donor search
//! - [`shipment`] - Shipment grouping
//! - [`pass`] - One full allocation pass
//! - [`metrics`] - Dashboard tab counts
//! - [`feed`] - Input snapshot and its loader trait
//! - [`sink`] - Writeback of derived fields, shipment plans and tab counts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod allocation;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feed;
pub mod inventory;
pub mod metrics;
pub mod models;
pub mod pass;
pub mod resize;
pub mod shipment;
pub mod sink;

pub use config::{DEFAULT_VENDOR_WAIT_DAYS, EngineConfig, OrderSort};
pub use error::{FeedError, ResolveError, SinkError, SkipReason};
pub use feed::{Snapshot, SnapshotSource};
pub use metrics::{OrderTab, TabCounts};
pub use pass::{PassOutcome, PassSummary, SkippedLineItem, run_pass};
pub use sink::{
    LineItemUpdate, MemorySink, MetricsSink, OrderUpdate, PersistenceSink, ShipmentSink,
    WritebackReport, persist,
};
