//! Data contracts the engine consumes.
//!
//! These mirror the records the order, catalog and incoming-inventory feeds
//! hand over. They carry no derived classification state; everything the
//! engine computes lives in [`crate::pass::PassOutcome`].

pub mod catalog;
pub mod incoming;
pub mod order;
pub mod shipment;

pub use catalog::{BundleComposition, Product, Variant};
pub use incoming::{IncomingRecordRef, Resize, Vendor, VendorOrder, VendorOrderVariant};
pub use order::{Address, LineItem, Order};
pub use shipment::{ShipmentLine, ShipmentRecord};
