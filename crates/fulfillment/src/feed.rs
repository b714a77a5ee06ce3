//! Input snapshot and the trait hosts implement to load it.
//!
//! A pass works on one consistent read of the orders, the catalog and the
//! incoming inventory. Hosts load that read however they like (files, a
//! database, the commerce platform's API) and hand the engine a [`Snapshot`].

use std::future::Future;

use lustre_core::OrderId;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::FeedError;
use crate::models::{Order, Product, Resize, ShipmentRecord, Variant, Vendor, VendorOrder};

/// Everything one pass reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub orders: Vec<Order>,
    pub products: Vec<Product>,
    pub variants: Vec<Variant>,
    pub vendors: Vec<Vendor>,
    pub vendor_orders: Vec<VendorOrder>,
    pub resizes: Vec<Resize>,
    pub shipments: Vec<ShipmentRecord>,
}

impl Snapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::Json` if the payload is not a valid snapshot.
    pub fn from_json_str(s: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Orders the pass considers, oldest first.
    ///
    /// An order is a candidate when its fulfillment status is one of the
    /// configured statuses and it has not been refunded or voided. Ties on
    /// creation time fall back to the order id.
    #[must_use]
    pub fn candidate_orders(&self, config: &EngineConfig) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self
            .orders
            .iter()
            .filter(|o| config.candidate_statuses.contains(&o.fulfillment_status))
            .filter(|o| !o.financial_status.is_closed())
            .collect();
        orders.sort_by_key(|o| (o.created_at, o.id));
        orders
    }

    /// Prior shipments of an order, oldest first.
    #[must_use]
    pub fn shipments_for(&self, order_id: OrderId) -> Vec<&ShipmentRecord> {
        let mut records: Vec<&ShipmentRecord> = self
            .shipments
            .iter()
            .filter(|s| s.order_id == order_id)
            .collect();
        records.sort_by_key(|s| (s.created_at, s.id));
        records
    }
}

/// Somewhere a snapshot can be loaded from.
pub trait SnapshotSource {
    /// Load a consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns `FeedError` when the source cannot be read or parsed. A failed
    /// load aborts the pass before anything is written.
    fn load(&self) -> impl Future<Output = Result<Snapshot, FeedError>> + Send;
}

/// An in-memory snapshot is its own source.
impl SnapshotSource for Snapshot {
    async fn load(&self) -> Result<Snapshot, FeedError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lustre_core::{FinancialStatus, FulfillmentStatus};

    use super::*;

    const SNAPSHOT: &str = r##"{
        "orders": [
            {
                "id": 2,
                "name": "#1002",
                "created_at": "2024-03-02T10:00:00Z",
                "fulfillment_status": "UNFULFILLED",
                "financial_status": "PAID",
                "total_price": { "amount": "120.00" },
                "line_items": []
            },
            {
                "id": 1,
                "name": "#1001",
                "created_at": "2024-03-01T10:00:00Z",
                "fulfillment_status": "PARTIALLY_FULFILLED",
                "financial_status": "PAID",
                "total_price": { "amount": "80.00" },
                "line_items": []
            },
            {
                "id": 3,
                "name": "#1003",
                "created_at": "2024-02-01T10:00:00Z",
                "fulfillment_status": "FULFILLED",
                "financial_status": "PAID",
                "total_price": { "amount": "10.00" },
                "line_items": []
            },
            {
                "id": 4,
                "name": "#1004",
                "created_at": "2024-02-01T10:00:00Z",
                "fulfillment_status": "UNFULFILLED",
                "financial_status": "REFUNDED",
                "total_price": { "amount": "10.00" },
                "line_items": []
            }
        ],
        "shipments": [
            { "id": 9, "order_id": 1, "lines": [], "created_at": "2024-03-05T00:00:00Z" },
            { "id": 8, "order_id": 1, "lines": [], "created_at": "2024-03-04T00:00:00Z" },
            { "id": 7, "order_id": 2, "lines": [], "created_at": "2024-03-04T00:00:00Z" }
        ]
    }"##;

    #[test]
    fn test_missing_sections_default_to_empty() {
        let snapshot = Snapshot::from_json_str("{}").unwrap();
        assert!(snapshot.orders.is_empty());
        assert!(snapshot.resizes.is_empty());
    }

    #[test]
    fn test_invalid_json_is_feed_error() {
        let err = Snapshot::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, FeedError::Json(_)));
    }

    #[test]
    fn test_candidate_orders_filters_and_sorts() {
        let snapshot = Snapshot::from_json_str(SNAPSHOT).unwrap();
        let ids: Vec<i32> = snapshot
            .candidate_orders(&EngineConfig::default())
            .iter()
            .map(|o| o.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(snapshot.orders[3].financial_status, FinancialStatus::Refunded);
    }

    #[test]
    fn test_candidate_statuses_are_configurable() {
        let snapshot = Snapshot::from_json_str(SNAPSHOT).unwrap();
        let config = EngineConfig {
            candidate_statuses: vec![FulfillmentStatus::Unfulfilled],
            ..EngineConfig::default()
        };
        let ids: Vec<i32> = snapshot
            .candidate_orders(&config)
            .iter()
            .map(|o| o.id.as_i32())
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_shipments_for_order() {
        let snapshot = Snapshot::from_json_str(SNAPSHOT).unwrap();
        let ids: Vec<i32> = snapshot
            .shipments_for(OrderId::new(1))
            .iter()
            .map(|s| s.id.as_i32())
            .collect();
        assert_eq!(ids, vec![8, 9]);
    }

    #[tokio::test]
    async fn test_snapshot_is_its_own_source() {
        let snapshot = Snapshot::from_json_str(SNAPSHOT).unwrap();
        let loaded = snapshot.load().await.unwrap();
        assert_eq!(loaded.orders.len(), 4);
    }
}
