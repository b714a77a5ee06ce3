//! Prior shipment history.

use chrono::{DateTime, Utc};
use lustre_core::{AddressId, LineItemId, OrderId, ShipmentId};
use serde::{Deserialize, Serialize};

/// A shipment that has already been packed for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Shipment ID.
    pub id: ShipmentId,
    /// Order the shipment belongs to.
    pub order_id: OrderId,
    /// Destination address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_id: Option<AddressId>,
    /// Line items packed and their quantities.
    #[serde(default)]
    pub lines: Vec<ShipmentLine>,
    /// When the shipment was created.
    pub created_at: DateTime<Utc>,
}

impl ShipmentRecord {
    /// Packed quantity for a line item, if it is in this shipment.
    #[must_use]
    pub fn quantity_for(&self, line_item_id: LineItemId) -> Option<i32> {
        self.lines
            .iter()
            .find(|line| line.line_item_id == line_item_id)
            .map(|line| line.quantity)
    }
}

/// One packed line within a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentLine {
    pub line_item_id: LineItemId,
    pub quantity: i32,
}
