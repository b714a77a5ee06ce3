//! Orders and their line items.

use chrono::{DateTime, NaiveDate, Utc};
use lustre_core::{
    AddressId, FinancialStatus, FulfillmentStatus, LineItemId, OptionSignature, OrderId, Price,
    ProductId,
};
use serde::{Deserialize, Serialize};

/// A postal address attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Address ID.
    pub id: AddressId,
    /// Recipient name.
    #[serde(default)]
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address1: String,
    /// Apartment, suite, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    /// City.
    #[serde(default)]
    pub city: String,
    /// State or province code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_code: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub zip: String,
    /// Country code.
    #[serde(default)]
    pub country_code: String,
}

/// One product entry within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Line item ID.
    pub id: LineItemId,
    /// Parent order.
    pub order_id: OrderId,
    /// Product ordered. `None` for custom pieces that are not in the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    /// Title shown on packing slips.
    #[serde(default)]
    pub title: String,
    /// The customer's option selections.
    #[serde(default)]
    pub options: OptionSignature,
    /// Units ordered.
    pub quantity: i32,
    /// Units already shipped.
    #[serde(default)]
    pub quantity_shipped: i32,
    /// Destination address. Falls back to the order's first shipping address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_id: Option<AddressId>,
    /// When the line item was created.
    pub created_at: DateTime<Utc>,
}

impl LineItem {
    /// Units still to ship.
    #[must_use]
    pub fn remaining(&self) -> i32 {
        self.quantity.saturating_sub(self.quantity_shipped).max(0)
    }

    /// A fully shipped line item is never reclassified or reserved against.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.quantity_shipped >= self.quantity
    }
}

/// An order as ingested from the commerce platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Display name (e.g., "#1001").
    #[serde(default)]
    pub name: String,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Fulfillment status.
    #[serde(default)]
    pub fulfillment_status: FulfillmentStatus,
    /// Financial status.
    #[serde(default)]
    pub financial_status: FinancialStatus,
    /// Order total.
    #[serde(default)]
    pub total_price: Price,
    /// Date the customer needs the order by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_needed: Option<NaiveDate>,
    /// Billing address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    /// Destination addresses.
    #[serde(default)]
    pub shipping_addresses: Vec<Address>,
    /// Line items, in the order the customer added them.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Order {
    /// Destination of a line item.
    #[must_use]
    pub fn address_for(&self, line_item: &LineItem) -> Option<AddressId> {
        line_item
            .address_id
            .or_else(|| self.shipping_addresses.first().map(|a| a.id))
    }
}
