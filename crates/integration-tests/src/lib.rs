//! Integration tests for Lustre.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lustre-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `allocation_properties` - Properties every pass must hold (conservation, determinism, ...)
//! - `scenarios` - End-to-end order scenarios
//! - `writeback` - Pass results flowing through the sinks
//!
//! Tests build snapshots with [`SnapshotBuilder`]. Orders are created one
//! minute apart in the order they are added, and their line items inherit the
//! order's creation time.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{DateTime, Duration, NaiveDate, Utc};
use lustre_core::{
    AddressId, FinancialStatus, FulfillmentStatus, LineItemId, OptionDimension, OptionSignature,
    OrderId, Price, ProductId, ResizeId, ShipmentId, VariantId, VendorId, VendorOrderId,
    VendorOrderVariantId,
};
use lustre_fulfillment::Snapshot;
use lustre_fulfillment::models::{
    Address, BundleComposition, LineItem, Order, Product, Resize, ShipmentLine, ShipmentRecord,
    Variant, Vendor, VendorOrder, VendorOrderVariant,
};

/// Fixed point in time `minutes` after the Unix epoch.
#[must_use]
pub fn at(minutes: i64) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(minutes)
}

/// Calendar date. Falls back to the epoch for impossible dates.
#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Option signature from `(dimension, value)` pairs.
#[must_use]
pub fn options(pairs: &[(OptionDimension, &str)]) -> OptionSignature {
    pairs
        .iter()
        .fold(OptionSignature::new(), |sig, &(dim, value)| sig.with(dim, value))
}

/// A line item with nothing shipped yet. Order and creation time are set
/// when the line item is added to an order.
#[must_use]
pub fn line(id: i32, product: i32, selection: OptionSignature, quantity: i32) -> LineItem {
    LineItem {
        id: LineItemId::new(id),
        order_id: OrderId::new(0),
        product_id: Some(ProductId::new(product)),
        title: format!("Line item {id}"),
        options: selection,
        quantity,
        quantity_shipped: 0,
        address_id: None,
        created_at: at(0),
    }
}

/// A line item for a one-off piece with no catalog product.
#[must_use]
pub fn custom_line(id: i32, quantity: i32) -> LineItem {
    LineItem {
        product_id: None,
        ..line(id, 0, OptionSignature::new(), quantity)
    }
}

/// A shipping address.
#[must_use]
pub fn address(id: i32) -> Address {
    Address {
        id: AddressId::new(id),
        name: format!("Recipient {id}"),
        address1: format!("{id} Market St"),
        address2: None,
        city: "San Francisco".to_string(),
        province_code: Some("CA".to_string()),
        zip: "94103".to_string(),
        country_code: "US".to_string(),
    }
}

/// Builds a [`Snapshot`] one record at a time.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn product(mut self, id: i32) -> Self {
        self.snapshot.products.push(Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            bundle: None,
        });
        self
    }

    /// A bundle product shipping the given component variants by default.
    #[must_use]
    pub fn bundle(mut self, id: i32, components: &[i32]) -> Self {
        self.snapshot.products.push(Product {
            id: ProductId::new(id),
            title: format!("Bundle {id}"),
            bundle: Some(BundleComposition {
                default_variant_ids: components.iter().copied().map(VariantId::new).collect(),
            }),
        });
        self
    }

    #[must_use]
    pub fn variant(mut self, id: i32, product: i32, sig: OptionSignature, inventory: i32) -> Self {
        self.snapshot.variants.push(Variant {
            id: VariantId::new(id),
            product_id: ProductId::new(product),
            options: sig,
            inventory,
            sku: Some(format!("SKU-{id}")),
        });
        self
    }

    /// An unfulfilled, paid order created after every order added before it.
    #[must_use]
    pub fn order(self, id: i32, line_items: Vec<LineItem>) -> Self {
        self.order_with(id, line_items, |_| {})
    }

    /// Like [`Self::order`], with a hook to adjust the order before it is added.
    #[must_use]
    pub fn order_with(
        mut self,
        id: i32,
        line_items: Vec<LineItem>,
        adjust: impl FnOnce(&mut Order),
    ) -> Self {
        let created_at = at(i64::try_from(self.snapshot.orders.len()).unwrap_or(0) + 1);
        let order_id = OrderId::new(id);
        let mut order = Order {
            id: order_id,
            name: format!("#{}", 1000 + id),
            created_at,
            fulfillment_status: FulfillmentStatus::Unfulfilled,
            financial_status: FinancialStatus::Paid,
            total_price: Price::zero(),
            date_needed: None,
            billing_address: Some(address(900 + id)),
            shipping_addresses: vec![address(id)],
            line_items: line_items
                .into_iter()
                .map(|li| LineItem {
                    order_id,
                    created_at,
                    ..li
                })
                .collect(),
        };
        adjust(&mut order);
        self.snapshot.orders.push(order);
        self
    }

    #[must_use]
    pub fn vendor(mut self, id: i32, wait_time_days: Option<i64>) -> Self {
        self.snapshot.vendors.push(Vendor {
            id: VendorId::new(id),
            name: format!("Vendor {id}"),
            wait_time_days,
        });
        self
    }

    /// An open vendor order. Lines are `(line id, variant id, units)`.
    #[must_use]
    pub fn vendor_order(
        mut self,
        id: i32,
        vendor: Option<i32>,
        date_ordered: NaiveDate,
        lines: &[(i32, i32, i32)],
    ) -> Self {
        self.snapshot.vendor_orders.push(VendorOrder {
            id: VendorOrderId::new(id),
            vendor_id: vendor.map(VendorId::new),
            date_ordered,
            created_at: at(i64::from(id)),
            done: false,
            variants: lines
                .iter()
                .map(|&(line_id, variant, units)| VendorOrderVariant {
                    id: VendorOrderVariantId::new(line_id),
                    variant_id: VariantId::new(variant),
                    units,
                    received: 0,
                    done: false,
                    created_at: at(i64::from(line_id)),
                })
                .collect(),
        });
        self
    }

    /// An open resize turning `from` units into `to` units.
    #[must_use]
    pub fn resize(mut self, id: i32, from: i32, to: i32, units: i32, received: i32) -> Self {
        self.snapshot.resizes.push(Resize {
            id: ResizeId::new(id),
            from_variant_id: VariantId::new(from),
            to_variant_id: VariantId::new(to),
            units,
            received,
            done: false,
            created_at: at(i64::from(id)),
        });
        self
    }

    /// A prior shipment. Lines are `(line item id, quantity)`.
    #[must_use]
    pub fn shipment(mut self, id: i32, order: i32, address: i32, lines: &[(i32, i32)]) -> Self {
        self.snapshot.shipments.push(ShipmentRecord {
            id: ShipmentId::new(id),
            order_id: OrderId::new(order),
            address_id: Some(AddressId::new(address)),
            lines: lines
                .iter()
                .map(|&(line_item, quantity)| ShipmentLine {
                    line_item_id: LineItemId::new(line_item),
                    quantity,
                })
                .collect(),
            created_at: at(i64::from(id)),
        });
        self
    }

    #[must_use]
    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}
