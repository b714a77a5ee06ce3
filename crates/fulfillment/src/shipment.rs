//! Shipment grouping.
//!
//! Splits an order's line items into three partitions used downstream to
//! create shipment batches and labels:
//!
//! - already shipped: the line item appears in a prior shipment to the same
//!   address, grouped by that shipment
//! - shippable: claimed stock covering the full remaining quantity, grouped
//!   by destination address
//! - unshippable: everything else, grouped by destination address
//!
//! Groups appear in the order their first line item does.

use std::collections::HashMap;

use lustre_core::{AddressId, LineItemId, OrderId, ShipmentId};
use serde::{Deserialize, Serialize};

use crate::models::{Address, LineItem, Order, ShipmentRecord};

/// What the grouper needs to know about a line item from the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineReadiness {
    pub shippable: bool,
    pub inventory_level: i32,
}

/// One line item inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedLineItem {
    pub line_item_id: LineItemId,
    pub title: String,
    /// Packed quantity for shipped groups, remaining quantity otherwise.
    pub quantity: i32,
}

/// A batch of line items going to one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentGroup {
    pub order_id: OrderId,
    pub address_id: Option<AddressId>,
    /// Prior shipment, for already-shipped groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_id: Option<ShipmentId>,
    pub billing_address: Option<Address>,
    pub line_items: Vec<GroupedLineItem>,
}

/// The three partitions for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentPlan {
    pub order_id: OrderId,
    pub shipped: Vec<ShipmentGroup>,
    pub shippable: Vec<ShipmentGroup>,
    pub unshippable: Vec<ShipmentGroup>,
}

impl ShipmentPlan {
    /// Number of new shipment batches this plan asks for.
    #[must_use]
    pub fn new_batches(&self) -> usize {
        self.shippable.len()
    }
}

/// Group an order's line items.
///
/// `history` is the order's prior shipments. Line items missing from
/// `readiness` are treated as not shippable. Fully shipped line items that no
/// prior shipment accounts for are left out, as there is nothing left to pack.
#[must_use]
pub fn group_shipments(
    order: &Order,
    history: &[&ShipmentRecord],
    readiness: &HashMap<LineItemId, LineReadiness>,
) -> ShipmentPlan {
    let mut shipped = Groups::default();
    let mut shippable = Groups::default();
    let mut unshippable = Groups::default();

    for line_item in &order.line_items {
        let address_id = order.address_for(line_item);

        let prior = history.iter().find_map(|record| {
            if record.address_id != address_id {
                return None;
            }
            record
                .quantity_for(line_item.id)
                .map(|quantity| (record.id, quantity))
        });

        if let Some((shipment_id, quantity)) = prior {
            shipped.add(
                GroupKey::Shipment(shipment_id),
                order,
                address_id,
                grouped(line_item, quantity),
            );
            continue;
        }

        if line_item.is_terminal() {
            continue;
        }

        let ready = readiness.get(&line_item.id).is_some_and(|r| {
            r.shippable && r.inventory_level >= line_item.remaining()
        });
        let target = if ready { &mut shippable } else { &mut unshippable };
        target.add(
            GroupKey::Address(address_id),
            order,
            address_id,
            grouped(line_item, line_item.remaining()),
        );
    }

    ShipmentPlan {
        order_id: order.id,
        shipped: shipped.into_groups(),
        shippable: shippable.into_groups(),
        unshippable: unshippable.into_groups(),
    }
}

fn grouped(line_item: &LineItem, quantity: i32) -> GroupedLineItem {
    GroupedLineItem {
        line_item_id: line_item.id,
        title: line_item.title.clone(),
        quantity,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GroupKey {
    Shipment(ShipmentId),
    Address(Option<AddressId>),
}

#[derive(Default)]
struct Groups {
    index: HashMap<GroupKey, usize>,
    groups: Vec<ShipmentGroup>,
}

impl Groups {
    fn add(
        &mut self,
        key: GroupKey,
        order: &Order,
        address_id: Option<AddressId>,
        item: GroupedLineItem,
    ) {
        match self.index.get(&key).and_then(|&slot| self.groups.get_mut(slot)) {
            Some(group) => group.line_items.push(item),
            None => {
                self.index.insert(key, self.groups.len());
                self.groups.push(ShipmentGroup {
                    order_id: order.id,
                    address_id,
                    shipment_id: match key {
                        GroupKey::Shipment(id) => Some(id),
                        GroupKey::Address(_) => None,
                    },
                    billing_address: order.billing_address.clone(),
                    line_items: vec![item],
                });
            }
        }
    }

    fn into_groups(self) -> Vec<ShipmentGroup> {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use lustre_core::{FinancialStatus, FulfillmentStatus, OptionSignature, Price};

    use super::*;
    use crate::models::ShipmentLine;

    fn address(id: i32) -> Address {
        Address {
            id: AddressId::new(id),
            name: format!("Recipient {id}"),
            address1: "1 Main St".to_string(),
            address2: None,
            city: "Portland".to_string(),
            province_code: Some("OR".to_string()),
            zip: "97201".to_string(),
            country_code: "US".to_string(),
        }
    }

    fn line(id: i32, quantity: i32, shipped: i32, address: Option<i32>) -> LineItem {
        LineItem {
            id: LineItemId::new(id),
            order_id: OrderId::new(1),
            product_id: None,
            title: format!("Item {id}"),
            options: OptionSignature::default(),
            quantity,
            quantity_shipped: shipped,
            address_id: address.map(AddressId::new),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn order(lines: Vec<LineItem>) -> Order {
        Order {
            id: OrderId::new(1),
            name: "#1".to_string(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            fulfillment_status: FulfillmentStatus::PartiallyFulfilled,
            financial_status: FinancialStatus::Paid,
            total_price: Price::zero(),
            date_needed: None,
            billing_address: Some(address(99)),
            shipping_addresses: vec![address(1), address(2)],
            line_items: lines,
        }
    }

    fn ready(entries: &[(i32, bool, i32)]) -> HashMap<LineItemId, LineReadiness> {
        entries
            .iter()
            .map(|&(id, shippable, inventory_level)| {
                (
                    LineItemId::new(id),
                    LineReadiness {
                        shippable,
                        inventory_level,
                    },
                )
            })
            .collect()
    }

    fn ids(group: &ShipmentGroup) -> Vec<i32> {
        group.line_items.iter().map(|l| l.line_item_id.as_i32()).collect()
    }

    #[test]
    fn test_groups_by_address() {
        let o = order(vec![
            line(1, 1, 0, None),
            line(2, 1, 0, Some(2)),
            line(3, 1, 0, Some(1)),
        ]);
        let plan = group_shipments(&o, &[], &ready(&[(1, true, 5), (2, true, 5), (3, true, 5)]));

        assert!(plan.shipped.is_empty());
        assert!(plan.unshippable.is_empty());
        assert_eq!(plan.shippable.len(), 2);
        assert_eq!(plan.shippable[0].address_id, Some(AddressId::new(1)));
        assert_eq!(ids(&plan.shippable[0]), vec![1, 3]);
        assert_eq!(ids(&plan.shippable[1]), vec![2]);
        assert_eq!(plan.shippable[0].billing_address, Some(address(99)));
        assert_eq!(plan.new_batches(), 2);
    }

    #[test]
    fn test_prior_shipment_takes_precedence() {
        let o = order(vec![line(1, 2, 1, Some(1)), line(2, 1, 0, Some(1))]);
        let record = ShipmentRecord {
            id: ShipmentId::new(50),
            order_id: OrderId::new(1),
            address_id: Some(AddressId::new(1)),
            lines: vec![ShipmentLine {
                line_item_id: LineItemId::new(1),
                quantity: 1,
            }],
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let plan = group_shipments(&o, &[&record], &ready(&[(1, true, 5), (2, false, 0)]));

        assert_eq!(plan.shipped.len(), 1);
        assert_eq!(plan.shipped[0].shipment_id, Some(ShipmentId::new(50)));
        assert_eq!(plan.shipped[0].line_items[0].quantity, 1);
        assert!(plan.shippable.is_empty());
        assert_eq!(ids(&plan.unshippable[0]), vec![2]);
    }

    #[test]
    fn test_prior_shipment_to_other_address_does_not_match() {
        let o = order(vec![line(1, 1, 0, Some(2))]);
        let record = ShipmentRecord {
            id: ShipmentId::new(50),
            order_id: OrderId::new(1),
            address_id: Some(AddressId::new(1)),
            lines: vec![ShipmentLine {
                line_item_id: LineItemId::new(1),
                quantity: 1,
            }],
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let plan = group_shipments(&o, &[&record], &ready(&[(1, true, 1)]));
        assert!(plan.shipped.is_empty());
        assert_eq!(ids(&plan.shippable[0]), vec![1]);
    }

    #[test]
    fn test_shippable_needs_stock_for_full_remaining_quantity() {
        let o = order(vec![line(1, 3, 0, None)]);
        let plan = group_shipments(&o, &[], &ready(&[(1, true, 2)]));
        assert!(plan.shippable.is_empty());
        assert_eq!(plan.unshippable[0].line_items[0].quantity, 3);
    }

    #[test]
    fn test_terminal_without_history_is_left_out() {
        let o = order(vec![line(1, 1, 1, None), line(2, 1, 0, None)]);
        let plan = group_shipments(&o, &[], &ready(&[(2, false, 0)]));
        assert!(plan.shipped.is_empty());
        assert!(plan.shippable.is_empty());
        assert_eq!(ids(&plan.unshippable[0]), vec![2]);
    }
}
