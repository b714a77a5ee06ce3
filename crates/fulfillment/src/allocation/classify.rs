//! Line-item statuses and order aggregates.

use std::cmp::Ordering;
use std::collections::HashMap;

use lustre_core::{LineItemId, OrderId, VariantId};
use serde::{Deserialize, Serialize};

use super::reservation::AwaitingInventory;
use crate::config::OrderSort;
use crate::models::Order;

/// Where an outstanding line item stands after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemStatus {
    /// On-hand stock was claimed for the full quantity.
    Shippable,
    /// Some unclaimed stock exists, but not enough for the full quantity.
    PartiallyShippable,
    /// Incoming units are reserved for it.
    AwaitingInventory,
    /// A sibling variant in another size is in stock.
    Resizable,
    /// No stock, no reservation, no resize donor.
    Blocked,
}

impl LineItemStatus {
    /// Pick the status from the pass results. Earlier checks win.
    #[must_use]
    pub fn decide(claimed: bool, unclaimed: i32, awaiting: &AwaitingInventory, resizable: bool) -> Self {
        if claimed {
            Self::Shippable
        } else if unclaimed > 0 {
            Self::PartiallyShippable
        } else if !awaiting.is_empty() {
            Self::AwaitingInventory
        } else if resizable {
            Self::Resizable
        } else {
            Self::Blocked
        }
    }
}

/// How a pass treated a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "status")]
pub enum LineItemState {
    /// Fully shipped. Only its awaiting fields are cleared.
    Terminal,
    /// Resolved to no catalog variant.
    Custom,
    /// Catalog references are broken. Left untouched.
    Skipped,
    /// Outstanding and classified.
    Active(LineItemStatus),
}

/// Everything a pass derived for one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemOutcome {
    pub line_item_id: LineItemId,
    pub order_id: OrderId,
    pub state: LineItemState,
    /// Resolved variants.
    pub variant_ids: Vec<VariantId>,
    /// Minimum on-hand across the resolved variants.
    pub inventory_level: i32,
    pub awaiting: AwaitingInventory,
    /// In-stock siblings that could be resized into this line item's variant.
    pub resize_candidates: Vec<VariantId>,
}

impl LineItemOutcome {
    #[must_use]
    pub const fn status(&self) -> Option<LineItemStatus> {
        match self.state {
            LineItemState::Active(status) => Some(status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_shippable(&self) -> bool {
        self.status() == Some(LineItemStatus::Shippable)
    }

    /// Counted in order aggregates. Custom and skipped line items still have
    /// units to ship but can never be shippable.
    #[must_use]
    pub const fn is_outstanding(&self) -> bool {
        !matches!(self.state, LineItemState::Terminal)
    }

    /// Has an incoming reservation to wait on.
    #[must_use]
    pub fn is_covered(&self) -> bool {
        !self.awaiting.is_empty()
    }
}

/// Order-level shippability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderShippability {
    FullyShippable,
    PartiallyShippable,
    CannotShip,
}

/// Aggregates for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderClassification {
    pub order_id: OrderId,
    pub order_name: String,
    pub shippability: OrderShippability,
    pub fully_shippable: bool,
    pub partially_shippable: bool,
    /// Something can ship, or some line item has no way of getting stock.
    pub needs_action: bool,
    /// Cannot ship, but every outstanding line item has a reservation.
    pub awaiting_inventory: bool,
    pub resizable: bool,
    pub has_custom: bool,
    pub outstanding_line_items: usize,
    pub shippable_line_items: usize,
}

/// Aggregate an order from its line-item outcomes.
///
/// Line items without an outcome (not part of the pass) and terminal line
/// items are ignored.
#[must_use]
pub fn classify_order(
    order: &Order,
    outcomes: &HashMap<LineItemId, &LineItemOutcome>,
) -> OrderClassification {
    let lines: Vec<&LineItemOutcome> = order
        .line_items
        .iter()
        .filter_map(|li| outcomes.get(&li.id).copied())
        .collect();
    let outstanding: Vec<&LineItemOutcome> =
        lines.iter().copied().filter(|o| o.is_outstanding()).collect();

    let total = outstanding.len();
    let shippable = outstanding.iter().filter(|o| o.is_shippable()).count();

    let shippability = if total > 0 && shippable == total {
        OrderShippability::FullyShippable
    } else if shippable > 0 {
        OrderShippability::PartiallyShippable
    } else {
        OrderShippability::CannotShip
    };
    let fully_shippable = shippability == OrderShippability::FullyShippable;
    let partially_shippable = shippability == OrderShippability::PartiallyShippable;

    let all_covered = outstanding.iter().all(|o| o.is_covered());
    let needs_action = fully_shippable || partially_shippable || (total > 0 && !all_covered);
    let awaiting_inventory =
        shippability == OrderShippability::CannotShip && total > 0 && all_covered;

    OrderClassification {
        order_id: order.id,
        order_name: order.name.clone(),
        shippability,
        fully_shippable,
        partially_shippable,
        needs_action,
        awaiting_inventory,
        resizable: outstanding
            .iter()
            .any(|o| o.status() == Some(LineItemStatus::Resizable)),
        has_custom: outstanding
            .iter()
            .any(|o| o.state == LineItemState::Custom),
        outstanding_line_items: total,
        shippable_line_items: shippable,
    }
}

/// Sort orders for the listing. Ties keep their incoming relative order,
/// which the pass sets to creation-time ascending.
pub fn sort_orders(orders: &mut [&Order], sort: OrderSort) {
    match sort {
        OrderSort::CreatedAsc => orders.sort_by_key(|o| o.created_at),
        OrderSort::CreatedDesc => orders.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        OrderSort::PriceAsc => {
            orders.sort_by(|a, b| a.total_price.amount.cmp(&b.total_price.amount));
        }
        OrderSort::PriceDesc => {
            orders.sort_by(|a, b| b.total_price.amount.cmp(&a.total_price.amount));
        }
        OrderSort::DateNeededAsc => {
            orders.sort_by(|a, b| needed_last(a, b, |x, y| x.cmp(&y)));
        }
        OrderSort::DateNeededDesc => {
            orders.sort_by(|a, b| needed_last(a, b, |x, y| y.cmp(&x)));
        }
    }
}

fn needed_last(
    a: &Order,
    b: &Order,
    cmp: impl Fn(chrono::NaiveDate, chrono::NaiveDate) -> Ordering,
) -> Ordering {
    match (a.date_needed, b.date_needed) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Duration, NaiveDate, Utc};
    use lustre_core::{CurrencyCode, OptionSignature, Price, ResizeId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::{IncomingRecordRef, LineItem};

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(minutes)
    }

    fn order(id: i32, line_ids: &[i32]) -> Order {
        Order {
            id: OrderId::new(id),
            name: format!("#{id}"),
            created_at: at(i64::from(id)),
            fulfillment_status: lustre_core::FulfillmentStatus::Unfulfilled,
            financial_status: lustre_core::FinancialStatus::Paid,
            total_price: Price::zero(),
            date_needed: None,
            billing_address: None,
            shipping_addresses: Vec::new(),
            line_items: line_ids
                .iter()
                .map(|&li| LineItem {
                    id: LineItemId::new(li),
                    order_id: OrderId::new(id),
                    product_id: None,
                    title: String::new(),
                    options: OptionSignature::default(),
                    quantity: 1,
                    quantity_shipped: 0,
                    address_id: None,
                    created_at: at(i64::from(id)),
                })
                .collect(),
        }
    }

    fn outcome(id: i32, state: LineItemState, covered: bool) -> LineItemOutcome {
        let mut awaiting = AwaitingInventory::default();
        if covered {
            awaiting.records.push(IncomingRecordRef::Resize(ResizeId::new(id)));
        }
        LineItemOutcome {
            line_item_id: LineItemId::new(id),
            order_id: OrderId::new(1),
            state,
            variant_ids: Vec::new(),
            inventory_level: 0,
            awaiting,
            resize_candidates: Vec::new(),
        }
    }

    fn classify(order: &Order, outcomes: &[LineItemOutcome]) -> OrderClassification {
        let map = outcomes.iter().map(|o| (o.line_item_id, o)).collect();
        classify_order(order, &map)
    }

    const SHIPPABLE: LineItemState = LineItemState::Active(LineItemStatus::Shippable);
    const AWAITING: LineItemState = LineItemState::Active(LineItemStatus::AwaitingInventory);
    const BLOCKED: LineItemState = LineItemState::Active(LineItemStatus::Blocked);

    #[test]
    fn test_status_precedence() {
        let covered = AwaitingInventory {
            records: vec![IncomingRecordRef::Resize(ResizeId::new(1))],
            ..AwaitingInventory::default()
        };
        let none = AwaitingInventory::default();
        assert_eq!(LineItemStatus::decide(true, 0, &covered, true), LineItemStatus::Shippable);
        assert_eq!(
            LineItemStatus::decide(false, 1, &covered, false),
            LineItemStatus::PartiallyShippable
        );
        assert_eq!(
            LineItemStatus::decide(false, 0, &covered, true),
            LineItemStatus::AwaitingInventory
        );
        assert_eq!(LineItemStatus::decide(false, 0, &none, true), LineItemStatus::Resizable);
        assert_eq!(LineItemStatus::decide(false, 0, &none, false), LineItemStatus::Blocked);
    }

    #[test]
    fn test_two_shippable_one_awaiting_is_partial() {
        let o = order(1, &[1, 2, 3]);
        let c = classify(
            &o,
            &[
                outcome(1, SHIPPABLE, false),
                outcome(2, SHIPPABLE, false),
                outcome(3, AWAITING, true),
            ],
        );
        assert!(c.partially_shippable);
        assert!(!c.fully_shippable);
        assert!(c.needs_action);
        assert!(!c.awaiting_inventory);
        assert_eq!(c.shippability, OrderShippability::PartiallyShippable);
    }

    #[test]
    fn test_all_shippable_is_full() {
        let o = order(1, &[1, 2]);
        let c = classify(&o, &[outcome(1, SHIPPABLE, false), outcome(2, SHIPPABLE, false)]);
        assert!(c.fully_shippable);
        assert!(c.needs_action);
    }

    #[test]
    fn test_all_covered_does_not_need_action() {
        let o = order(1, &[1, 2]);
        let c = classify(&o, &[outcome(1, AWAITING, true), outcome(2, AWAITING, true)]);
        assert_eq!(c.shippability, OrderShippability::CannotShip);
        assert!(!c.needs_action);
        assert!(c.awaiting_inventory);
    }

    #[test]
    fn test_one_line_without_rescue_needs_action() {
        let o = order(1, &[1, 2]);
        let c = classify(&o, &[outcome(1, AWAITING, true), outcome(2, BLOCKED, false)]);
        assert!(c.needs_action);
        assert!(!c.awaiting_inventory);
    }

    #[test]
    fn test_custom_line_blocks_full_shipment() {
        let o = order(1, &[1, 2]);
        let c = classify(
            &o,
            &[outcome(1, SHIPPABLE, false), outcome(2, LineItemState::Custom, false)],
        );
        assert!(c.partially_shippable);
        assert!(c.has_custom);
        assert_eq!(c.outstanding_line_items, 2);
    }

    #[test]
    fn test_terminal_is_ignored_and_skipped_blocks_full_shipment() {
        let o = order(1, &[1, 2, 3]);
        let c = classify(
            &o,
            &[
                outcome(1, SHIPPABLE, false),
                outcome(2, LineItemState::Terminal, false),
                outcome(3, LineItemState::Skipped, false),
            ],
        );
        assert!(!c.fully_shippable);
        assert!(c.partially_shippable);
        assert!(c.needs_action);
        assert!(!c.has_custom);
        assert_eq!(c.outstanding_line_items, 2);
        assert_eq!(c.shippable_line_items, 1);
    }

    #[test]
    fn test_nothing_outstanding_cannot_ship_without_action() {
        let o = order(1, &[1]);
        let c = classify(&o, &[outcome(1, LineItemState::Terminal, false)]);
        assert_eq!(c.shippability, OrderShippability::CannotShip);
        assert!(!c.needs_action);
        assert!(!c.awaiting_inventory);
    }

    #[test]
    fn test_sort_by_price_keeps_ties_stable() {
        let mut a = order(1, &[]);
        let mut b = order(2, &[]);
        let mut c = order(3, &[]);
        a.total_price = Price::new(Decimal::new(500, 2), CurrencyCode::USD);
        b.total_price = Price::new(Decimal::new(9900, 2), CurrencyCode::USD);
        c.total_price = Price::new(Decimal::new(500, 2), CurrencyCode::USD);

        let mut orders = vec![&a, &b, &c];
        sort_orders(&mut orders, OrderSort::PriceDesc);
        let ids: Vec<_> = orders.iter().map(|o| o.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_by_date_needed_puts_missing_last() {
        let mut a = order(1, &[]);
        let b = order(2, &[]);
        let mut c = order(3, &[]);
        a.date_needed = NaiveDate::from_ymd_opt(2024, 6, 1);
        c.date_needed = NaiveDate::from_ymd_opt(2024, 5, 1);

        let mut orders = vec![&a, &b, &c];
        sort_orders(&mut orders, OrderSort::DateNeededAsc);
        let ids: Vec<_> = orders.iter().map(|o| o.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        sort_orders(&mut orders, OrderSort::DateNeededDesc);
        let ids: Vec<_> = orders.iter().map(|o| o.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn test_sort_created_desc() {
        let (a, b) = (order(1, &[]), order(2, &[]));
        let mut orders = vec![&a, &b];
        sort_orders(&mut orders, OrderSort::CreatedDesc);
        assert_eq!(orders[0].id, OrderId::new(2));
    }
}
