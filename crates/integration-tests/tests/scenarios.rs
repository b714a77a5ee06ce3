//! End-to-end order scenarios.

#![allow(clippy::unwrap_used)]

use lustre_core::{
    AddressId, CurrencyCode, LineItemId, OptionDimension, OptionSignature, OrderId, Price,
    VariantId, VendorOrderId,
};
use lustre_fulfillment::allocation::{LineItemState, LineItemStatus, OrderShippability};
use lustre_fulfillment::models::IncomingRecordRef;
use lustre_fulfillment::{EngineConfig, OrderSort, OrderTab, run_pass};
use lustre_integration_tests::{SnapshotBuilder, address, custom_line, date, line, options};
use rust_decimal::Decimal;

fn plain() -> OptionSignature {
    OptionSignature::new()
}

// =============================================================================
// Competing orders
// =============================================================================

#[test]
fn test_earlier_order_wins_scarce_stock() {
    let snapshot = SnapshotBuilder::new()
        .product(1)
        .variant(10, 1, plain(), 4)
        .order(1, vec![line(1, 1, plain(), 3)])
        .order(2, vec![line(2, 1, plain(), 3)])
        .build();
    let outcome = run_pass(&snapshot, &EngineConfig::default());

    let first = outcome.order(OrderId::new(1)).unwrap();
    assert!(first.fully_shippable);
    assert_eq!(
        outcome.line_item(LineItemId::new(1)).unwrap().status(),
        Some(LineItemStatus::Shippable)
    );

    let second = outcome.order(OrderId::new(2)).unwrap();
    let second_line = outcome.line_item(LineItemId::new(2)).unwrap();
    assert!(!second_line.is_shippable());
    assert!(second_line.awaiting.is_empty());
    assert_eq!(second.shippability, OrderShippability::CannotShip);
    assert!(second.needs_action);
    assert!(!second.awaiting_inventory);
}

#[test]
fn test_incoming_stock_rescues_later_order() {
    let snapshot = SnapshotBuilder::new()
        .product(1)
        .variant(10, 1, plain(), 4)
        .vendor(1, Some(14))
        .vendor_order(7, Some(1), date(2024, 6, 1), &[(70, 10, 5)])
        .order(1, vec![line(1, 1, plain(), 3)])
        .order(2, vec![line(2, 1, plain(), 3)])
        .build();
    let outcome = run_pass(&snapshot, &EngineConfig::default());

    let second_line = outcome.line_item(LineItemId::new(2)).unwrap();
    assert_eq!(second_line.awaiting.vendor_orders, vec![VendorOrderId::new(7)]);
    assert_eq!(second_line.awaiting.expected_date, Some(date(2024, 6, 15)));
    assert_eq!(outcome.reservations[0].quantity, 3);

    // Partially shippable from stock takes precedence over the reservation.
    assert_eq!(second_line.status(), Some(LineItemStatus::PartiallyShippable));
    let second = outcome.order(OrderId::new(2)).unwrap();
    assert!(!second.needs_action);
    assert!(second.awaiting_inventory);
}

// =============================================================================
// Resizing
// =============================================================================

#[test]
fn test_out_of_stock_size_is_resizable_from_neighbour() {
    let ring = |size: &str| options(&[(OptionDimension::Size, size), (OptionDimension::Color, "rose")]);
    let snapshot = SnapshotBuilder::new()
        .product(1)
        .variant(10, 1, ring("7"), 0)
        .variant(11, 1, ring("7.5"), 4)
        .order(1, vec![line(1, 1, ring("7"), 1)])
        .build();
    let outcome = run_pass(&snapshot, &EngineConfig::default());

    let li = outcome.line_item(LineItemId::new(1)).unwrap();
    assert_eq!(li.status(), Some(LineItemStatus::Resizable));
    assert!(!li.is_shippable());
    assert_eq!(li.resize_candidates, vec![VariantId::new(11)]);

    let order = outcome.order(OrderId::new(1)).unwrap();
    assert!(order.resizable);
    assert!(order.needs_action);
    assert_eq!(outcome.orders_in_tab(OrderTab::Resizable).len(), 1);
}

#[test]
fn test_pending_resize_beats_resize_suggestion() {
    let ring = |size: &str| options(&[(OptionDimension::Size, size)]);
    let snapshot = SnapshotBuilder::new()
        .product(1)
        .variant(10, 1, ring("7"), 0)
        .variant(11, 1, ring("7.5"), 4)
        .resize(3, 11, 10, 1, 0)
        .order(1, vec![line(1, 1, ring("7"), 1)])
        .build();
    let outcome = run_pass(&snapshot, &EngineConfig::default());

    let li = outcome.line_item(LineItemId::new(1)).unwrap();
    assert_eq!(li.status(), Some(LineItemStatus::AwaitingInventory));
    assert_eq!(li.awaiting.records, vec![IncomingRecordRef::Resize(lustre_core::ResizeId::new(3))]);
    assert_eq!(li.awaiting.expected_date, None);
    assert!(li.resize_candidates.is_empty());
}

// =============================================================================
// Order aggregation
// =============================================================================

#[test]
fn test_two_shippable_one_awaiting_is_partially_shippable() {
    let snapshot = SnapshotBuilder::new()
        .product(1)
        .product(2)
        .product(3)
        .variant(10, 1, plain(), 5)
        .variant(20, 2, plain(), 5)
        .variant(30, 3, plain(), 0)
        .vendor_order(1, None, date(2024, 1, 10), &[(5, 30, 2)])
        .order(1, vec![line(1, 1, plain(), 1), line(2, 2, plain(), 1), line(3, 3, plain(), 1)])
        .build();
    let outcome = run_pass(&snapshot, &EngineConfig::default());
    let order = outcome.order(OrderId::new(1)).unwrap();

    assert!(order.partially_shippable);
    assert!(!order.fully_shippable);
    assert!(order.needs_action);
    assert_eq!(order.outstanding_line_items, 3);
    assert_eq!(order.shippable_line_items, 2);

    // Default lead time applies without a vendor.
    let awaiting = &outcome.line_item(LineItemId::new(3)).unwrap().awaiting;
    assert_eq!(awaiting.expected_date, Some(date(2024, 1, 31)));
}

#[test]
fn test_custom_piece_keeps_order_from_shipping_in_full() {
    let snapshot = SnapshotBuilder::new()
        .product(1)
        .variant(10, 1, plain(), 5)
        .order(1, vec![line(1, 1, plain(), 1), custom_line(2, 1)])
        .build();
    let outcome = run_pass(&snapshot, &EngineConfig::default());
    let order = outcome.order(OrderId::new(1)).unwrap();

    assert_eq!(outcome.line_item(LineItemId::new(2)).unwrap().state, LineItemState::Custom);
    assert!(order.partially_shippable);
    assert!(order.has_custom);
    assert_eq!(outcome.tab_counts.has_custom, 1);
}

#[test]
fn test_line_with_missing_product_keeps_order_from_shipping_in_full() {
    let snapshot = SnapshotBuilder::new()
        .product(1)
        .variant(10, 1, plain(), 5)
        .order(1, vec![line(1, 1, plain(), 1), line(2, 99, plain(), 1)])
        .build();
    let outcome = run_pass(&snapshot, &EngineConfig::default());
    let order = outcome.order(OrderId::new(1)).unwrap();

    assert_eq!(outcome.line_item(LineItemId::new(2)).unwrap().state, LineItemState::Skipped);
    assert!(!order.fully_shippable);
    assert!(order.partially_shippable);
    assert!(order.needs_action);
    assert!(!order.has_custom);
    assert_eq!(order.outstanding_line_items, 2);
    assert_eq!(outcome.tab_counts.fully_shippable, 0);
    assert_eq!(outcome.tab_counts.partially_shippable, 1);

    let plan = &outcome.shipments[0];
    assert_eq!(plan.shippable[0].line_items[0].line_item_id, LineItemId::new(1));
    assert_eq!(plan.unshippable[0].line_items[0].line_item_id, LineItemId::new(2));
}

#[test]
fn test_refunded_and_fulfilled_orders_are_not_candidates() {
    let snapshot = SnapshotBuilder::new()
        .product(1)
        .variant(10, 1, plain(), 1)
        .order_with(1, vec![line(1, 1, plain(), 1)], |o| {
            o.financial_status = lustre_core::FinancialStatus::Refunded;
        })
        .order_with(2, vec![line(2, 1, plain(), 1)], |o| {
            o.fulfillment_status = lustre_core::FulfillmentStatus::Fulfilled;
        })
        .order(3, vec![line(3, 1, plain(), 1)])
        .build();
    let outcome = run_pass(&snapshot, &EngineConfig::default());

    assert_eq!(outcome.summary.orders_considered, 1);
    assert!(outcome.line_item(LineItemId::new(1)).is_none());
    assert!(outcome.order(OrderId::new(3)).unwrap().fully_shippable);
}

// =============================================================================
// Variant resolution
// =============================================================================

#[test]
fn test_bundle_selection_overrides_component_option() {
    let metal = |m: &str| options(&[(OptionDimension::Color, m)]);
    let snapshot = SnapshotBuilder::new()
        .bundle(1, &[20, 30])
        .product(2)
        .product(3)
        .variant(20, 2, metal("gold"), 3)
        .variant(21, 2, metal("silver"), 3)
        .variant(30, 3, OptionSignature::new().with(OptionDimension::Stone, "pearl"), 3)
        .order(1, vec![line(1, 1, metal("silver"), 1)])
        .build();
    let outcome = run_pass(&snapshot, &EngineConfig::default());
    let li = outcome.line_item(LineItemId::new(1)).unwrap();

    assert_eq!(li.variant_ids, vec![VariantId::new(21), VariantId::new(30)]);
    assert!(li.is_shippable());
}

#[test]
fn test_unmatched_selection_is_custom() {
    let snapshot = SnapshotBuilder::new()
        .product(1)
        .variant(10, 1, options(&[(OptionDimension::Size, "6")]), 1)
        .variant(11, 1, options(&[(OptionDimension::Size, "7")]), 1)
        .order(1, vec![line(1, 1, options(&[(OptionDimension::Size, "13")]), 1)])
        .build();
    let outcome = run_pass(&snapshot, &EngineConfig::default());

    assert_eq!(outcome.line_item(LineItemId::new(1)).unwrap().state, LineItemState::Custom);
    assert_eq!(outcome.summary.custom_line_items, 1);
    assert!(outcome.reservations.is_empty());
}

// =============================================================================
// Listing and shipments
// =============================================================================

#[test]
fn test_listing_sorted_by_price() {
    let snapshot = SnapshotBuilder::new()
        .order_with(1, Vec::new(), |o| o.total_price = price(40))
        .order_with(2, Vec::new(), |o| o.total_price = price(900))
        .order_with(3, Vec::new(), |o| o.total_price = price(120))
        .build();
    let config = EngineConfig::default().with_order_sort(OrderSort::PriceDesc);
    let outcome = run_pass(&snapshot, &config);

    let ids: Vec<i32> = outcome.orders.iter().map(|o| o.order_id.as_i32()).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

fn price(dollars: i64) -> Price {
    Price::new(Decimal::new(dollars * 100, 2), CurrencyCode::USD)
}

#[test]
fn test_shipments_split_by_address_and_history() {
    let mut second_address = line(2, 1, plain(), 1);
    second_address.address_id = Some(AddressId::new(77));
    let mut half_shipped = line(3, 1, plain(), 2);
    half_shipped.quantity_shipped = 1;

    let snapshot = SnapshotBuilder::new()
        .product(1)
        .product(2)
        .variant(10, 1, plain(), 10)
        .variant(20, 2, plain(), 0)
        .order_with(
            1,
            vec![line(1, 1, plain(), 1), second_address, half_shipped, line(4, 2, plain(), 1)],
            |o| o.shipping_addresses.push(address(77)),
        )
        .shipment(500, 1, 1, &[(3, 1)])
        .build();
    let outcome = run_pass(&snapshot, &EngineConfig::default());

    assert_eq!(outcome.shipments.len(), 1);
    let plan = &outcome.shipments[0];
    assert_eq!(plan.shipped.len(), 1);
    assert_eq!(plan.shipped[0].line_items[0].line_item_id, LineItemId::new(3));

    let by_address: Vec<(Option<AddressId>, Vec<i32>)> = plan
        .shippable
        .iter()
        .map(|g| {
            (
                g.address_id,
                g.line_items.iter().map(|l| l.line_item_id.as_i32()).collect(),
            )
        })
        .collect();
    assert_eq!(
        by_address,
        vec![
            (Some(AddressId::new(1)), vec![1]),
            (Some(AddressId::new(77)), vec![2]),
        ]
    );
    assert_eq!(plan.unshippable.len(), 1);
    assert_eq!(plan.unshippable[0].line_items[0].line_item_id, LineItemId::new(4));
}
