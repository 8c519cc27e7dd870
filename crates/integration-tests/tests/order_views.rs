//! View assembly for the three roles: the diner's own list, the kitchen
//! board with customer names, and the filterable register.

use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use comanda_core::{LineItem, Order, OrderId, OrderStatus, ProductId, StepState, TableId, UserId};
use comanda_server::aggregate::{
    self, OrderView, StatusFilter, UNKNOWN_CUSTOMER,
};
use comanda_server::db::SortDirection;

fn order(minute: u32, status: OrderStatus, user_id: UserId) -> Order {
    let created_at = Utc
        .with_ymd_and_hms(2026, 8, 15, 12, minute, 0)
        .single()
        .expect("valid time");
    let item = LineItem::new(
        ProductId::new(Uuid::new_v4()),
        "Pozole rojo",
        Decimal::from(12_000),
        1,
        None,
    )
    .expect("valid line item");

    let mut order = Order::place(
        OrderId::new(Uuid::new_v4()),
        user_id,
        TableId::new("4"),
        vec![item],
        created_at,
    )
    .expect("order places");

    order.status = status;
    order
        .status_history
        .stamp(status, created_at + Duration::minutes(1));
    order
}

// =============================================================================
// Client View
// =============================================================================

#[test]
fn test_client_view_has_steps_and_totals_but_no_name() {
    let user = UserId::new(Uuid::new_v4());
    let orders = [order(0, OrderStatus::Cocinando, user)];

    let views = aggregate::client_orders(&orders);
    assert_eq!(views.len(), 1);

    let view = &views[0];
    assert_eq!(view.status, OrderStatus::Cocinando);
    assert!(!view.payable);
    assert_eq!(view.customer_name, None);
    assert_eq!(view.totals.total, Decimal::from(13_920));

    assert_eq!(view.steps.len(), 6);
    assert_eq!(view.steps[1].state, StepState::Active);
    assert!(view.steps[1].timestamp.is_some());
    // Steps the order has not reached carry no timestamp.
    assert_eq!(view.steps[5].timestamp, None);
}

#[test]
fn test_payable_flag_marks_ready_to_pay() {
    let user = UserId::new(Uuid::new_v4());
    let views = aggregate::client_orders(&[order(0, OrderStatus::ListoParaPagar, user)]);
    assert!(views[0].payable);
}

// =============================================================================
// Kitchen View
// =============================================================================

#[test]
fn test_kitchen_view_resolves_names_with_fallback() {
    let known = UserId::new(Uuid::new_v4());
    let unknown = UserId::new(Uuid::new_v4());
    let orders = [
        order(0, OrderStatus::Pedido, known),
        order(1, OrderStatus::Pedido, unknown),
    ];
    let names: HashMap<UserId, String> = [(known, "Ana".to_string())].into();

    let views = aggregate::kitchen_orders(&orders, &names);
    assert_eq!(views[0].customer_name.as_deref(), Some("Ana"));
    assert_eq!(views[1].customer_name.as_deref(), Some(UNKNOWN_CUSTOMER));
}

// =============================================================================
// Register View
// =============================================================================

#[test]
fn test_register_filters_by_status() {
    let user = UserId::new(Uuid::new_v4());
    let orders = [
        order(0, OrderStatus::Pedido, user),
        order(1, OrderStatus::Pagado, user),
        order(2, OrderStatus::Pedido, user),
    ];

    let views = aggregate::cashier_orders(
        &orders,
        StatusFilter::Only(OrderStatus::Pedido),
        SortDirection::Ascending,
        &HashMap::new(),
    );
    assert_eq!(views.len(), 2);
    assert!(views.iter().all(|v| v.status == OrderStatus::Pedido));
}

#[test]
fn test_register_sort_direction_flips_order() {
    let user = UserId::new(Uuid::new_v4());
    let orders = [
        order(0, OrderStatus::Pedido, user),
        order(5, OrderStatus::Pedido, user),
    ];

    let ascending = aggregate::cashier_orders(
        &orders,
        StatusFilter::All,
        SortDirection::Ascending,
        &HashMap::new(),
    );
    let descending = aggregate::cashier_orders(
        &orders,
        StatusFilter::All,
        SortDirection::Descending,
        &HashMap::new(),
    );

    assert_eq!(ascending[0].id, descending[1].id);
    assert_eq!(ascending[1].id, descending[0].id);
}

#[test]
fn test_filter_cycle_walks_the_sequence_and_wraps() {
    let mut filter = StatusFilter::All;
    for status in OrderStatus::SEQUENCE {
        filter = filter.cycle();
        assert_eq!(filter, StatusFilter::Only(status));
    }
    assert_eq!(filter.cycle(), StatusFilter::All);
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn test_view_serializes_spanish_status_labels() {
    let user = UserId::new(Uuid::new_v4());
    let views = aggregate::client_orders(&[order(0, OrderStatus::ListoParaRecoger, user)]);
    let json = serde_json::to_value(&views[0]).expect("serializes");

    assert_eq!(json["status"], "Listo para recoger");
    assert_eq!(json["steps"][0]["status"], "Pedido");
}

#[test]
fn test_view_ids_are_plain_uuid_strings() {
    let user = UserId::new(Uuid::new_v4());
    let single = order(0, OrderStatus::Pedido, user);
    let view = OrderView::from_order(&single, None);
    let json = serde_json::to_value(&view).expect("serializes");

    let id = json["id"].as_str().expect("id is a string");
    assert_eq!(id, single.id.to_string());
}
