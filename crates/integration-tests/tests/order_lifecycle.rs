//! Lifecycle invariants: the six-status sequence, free transitions, the
//! stamped history, and the tax math.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use comanda_core::{
    LineItem, Order, OrderId, OrderStatus, ProductId, StepState, TableId, UserId, compute_totals,
};

fn item(price: i64, quantity: u32) -> LineItem {
    LineItem::new(
        ProductId::new(Uuid::new_v4()),
        "Tacos al pastor",
        Decimal::from(price),
        quantity,
        None,
    )
    .expect("valid line item")
}

// =============================================================================
// Status Sequence
// =============================================================================

#[test]
fn test_sequence_runs_from_placed_to_paid() {
    assert_eq!(OrderStatus::SEQUENCE.len(), 6);
    assert_eq!(OrderStatus::SEQUENCE[0], OrderStatus::Pedido);
    assert_eq!(OrderStatus::SEQUENCE[5], OrderStatus::Pagado);

    for (position, status) in OrderStatus::SEQUENCE.iter().enumerate() {
        assert_eq!(status.position(), position);
    }
}

#[test]
fn test_every_transition_is_permitted() {
    // Staff may move an order anywhere in the sequence, including
    // backward, as a correction.
    for from in OrderStatus::SEQUENCE {
        for to in OrderStatus::SEQUENCE {
            assert!(from.permits(to), "{from} -> {to} should be permitted");
        }
    }
}

#[test]
fn test_only_paid_is_terminal_and_only_ready_is_payable() {
    for status in OrderStatus::SEQUENCE {
        assert_eq!(status.is_terminal(), status == OrderStatus::Pagado);
        assert_eq!(status.is_payable(), status == OrderStatus::ListoParaPagar);
    }
}

#[test]
fn test_spanish_wire_labels_round_trip() {
    for status in OrderStatus::SEQUENCE {
        let parsed: OrderStatus = status.as_str().parse().expect("label parses");
        assert_eq!(parsed, status);
    }
    assert_eq!(OrderStatus::ListoParaRecoger.as_str(), "Listo para recoger");
    assert!("Ready for pickup".parse::<OrderStatus>().is_err());
}

// =============================================================================
// Progress Strip
// =============================================================================

#[test]
fn test_progress_marks_steps_relative_to_current_status() {
    let progress = OrderStatus::Entregado.progress();
    assert_eq!(
        progress,
        [
            StepState::Completed,
            StepState::Completed,
            StepState::Completed,
            StepState::Active,
            StepState::Pending,
            StepState::Pending,
        ]
    );
}

// =============================================================================
// Status History
// =============================================================================

#[test]
fn test_restamping_a_status_overwrites_its_timestamp() {
    let placed_at = Utc::now();
    let mut order = Order::place(
        OrderId::new(Uuid::new_v4()),
        UserId::new(Uuid::new_v4()),
        TableId::new("7"),
        vec![item(100, 1)],
        placed_at,
    )
    .expect("order places");

    let first = placed_at + Duration::minutes(5);
    let second = placed_at + Duration::minutes(9);
    order.status_history.stamp(OrderStatus::Cocinando, first);
    order.status_history.stamp(OrderStatus::Cocinando, second);

    // One entry per status reached; re-stamping moves the timestamp.
    assert_eq!(order.status_history.len(), 2);
    let stamp = order
        .status_history
        .get(OrderStatus::Cocinando)
        .expect("stamped");
    assert_eq!(stamp.timestamp, second);
}

#[test]
fn test_placing_an_order_stamps_pedido() {
    let placed_at = Utc::now();
    let order = Order::place(
        OrderId::new(Uuid::new_v4()),
        UserId::new(Uuid::new_v4()),
        TableId::unassigned(),
        vec![item(100, 1)],
        placed_at,
    )
    .expect("order places");

    assert_eq!(order.status, OrderStatus::Pedido);
    let stamp = order
        .status_history
        .get(OrderStatus::Pedido)
        .expect("initial stamp");
    assert_eq!(stamp.timestamp, placed_at);
}

#[test]
fn test_empty_order_is_rejected() {
    let result = Order::place(
        OrderId::new(Uuid::new_v4()),
        UserId::new(Uuid::new_v4()),
        TableId::new("3"),
        Vec::new(),
        Utc::now(),
    );
    assert!(result.is_err());
}

// =============================================================================
// Totals
// =============================================================================

#[test]
fn test_sixteen_percent_tax_over_item_subtotal() {
    let totals = compute_totals(&[item(10_000, 2)]);
    assert_eq!(totals.subtotal, Decimal::from(20_000));
    assert_eq!(totals.tax, Decimal::from(3_200));
    assert_eq!(totals.total, Decimal::from(23_200));
}

#[test]
fn test_order_totals_match_line_items() {
    let items = vec![item(9_500, 3), item(3_500, 1)];
    let order = Order::place(
        OrderId::new(Uuid::new_v4()),
        UserId::new(Uuid::new_v4()),
        TableId::new("12"),
        items.clone(),
        Utc::now(),
    )
    .expect("order places");

    assert_eq!(order.totals(), compute_totals(&items));
}
