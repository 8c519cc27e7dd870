//! Role-scoped read models over raw orders.
//!
//! Every function here is a pure transformation of (raw order list, role
//! parameters) into display-ready view models; none of them writes. The
//! sync bridge hands these functions each full snapshot and the result
//! replaces the previous view wholesale.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use comanda_core::{
    LineItem, Order, OrderId, OrderStatus, OrderTotals, StepState, TableId, UserId,
};

use crate::db::SortDirection;

/// Label shown when an order's customer cannot be resolved.
pub const UNKNOWN_CUSTOMER: &str = "Desconocido";

/// One step of the six-stage progress strip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    /// The step's status (serializes to its wire label).
    pub status: OrderStatus,
    pub state: StepState,
    /// When the order entered this step, if it has.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Display-ready projection of one order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub table: TableId,
    pub status: OrderStatus,
    /// Whether the pay control should be offered.
    pub payable: bool,
    pub steps: Vec<StepView>,
    pub items: Vec<LineItem>,
    pub totals: OrderTotals,
    pub created_at: DateTime<Utc>,
    /// Resolved customer name; present only on staff views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl OrderView {
    /// Project one order, optionally tagged with a resolved customer name.
    #[must_use]
    pub fn from_order(order: &Order, customer_name: Option<String>) -> Self {
        let steps = OrderStatus::SEQUENCE
            .into_iter()
            .zip(order.status.progress())
            .map(|(status, state)| StepView {
                status,
                state,
                timestamp: order.status_history.get(status).map(|s| s.timestamp),
            })
            .collect();

        Self {
            id: order.id,
            table: order.table.clone(),
            status: order.status,
            payable: order.status.is_payable(),
            steps,
            items: order.items.clone(),
            totals: order.totals(),
            created_at: order.created_at,
            customer_name,
        }
    }
}

/// Client view: the customer's own orders.
///
/// The caller queries with the `user_id` filter, oldest first; this only
/// projects. Other customers' orders never reach this function.
#[must_use]
pub fn client_orders(orders: &[Order]) -> Vec<OrderView> {
    orders
        .iter()
        .map(|order| OrderView::from_order(order, None))
        .collect()
}

/// Kitchen view: all active orders, oldest first, with customer names.
///
/// `names` is the single batched lookup for the snapshot; a missing user
/// resolves to [`UNKNOWN_CUSTOMER`], never an error.
#[must_use]
pub fn kitchen_orders(orders: &[Order], names: &HashMap<UserId, String>) -> Vec<OrderView> {
    orders
        .iter()
        .map(|order| {
            let name = names
                .get(&order.user_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());
            OrderView::from_order(order, Some(name))
        })
        .collect()
}

/// Cashier status filter: one status, or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    /// Next stop of the cyclic picker: each status in sequence, then back
    /// to show-all.
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Only(OrderStatus::Pedido),
            Self::Only(OrderStatus::Pagado) => Self::All,
            Self::Only(status) => {
                let next = OrderStatus::SEQUENCE
                    .get(status.position() + 1)
                    .copied()
                    .unwrap_or(OrderStatus::Pedido);
                Self::Only(next)
            }
        }
    }

    fn matches(self, status: OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => status == wanted,
        }
    }
}

/// Cashier view: all active orders, optionally filtered to one status,
/// sort direction toggled by the operator.
///
/// This is the one view that intentionally overrides the query's declared
/// sort, so it re-sorts rather than trusting the input order.
#[must_use]
pub fn cashier_orders(
    orders: &[Order],
    filter: StatusFilter,
    direction: SortDirection,
    names: &HashMap<UserId, String>,
) -> Vec<OrderView> {
    let mut filtered: Vec<&Order> = orders
        .iter()
        .filter(|order| filter.matches(order.status))
        .collect();

    filtered.sort_by_key(|order| order.created_at);
    if direction == SortDirection::Descending {
        filtered.reverse();
    }

    filtered
        .into_iter()
        .map(|order| {
            let name = names
                .get(&order.user_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());
            OrderView::from_order(order, Some(name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use comanda_core::ProductId;

    fn order(minute: u32, status: OrderStatus) -> Order {
        let created_at = Utc.with_ymd_and_hms(2025, 5, 10, 12, minute, 0).unwrap();
        let item = LineItem::new(
            ProductId::new(Uuid::new_v4()),
            "Enchiladas",
            Decimal::from(120),
            2,
            None,
        )
        .expect("valid line item");

        let mut order = Order::place(
            OrderId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            TableId::new("Mesa_2"),
            vec![item],
            created_at,
        )
        .expect("valid order");
        order.status = status;
        order.status_history.stamp(status, created_at);
        order
    }

    #[test]
    fn test_view_carries_totals_and_steps() {
        let views = client_orders(&[order(0, OrderStatus::Cocinando)]);
        let view = views.first().expect("one view");

        assert_eq!(view.totals.subtotal, Decimal::from(240));
        assert_eq!(view.totals.tax, Decimal::new(3840, 2));
        assert_eq!(view.steps.len(), 6);
        assert_eq!(view.steps[1].state, StepState::Active);
        assert!(view.steps[1].timestamp.is_some());
        assert!(view.steps[3].timestamp.is_none());
        assert!(!view.payable);
    }

    #[test]
    fn test_payable_flag() {
        let views = client_orders(&[order(0, OrderStatus::ListoParaPagar)]);
        assert!(views.first().expect("one view").payable);
    }

    #[test]
    fn test_kitchen_name_fallback() {
        let known = order(0, OrderStatus::Pedido);
        let unknown = order(1, OrderStatus::Pedido);

        let mut names = HashMap::new();
        names.insert(known.user_id, "Ana".to_string());

        let views = kitchen_orders(&[known, unknown], &names);
        assert_eq!(views[0].customer_name.as_deref(), Some("Ana"));
        assert_eq!(views[1].customer_name.as_deref(), Some(UNKNOWN_CUSTOMER));
    }

    #[test]
    fn test_cashier_filter_and_sort() {
        let orders = [
            order(0, OrderStatus::Pedido),
            order(1, OrderStatus::Pagado),
            order(2, OrderStatus::Pedido),
        ];
        let names = HashMap::new();

        let all = cashier_orders(&orders, StatusFilter::All, SortDirection::Descending, &names);
        assert_eq!(all.len(), 3);
        assert!(all[0].created_at > all[1].created_at);

        let paid = cashier_orders(
            &orders,
            StatusFilter::Only(OrderStatus::Pagado),
            SortDirection::Ascending,
            &names,
        );
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].status, OrderStatus::Pagado);
    }

    #[test]
    fn test_status_filter_cycles_through_all_stops() {
        let mut filter = StatusFilter::All;
        let mut stops = Vec::new();
        for _ in 0..7 {
            filter = filter.cycle();
            stops.push(filter);
        }
        // Six statuses then back to show-all.
        assert_eq!(stops[0], StatusFilter::Only(OrderStatus::Pedido));
        assert_eq!(stops[5], StatusFilter::Only(OrderStatus::Pagado));
        assert_eq!(stops[6], StatusFilter::All);
    }

    #[test]
    fn test_aggregators_do_not_reorder_client_view() {
        let a = order(1, OrderStatus::Pedido);
        let b = order(0, OrderStatus::Pedido);
        // Input order (the query's declared sort) is preserved verbatim.
        let views = client_orders(&[a.clone(), b.clone()]);
        assert_eq!(views[0].id, a.id);
        assert_eq!(views[1].id, b.id);
    }
}
