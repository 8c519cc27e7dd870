//! The order document: the central entity of the system.
//!
//! An order is a customer's submitted set of line items tied to a table and
//! a lifecycle status. Line items are value snapshots of product data at
//! order time, never live references, so later catalog edits or deletions
//! cannot retroactively alter historical orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{OrderId, ProductId, TableId, UserId};
use super::status::{OrderStatus, StatusHistory};
use super::totals::{OrderTotals, compute_totals};

/// A snapshot of one ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// The catalog product this was copied from (weak reference).
    pub product_id: ProductId,
    /// Product name at order time.
    pub name: String,
    /// Unit price at order time.
    pub price: Decimal,
    /// Ordered quantity, always >= 1.
    pub quantity: u32,
    /// Product image at order time, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Invariant violation constructing a line item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineItemError {
    #[error("line item quantity must be at least 1")]
    ZeroQuantity,
    #[error("line item price must not be negative")]
    NegativePrice,
}

impl LineItem {
    /// Create a line item, enforcing `quantity >= 1` and `price >= 0`.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError`] if either invariant is violated.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
        image_url: Option<String>,
    ) -> Result<Self, LineItemError> {
        if quantity == 0 {
            return Err(LineItemError::ZeroQuantity);
        }
        if price.is_sign_negative() {
            return Err(LineItemError::NegativePrice);
        }
        Ok(Self {
            product_id,
            name: name.into(),
            price,
            quantity,
            image_url,
        })
    }

    /// Line subtotal (`price × quantity`), rounded to two decimals.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        (self.price * Decimal::from(self.quantity)).round_dp(2)
    }
}

/// Invariant violation constructing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("an order must contain at least one line item")]
    EmptyItems,
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-assigned identifier. Preserved across archival.
    pub id: OrderId,
    /// The placing customer (weak reference; no ownership).
    pub user_id: UserId,
    /// The table the order was placed from.
    pub table: TableId,
    /// Snapshot line items; non-empty at creation.
    pub items: Vec<LineItem>,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Per-status entry timestamps.
    pub status_history: StatusHistory,
    /// Creation time; the default sort key.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a freshly placed order.
    ///
    /// Sets `status = Pedido` and stamps the `Pedido` history entry with
    /// the creation time.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyItems`] if `items` is empty.
    pub fn place(
        id: OrderId,
        user_id: UserId,
        table: TableId,
        items: Vec<LineItem>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyItems);
        }
        Ok(Self {
            id,
            user_id,
            table,
            items,
            status: OrderStatus::Pedido,
            status_history: StatusHistory::initial(created_at),
            created_at,
        })
    }

    /// Derived totals for this order's items.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        compute_totals(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn line(price: i64, quantity: u32) -> LineItem {
        LineItem::new(
            ProductId::new(uuid::Uuid::new_v4()),
            "Pozole",
            Decimal::from(price),
            quantity,
            None,
        )
        .expect("valid line item")
    }

    #[test]
    fn test_line_item_invariants() {
        let product_id = ProductId::new(uuid::Uuid::new_v4());
        assert_eq!(
            LineItem::new(product_id, "Agua", Decimal::from(20), 0, None),
            Err(LineItemError::ZeroQuantity)
        );
        assert_eq!(
            LineItem::new(product_id, "Agua", Decimal::from(-1), 1, None),
            Err(LineItemError::NegativePrice)
        );
        // Free items are fine.
        assert!(LineItem::new(product_id, "Agua", Decimal::ZERO, 1, None).is_ok());
    }

    #[test]
    fn test_place_requires_items() {
        let result = Order::place(
            OrderId::new(uuid::Uuid::new_v4()),
            UserId::new(uuid::Uuid::new_v4()),
            TableId::new("Mesa_1"),
            Vec::new(),
            Utc::now(),
        );
        assert_eq!(result, Err(OrderError::EmptyItems));
    }

    #[test]
    fn test_place_stamps_initial_status() {
        let created_at = Utc.with_ymd_and_hms(2025, 5, 10, 19, 30, 0).unwrap();
        let order = Order::place(
            OrderId::new(uuid::Uuid::new_v4()),
            UserId::new(uuid::Uuid::new_v4()),
            TableId::unassigned(),
            vec![line(10_000, 2)],
            created_at,
        )
        .expect("valid order");

        assert_eq!(order.status, OrderStatus::Pedido);
        assert_eq!(
            order
                .status_history
                .get(OrderStatus::Pedido)
                .map(|s| s.timestamp),
            Some(created_at)
        );

        let totals = order.totals();
        assert_eq!(totals.subtotal, Decimal::from(20_000));
        assert_eq!(totals.tax, Decimal::from(3_200));
        assert_eq!(totals.total, Decimal::from(23_200));
    }

    #[test]
    fn test_line_items_are_snapshots() {
        // Serialization keeps the copied product fields, so a deleted
        // product leaves historical orders intact.
        let item = line(150, 1);
        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["name"], "Pozole");
        assert!(json.get("productId").is_some());
        let back: LineItem = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, item);
    }
}
