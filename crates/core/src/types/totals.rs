//! Totals arithmetic for orders and receipts.
//!
//! All money math uses [`rust_decimal::Decimal`] so totals are reproducible
//! to the cent. A single fixed 16% tax rate applies uniformly; there is no
//! per-item tax variance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::LineItem;

/// Fixed tax rate (16% IVA) applied to every order.
pub const TAX_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

/// Derived totals for a set of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of `price × quantity` over all items.
    pub subtotal: Decimal,
    /// `subtotal × TAX_RATE`.
    pub tax: Decimal,
    /// `subtotal + tax`.
    pub total: Decimal,
}

/// Compute subtotal, tax, and grand total for a list of line items.
///
/// Pure function; rounds each figure to two decimals for display so that
/// `total == subtotal × 1.16` holds to the cent.
#[must_use]
pub fn compute_totals(items: &[LineItem]) -> OrderTotals {
    let subtotal: Decimal = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();
    let subtotal = subtotal.round_dp(2);
    let tax = (subtotal * TAX_RATE).round_dp(2);

    OrderTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn item(price: Decimal, quantity: u32) -> LineItem {
        LineItem::new(
            ProductId::new(uuid::Uuid::new_v4()),
            "Tacos al pastor",
            price,
            quantity,
            None,
        )
        .expect("valid line item")
    }

    #[test]
    fn test_tax_rate_is_sixteen_percent() {
        assert_eq!(TAX_RATE, Decimal::new(16, 2));
    }

    #[test]
    fn test_totals_simple_order() {
        // price 10000 x 2 -> subtotal 20000, tax 3200, total 23200
        let totals = compute_totals(&[item(Decimal::from(10_000), 2)]);
        assert_eq!(totals.subtotal, Decimal::from(20_000));
        assert_eq!(totals.tax, Decimal::from(3_200));
        assert_eq!(totals.total, Decimal::from(23_200));
    }

    #[test]
    fn test_total_is_subtotal_times_one_sixteen() {
        let items = [
            item(Decimal::new(8950, 2), 3),  // 89.50 x 3
            item(Decimal::new(12999, 2), 1), // 129.99
            item(Decimal::new(500, 2), 7),   // 5.00 x 7
        ];
        let totals = compute_totals(&items);
        let expected = (totals.subtotal * (Decimal::ONE + TAX_RATE)).round_dp(2);
        assert_eq!((totals.total - expected).abs(), Decimal::ZERO);
        assert_eq!(totals.total, totals.subtotal + totals.tax);
    }

    #[test]
    fn test_empty_items() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }
}
