//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use rust_decimal::Decimal;

/// Formats a decimal amount as money with two fraction digits.
///
/// Usage in templates: `{{ item.price|money }}`
#[askama::filter_fn]
pub fn money(
    value: impl std::borrow::Borrow<Decimal>,
    _env: &dyn askama::Values,
) -> askama::Result<String> {
    Ok(format!("${:.2}", value.borrow().round_dp(2)))
}
