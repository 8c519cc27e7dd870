//! Order lifecycle status machine.
//!
//! An order moves through a fixed six-stage sequence from placement to
//! payment. The wire values are the Spanish labels the kitchen and cashier
//! screens display; they are also what gets persisted, so they must never
//! change without a data migration.
//!
//! Transitions form a free relation over the six states rather than a
//! strict linear automaton: operators may move an order forward or backward
//! to correct mistakes. See [`OrderStatus::permits`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of an order.
///
/// Variants are declared in sequence order, so the derived `Ord` matches
/// the progression from placement to payment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum OrderStatus {
    /// Placed by the customer, not yet picked up by the kitchen.
    #[default]
    #[serde(rename = "Pedido")]
    Pedido,
    /// Being prepared.
    #[serde(rename = "Cocinando")]
    Cocinando,
    /// Ready for pickup at the pass.
    #[serde(rename = "Listo para recoger")]
    ListoParaRecoger,
    /// Delivered to the table.
    #[serde(rename = "Entregado")]
    Entregado,
    /// Customer asked for the bill; the pay control is enabled.
    #[serde(rename = "Listo para pagar")]
    ListoParaPagar,
    /// Paid. Terminal; the order may now be archived.
    #[serde(rename = "Pagado")]
    Pagado,
}

/// Error parsing a status wire string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0:?}")]
pub struct ParseStatusError(pub String);

impl OrderStatus {
    /// The fixed status sequence, in order.
    pub const SEQUENCE: [Self; 6] = [
        Self::Pedido,
        Self::Cocinando,
        Self::ListoParaRecoger,
        Self::Entregado,
        Self::ListoParaPagar,
        Self::Pagado,
    ];

    /// Position of this status in the fixed sequence (0-based step index).
    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }

    /// The persisted wire string (also the display label).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pedido => "Pedido",
            Self::Cocinando => "Cocinando",
            Self::ListoParaRecoger => "Listo para recoger",
            Self::Entregado => "Entregado",
            Self::ListoParaPagar => "Listo para pagar",
            Self::Pagado => "Pagado",
        }
    }

    /// Whether the transition `self -> to` is allowed.
    ///
    /// Modeled as a labeled transition relation over the six states. The
    /// shipped relation permits every pair, including re-asserting the
    /// current status and moving backward: the kitchen stepper lets an
    /// operator pick any step to correct a mistake. Tightening to
    /// forward-only movement would replace the body with
    /// `to.position() > self.position()`.
    #[must_use]
    pub const fn permits(self, to: Self) -> bool {
        // Every (from, to) edge is a valid correction.
        let _ = to;
        true
    }

    /// Whether this status is terminal (no further kitchen work).
    ///
    /// Terminal status is the precondition for archival.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Pagado)
    }

    /// Whether the cashier's pay control should be offered.
    #[must_use]
    pub const fn is_payable(self) -> bool {
        matches!(self, Self::ListoParaPagar)
    }

    /// Derived progress strip for this status.
    ///
    /// Steps at or before the current index render as completed/active,
    /// later steps as pending. This is a pure view of `self`, not state.
    #[must_use]
    pub fn progress(self) -> [StepState; 6] {
        let current = self.position();
        let mut steps = [StepState::Pending; 6];
        for (index, slot) in steps.iter_mut().enumerate() {
            *slot = match index.cmp(&current) {
                std::cmp::Ordering::Less => StepState::Completed,
                std::cmp::Ordering::Equal => StepState::Active,
                std::cmp::Ordering::Greater => StepState::Pending,
            };
        }
        steps
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SEQUENCE
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Render state of one step in the progress strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Active,
    Pending,
}

/// Timestamp recorded when a status was (re-)entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusStamp {
    /// When the order entered the status.
    pub timestamp: DateTime<Utc>,
}

/// Per-status transition history.
///
/// One entry per status the order has passed through, keyed by status.
/// Re-entering an already-visited status overwrites that status's
/// timestamp; there is no multi-visit history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusHistory(BTreeMap<OrderStatus, StatusStamp>);

impl StatusHistory {
    /// Empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// History with the initial `Pedido` entry stamped at creation time.
    #[must_use]
    pub fn initial(at: DateTime<Utc>) -> Self {
        let mut history = Self::new();
        history.stamp(OrderStatus::Pedido, at);
        history
    }

    /// Record that `status` was entered at `at`.
    ///
    /// Overwrites any previous stamp for the same status.
    pub fn stamp(&mut self, status: OrderStatus, at: DateTime<Utc>) {
        self.0.insert(status, StatusStamp { timestamp: at });
    }

    /// The stamp for `status`, if the order has passed through it.
    #[must_use]
    pub fn get(&self, status: OrderStatus) -> Option<&StatusStamp> {
        self.0.get(&status)
    }

    /// Number of distinct statuses recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no status has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = (OrderStatus, &StatusStamp)> {
        self.0.iter().map(|(status, stamp)| (*status, stamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_strings_round_trip() {
        for status in OrderStatus::SEQUENCE {
            let parsed: OrderStatus = status.as_str().parse().expect("parse");
            assert_eq!(parsed, status);

            let json = serde_json::to_string(&status).expect("serialize");
            assert_eq!(json, format!("{:?}", status.as_str()));
            let back: OrderStatus = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, status);
        }

        assert!("Cancelado".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_sequence_positions() {
        assert_eq!(OrderStatus::Pedido.position(), 0);
        assert_eq!(OrderStatus::ListoParaRecoger.position(), 2);
        assert_eq!(OrderStatus::Pagado.position(), 5);

        // Derived Ord follows the sequence.
        assert!(OrderStatus::Pedido < OrderStatus::Cocinando);
        assert!(OrderStatus::ListoParaPagar < OrderStatus::Pagado);
    }

    #[test]
    fn test_terminal_and_payable() {
        assert!(OrderStatus::Pagado.is_terminal());
        assert!(OrderStatus::ListoParaPagar.is_payable());
        for status in OrderStatus::SEQUENCE {
            if status != OrderStatus::Pagado {
                assert!(!status.is_terminal());
            }
            if status != OrderStatus::ListoParaPagar {
                assert!(!status.is_payable());
            }
        }
    }

    #[test]
    fn test_free_transition_relation() {
        // Backward moves and self-loops are valid corrections.
        assert!(OrderStatus::Entregado.permits(OrderStatus::Cocinando));
        assert!(OrderStatus::Pedido.permits(OrderStatus::Pagado));
        assert!(OrderStatus::Cocinando.permits(OrderStatus::Cocinando));
    }

    #[test]
    fn test_progress_strip() {
        let steps = OrderStatus::ListoParaRecoger.progress();
        assert_eq!(steps[0], StepState::Completed);
        assert_eq!(steps[1], StepState::Completed);
        assert_eq!(steps[2], StepState::Active);
        assert_eq!(steps[3], StepState::Pending);
        assert_eq!(steps[5], StepState::Pending);

        let done = OrderStatus::Pagado.progress();
        assert_eq!(done[5], StepState::Active);
        assert!(done[..5].iter().all(|s| *s == StepState::Completed));
    }

    #[test]
    fn test_history_stamp_overwrites() {
        let first = Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2025, 5, 10, 12, 30, 0).unwrap();

        let mut history = StatusHistory::initial(first);
        assert_eq!(history.len(), 1);

        history.stamp(OrderStatus::Cocinando, first);
        history.stamp(OrderStatus::Cocinando, second);

        // Re-entering overwrites the stamp; no duplicate entry.
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.get(OrderStatus::Cocinando).map(|s| s.timestamp),
            Some(second)
        );
    }

    #[test]
    fn test_history_serializes_with_wire_keys() {
        let at = Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
        let mut history = StatusHistory::initial(at);
        history.stamp(OrderStatus::ListoParaRecoger, at);

        let json = serde_json::to_value(&history).expect("serialize");
        assert!(json.get("Pedido").is_some());
        assert!(json.get("Listo para recoger").is_some());
    }
}
