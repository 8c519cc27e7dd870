//! Order lifecycle orchestration: place, advance, settle, archive.
//!
//! Every mutation notifies the order feed only after the write has
//! committed, so subscribed views never render uncommitted state. On any
//! failure nothing is notified and every view stays on its previous
//! committed snapshot.

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;

use comanda_core::{LineItem, Order, OrderId, OrderStatus, TableId, UserId};

use crate::db::receipts::{Receipt, ReceiptRepository};
use crate::db::users::UserRepository;
use crate::db::{ArchiveOutcome, OrderRepository, RepositoryError};
use crate::sync::OrderFeed;

use crate::aggregate::UNKNOWN_CUSTOMER;

/// Errors from order lifecycle operations.
#[derive(Debug, Error)]
pub enum OrderServiceError {
    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// The requested transition is not in the relation.
    ///
    /// Unreachable while the relation is total; kept so tightening the
    /// relation needs no new plumbing.
    #[error("transition {from} -> {to} is not allowed")]
    TransitionNotAllowed { from: OrderStatus, to: OrderStatus },

    /// Settle called on an order that is not ready to pay.
    #[error("order is {0}, not ready to pay")]
    NotPayable(OrderStatus),
}

/// Order lifecycle service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    feed: &'a OrderFeed,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, feed: &'a OrderFeed) -> Self {
        Self { pool, feed }
    }

    /// Place a new order from a checked-out cart.
    ///
    /// The order starts at `Pedido` with its history stamped at creation
    /// time.
    ///
    /// # Errors
    ///
    /// Returns `OrderServiceError::Repository` if the insert fails (an
    /// empty cart surfaces as a conflict from the store layer).
    pub async fn place(
        &self,
        user_id: UserId,
        table: TableId,
        items: Vec<LineItem>,
    ) -> Result<Order, OrderServiceError> {
        let order = OrderRepository::new(self.pool)
            .create(user_id, table, items)
            .await?;

        tracing::info!(order_id = %order.id, table = %order.table, "order placed");
        self.feed.notify();
        Ok(order)
    }

    /// Write a status transition chosen by an operator.
    ///
    /// Any status in the sequence may be selected, including moving
    /// backward or re-asserting the current status (which only refreshes
    /// that status's timestamp).
    ///
    /// # Errors
    ///
    /// Returns `Repository(NotFound)` if the order is not active,
    /// `TransitionNotAllowed` if the relation rejects the edge.
    pub async fn advance(
        &self,
        id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, OrderServiceError> {
        let mut order = OrderRepository::new(self.pool)
            .get(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if !order.status.permits(new_status) {
            return Err(OrderServiceError::TransitionNotAllowed {
                from: order.status,
                to: new_status,
            });
        }

        let at = Utc::now();
        OrderRepository::new(self.pool)
            .set_status(id, new_status, at)
            .await?;

        tracing::info!(order_id = %id, from = %order.status, to = %new_status, "status advanced");

        // Mirror the committed write locally for the caller.
        order.status = new_status;
        order.status_history.stamp(new_status, at);

        self.feed.notify();
        Ok(order)
    }

    /// Confirm payment: advance to `Pagado` and record the receipt.
    ///
    /// The order remains in the active set until the separate archive
    /// action.
    ///
    /// # Errors
    ///
    /// Returns `NotPayable` unless the order is at `Listo para pagar`,
    /// `Repository` on store failure.
    pub async fn settle(&self, id: OrderId) -> Result<(Order, Receipt), OrderServiceError> {
        let order = OrderRepository::new(self.pool)
            .get(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if !order.status.is_payable() {
            return Err(OrderServiceError::NotPayable(order.status));
        }

        // Missing customer resolves to the fallback label, never an error.
        let customer_name = UserRepository::new(self.pool)
            .get_by_id(order.user_id)
            .await?
            .map_or_else(|| UNKNOWN_CUSTOMER.to_string(), |user| user.name);

        let order = self.advance(id, OrderStatus::Pagado).await?;

        let receipt = ReceiptRepository::new(self.pool)
            .create(order.id, &customer_name, &order.items, order.totals())
            .await?;

        tracing::info!(order_id = %id, receipt_id = %receipt.id, total = %receipt.total, "order settled");
        Ok((order, receipt))
    }

    /// Move a paid order from the active set to history.
    ///
    /// Archiving an order that is already gone is a warned no-op, never a
    /// duplicate.
    ///
    /// # Errors
    ///
    /// Returns `Repository` on store failure.
    pub async fn archive(&self, id: OrderId) -> Result<ArchiveOutcome, OrderServiceError> {
        let outcome = OrderRepository::new(self.pool).archive(id).await?;

        match outcome {
            ArchiveOutcome::Archived => {
                tracing::info!(order_id = %id, "order archived");
                self.feed.notify();
            }
            ArchiveOutcome::AlreadyArchived => {
                tracing::warn!(order_id = %id, "archive skipped: already in history");
            }
            ArchiveOutcome::NotFound => {
                tracing::warn!(order_id = %id, "archive skipped: order not found");
            }
            ArchiveOutcome::NotPaid(status) => {
                tracing::warn!(order_id = %id, status = %status, "archive rejected: not paid");
            }
        }

        Ok(outcome)
    }
}
