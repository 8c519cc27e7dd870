//! Real-time sync bridge between the order store and the role views.
//!
//! Every screen watches orders through one of two acquisition strategies
//! over the same [`OrderQuery`] shape:
//!
//! - **Subscription**: [`OrderFeed::subscribe`] yields the full current
//!   result set immediately, then re-executes the query and yields the
//!   *entire fresh result set* after every committed mutation. Consumers
//!   replace their whole list on each snapshot; the contract is
//!   full-replacement and at-least-once, never incremental deltas.
//! - **One-shot**: [`fetch`] runs the query once. The kitchen board uses
//!   this, re-fetching each time the screen regains focus.
//!
//! Services call [`OrderFeed::notify`] strictly *after* a write commits,
//! so subscribers only ever see committed data. Dropping a subscription
//! stream drops its broadcast receiver; nothing fires after teardown.

use futures::Stream;
use sqlx::PgPool;
use tokio::sync::broadcast;

use comanda_core::Order;

use crate::db::{OrderQuery, OrderRepository, RepositoryError};

/// Broadcast capacity. A lagged receiver is harmless: it coalesces by
/// simply re-running its query on the next wakeup.
const FEED_CAPACITY: usize = 64;

/// Change signal for the active order set.
#[derive(Debug, Clone)]
pub struct OrderFeed {
    tx: broadcast::Sender<()>,
}

impl Default for OrderFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderFeed {
    /// Create a feed with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    /// Signal that a mutation of the active order set has committed.
    ///
    /// Safe to call with no subscribers.
    pub fn notify(&self) {
        let _ = self.tx.send(());
    }

    /// Number of live subscriptions (for logging).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Subscribe to full snapshots of `query`.
    ///
    /// The first item is the current result set; every later item is the
    /// complete re-queried result set after a change signal. A failed
    /// re-query is logged and skipped, leaving the consumer on its last
    /// committed snapshot.
    pub fn subscribe(
        &self,
        pool: PgPool,
        query: OrderQuery,
    ) -> impl Stream<Item = Vec<Order>> + Send + use<> {
        let mut rx = self.tx.subscribe();

        async_stream::stream! {
            match OrderRepository::new(&pool).list(&query).await {
                Ok(orders) => yield orders,
                Err(e) => tracing::warn!(error = %e, "initial order snapshot failed"),
            }

            loop {
                match rx.recv().await {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }

                match OrderRepository::new(&pool).list(&query).await {
                    Ok(orders) => yield orders,
                    Err(e) => tracing::warn!(error = %e, "order snapshot refresh failed"),
                }
            }
        }
    }
}

/// One-shot read of the same query shape the subscriptions use.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn fetch(pool: &PgPool, query: &OrderQuery) -> Result<Vec<Order>, RepositoryError> {
    OrderRepository::new(pool).list(query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_without_subscribers_is_safe() {
        let feed = OrderFeed::new();
        assert_eq!(feed.subscriber_count(), 0);
        feed.notify();
        feed.notify();
    }

    #[tokio::test]
    async fn test_dropped_subscriber_detaches() {
        let feed = OrderFeed::new();
        let rx = feed.tx.subscribe();
        assert_eq!(feed.subscriber_count(), 1);
        drop(rx);
        assert_eq!(feed.subscriber_count(), 0);
    }
}
