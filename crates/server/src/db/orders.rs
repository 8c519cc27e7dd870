//! Order repository: the active working set and the archive.
//!
//! Orders are stored as documents: line items and status history are
//! JSONB values inside the row. Writes rely on per-row last-write-wins
//! semantics; there is no optimistic
//! version check, so a race between two status writers can overwrite one
//! transition's history stamp.

use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use comanda_core::{LineItem, Order, OrderId, OrderStatus, StatusHistory, TableId, UserId};

use super::RepositoryError;

/// Sort direction over the creation-time sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Oldest first (the kitchen works the queue front-to-back).
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

impl SortDirection {
    const fn sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// The live-query shape shared by every view: an optional equality filter
/// on the placing user, ordered by creation time.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderQuery {
    /// Restrict to one customer's orders (the client view); `None` shows all.
    pub user_id: Option<UserId>,
    /// Sort over `created_at`.
    pub direction: SortDirection,
}

impl OrderQuery {
    /// A single customer's orders, oldest first.
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            direction: SortDirection::Ascending,
        }
    }

    /// All active orders, oldest first.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }
}

/// Outcome of an archive attempt.
///
/// Re-invoking archival on an already-archived order is a reported no-op,
/// never a silent duplicate in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Moved from the active set to history.
    Archived,
    /// Already in history; nothing to do.
    AlreadyArchived,
    /// Active, but not yet paid; archival rejected.
    NotPaid(OrderStatus),
    /// Unknown in both the active set and history.
    NotFound,
}

/// Raw order row; converted to the domain [`Order`] after reading.
#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    table_id: String,
    items: Json<Vec<LineItem>>,
    status: String,
    status_history: Json<StatusHistory>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "invalid status {:?} in order {}",
                row.status, row.id
            ))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            table: TableId::new(row.table_id),
            items: row.items.0,
            status,
            status_history: row.status_history.0,
            created_at: row.created_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new order in the active set.
    ///
    /// The store assigns the id; status is `Pedido` with the initial
    /// history stamp at creation time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        table: TableId,
        items: Vec<LineItem>,
    ) -> Result<Order, RepositoryError> {
        let order = Order::place(
            OrderId::new(Uuid::new_v4()),
            user_id,
            table,
            items,
            Utc::now(),
        )
        .map_err(|e| RepositoryError::Conflict(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO orders (id, user_id, table_id, items, status, status_history, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.table.as_str())
        .bind(Json(&order.items))
        .bind(order.status.as_str())
        .bind(Json(&order.status_history))
        .bind(order.created_at)
        .execute(self.pool)
        .await?;

        Ok(order)
    }

    /// Get an active order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if the stored status is not a known value.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, table_id, items, status, status_history, created_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// List active orders matching a query, in the query's declared sort.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, query: &OrderQuery) -> Result<Vec<Order>, RepositoryError> {
        let direction = query.direction.sql();
        let rows = if let Some(user_id) = query.user_id {
            sqlx::query_as::<_, OrderRow>(&format!(
                r"
                SELECT id, user_id, table_id, items, status, status_history, created_at
                FROM orders
                WHERE user_id = $1
                ORDER BY created_at {direction}, id
                "
            ))
            .bind(user_id.as_uuid())
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, OrderRow>(&format!(
                r"
                SELECT id, user_id, table_id, items, status, status_history, created_at
                FROM orders
                ORDER BY created_at {direction}, id
                "
            ))
            .fetch_all(self.pool)
            .await?
        };

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Write a status transition: the new status plus its history stamp,
    /// in a single UPDATE.
    ///
    /// Merging with `||` overwrites any existing stamp for the same status
    /// (re-entering a status refreshes its timestamp; no duplicate entry).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order is not in the
    /// active set, `Database` on write failure.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let stamp = json!({ (status.as_str()): { "timestamp": at } });

        let result = sqlx::query(
            r"
            UPDATE orders
            SET status = $2, status_history = status_history || $3
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(Json(stamp))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Move a paid order from the active set to history.
    ///
    /// The copy and the delete run inside one database transaction, so the
    /// duplicate/loss window of a client-driven copy-then-delete cannot
    /// occur: the order is either in exactly one of the two sets or the
    /// whole move rolled back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on transaction failure. All
    /// non-error outcomes (including "already archived" and "not paid")
    /// are reported through [`ArchiveOutcome`].
    pub async fn archive(&self, id: OrderId) -> Result<ArchiveOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let copied = sqlx::query(
            r"
            INSERT INTO orders_history
                (id, user_id, table_id, items, status, status_history, created_at)
            SELECT id, user_id, table_id, items, status, status_history, created_at
            FROM orders
            WHERE id = $1 AND status = $2
            ",
        )
        .bind(id.as_uuid())
        .bind(OrderStatus::Pagado.as_str())
        .execute(&mut *tx)
        .await?;

        if copied.rows_affected() == 0 {
            tx.rollback().await?;
            // Nothing moved: report why instead of failing.
            if let Some(order) = self.get(id).await? {
                return Ok(ArchiveOutcome::NotPaid(order.status));
            }
            if self.get_archived(id).await?.is_some() {
                return Ok(ArchiveOutcome::AlreadyArchived);
            }
            return Ok(ArchiveOutcome::NotFound);
        }

        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ArchiveOutcome::Archived)
    }

    /// Get an archived order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_archived(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, table_id, items, status, status_history, created_at
            FROM orders_history
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// List archived orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_archived(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, table_id, items, status, status_history, created_at
            FROM orders_history
            ORDER BY created_at DESC, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }
}
