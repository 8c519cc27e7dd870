//! Receipt repository.
//!
//! A receipt is written once at payment confirmation and never mutated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use comanda_core::{LineItem, OrderId, OrderTotals, ReceiptId};

use super::RepositoryError;

/// A stored payment receipt.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: ReceiptId,
    pub order_id: OrderId,
    /// Name of the paying customer at settlement time.
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Raw receipt row.
#[derive(Debug, FromRow)]
struct ReceiptRow {
    id: Uuid,
    order_id: Uuid,
    customer_name: String,
    items: Json<Vec<LineItem>>,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl From<ReceiptRow> for Receipt {
    fn from(row: ReceiptRow) -> Self {
        Self {
            id: ReceiptId::new(row.id),
            order_id: OrderId::new(row.order_id),
            customer_name: row.customer_name,
            items: row.items.0,
            subtotal: row.subtotal,
            tax: row.tax,
            total: row.total,
            created_at: row.created_at,
        }
    }
}

/// Repository for receipt database operations.
pub struct ReceiptRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReceiptRepository<'a> {
    /// Create a new receipt repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a receipt for a settled order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        order_id: OrderId,
        customer_name: &str,
        items: &[LineItem],
        totals: OrderTotals,
    ) -> Result<Receipt, RepositoryError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO receipts (id, order_id, customer_name, items, subtotal, tax, total, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(id)
        .bind(order_id.as_uuid())
        .bind(customer_name)
        .bind(Json(items))
        .bind(totals.subtotal)
        .bind(totals.tax)
        .bind(totals.total)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(Receipt {
            id: ReceiptId::new(id),
            order_id,
            customer_name: customer_name.to_string(),
            items: items.to_vec(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            created_at: now,
        })
    }

    /// Get a receipt by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ReceiptId) -> Result<Option<Receipt>, RepositoryError> {
        let row = sqlx::query_as::<_, ReceiptRow>(
            r"
            SELECT id, order_id, customer_name, items, subtotal, tax, total, created_at
            FROM receipts
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Receipt::from))
    }
}
