//! Database operations for the `comanda` `PostgreSQL` database.
//!
//! # Collections
//!
//! Orders are stored as documents: line items and status history live as
//! JSONB columns inside the row rather than normalized child tables.
//!
//! - `orders` - the active working set (one row per live order)
//! - `orders_history` - archived orders, same shape, same ids
//! - `products` - the menu catalog
//! - `receipts` - payment receipts
//! - `users` - accounts and roles
//! - `session` - tower-sessions storage
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p comanda-cli -- migrate
//! ```
//! They are never run automatically on startup.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod orders;
pub mod products;
pub mod receipts;
pub mod users;

pub use orders::{ArchiveOutcome, OrderQuery, OrderRepository, SortDirection};
pub use products::{ProductInput, ProductRepository};
pub use receipts::ReceiptRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
