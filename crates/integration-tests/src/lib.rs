//! Integration tests for Comanda.
//!
//! # Running Tests
//!
//! Logic-level tests run with a plain `cargo test -p comanda-integration-tests`.
//!
//! Database-backed tests are `#[ignore]`d by default and need a migrated
//! `PostgreSQL` instance:
//!
//! ```bash
//! export COMANDA_TEST_DATABASE_URL=postgres://localhost/comanda_test
//! COMANDA_DATABASE_URL=$COMANDA_TEST_DATABASE_URL cargo run -p comanda-cli -- migrate
//! cargo test -p comanda-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `order_lifecycle` - Status sequence and totals invariants
//! - `order_views` - Client, kitchen, and cashier view assembly
//! - `order_store` - Repository round trips, settlement, and archival
//! - `sync_feed` - Change-feed snapshot semantics

use secrecy::SecretString;
use sqlx::PgPool;

/// Connect to the test database named by `COMANDA_TEST_DATABASE_URL`.
///
/// # Panics
///
/// Panics when the variable is unset or the connection fails; the
/// database-backed tests are ignored by default, so this only fires when
/// they are requested explicitly.
#[must_use]
pub async fn test_pool() -> PgPool {
    let url = std::env::var("COMANDA_TEST_DATABASE_URL")
        .map(SecretString::from)
        .expect("COMANDA_TEST_DATABASE_URL must be set for database tests");
    comanda_server::db::create_pool(&url)
        .await
        .expect("failed to connect to the test database")
}
