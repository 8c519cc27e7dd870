//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod staff;

use secrecy::SecretString;
use sqlx::PgPool;

/// Connect to the database named by the environment.
///
/// Reads `COMANDA_DATABASE_URL`, falling back to `DATABASE_URL`, after
/// loading a `.env` file if present.
///
/// # Errors
///
/// Returns an error if no database URL is set or the connection fails.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("COMANDA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "COMANDA_DATABASE_URL (or DATABASE_URL) not set")?;

    Ok(comanda_server::db::create_pool(&database_url).await?)
}
