//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are embedded into
//! the binary at compile time, so the CLI can migrate any environment it
//! can reach.

use tracing::info;

/// Run the database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
