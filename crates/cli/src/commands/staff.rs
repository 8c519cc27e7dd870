//! Staff account command.
//!
//! Diners self-register through the server; chef and cashier accounts
//! are provisioned here so the registration endpoint never has to mint
//! staff roles.

use std::str::FromStr;

use tracing::info;

use comanda_core::UserRole;
use comanda_server::services::AuthService;

/// Create a staff account.
///
/// # Errors
///
/// Returns an error for an unknown or non-staff role, a weak password,
/// an already-registered email, or a database failure.
pub async fn create(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let role = UserRole::from_str(role)?;
    if !role.is_staff() {
        return Err(format!("role {} is not a staff role", role.as_str()).into());
    }

    let pool = super::connect().await?;
    let user = AuthService::new(&pool)
        .register(email, name, password, role)
        .await?;

    info!(user_id = %user.id, role = %user.role.as_str(), "staff account created");
    Ok(())
}
