//! Session-related types.
//!
//! Types stored in the session for authentication state, the scanned
//! table, and the pre-checkout cart.

use serde::{Deserialize, Serialize};

use comanda_core::{Email, UserId, UserRole};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role, checked by the staff extractors.
    pub role: UserRole,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the scanned table id (set by the QR flow).
    pub const TABLE_ID: &str = "table_id";

    /// Key for the pre-checkout cart.
    ///
    /// Lives only for the ordering session: cleared on checkout and gone
    /// when the session expires.
    pub const CART: &str = "cart";
}
