//! User roles.

use serde::{Deserialize, Serialize};

/// Role attached to an account, controlling which views a user may access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// A customer: browses the menu, places orders, tracks their own.
    #[default]
    Client,
    /// Kitchen staff: sees every active order and advances status.
    Chef,
    /// Front of house: manages the catalog, settles payment, archives.
    Cashier,
}

impl UserRole {
    /// The persisted wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Chef => "chef",
            Self::Cashier => "cashier",
        }
    }

    /// Whether this role may use the staff views (kitchen or cashier).
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Chef | Self::Cashier)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "chef" => Ok(Self::Chef),
            "cashier" => Ok(Self::Cashier),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
