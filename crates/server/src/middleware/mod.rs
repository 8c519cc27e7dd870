//! Middleware and extractors.

pub mod auth;
pub mod session;

pub use auth::{RequireCashier, RequireChef, RequireUser};
pub use session::create_session_layer;
