//! Application services sitting between routes and repositories.

pub mod auth;
pub mod orders;
pub mod storage;

pub use auth::{AuthError, AuthService};
pub use orders::{OrderService, OrderServiceError};
pub use storage::{StorageClient, StorageError};
