//! Core types for Comanda.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod order;
pub mod product;
pub mod role;
pub mod status;
pub mod totals;

pub use email::{Email, EmailError};
pub use id::*;
pub use order::{LineItem, LineItemError, Order, OrderError};
pub use product::Product;
pub use role::UserRole;
pub use status::{OrderStatus, StatusHistory, StatusStamp, StepState};
pub use totals::{OrderTotals, TAX_RATE, compute_totals};
