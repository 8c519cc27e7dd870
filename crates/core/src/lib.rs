//! Comanda Core - Shared types library.
//!
//! This crate provides common types used across all Comanda components:
//! - `server` - The ordering service (client, kitchen, and cashier views)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the order status machine, order and product
//!   documents, and totals arithmetic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
