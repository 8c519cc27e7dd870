//! Comanda server library.
//!
//! Exposes the application modules so the CLI and integration tests can
//! reuse configuration, repositories, and services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aggregate;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod sync;
