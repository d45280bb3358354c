//! HTTP API for the point ledger.
//!
//! Exposes balance and history queries plus the charge and use mutations of
//! a [`PointLedger`](point_ledger::PointLedger) over JSON.
//!
//! # Errors
//!
//! Every error body has the shape `{ "error": { code, message, details } }`.
//! Rejected requests answer 400 with code `invalid_request`; failed commits
//! answer 500 with code `persistence_failure`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{ServiceConfig, StoreBackend};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
