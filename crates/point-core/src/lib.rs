//! Core types and validation rules for the point ledger.
//!
//! This crate provides the foundational types shared by every layer:
//!
//! - **Identifiers**: `UserId`, `HistoryId`
//! - **Balances**: `UserPoint`
//! - **History**: `PointHistory`, `TransactionType`
//! - **Validation**: amount and balance rules with their policy constants
//! - **Errors**: `PointError`, `InvalidRequest`
//!
//! # Policy
//!
//! - A balance never exceeds 1,000,000 points and never goes negative
//! - A charge adds at least 5,000 points
//! - A use deducts at least 500 points

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod history;
pub mod ids;
pub mod point;
pub mod validation;

pub use error::{InvalidRequest, PointError, Result};
pub use history::{PointHistory, TransactionType};
pub use ids::{HistoryId, IdError, UserId};
pub use point::{now_millis, UserPoint};
pub use validation::{MAX_BALANCE, MIN_CHARGE_AMOUNT, MIN_USE_AMOUNT};
