//! Client SDK for the point ledger service.
//!
//! # Example
//!
//! ```no_run
//! use point_client::PointClient;
//! use point_core::UserId;
//!
//! # async fn example() -> Result<(), point_client::ClientError> {
//! let client = PointClient::new("http://point-ledger:8080")?;
//! let user_id = UserId::new(1);
//!
//! client.charge_point(user_id, 10_000).await?;
//! let point = client.use_point(user_id, 3_000).await?;
//!
//! println!("Balance: {} points", point.point);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, PointClient};
pub use error::ClientError;
pub use point_core::{PointHistory, TransactionType, UserId, UserPoint};
pub use types::{AmountRequest, ApiErrorBody, ApiErrorResponse};
