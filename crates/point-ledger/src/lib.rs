//! Concurrency-safe point ledger.
//!
//! [`PointLedger`] implements charge, use and the two queries on top of a
//! [`BalanceStore`](point_store::BalanceStore) and a
//! [`HistoryStore`](point_store::HistoryStore). Mutations for one user are
//! serialized through the [`LockRegistry`]; different users never wait on each
//! other.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use point_core::UserId;
//! use point_ledger::PointLedger;
//! use point_store::{MemoryBalanceStore, MemoryHistoryStore};
//!
//! # async fn example() -> point_core::Result<()> {
//! let ledger = PointLedger::new(
//!     Arc::new(MemoryBalanceStore::new()),
//!     Arc::new(MemoryHistoryStore::new()),
//! );
//!
//! let user_id = UserId::new(1);
//! ledger.charge_point(user_id, 10_000).await?;
//! let point = ledger.use_point(user_id, 3_000).await?;
//! assert_eq!(point.point, 7_000);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ledger;
pub mod lock;

pub use ledger::PointLedger;
pub use lock::{LockRegistry, UserLock};
