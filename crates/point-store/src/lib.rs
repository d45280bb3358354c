//! Storage layer for the point ledger.
//!
//! Balances and history live in two independent stores. Neither store offers
//! transactions spanning both; the ledger sequences writes across them and
//! compensates when the second write fails.
//!
//! # Backends
//!
//! - [`MemoryBalanceStore`] / [`MemoryHistoryStore`]: in-process tables,
//!   optionally with a fixed per-call latency
//! - `RocksStore` (feature `rocksdb-backend`): both stores over `RocksDB`
//!   column families
//!
//! # Example
//!
//! ```
//! use point_core::UserId;
//! use point_store::{BalanceStore, MemoryBalanceStore};
//!
//! # async fn example() -> point_store::Result<()> {
//! let store = MemoryBalanceStore::new();
//! let user_id = UserId::new(1);
//!
//! store.insert_or_update(user_id, 5000).await?;
//! assert_eq!(store.select_by_id(user_id).await?.point, 5000);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;

#[cfg(feature = "rocksdb-backend")]
pub mod keys;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
#[cfg(feature = "rocksdb-backend")]
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::{MemoryBalanceStore, MemoryHistoryStore};
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use async_trait::async_trait;
use point_core::{PointHistory, TransactionType, UserId, UserPoint};

/// Keyed storage for user balances.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Read a user's balance.
    ///
    /// A user with no stored balance reads as a zero balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn select_by_id(&self, user_id: UserId) -> Result<UserPoint>;

    /// Overwrite a user's balance unconditionally.
    ///
    /// Returns the stored record, stamped with the write time.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    async fn insert_or_update(&self, user_id: UserId, point: i64) -> Result<UserPoint>;
}

/// Append-only storage for point history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a history record and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    async fn insert(
        &self,
        user_id: UserId,
        amount: i64,
        transaction_type: TransactionType,
        time_millis: i64,
    ) -> Result<PointHistory>;

    /// List a user's history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn select_all_by_user_id(&self, user_id: UserId) -> Result<Vec<PointHistory>>;
}
