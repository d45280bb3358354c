//! In-memory storage implementation.
//!
//! Both tables hold their data behind a `RwLock` that is never held across an
//! await point. The optional latency is applied before each call touches the
//! table, which widens the window in which concurrent callers interleave.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use point_core::{HistoryId, PointHistory, TransactionType, UserId, UserPoint};

use crate::error::{Result, StoreError};
use crate::{BalanceStore, HistoryStore};

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

/// In-memory balance table.
#[derive(Debug, Default)]
pub struct MemoryBalanceStore {
    points: RwLock<HashMap<UserId, UserPoint>>,
    latency: Duration,
}

impl MemoryBalanceStore {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table that sleeps for `latency` on every call.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Number of users with a stored balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the table lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self
            .points
            .read()
            .map_err(|_| StoreError::Database("balance table lock poisoned".into()))?
            .len())
    }

    /// Check if no balance has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the table lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl BalanceStore for MemoryBalanceStore {
    async fn select_by_id(&self, user_id: UserId) -> Result<UserPoint> {
        simulate_latency(self.latency).await;

        let points = self
            .points
            .read()
            .map_err(|_| StoreError::Database("balance table lock poisoned".into()))?;

        Ok(points
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| UserPoint::empty(user_id)))
    }

    async fn insert_or_update(&self, user_id: UserId, point: i64) -> Result<UserPoint> {
        simulate_latency(self.latency).await;

        let record = UserPoint::new(user_id, point);
        self.points
            .write()
            .map_err(|_| StoreError::Database("balance table lock poisoned".into()))?
            .insert(user_id, record.clone());

        tracing::trace!(user_id = %user_id, point, "Balance stored");
        Ok(record)
    }
}

/// In-memory history table.
///
/// Identifiers start at 1 and increase by one per insert.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    inner: RwLock<HistoryTable>,
    latency: Duration,
}

#[derive(Debug, Default)]
struct HistoryTable {
    last_id: u64,
    by_user: HashMap<UserId, Vec<PointHistory>>,
}

impl MemoryHistoryStore {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table that sleeps for `latency` on every call.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Total number of records across all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the table lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        let table = self
            .inner
            .read()
            .map_err(|_| StoreError::Database("history table lock poisoned".into()))?;
        Ok(table.by_user.values().map(Vec::len).sum())
    }

    /// Check if no record has been appended yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the table lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn insert(
        &self,
        user_id: UserId,
        amount: i64,
        transaction_type: TransactionType,
        time_millis: i64,
    ) -> Result<PointHistory> {
        simulate_latency(self.latency).await;

        let mut table = self
            .inner
            .write()
            .map_err(|_| StoreError::Database("history table lock poisoned".into()))?;

        table.last_id += 1;
        let history = PointHistory {
            id: HistoryId::new(table.last_id),
            user_id,
            amount,
            transaction_type,
            time_millis,
        };
        table
            .by_user
            .entry(user_id)
            .or_default()
            .push(history.clone());

        tracing::trace!(user_id = %user_id, history_id = %history.id, "History appended");
        Ok(history)
    }

    async fn select_all_by_user_id(&self, user_id: UserId) -> Result<Vec<PointHistory>> {
        simulate_latency(self.latency).await;

        let table = self
            .inner
            .read()
            .map_err(|_| StoreError::Database("history table lock poisoned".into()))?;

        Ok(table.by_user.get(&user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_user_reads_as_zero_balance() {
        let store = MemoryBalanceStore::new();

        let point = store.select_by_id(UserId::new(1)).await.unwrap();
        assert_eq!(point.point, 0);
        assert_eq!(point.id, UserId::new(1));
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn insert_or_update_overwrites() {
        let store = MemoryBalanceStore::new();
        let user_id = UserId::new(1);

        store.insert_or_update(user_id, 5000).await.unwrap();
        let stored = store.insert_or_update(user_id, 1200).await.unwrap();

        assert_eq!(stored.point, 1200);
        assert_eq!(store.select_by_id(user_id).await.unwrap(), stored);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn history_ids_increase_from_one() {
        let store = MemoryHistoryStore::new();

        let first = store
            .insert(UserId::new(1), 5000, TransactionType::Charge, 10)
            .await
            .unwrap();
        let second = store
            .insert(UserId::new(2), 700, TransactionType::Use, 11)
            .await
            .unwrap();

        assert_eq!(first.id, HistoryId::new(1));
        assert_eq!(second.id, HistoryId::new(2));
    }

    #[tokio::test]
    async fn history_is_listed_per_user_in_insertion_order() {
        let store = MemoryHistoryStore::new();
        let user_id = UserId::new(1);

        store
            .insert(user_id, 5000, TransactionType::Charge, 10)
            .await
            .unwrap();
        store
            .insert(UserId::new(2), 9000, TransactionType::Charge, 11)
            .await
            .unwrap();
        store
            .insert(user_id, 3000, TransactionType::Use, 12)
            .await
            .unwrap();

        let histories = store.select_all_by_user_id(user_id).await.unwrap();
        assert_eq!(histories.len(), 2);
        assert_eq!(histories[0].transaction_type, TransactionType::Charge);
        assert_eq!(histories[1].amount, 3000);
        assert!(store
            .select_all_by_user_id(UserId::new(3))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(store.len().unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_applied_per_call() {
        let store = MemoryBalanceStore::with_latency(Duration::from_millis(200));
        let started = tokio::time::Instant::now();

        store.insert_or_update(UserId::new(1), 5000).await.unwrap();
        store.select_by_id(UserId::new(1)).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(400));
    }
}
