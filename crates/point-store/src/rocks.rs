//! `RocksDB` storage implementation.
//!
//! This module provides `RocksStore`, which implements both `BalanceStore`
//! and `HistoryStore` over one database. Balance writes and history appends
//! still go to separate column families in separate writes; the ledger is
//! responsible for sequencing them.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use point_core::{HistoryId, PointHistory, TransactionType, UserId, UserPoint};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{BalanceStore, HistoryStore};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    last_history_id: AtomicU64,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// History ids continue from the highest id already stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let store = Self {
            db: Arc::new(db),
            last_history_id: AtomicU64::new(0),
        };
        let last = store.load_last_history_id()?;
        store.last_history_id.store(last, Ordering::SeqCst);

        tracing::debug!(last_history_id = last, "RocksDB point store opened");
        Ok(store)
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn load_last_history_id(&self) -> Result<u64> {
        let cf = self.cf(cf::POINT_HISTORIES)?;
        let mut iter = self.db.iterator_cf(&cf, IteratorMode::End);

        match iter.next() {
            None => Ok(0),
            Some(item) => {
                let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
                keys::history_id_from_key(&key)
                    .map(HistoryId::get)
                    .ok_or_else(|| StoreError::Database("malformed history key".into()))
            }
        }
    }

    fn read_point(&self, user_id: UserId) -> Result<Option<UserPoint>> {
        let cf = self.cf(cf::USER_POINTS)?;

        self.db
            .get_cf(&cf, keys::user_point_key(user_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn write_point(&self, record: &UserPoint) -> Result<()> {
        let cf = self.cf(cf::USER_POINTS)?;
        let value = Self::serialize(record)?;

        self.db
            .put_cf(&cf, keys::user_point_key(record.id), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn write_history(&self, history: &PointHistory) -> Result<()> {
        let cf_history = self.cf(cf::POINT_HISTORIES)?;
        let cf_by_user = self.cf(cf::POINT_HISTORIES_BY_USER)?;
        let value = Self::serialize(history)?;

        // Record and index land together
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_history, keys::history_key(history.id), value);
        batch.put_cf(
            &cf_by_user,
            keys::user_history_key(history.user_id, history.id),
            [],
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn read_histories(&self, user_id: UserId) -> Result<Vec<PointHistory>> {
        let cf_history = self.cf(cf::POINT_HISTORIES)?;
        let cf_by_user = self.cf(cf::POINT_HISTORIES_BY_USER)?;
        let prefix = keys::user_histories_prefix(user_id);

        let iter = self
            .db
            .iterator_cf(&cf_by_user, IteratorMode::From(&prefix, Direction::Forward));

        let mut histories = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }

            let history_id = keys::history_id_from_user_key(&key)
                .ok_or_else(|| StoreError::Database("malformed history index key".into()))?;

            let data = self
                .db
                .get_cf(&cf_history, keys::history_key(history_id))
                .map_err(|e| StoreError::Database(e.to_string()))?;

            match data {
                Some(data) => histories.push(Self::deserialize(&data)?),
                None => {
                    tracing::warn!(user_id = %user_id, history_id = %history_id, "Dangling history index entry");
                }
            }
        }

        Ok(histories)
    }
}

/// The trait methods are `async` only to share the store interface. Each
/// call runs its `RocksDB` read or write synchronously on the calling worker
/// thread, and during a mutation that thread also holds the user's lock.
/// Calls are single point lookups, single-key writes or one prefix scan, so
/// they are not moved to `spawn_blocking`.
#[async_trait]
impl BalanceStore for RocksStore {
    async fn select_by_id(&self, user_id: UserId) -> Result<UserPoint> {
        Ok(self
            .read_point(user_id)?
            .unwrap_or_else(|| UserPoint::empty(user_id)))
    }

    async fn insert_or_update(&self, user_id: UserId, point: i64) -> Result<UserPoint> {
        let record = UserPoint::new(user_id, point);
        self.write_point(&record)?;
        Ok(record)
    }
}

/// Runs synchronously on the calling worker thread, like the
/// [`BalanceStore`] impl.
#[async_trait]
impl HistoryStore for RocksStore {
    async fn insert(
        &self,
        user_id: UserId,
        amount: i64,
        transaction_type: TransactionType,
        time_millis: i64,
    ) -> Result<PointHistory> {
        let id = self.last_history_id.fetch_add(1, Ordering::SeqCst) + 1;
        let history = PointHistory {
            id: HistoryId::new(id),
            user_id,
            amount,
            transaction_type,
            time_millis,
        };

        self.write_history(&history)?;
        Ok(history)
    }

    async fn select_all_by_user_id(&self, user_id: UserId) -> Result<Vec<PointHistory>> {
        self.read_histories(user_id)
    }
}
