//! Application state.

use std::sync::Arc;

use point_ledger::PointLedger;
use point_store::{BalanceStore, HistoryStore, MemoryBalanceStore, MemoryHistoryStore, StoreError};

use crate::config::{ServiceConfig, StoreBackend};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The point ledger.
    pub ledger: Arc<PointLedger>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state around an existing ledger.
    #[must_use]
    pub fn new(ledger: Arc<PointLedger>, config: ServiceConfig) -> Self {
        Self { ledger, config }
    }

    /// Open the configured backend and build the ledger over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the `RocksDB` backend is selected and cannot be
    /// opened, or if the service was built without it.
    pub fn from_config(config: ServiceConfig) -> Result<Self, StoreError> {
        let (balances, histories) = open_stores(&config)?;
        let ledger = Arc::new(PointLedger::new(balances, histories));
        Ok(Self::new(ledger, config))
    }
}

type Stores = (Arc<dyn BalanceStore>, Arc<dyn HistoryStore>);

fn open_stores(config: &ServiceConfig) -> Result<Stores, StoreError> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!(
                latency_ms = config.store_latency.as_millis(),
                "Using in-memory store"
            );
            Ok((
                Arc::new(MemoryBalanceStore::with_latency(config.store_latency)),
                Arc::new(MemoryHistoryStore::with_latency(config.store_latency)),
            ))
        }
        StoreBackend::Rocksdb => open_rocks(&config.data_dir),
    }
}

#[cfg(feature = "rocksdb-backend")]
fn open_rocks(data_dir: &str) -> Result<Stores, StoreError> {
    tracing::info!(path = %data_dir, "Opening RocksDB store");
    let store = Arc::new(point_store::RocksStore::open(data_dir)?);
    Ok((store.clone(), store))
}

#[cfg(not(feature = "rocksdb-backend"))]
fn open_rocks(_data_dir: &str) -> Result<Stores, StoreError> {
    Err(StoreError::Unavailable(
        "built without the rocksdb-backend feature".into(),
    ))
}
