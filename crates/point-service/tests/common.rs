//! Common test utilities for point service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;

use point_core::{PointHistory, TransactionType, UserId};
use point_ledger::PointLedger;
use point_service::{create_router, AppState, ServiceConfig};
use point_store::{HistoryStore, MemoryBalanceStore, MemoryHistoryStore, Result, StoreError};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The ledger behind the server, for seeding and inspection.
    pub ledger: Arc<PointLedger>,
    /// A test user ID.
    pub test_user_id: UserId,
}

impl TestHarness {
    /// Create a new test harness over fresh in-memory stores.
    pub fn new() -> Self {
        Self::with_ledger(PointLedger::new(
            Arc::new(MemoryBalanceStore::new()),
            Arc::new(MemoryHistoryStore::new()),
        ))
    }

    /// Create a harness whose history appends always fail.
    pub fn with_broken_history() -> Self {
        Self::with_ledger(PointLedger::new(
            Arc::new(MemoryBalanceStore::new()),
            Arc::new(BrokenHistoryStore),
        ))
    }

    fn with_ledger(ledger: PointLedger) -> Self {
        let ledger = Arc::new(ledger);
        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            ..ServiceConfig::default()
        };

        let state = AppState::new(Arc::clone(&ledger), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            ledger,
            test_user_id: UserId::new(1),
        }
    }

    /// Path of an endpoint under the test user.
    pub fn point_path(&self, suffix: &str) -> String {
        format!("/point/{}{suffix}", self.test_user_id)
    }

    /// Give the test user a starting balance through the ledger.
    pub async fn seed(&self, amount: i64) {
        self.ledger
            .charge_point(self.test_user_id, amount)
            .await
            .expect("Failed to seed balance");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// History store that refuses every append.
struct BrokenHistoryStore;

#[async_trait]
impl HistoryStore for BrokenHistoryStore {
    async fn insert(
        &self,
        _user_id: UserId,
        _amount: i64,
        _transaction_type: TransactionType,
        _time_millis: i64,
    ) -> Result<PointHistory> {
        Err(StoreError::Database("history table offline".into()))
    }

    async fn select_all_by_user_id(&self, _user_id: UserId) -> Result<Vec<PointHistory>> {
        Ok(Vec::new())
    }
}
