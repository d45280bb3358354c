//! Store doubles shared by the ledger integration tests.

#![allow(dead_code)] // Each test file uses a different subset

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use point_core::{PointHistory, TransactionType, UserId, UserPoint};
use point_ledger::PointLedger;
use point_store::{
    BalanceStore, HistoryStore, MemoryBalanceStore, MemoryHistoryStore, Result, StoreError,
};
use tokio::sync::{Notify, Semaphore};

/// Ledger over plain in-memory stores, with handles to inspect them.
pub struct Harness {
    pub ledger: Arc<PointLedger>,
    pub balances: Arc<MemoryBalanceStore>,
    pub histories: Arc<MemoryHistoryStore>,
}

impl Harness {
    /// Stores sleep `latency` per call so concurrent mutations overlap.
    pub fn with_latency(latency: Duration) -> Self {
        let balances = Arc::new(MemoryBalanceStore::with_latency(latency));
        let histories = Arc::new(MemoryHistoryStore::with_latency(latency));
        let ledger = Arc::new(PointLedger::new(balances.clone(), histories.clone()));
        Self {
            ledger,
            balances,
            histories,
        }
    }

    pub async fn seed(&self, user_id: UserId, point: i64) {
        self.balances.insert_or_update(user_id, point).await.unwrap();
    }

    pub async fn balance(&self, user_id: UserId) -> i64 {
        self.ledger.get_user_point(user_id).await.unwrap().point
    }

    pub async fn histories(&self, user_id: UserId) -> Vec<PointHistory> {
        self.ledger.get_point_histories(user_id).await.unwrap()
    }
}

/// Balance store that records every write attempt and fails chosen attempts.
#[derive(Default)]
pub struct FlakyBalanceStore {
    inner: MemoryBalanceStore,
    failing_attempts: Mutex<Vec<usize>>,
    writes: Mutex<Vec<i64>>,
}

impl FlakyBalanceStore {
    /// Fail the write attempts at these zero-based positions.
    pub fn fail_attempts(&self, attempts: &[usize]) {
        self.failing_attempts.lock().unwrap().extend_from_slice(attempts);
    }

    /// Every value passed to `insert_or_update`, including failed attempts.
    pub fn attempted_writes(&self) -> Vec<i64> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl BalanceStore for FlakyBalanceStore {
    async fn select_by_id(&self, user_id: UserId) -> Result<UserPoint> {
        self.inner.select_by_id(user_id).await
    }

    async fn insert_or_update(&self, user_id: UserId, point: i64) -> Result<UserPoint> {
        let attempt = {
            let mut writes = self.writes.lock().unwrap();
            writes.push(point);
            writes.len() - 1
        };

        if self.failing_attempts.lock().unwrap().contains(&attempt) {
            return Err(StoreError::Unavailable("injected balance write failure".into()));
        }

        self.inner.insert_or_update(user_id, point).await
    }
}

/// History store whose appends can be switched to fail.
#[derive(Default)]
pub struct FlakyHistoryStore {
    inner: MemoryHistoryStore,
    fail_inserts: AtomicBool,
}

impl FlakyHistoryStore {
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl HistoryStore for FlakyHistoryStore {
    async fn insert(
        &self,
        user_id: UserId,
        amount: i64,
        transaction_type: TransactionType,
        time_millis: i64,
    ) -> Result<PointHistory> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Database("injected history failure".into()));
        }
        self.inner
            .insert(user_id, amount, transaction_type, time_millis)
            .await
    }

    async fn select_all_by_user_id(&self, user_id: UserId) -> Result<Vec<PointHistory>> {
        self.inner.select_all_by_user_id(user_id).await
    }
}

/// Balance store that parks writes for one user until permits are released.
pub struct GatedBalanceStore {
    inner: MemoryBalanceStore,
    gated_user: UserId,
    entered: Notify,
    gate: Semaphore,
}

impl GatedBalanceStore {
    pub fn new(gated_user: UserId) -> Self {
        Self {
            inner: MemoryBalanceStore::new(),
            gated_user,
            entered: Notify::new(),
            gate: Semaphore::new(0),
        }
    }

    /// Wait until a write for the gated user is parked.
    pub async fn wait_for_parked_write(&self) {
        self.entered.notified().await;
    }

    /// Let `count` parked (or future) writes for the gated user through.
    pub fn release(&self, count: usize) {
        self.gate.add_permits(count);
    }
}

#[async_trait]
impl BalanceStore for GatedBalanceStore {
    async fn select_by_id(&self, user_id: UserId) -> Result<UserPoint> {
        self.inner.select_by_id(user_id).await
    }

    async fn insert_or_update(&self, user_id: UserId, point: i64) -> Result<UserPoint> {
        if user_id == self.gated_user {
            self.entered.notify_one();
            self.gate
                .acquire()
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?
                .forget();
        }
        self.inner.insert_or_update(user_id, point).await
    }
}
