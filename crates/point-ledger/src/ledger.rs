//! The point ledger.
//!
//! Charges and uses for one user run one at a time under that user's lock.
//! Inside the lock a mutation moves through a fixed sequence:
//!
//! ```text
//! Validated ──write balance──▶ BalanceWritten ──append history──▶ HistoryAppended
//!     │                              │
//!     └──────── failure ─────────────┴──▶ RolledBack (snapshot balance restored)
//! ```
//!
//! The two writes go to independent stores, so there is no atomic commit. When
//! either write fails the ledger overwrites the balance with the snapshot it
//! read before the mutation and reports a single persistence failure. The
//! restore is best effort: if it fails too, that is logged and the caller
//! still sees the same persistence failure.
//!
//! Each mutation runs on its own tokio task. Dropping the future returned by
//! [`PointLedger::charge_point`] or [`PointLedger::use_point`] detaches the
//! caller; the mutation still finishes with a commit or a rollback. The ledger
//! therefore has to be used from within a tokio runtime.
//!
//! Reads take no lock and may observe a balance written by a mutation whose
//! history append has not happened yet.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use point_core::validation::{
    validate_amount, validate_max_balance, validate_min_charge_amount, validate_min_use_amount,
    validate_sufficient_balance,
};
use point_core::{PointError, PointHistory, Result, TransactionType, UserId, UserPoint};
use point_store::{BalanceStore, HistoryStore};

use crate::lock::LockRegistry;

/// Where a commit stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitStage {
    Validated,
    BalanceWritten,
}

impl fmt::Display for CommitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validated => f.write_str("validated"),
            Self::BalanceWritten => f.write_str("balance_written"),
        }
    }
}

/// A validated mutation ready to be committed.
#[derive(Debug, Clone, Copy)]
struct Mutation {
    transaction_type: TransactionType,
    amount: i64,
    new_point: i64,
}

/// Orchestrates charge, use and query over a balance store and a history store.
///
/// Cloning is cheap and clones share stores and locks.
#[derive(Clone)]
pub struct PointLedger {
    inner: Arc<LedgerInner>,
}

// Shared with the spawned mutation tasks.
struct LedgerInner {
    balances: Arc<dyn BalanceStore>,
    histories: Arc<dyn HistoryStore>,
    locks: LockRegistry,
}

impl PointLedger {
    /// Create a ledger over the given stores.
    #[must_use]
    pub fn new(balances: Arc<dyn BalanceStore>, histories: Arc<dyn HistoryStore>) -> Self {
        Self {
            inner: Arc::new(LedgerInner {
                balances,
                histories,
                locks: LockRegistry::new(),
            }),
        }
    }

    /// Read a user's current balance.
    ///
    /// A user that was never charged has a zero balance. Takes no lock.
    ///
    /// # Errors
    ///
    /// Returns `PointError::PersistenceFailure` if the balance store fails.
    pub async fn get_user_point(&self, user_id: UserId) -> Result<UserPoint> {
        self.inner.read_balance(user_id).await
    }

    /// List a user's history, oldest first. Takes no lock.
    ///
    /// # Errors
    ///
    /// Returns `PointError::PersistenceFailure` if the history store fails.
    pub async fn get_point_histories(&self, user_id: UserId) -> Result<Vec<PointHistory>> {
        self.inner
            .histories
            .select_all_by_user_id(user_id)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Failed to read point history");
                PointError::PersistenceFailure
            })
    }

    /// Add `amount` points to a user's balance.
    ///
    /// # Errors
    ///
    /// - `PointError::InvalidRequest` if the amount is not positive, is below
    ///   the minimum charge, or would push the balance past the maximum.
    /// - `PointError::PersistenceFailure` if a store call fails; the balance
    ///   has been restored on a best-effort basis.
    pub async fn charge_point(&self, user_id: UserId, amount: i64) -> Result<UserPoint> {
        let inner = Arc::clone(&self.inner);
        run_to_completion(async move { inner.charge_point(user_id, amount).await }).await
    }

    /// Deduct `amount` points from a user's balance.
    ///
    /// # Errors
    ///
    /// - `PointError::InvalidRequest` if the amount is not positive, is below
    ///   the minimum use, or exceeds the current balance.
    /// - `PointError::PersistenceFailure` if a store call fails; the balance
    ///   has been restored on a best-effort basis.
    pub async fn use_point(&self, user_id: UserId, amount: i64) -> Result<UserPoint> {
        let inner = Arc::clone(&self.inner);
        run_to_completion(async move { inner.use_point(user_id, amount).await }).await
    }

    /// Number of users with a lock entry. Grows monotonically.
    #[must_use]
    pub fn tracked_users(&self) -> usize {
        self.inner.locks.len()
    }
}

/// Drive a mutation on its own task so the caller cannot cancel it midway.
async fn run_to_completion<F>(mutation: F) -> Result<UserPoint>
where
    F: Future<Output = Result<UserPoint>> + Send + 'static,
{
    match tokio::spawn(mutation).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            // Only reachable when the runtime shuts down under the task
            tracing::error!(error = %e, "Point mutation task was cancelled");
            Err(PointError::PersistenceFailure)
        }
    }
}

impl LedgerInner {
    async fn charge_point(&self, user_id: UserId, amount: i64) -> Result<UserPoint> {
        let _lock = self.locks.acquire(user_id).await;

        validate_amount(amount)?;
        validate_min_charge_amount(amount)?;

        let snapshot = self.read_balance(user_id).await?;
        validate_max_balance(snapshot.point, amount)?;

        let mutation = Mutation {
            transaction_type: TransactionType::Charge,
            amount,
            new_point: snapshot.point + amount,
        };
        self.commit(&snapshot, mutation).await
    }

    async fn use_point(&self, user_id: UserId, amount: i64) -> Result<UserPoint> {
        let _lock = self.locks.acquire(user_id).await;

        validate_amount(amount)?;
        validate_min_use_amount(amount)?;

        let snapshot = self.read_balance(user_id).await?;
        validate_sufficient_balance(snapshot.point, amount)?;

        let mutation = Mutation {
            transaction_type: TransactionType::Use,
            amount,
            new_point: snapshot.point - amount,
        };
        self.commit(&snapshot, mutation).await
    }

    async fn read_balance(&self, user_id: UserId) -> Result<UserPoint> {
        self.balances.select_by_id(user_id).await.map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Failed to read point balance");
            PointError::PersistenceFailure
        })
    }

    async fn commit(&self, snapshot: &UserPoint, mutation: Mutation) -> Result<UserPoint> {
        let user_id = snapshot.id;

        let updated = match self
            .balances
            .insert_or_update(user_id, mutation.new_point)
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    stage = %CommitStage::Validated,
                    error = %e,
                    "Balance write failed, restoring snapshot"
                );
                self.restore(snapshot).await;
                return Err(PointError::PersistenceFailure);
            }
        };

        if let Err(e) = self
            .histories
            .insert(
                user_id,
                mutation.amount,
                mutation.transaction_type,
                updated.update_millis,
            )
            .await
        {
            tracing::warn!(
                user_id = %user_id,
                stage = %CommitStage::BalanceWritten,
                error = %e,
                "History append failed, restoring snapshot"
            );
            self.restore(snapshot).await;
            return Err(PointError::PersistenceFailure);
        }

        tracing::info!(
            user_id = %user_id,
            transaction_type = %mutation.transaction_type,
            amount = mutation.amount,
            previous = snapshot.point,
            balance = updated.point,
            "Point balance updated"
        );

        Ok(updated)
    }

    // Compensating write. Never escalated: a failure here is only logged.
    async fn restore(&self, snapshot: &UserPoint) {
        match self
            .balances
            .insert_or_update(snapshot.id, snapshot.point)
            .await
        {
            Ok(_) => {
                tracing::warn!(user_id = %snapshot.id, balance = snapshot.point, "Point balance rolled back");
            }
            Err(e) => {
                tracing::error!(
                    user_id = %snapshot.id,
                    balance = snapshot.point,
                    error = %e,
                    "Rollback failed, stored balance may not match history"
                );
            }
        }
    }
}

impl fmt::Debug for PointLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointLedger")
            .field("tracked_users", &self.tracked_users())
            .finish_non_exhaustive()
    }
}
