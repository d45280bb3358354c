//! Compensating rollback when a commit fails partway.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FlakyBalanceStore, FlakyHistoryStore};
use point_core::{PointError, TransactionType, UserId};
use point_ledger::PointLedger;
use point_store::{BalanceStore, HistoryStore, MemoryBalanceStore, MemoryHistoryStore};

struct FlakyLedger {
    ledger: PointLedger,
    balances: Arc<FlakyBalanceStore>,
    histories: Arc<FlakyHistoryStore>,
}

fn flaky_ledger() -> FlakyLedger {
    let balances = Arc::new(FlakyBalanceStore::default());
    let histories = Arc::new(FlakyHistoryStore::default());
    let ledger = PointLedger::new(balances.clone(), histories.clone());
    FlakyLedger {
        ledger,
        balances,
        histories,
    }
}

#[tokio::test]
async fn failed_history_append_restores_balance() {
    let f = flaky_ledger();
    let user_id = UserId::new(1);
    f.balances.insert_or_update(user_id, 10_000).await.unwrap();
    f.histories.fail_inserts(true);

    let err = f.ledger.charge_point(user_id, 5000).await.unwrap_err();

    assert_eq!(err, PointError::PersistenceFailure);
    assert_eq!(f.ledger.get_user_point(user_id).await.unwrap().point, 10_000);
    assert!(f.ledger.get_point_histories(user_id).await.unwrap().is_empty());
    // seed, new balance, compensating restore
    assert_eq!(f.balances.attempted_writes(), vec![10_000, 15_000, 10_000]);
}

#[tokio::test]
async fn failed_history_append_on_use_restores_balance() {
    let f = flaky_ledger();
    let user_id = UserId::new(1);
    f.balances.insert_or_update(user_id, 10_000).await.unwrap();
    f.histories.fail_inserts(true);

    let err = f.ledger.use_point(user_id, 3000).await.unwrap_err();

    assert!(err.is_persistence_failure());
    assert_eq!(f.ledger.get_user_point(user_id).await.unwrap().point, 10_000);
}

#[tokio::test]
async fn failed_balance_write_surfaces_persistence_failure() {
    let f = flaky_ledger();
    let user_id = UserId::new(1);
    f.balances.insert_or_update(user_id, 10_000).await.unwrap();
    // Attempt 0 is the seed, attempt 1 the new balance
    f.balances.fail_attempts(&[1]);

    let err = f.ledger.charge_point(user_id, 5000).await.unwrap_err();

    assert_eq!(err, PointError::PersistenceFailure);
    assert_eq!(f.ledger.get_user_point(user_id).await.unwrap().point, 10_000);
    assert!(f.ledger.get_point_histories(user_id).await.unwrap().is_empty());
    // The restore rewrites the snapshot value
    assert_eq!(f.balances.attempted_writes(), vec![10_000, 15_000, 10_000]);
}

#[tokio::test]
async fn failed_restore_is_not_escalated() {
    let f = flaky_ledger();
    let user_id = UserId::new(1);
    f.balances.insert_or_update(user_id, 10_000).await.unwrap();
    f.histories.fail_inserts(true);
    // Attempt 2 is the compensating restore
    f.balances.fail_attempts(&[2]);

    let err = f.ledger.charge_point(user_id, 5000).await.unwrap_err();

    // Same uniform error, one restore attempt only
    assert_eq!(err, PointError::PersistenceFailure);
    assert_eq!(f.balances.attempted_writes(), vec![10_000, 15_000, 10_000]);
    // The restore failed, so the written balance stays without a history record
    assert_eq!(f.ledger.get_user_point(user_id).await.unwrap().point, 15_000);
    assert!(f.ledger.get_point_histories(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn lock_is_released_after_persistence_failure() {
    let f = flaky_ledger();
    let user_id = UserId::new(1);
    f.histories.fail_inserts(true);

    f.ledger.charge_point(user_id, 5000).await.unwrap_err();
    f.histories.fail_inserts(false);

    let updated = tokio::time::timeout(
        Duration::from_secs(1),
        f.ledger.charge_point(user_id, 5000),
    )
    .await
    .expect("lock must be released after a failed commit")
    .unwrap();

    assert_eq!(updated.point, 5000);
    assert_eq!(f.ledger.get_point_histories(user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_balance_read_is_a_persistence_failure_without_writes() {
    struct BrokenBalances;

    #[async_trait::async_trait]
    impl BalanceStore for BrokenBalances {
        async fn select_by_id(&self, _user_id: UserId) -> point_store::Result<point_core::UserPoint> {
            Err(point_store::StoreError::Database("disk gone".into()))
        }

        async fn insert_or_update(
            &self,
            _user_id: UserId,
            _point: i64,
        ) -> point_store::Result<point_core::UserPoint> {
            panic!("no write may follow a failed read");
        }
    }

    let histories = Arc::new(MemoryHistoryStore::new());
    let ledger = PointLedger::new(Arc::new(BrokenBalances), histories.clone());

    let err = ledger.charge_point(UserId::new(1), 5000).await.unwrap_err();
    assert_eq!(err, PointError::PersistenceFailure);
    assert!(!err.to_string().contains("disk gone"));
    assert!(histories
        .select_all_by_user_id(UserId::new(1))
        .await
        .unwrap()
        .is_empty());

    // Validation still runs first
    let err = ledger.charge_point(UserId::new(1), 10).await.unwrap_err();
    assert!(err.is_invalid_request());
}

fn ledger_with_slow_history() -> PointLedger {
    PointLedger::new(
        Arc::new(MemoryBalanceStore::new()),
        Arc::new(MemoryHistoryStore::with_latency(Duration::from_millis(200))),
    )
}

#[tokio::test]
async fn dropped_charge_still_appends_history() {
    let ledger = ledger_with_slow_history();
    let user_id = UserId::new(1);

    // Gives up while the history append is in flight
    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), ledger.charge_point(user_id, 5000)).await;
    assert!(timed_out.is_err());

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(ledger.get_user_point(user_id).await.unwrap().point, 5000);
    let histories = ledger.get_point_histories(user_id).await.unwrap();
    assert_eq!(histories.len(), 1);
    assert_eq!(histories[0].transaction_type, TransactionType::Charge);
    assert_eq!(histories[0].amount, 5000);
}

#[tokio::test]
async fn mutation_after_a_dropped_one_waits_for_its_commit() {
    let ledger = ledger_with_slow_history();
    let user_id = UserId::new(1);

    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), ledger.charge_point(user_id, 5000)).await;
    assert!(timed_out.is_err());

    // Still serialized behind the detached charge, so it sees its balance
    let next = ledger.use_point(user_id, 2000).await.unwrap();
    assert_eq!(next.point, 3000);

    let types: Vec<_> = ledger
        .get_point_histories(user_id)
        .await
        .unwrap()
        .iter()
        .map(|h| h.transaction_type)
        .collect();
    assert_eq!(types, vec![TransactionType::Charge, TransactionType::Use]);
}
