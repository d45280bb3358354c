//! Per-user lock registry.
//!
//! Each user id maps to its own async mutex, created on first use and kept
//! for the life of the registry. Entries are never evicted; `len` exposes the
//! growth.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use point_core::UserId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-user exclusive locks.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

/// Exclusive hold on one user's mutations. Released on drop.
#[derive(Debug)]
#[must_use = "the user lock is released as soon as the guard is dropped"]
pub struct UserLock {
    _guard: OwnedMutexGuard<()>,
}

impl LockRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`.
    ///
    /// Waiters on the same user are served in arrival order. Different users
    /// only contend on the map lookup, which never spans an await.
    pub async fn acquire(&self, user_id: UserId) -> UserLock {
        let mutex = self.entry(user_id);
        UserLock {
            _guard: mutex.lock_owned().await,
        }
    }

    /// Number of users that have a lock entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no user has been locked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Insert-if-absent under the map lock, so first-time callers share one entry.
    fn entry(&self, user_id: UserId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(user_id).or_default())
    }
}
