//! User point balance types.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A user's current point balance.
///
/// One record exists per user. A user that has never been charged reads as a
/// zero balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPoint {
    /// The user this balance belongs to.
    pub id: UserId,

    /// Current balance, never negative and never above
    /// [`MAX_BALANCE`](crate::validation::MAX_BALANCE).
    pub point: i64,

    /// When the balance was last written (milliseconds since epoch).
    pub update_millis: i64,
}

impl UserPoint {
    /// Create a balance record stamped with the current time.
    #[must_use]
    pub fn new(id: UserId, point: i64) -> Self {
        Self {
            id,
            point,
            update_millis: now_millis(),
        }
    }

    /// Zero-balance record for a user with no stored balance.
    #[must_use]
    pub fn empty(id: UserId) -> Self {
        Self::new(id, 0)
    }
}
