//! Point history types.
//!
//! Every completed charge or use leaves exactly one history record. Records
//! are immutable once written.

use serde::{Deserialize, Serialize};

use crate::{HistoryId, UserId};

/// A completed balance mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointHistory {
    /// Store-assigned identifier.
    pub id: HistoryId,

    /// The user whose balance was affected.
    pub user_id: UserId,

    /// Magnitude of the change. Always positive, for both charge and use.
    pub amount: i64,

    /// Whether points were added or deducted.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Timestamp of the balance write this record belongs to.
    pub time_millis: i64,
}

/// Type of point transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Points were added.
    Charge,

    /// Points were deducted.
    Use,
}

impl TransactionType {
    /// Wire name (`CHARGE` / `USE`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Charge => "CHARGE",
            Self::Use => "USE",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
