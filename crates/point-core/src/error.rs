//! Error types for the point ledger.

/// Result type for point ledger operations.
pub type Result<T> = std::result::Result<T, PointError>;

/// Errors surfaced by point ledger operations.
///
/// Callers branch on the variant: an invalid request never changed any state,
/// while a persistence failure may have been partially applied and then
/// compensated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointError {
    /// The request was rejected before any write.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequest),

    /// A store call failed while committing the mutation.
    ///
    /// The store error itself is logged, never carried to the caller.
    #[error("failed to update point balance or record history")]
    PersistenceFailure,
}

impl PointError {
    /// Check if this error was a rejected request.
    #[must_use]
    pub const fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Check if this error was a failed commit.
    #[must_use]
    pub const fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::PersistenceFailure)
    }

    /// The rejection reason, if this is an invalid request.
    #[must_use]
    pub const fn invalid_request(&self) -> Option<&InvalidRequest> {
        match self {
            Self::InvalidRequest(reason) => Some(reason),
            Self::PersistenceFailure => None,
        }
    }
}

/// Why a charge or use request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRequest {
    /// The amount was not a number.
    #[error("amount must be a number")]
    NotNumeric,

    /// The amount had a fractional part or was not finite.
    #[error("amount must be an integer")]
    NotInteger,

    /// The amount was zero or negative.
    #[error("amount must be greater than 0")]
    NonPositive,

    /// The charge was below the minimum charge amount.
    #[error("charge amount must be at least {minimum} points, got {amount}")]
    BelowMinimumCharge {
        /// Requested amount.
        amount: i64,
        /// Minimum charge amount.
        minimum: i64,
    },

    /// The use was below the minimum use amount.
    #[error("use amount must be at least {minimum} points, got {amount}")]
    BelowMinimumUse {
        /// Requested amount.
        amount: i64,
        /// Minimum use amount.
        minimum: i64,
    },

    /// The charge would push the balance past the maximum.
    #[error("balance cannot exceed {maximum} points: balance={balance}, charge={amount}")]
    ExceedsMaxBalance {
        /// Current balance.
        balance: i64,
        /// Requested charge.
        amount: i64,
        /// Maximum balance.
        maximum: i64,
    },

    /// The balance does not cover the use.
    #[error("insufficient points: balance={balance}, required={required}")]
    InsufficientBalance {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },
}
