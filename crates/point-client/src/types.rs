//! Request and error body types for the point API.

use serde::{Deserialize, Serialize};

/// Body of a charge or use request.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AmountRequest {
    /// Requested amount.
    pub amount: i64,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorBody,
}

/// API error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Additional details.
    pub details: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Read an integer field from `details`.
    #[must_use]
    pub fn detail_i64(&self, key: &str) -> Option<i64> {
        self.details
            .as_ref()
            .and_then(|d| d.get(key))
            .and_then(serde_json::Value::as_i64)
    }
}
