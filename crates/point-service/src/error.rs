//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use point_core::{IdError, InvalidRequest, PointError};

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The ledger rejected the request before any write.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequest),

    /// The path did not carry an integer user id.
    #[error(transparent)]
    InvalidUserId(#[from] IdError),

    /// Bad request - the body could not be read as JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A store call failed while serving the request.
    #[error("failed to update point balance or record history")]
    PersistenceFailure,
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::InvalidRequest(reason) => (
                StatusCode::BAD_REQUEST,
                "invalid_request",
                self.to_string(),
                invalid_request_details(reason),
            ),
            Self::InvalidUserId(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_request",
                self.to_string(),
                None,
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::PersistenceFailure => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "persistence_failure",
                self.to_string(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

fn invalid_request_details(reason: &InvalidRequest) -> Option<serde_json::Value> {
    match reason {
        InvalidRequest::InsufficientBalance { balance, required } => Some(serde_json::json!({
            "balance": balance,
            "required": required
        })),
        _ => None,
    }
}

impl From<PointError> for ApiError {
    fn from(err: PointError) -> Self {
        match err {
            PointError::InvalidRequest(reason) => Self::InvalidRequest(reason),
            PointError::PersistenceFailure => Self::PersistenceFailure,
        }
    }
}
