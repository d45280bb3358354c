//! Point balance, history and mutation handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use point_core::validation::parse_amount;
use point_core::{PointHistory, UserId, UserPoint};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of a charge or use request.
///
/// The amount stays untyped so that strings, fractions and missing values
/// are rejected by the ledger's own amount rules.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    /// Requested amount.
    #[serde(default)]
    pub amount: serde_json::Value,
}

/// Get a user's balance.
pub async fn get_user_point(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserPoint>, ApiError> {
    let user_id: UserId = id.parse()?;
    let point = state.ledger.get_user_point(user_id).await?;
    Ok(Json(point))
}

/// List a user's history, oldest first.
pub async fn get_point_histories(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PointHistory>>, ApiError> {
    let user_id: UserId = id.parse()?;
    let histories = state.ledger.get_point_histories(user_id).await?;
    Ok(Json(histories))
}

/// Charge points to a user.
pub async fn charge_point(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<UserPoint>, ApiError> {
    let (user_id, amount) = parse_mutation(&id, payload)?;
    let point = state.ledger.charge_point(user_id, amount).await?;
    Ok(Json(point))
}

/// Use points from a user's balance.
pub async fn use_point(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<UserPoint>, ApiError> {
    let (user_id, amount) = parse_mutation(&id, payload)?;
    let point = state.ledger.use_point(user_id, amount).await?;
    Ok(Json(point))
}

fn parse_mutation(
    id: &str,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<(UserId, i64), ApiError> {
    let user_id: UserId = id.parse()?;
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let amount = parse_amount(&request.amount)?;
    Ok((user_id, amount))
}
