//! Tracked-token endpoints: snapshots, watch/unwatch, momentum history.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::TokenSnapshot;
use crate::types::Candle;
use crate::AppState;

/// Optional body for watch requests.
#[derive(Debug, Default, Deserialize)]
pub struct WatchRequest {
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchResponse {
    pub mint: String,
    pub watching: bool,
}

/// Query parameters for the momentum history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumHistoryResponse {
    pub mint: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandlesResponse {
    pub mint: String,
    pub candles: Vec<Candle>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tokens))
        .route("/:mint", get(get_token).delete(unwatch_token))
        .route("/:mint/watch", post(watch_token))
        .route("/:mint/momentum", get(get_momentum_history))
        .route("/:mint/candles", get(get_candles))
}

/// GET /api/tokens: all tracked tokens with their current snapshot.
async fn list_tokens(State(state): State<AppState>) -> Json<ApiResponse<Vec<TokenSnapshot>>> {
    Json(ApiResponse::new(state.tracker.snapshots()))
}

/// GET /api/tokens/:mint
async fn get_token(
    State(state): State<AppState>,
    Path(mint): Path<String>,
) -> Result<Json<ApiResponse<TokenSnapshot>>> {
    let snapshot = state
        .tracker
        .snapshot(&mint)
        .ok_or_else(|| AppError::NotFound(format!("{} is not being tracked", mint)))?;
    Ok(Json(ApiResponse::new(snapshot)))
}

/// POST /api/tokens/:mint/watch
async fn watch_token(
    State(state): State<AppState>,
    Path(mint): Path<String>,
    body: Option<Json<WatchRequest>>,
) -> Json<ApiResponse<WatchResponse>> {
    let label = body.and_then(|Json(req)| req.label);
    state.tracker.watch(&mint, label);
    Json(ApiResponse::new(WatchResponse {
        mint,
        watching: true,
    }))
}

/// DELETE /api/tokens/:mint
async fn unwatch_token(
    State(state): State<AppState>,
    Path(mint): Path<String>,
) -> Json<ApiResponse<WatchResponse>> {
    state.tracker.unwatch(&mint);
    Json(ApiResponse::new(WatchResponse {
        mint,
        watching: false,
    }))
}

/// GET /api/tokens/:mint/momentum?limit=K, raw indicator series tail for
/// charting.
async fn get_momentum_history(
    State(state): State<AppState>,
    Path(mint): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<MomentumHistoryResponse>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let values = state
        .tracker
        .momentum_history(&mint, limit)
        .ok_or_else(|| AppError::NotFound(format!("{} is not being tracked", mint)))?;
    Ok(Json(ApiResponse::new(MomentumHistoryResponse {
        mint,
        values,
    })))
}

/// GET /api/tokens/:mint/candles: finalized candles for charting.
async fn get_candles(
    State(state): State<AppState>,
    Path(mint): Path<String>,
) -> Result<Json<ApiResponse<CandlesResponse>>> {
    let candles = state
        .tracker
        .candles(&mint)
        .ok_or_else(|| AppError::NotFound(format!("{} is not being tracked", mint)))?;
    Ok(Json(ApiResponse::new(CandlesResponse { mint, candles })))
}
