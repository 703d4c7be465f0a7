//! Candidate scanner endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::types::{Candidate, ScanFilters, ScanPage};
use crate::AppState;

/// Query parameters for a scan.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanQuery {
    pub min_holders: Option<u64>,
    pub max_holders: Option<u64>,
    pub min_score: Option<u32>,
    pub min_total_trades: Option<u64>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scan", get(scan))
        .route("/analyze/:query", get(analyze))
}

/// GET /api/scanner/scan: ranked, paginated candidates.
async fn scan(
    State(state): State<AppState>,
    Query(query): Query<ScanQuery>,
) -> Json<ApiResponse<ScanPage>> {
    let defaults = ScanFilters::default();
    let filters = ScanFilters {
        min_holders: query.min_holders.unwrap_or(defaults.min_holders),
        max_holders: query.max_holders.unwrap_or(defaults.max_holders),
        min_score: query.min_score.unwrap_or(defaults.min_score),
        min_total_trades: query.min_total_trades.unwrap_or(defaults.min_total_trades),
    };
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);

    Json(ApiResponse::new(
        state.scanner.scan(&filters, page, limit).await,
    ))
}

/// GET /api/scanner/analyze/:query, score one token on demand.
async fn analyze(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<ApiResponse<Candidate>>> {
    let candidate = state
        .scanner
        .analyze(&query)
        .await
        .ok_or_else(|| AppError::NotFound(format!("no scoreable record for {}", query)))?;
    Ok(Json(ApiResponse::new(candidate)))
}
