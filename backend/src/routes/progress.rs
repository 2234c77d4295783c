//! Progress scoring API routes

use super::dates::{resolve_day, resolve_range};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::ProgressService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use fitquest_shared::types::{
    AnalyticsResponse, DayProgressResponse, DayQuery, HistoryResponse, RangeQuery,
};

/// Create progress routes
pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/day", get(get_day))
        .route("/history", get(get_history))
        .route("/analytics", get(get_analytics))
}

/// GET /api/v1/progress/day - Score, checks and fit score for one date
///
/// `date` defaults to today in UTC, so clients elsewhere should send their
/// local date. Workout pace counts every workout day since that week's Monday.
async fn get_day(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayProgressResponse>, ApiError> {
    let date = resolve_day(&query)?;
    let response = ProgressService::day(state.db(), auth.user_id, date).await?;
    Ok(Json(response))
}

/// GET /api/v1/progress/history - Scored days, newest first
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let (start, end) = resolve_range(&query)?;
    let response = ProgressService::history(state.db(), auth.user_id, start, end).await?;
    Ok(Json(response))
}

/// GET /api/v1/progress/analytics - Chronological series with streak summary
async fn get_analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let (start, end) = resolve_range(&query)?;
    let response = ProgressService::analytics(state.db(), auth.user_id, start, end).await?;
    Ok(Json(response))
}
