//! Gamification API routes

use super::dates::resolve_day;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::GameService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use fitquest_shared::types::{BadgeResponse, DayQuery, GameActionResponse, GameStateResponse};
use fitquest_shared::QuestId;

/// Create game routes
pub fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_state))
        .route("/badges", get(list_badges))
        .route("/sync", post(sync_quests))
        .route("/quests/:quest_id/complete", post(complete_quest))
        .route("/quests/:quest_id/uncomplete", post(uncomplete_quest))
}

/// Unknown quest ids are a missing resource, not bad input
fn parse_quest_id(raw: &str) -> Result<QuestId, ApiError> {
    raw.parse::<QuestId>()
        .map_err(|_| ApiError::NotFound(format!("Quest '{}' does not exist", raw)))
}

/// GET /api/v1/game - State for a date, creating its quests on first view
async fn get_state(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DayQuery>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let date = resolve_day(&query)?;
    let outcome = GameService::state(state.db(), &state.config().game, auth.user_id, date).await?;
    Ok(Json(GameStateResponse::from_snapshot(&outcome.snapshot)?))
}

/// POST /api/v1/game/quests/:quest_id/complete
///
/// Completing an already completed quest returns the unchanged state with no
/// events.
async fn complete_quest(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(quest_id): Path<String>,
    Query(query): Query<DayQuery>,
) -> Result<Json<GameActionResponse>, ApiError> {
    let quest_id = parse_quest_id(&quest_id)?;
    let date = resolve_day(&query)?;
    let outcome =
        GameService::complete(state.db(), &state.config().game, auth.user_id, date, quest_id)
            .await?;
    Ok(Json(GameActionResponse::from_outcome(&outcome)?))
}

/// POST /api/v1/game/quests/:quest_id/uncomplete
///
/// Removes the quest's XP only. Bonus, streak and badges stay.
async fn uncomplete_quest(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(quest_id): Path<String>,
    Query(query): Query<DayQuery>,
) -> Result<Json<GameActionResponse>, ApiError> {
    let quest_id = parse_quest_id(&quest_id)?;
    let date = resolve_day(&query)?;
    let outcome =
        GameService::uncomplete(state.db(), &state.config().game, auth.user_id, date, quest_id)
            .await?;
    Ok(Json(GameActionResponse::from_outcome(&outcome)?))
}

/// POST /api/v1/game/sync - Complete quests the day's logs satisfy
async fn sync_quests(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DayQuery>,
) -> Result<Json<GameActionResponse>, ApiError> {
    let date = resolve_day(&query)?;
    let outcome = GameService::sync(state.db(), &state.config().game, auth.user_id, date).await?;
    Ok(Json(GameActionResponse::from_outcome(&outcome)?))
}

/// GET /api/v1/game/badges - The badge catalog
async fn list_badges(_auth: AuthUser) -> Json<Vec<BadgeResponse>> {
    Json(BadgeResponse::catalog())
}
