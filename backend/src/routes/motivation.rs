//! Daily motivation quote

use super::dates::resolve_day;
use crate::error::ApiError;
use axum::{extract::Query, Json};
use fitquest_shared::types::{DayQuery, MotivationResponse};
use fitquest_shared::{daily_quote, iso_date};

/// GET /api/v1/motivation - Quote for a date, same for every user
pub async fn get_motivation(
    Query(query): Query<DayQuery>,
) -> Result<Json<MotivationResponse>, ApiError> {
    let date = resolve_day(&query)?;
    Ok(Json(MotivationResponse {
        date: iso_date(date),
        quote: daily_quote(date).to_string(),
    }))
}
