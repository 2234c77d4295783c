//! FitQuest WASM Module
//!
//! Browser bindings for the scoring and leveling engine so the client can
//! preview scores and level bars without a round trip. Structured values
//! cross the boundary as JSON strings.

use chrono::NaiveDate;
use fitquest_shared::types::{DailyScoreResponse, LevelProgressResponse};
use fitquest_shared::{
    aggregate_series, compute_daily_score, compute_fit_score, daily_quote as quote_for,
    parse_iso_date, score_date_range, DailyMetrics, DayScore, EngineError, EngineResult, Goals,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Longest range [`score_range`] accepts, matching the backend's history cap
const MAX_RANGE_DAYS: i64 = 366;

/// Input for [`score_range`]
#[derive(Debug, Deserialize)]
struct RangeInput {
    start: String,
    end: String,
    #[serde(default)]
    goals: Goals,
    #[serde(default)]
    metrics: Vec<DailyMetrics>,
}

fn js_error(err: EngineError) -> JsError {
    JsError::new(&err.to_string())
}

fn parse_json<'a, T: Deserialize<'a>>(what: &str, json: &'a str) -> EngineResult<T> {
    serde_json::from_str(json).map_err(|e| EngineError::invalid(format!("invalid {} JSON: {}", what, e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> EngineResult<String> {
    serde_json::to_string(value).map_err(|e| EngineError::invalid(format!("cannot encode result: {}", e)))
}

// ============================================================================
// Pure implementations
// ============================================================================

fn level_json(xp: i64) -> EngineResult<String> {
    let progress = fitquest_shared::level_from_xp(xp)?;
    to_json(&LevelProgressResponse::from(progress))
}

fn daily_score_json(
    metrics_json: &str,
    goals_json: &str,
    workout_days_so_far: u32,
    day_index: u32,
) -> EngineResult<String> {
    let metrics: DailyMetrics = parse_json("metrics", metrics_json)?;
    let goals: Goals = parse_json("goals", goals_json)?;
    let result = compute_daily_score(&metrics, &goals, workout_days_so_far, day_index)?;
    let day = DayScore {
        date: metrics.date,
        metrics,
        result,
    };
    to_json(&DailyScoreResponse::from(&day))
}

fn score_range_json(input_json: &str) -> EngineResult<String> {
    let input: RangeInput = parse_json("range", input_json)?;
    let start = parse_iso_date(&input.start)?;
    let end = parse_iso_date(&input.end)?;
    let span = (end - start).num_days() + 1;
    if span > MAX_RANGE_DAYS {
        return Err(EngineError::invalid(format!(
            "date range covers {} days, at most {} allowed",
            span, MAX_RANGE_DAYS
        )));
    }
    let days = score_date_range(start, end, input.metrics, &input.goals)?;
    let series: Vec<DailyScoreResponse> = days.iter().map(DailyScoreResponse::from).collect();
    to_json(&series)
}

fn series_summary_json(scores: &[u8]) -> EngineResult<String> {
    to_json(&aggregate_series(scores)?)
}

fn fit_score_value(metrics_json: &str, steps_goal: u32) -> EngineResult<u8> {
    let metrics: DailyMetrics = parse_json("metrics", metrics_json)?;
    compute_fit_score(&metrics, steps_goal)
}

fn quote_value(date: &str) -> EngineResult<&'static str> {
    let date: NaiveDate = parse_iso_date(date)?;
    Ok(quote_for(date))
}

// ============================================================================
// Exports
// ============================================================================

/// Workout days expected by a 1-based day of the week (Monday is 1)
#[wasm_bindgen]
pub fn expected_workout_days(workouts_per_week_target: u32, day_index: u32) -> Result<u32, JsError> {
    fitquest_shared::expected_workout_days(workouts_per_week_target, day_index).map_err(js_error)
}

/// XP cost of advancing from `level` to `level + 1`
#[wasm_bindgen]
pub fn xp_for_level(level: u32) -> Result<i64, JsError> {
    fitquest_shared::xp_for_level(level).map_err(js_error)
}

/// Level bar for a cumulative XP total, as JSON
#[wasm_bindgen]
pub fn level_from_xp(xp: i64) -> Result<String, JsError> {
    level_json(xp).map_err(js_error)
}

/// Score one day from metrics and goals JSON
#[wasm_bindgen]
pub fn daily_score(
    metrics_json: &str,
    goals_json: &str,
    workout_days_so_far: u32,
    day_index: u32,
) -> Result<String, JsError> {
    daily_score_json(metrics_json, goals_json, workout_days_so_far, day_index).map_err(js_error)
}

/// Score a date range with week replay
///
/// Input: `{"start": "YYYY-MM-DD", "end": "YYYY-MM-DD", "goals": {...}, "metrics": [...]}`
#[wasm_bindgen]
pub fn score_range(input_json: &str) -> Result<String, JsError> {
    score_range_json(input_json).map_err(js_error)
}

/// Streaks and on-track percent for chronological scores
#[wasm_bindgen]
pub fn series_summary(scores: &[u8]) -> Result<String, JsError> {
    series_summary_json(scores).map_err(js_error)
}

/// `round(100 * sum / (4 * count))`, 0 for an empty series
#[wasm_bindgen]
pub fn on_track_percent(scores: &[u8]) -> u32 {
    fitquest_shared::series::on_track_percent(scores)
}

#[wasm_bindgen]
pub fn fit_score(metrics_json: &str, steps_goal: u32) -> Result<u8, JsError> {
    fit_score_value(metrics_json, steps_goal).map_err(js_error)
}

#[wasm_bindgen]
pub fn daily_quote(date: &str) -> Result<String, JsError> {
    quote_value(date).map(str::to_string).map_err(js_error)
}
