//! Daily score calculation
//!
//! A day scores one point for each goal check it meets: steps, water, sleep
//! and weekly workout pace. Scores run 0 to 4.

use crate::calendar::{day_index_in_week, enumerate_dates_inclusive, week_start_monday};
use crate::errors::{EngineError, EngineResult};
use crate::models::{DailyMetrics, Goals};
use crate::pace::{expected_workout_days, WeeklyPaceTracker};
use crate::validation::{validate_daily_metrics, validate_goals};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest possible daily score
pub const MAX_DAILY_SCORE: u8 = 4;

/// Minimum score for a day to count toward a streak
pub const STREAK_THRESHOLD: u8 = 3;

/// History label for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreLabel {
    Great,
    Okay,
    Behind,
}

impl ScoreLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= STREAK_THRESHOLD => ScoreLabel::Great,
            2 => ScoreLabel::Okay,
            _ => ScoreLabel::Behind,
        }
    }
}

/// The four checks and resulting score for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyScoreResult {
    pub on_steps: bool,
    pub on_water: bool,
    pub on_sleep: bool,
    pub on_workout_pace: bool,
    pub expected_workout_days: u32,
    pub workout_days_so_far: u32,
    pub score: u8,
    pub label: ScoreLabel,
}

impl DailyScoreResult {
    pub fn counts_toward_streak(&self) -> bool {
        self.score >= STREAK_THRESHOLD
    }
}

/// Score one day
///
/// `workout_days_so_far` must come from a week replay that includes this day
/// (see [`WeeklyPaceTracker`]).
pub fn compute_daily_score(
    metrics: &DailyMetrics,
    goals: &Goals,
    workout_days_so_far: u32,
    day_index: u32,
) -> EngineResult<DailyScoreResult> {
    validate_goals(goals)?;
    validate_daily_metrics(metrics)?;

    let expected = expected_workout_days(goals.workouts_per_week_target, day_index)?;

    let on_steps = metrics.steps >= goals.steps_target;
    let on_water = metrics.water_ml >= goals.water_ml_target;
    let on_sleep = metrics.sleep_hours >= goals.sleep_hours_target;
    let on_workout_pace = workout_days_so_far >= expected;

    let score = [on_steps, on_water, on_sleep, on_workout_pace]
        .iter()
        .filter(|check| **check)
        .count() as u8;

    Ok(DailyScoreResult {
        on_steps,
        on_water,
        on_sleep,
        on_workout_pace,
        expected_workout_days: expected,
        workout_days_so_far,
        score,
        label: ScoreLabel::from_score(score),
    })
}

/// A scored calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScore {
    pub date: NaiveDate,
    pub metrics: DailyMetrics,
    pub result: DailyScoreResult,
}

/// Score every date in `start..=end`, ascending
///
/// Dates without a metrics row are scored as empty days. Rows before `start`
/// in the same week are used for pacing only, so a range beginning mid-week
/// still counts that week's earlier workouts. Rows outside the range are
/// otherwise ignored. Two rows for the same date are rejected.
pub fn score_date_range(
    start: NaiveDate,
    end: NaiveDate,
    metrics: impl IntoIterator<Item = DailyMetrics>,
    goals: &Goals,
) -> EngineResult<Vec<DayScore>> {
    validate_goals(goals)?;

    let mut by_date: BTreeMap<NaiveDate, DailyMetrics> = BTreeMap::new();
    for row in metrics {
        let date = row.date;
        if by_date.insert(date, row).is_some() {
            return Err(EngineError::invalid(format!(
                "duplicate metrics for {}",
                date
            )));
        }
    }

    if start > end {
        return Ok(Vec::new());
    }

    let mut tracker = WeeklyPaceTracker::new();
    for row in by_date.range(week_start_monday(start)..=end).map(|(_, m)| m) {
        tracker.record_day(row.date, row.workout_minutes);
    }

    enumerate_dates_inclusive(start, end)
        .map(|date| {
            let metrics = by_date
                .get(&date)
                .cloned()
                .unwrap_or_else(|| DailyMetrics::empty(date));
            let so_far = tracker.workout_days_so_far(date);
            let result = compute_daily_score(&metrics, goals, so_far, day_index_in_week(date))?;
            Ok(DayScore {
                date,
                metrics,
                result,
            })
        })
        .collect()
}
