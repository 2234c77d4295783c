//! Daily quote and the 0 to 100 fit score shown on the Today page

use crate::errors::EngineResult;
use crate::models::DailyMetrics;
use crate::validation::validate_daily_metrics;
use chrono::{Datelike, NaiveDate};

pub const QUOTES: [&str; 9] = [
    "Discipline beats motivation.",
    "You don’t need to be extreme. Just consistent.",
    "Your future body is watching you today.",
    "Every workout is a vote for the person you want to become.",
    "Progress, not perfection.",
    "You’re one decision away from a better life.",
    "Small steps every day. Big results over time.",
    "You showed up. That’s the win.",
    "Make today count.",
];

/// Quote for a date, stable for the whole day
pub fn daily_quote(date: NaiveDate) -> &'static str {
    QUOTES[date.day() as usize % QUOTES.len()]
}

// Fit score weights
const STEPS_POINTS: f64 = 40.0;
const SLEEP_POINTS: f64 = 25.0;
const WATER_POINTS: f64 = 20.0;
const WORKOUT_POINTS: f64 = 15.0;

const SLEEP_REFERENCE_HOURS: f64 = 8.0;
const WATER_REFERENCE_ML: f64 = 2000.0;

/// Weighted 0 to 100 summary of one day
///
/// Steps are measured against the user's goal, sleep and water against fixed
/// references of 8 h and 2000 ml. Any workout earns the full workout share.
pub fn compute_fit_score(metrics: &DailyMetrics, steps_goal: u32) -> EngineResult<u8> {
    validate_daily_metrics(metrics)?;

    let steps = (f64::from(metrics.steps) / f64::from(steps_goal.max(1)) * STEPS_POINTS).min(STEPS_POINTS);
    let sleep = (metrics.sleep_hours / SLEEP_REFERENCE_HOURS * SLEEP_POINTS).min(SLEEP_POINTS);
    let water = (f64::from(metrics.water_ml) / WATER_REFERENCE_ML * WATER_POINTS).min(WATER_POINTS);
    let workout = if metrics.has_workout() { WORKOUT_POINTS } else { 0.0 };

    Ok((steps + sleep + water + workout).round().clamp(0.0, 100.0) as u8)
}
