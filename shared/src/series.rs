//! Series aggregation over chronological daily scores
//!
//! The aggregator sees score values only. Calendar gaps must already be filled
//! by the caller (see [`crate::scoring::score_date_range`]).

use crate::errors::{EngineError, EngineResult};
use crate::scoring::{ScoreLabel, MAX_DAILY_SCORE, STREAK_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Summary of a score series
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub days: u32,
    pub on_track_percent: u32,
    pub average_score: f64,
    pub current_streak: u32,
    pub best_streak: u32,
    pub great_days: u32,
    pub okay_days: u32,
    pub behind_days: u32,
}

/// Aggregate a chronological series of daily scores
pub fn aggregate_series(scores: &[u8]) -> EngineResult<SeriesSummary> {
    if let Some(bad) = scores.iter().find(|s| **s > MAX_DAILY_SCORE) {
        return Err(EngineError::invalid(format!(
            "daily score must be between 0 and {}, got {}",
            MAX_DAILY_SCORE, bad
        )));
    }

    if scores.is_empty() {
        return Ok(SeriesSummary::default());
    }

    let (current_streak, best_streak) = streaks(scores);
    let mut summary = SeriesSummary {
        days: scores.len() as u32,
        on_track_percent: on_track_percent(scores),
        average_score: average_score(scores),
        current_streak,
        best_streak,
        ..SeriesSummary::default()
    };

    for score in scores {
        match ScoreLabel::from_score(*score) {
            ScoreLabel::Great => summary.great_days += 1,
            ScoreLabel::Okay => summary.okay_days += 1,
            ScoreLabel::Behind => summary.behind_days += 1,
        }
    }

    Ok(summary)
}

/// `round(100 * sum / (4 * count))`, half rounding up, 0 for an empty series
pub fn on_track_percent(scores: &[u8]) -> u32 {
    if scores.is_empty() {
        return 0;
    }
    let total: u64 = scores.iter().map(|s| u64::from(*s)).sum();
    let possible = u64::from(MAX_DAILY_SCORE) * scores.len() as u64;
    ((200 * total + possible) / (2 * possible)) as u32
}

/// Mean score rounded to one decimal place
pub fn average_score(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: u64 = scores.iter().map(|s| u64::from(*s)).sum();
    let tenths = (20 * total + scores.len() as u64) / (2 * scores.len() as u64);
    tenths as f64 / 10.0
}

/// (current, best) runs of days at or above the streak threshold
pub fn streaks(scores: &[u8]) -> (u32, u32) {
    let qualifies = |s: &u8| *s >= STREAK_THRESHOLD;

    let mut best = 0u32;
    let mut running = 0u32;
    for score in scores {
        if qualifies(score) {
            running += 1;
            best = best.max(running);
        } else {
            running = 0;
        }
    }

    let current = scores.iter().rev().take_while(|s| qualifies(s)).count() as u32;
    (current, best)
}
