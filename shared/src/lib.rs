//! FitQuest Progress Engine
//!
//! Pure scoring and gamification logic shared by the backend and the WASM
//! bindings. Nothing in this crate performs I/O; callers hand in materialized
//! daily metrics and goals and persist whatever comes back.

pub mod calendar;
pub mod errors;
pub mod gamification;
pub mod leveling;
pub mod models;
pub mod motivation;
pub mod pace;
pub mod scoring;
pub mod series;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use calendar::{
    add_days, day_index_in_week, enumerate_dates_inclusive, is_previous_day, iso_date,
    parse_iso_date, week_start_monday,
};
pub use errors::*;
pub use gamification::{
    apply_quest_transition, compute_streak, ensure_daily_quests, EnsureOutcome, GameEvent,
    GameSnapshot, QuestTransition, TransitionOutcome, DAILY_BONUS_XP,
};
pub use leveling::{level_from_xp, xp_for_level, LevelProgress, MAX_LEVEL};
pub use models::*;
pub use motivation::{compute_fit_score, daily_quote};
pub use pace::{expected_workout_days, WeekPaceState, WeeklyPaceTracker};
pub use scoring::{compute_daily_score, score_date_range, DailyScoreResult, DayScore, ScoreLabel};
pub use series::{aggregate_series, SeriesSummary};
pub use types::*;
