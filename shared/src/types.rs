//! API request and response types

use crate::calendar::iso_date;
use crate::errors::EngineResult;
use crate::gamification::{GameEvent, GameSnapshot, TransitionOutcome};
use crate::leveling::LevelProgress;
use crate::models::{Badge, DailyQuest, Goals, QuestId, UserBadge, BADGE_CATALOG};
use crate::scoring::{DayScore, ScoreLabel};
use crate::series::SeriesSummary;
use serde::{Deserialize, Serialize};

// ============================================================================
// Query parameters
// ============================================================================

/// Single-date query, `YYYY-MM-DD`
///
/// Absent means today in UTC. Clients in other time zones should always send
/// their local date, otherwise the quests and score land on the UTC day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayQuery {
    #[serde(default)]
    pub date: Option<String>,
}

/// Inclusive date range query, both ends `YYYY-MM-DD`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
}

// ============================================================================
// Errors
// ============================================================================

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Progress
// ============================================================================

/// One scored day with its raw totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyScoreResponse {
    pub date: String,
    pub steps: u32,
    pub water_ml: u32,
    pub sleep_hours: f64,
    pub workout_minutes: u32,
    pub calories: u32,
    pub protein_g: f64,
    pub on_steps: bool,
    pub on_water: bool,
    pub on_sleep: bool,
    pub on_workout_pace: bool,
    pub expected_workout_days: u32,
    pub workout_days_so_far: u32,
    pub score: u8,
    pub label: ScoreLabel,
}

impl From<&DayScore> for DailyScoreResponse {
    fn from(day: &DayScore) -> Self {
        Self {
            date: iso_date(day.date),
            steps: day.metrics.steps,
            water_ml: day.metrics.water_ml,
            sleep_hours: day.metrics.sleep_hours,
            workout_minutes: day.metrics.workout_minutes,
            calories: day.metrics.calories,
            protein_g: day.metrics.protein_g,
            on_steps: day.result.on_steps,
            on_water: day.result.on_water,
            on_sleep: day.result.on_sleep,
            on_workout_pace: day.result.on_workout_pace,
            expected_workout_days: day.result.expected_workout_days,
            workout_days_so_far: day.result.workout_days_so_far,
            score: day.result.score,
            label: day.result.label,
        }
    }
}

/// Today view: the day's score, the goals it was measured against and the
/// fit score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayProgressResponse {
    pub day: DailyScoreResponse,
    pub goals: Goals,
    pub fit_score: u8,
}

/// History view, newest day first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub start: String,
    pub end: String,
    pub days: Vec<DailyScoreResponse>,
    /// Share of the range's possible points earned, 0 to 100
    pub on_track_percent: u32,
    pub great_days: u32,
    pub okay_days: u32,
    pub behind_days: u32,
}

/// Analytics view, chronological
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub start: String,
    pub end: String,
    pub series: Vec<DailyScoreResponse>,
    pub summary: SeriesSummary,
}

// ============================================================================
// Gamification
// ============================================================================

/// Level bar data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgressResponse {
    pub level: u32,
    pub xp_into_level: i64,
    pub xp_needed: i64,
    pub progress_percent: u32,
    pub xp_to_next_level: i64,
    pub is_max_level: bool,
}

impl From<LevelProgress> for LevelProgressResponse {
    fn from(progress: LevelProgress) -> Self {
        Self {
            level: progress.level,
            xp_into_level: progress.xp_into_level,
            xp_needed: progress.xp_needed,
            progress_percent: progress.progress_percent(),
            xp_to_next_level: progress.xp_to_next_level(),
            is_max_level: progress.is_max_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestResponse {
    pub quest_id: QuestId,
    pub title: String,
    pub xp_reward: u32,
    pub completed: bool,
}

impl From<&DailyQuest> for QuestResponse {
    fn from(quest: &DailyQuest) -> Self {
        Self {
            quest_id: quest.quest_id,
            title: quest.title.clone(),
            xp_reward: quest.xp_reward,
            completed: quest.completed,
        }
    }
}

/// Catalog entry, with the earn date when the user has it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeResponse {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earned_on: Option<String>,
}

impl BadgeResponse {
    pub fn from_badge(badge: &Badge, earned: Option<&UserBadge>) -> Self {
        Self {
            id: badge.id.as_str().to_string(),
            name: badge.name.to_string(),
            icon: badge.icon.to_string(),
            description: badge.description.to_string(),
            earned_on: earned.map(|b| iso_date(b.earned_on)),
        }
    }

    /// Whole catalog, unearned
    pub fn catalog() -> Vec<Self> {
        BADGE_CATALOG
            .iter()
            .map(|badge| Self::from_badge(badge, None))
            .collect()
    }
}

/// Game page state for one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateResponse {
    pub date: String,
    pub xp: i64,
    pub completion_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_completed_date: Option<String>,
    pub level: LevelProgressResponse,
    pub quests: Vec<QuestResponse>,
    pub quest_xp_today: u32,
    pub badges: Vec<BadgeResponse>,
}

impl GameStateResponse {
    pub fn from_snapshot(snapshot: &GameSnapshot) -> EngineResult<Self> {
        Ok(Self {
            date: iso_date(snapshot.date),
            xp: snapshot.state.xp,
            completion_streak: snapshot.state.completion_streak,
            last_completed_date: snapshot.state.last_completed_date.map(iso_date),
            level: snapshot.level_progress()?.into(),
            quests: snapshot.quests.iter().map(QuestResponse::from).collect(),
            quest_xp_today: snapshot.quest_xp_earned(),
            badges: snapshot
                .badges
                .iter()
                .map(|earned| BadgeResponse::from_badge(earned.badge_id.badge(), Some(earned)))
                .collect(),
        })
    }
}

/// Result of a quest action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameActionResponse {
    pub state: GameStateResponse,
    pub events: Vec<GameEvent>,
    pub messages: Vec<String>,
}

impl GameActionResponse {
    pub fn from_outcome(outcome: &TransitionOutcome) -> EngineResult<Self> {
        Ok(Self {
            state: GameStateResponse::from_snapshot(&outcome.snapshot)?,
            events: outcome.events.clone(),
            messages: outcome.events.iter().filter_map(GameEvent::message).collect(),
        })
    }
}

// ============================================================================
// Motivation
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotivationResponse {
    pub date: String,
    pub quote: String,
}
