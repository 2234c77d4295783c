//! Data models for the progress engine

use crate::errors::{EngineError, EngineResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

// ============================================================================
// Goals and daily metrics
// ============================================================================

/// Goal type chosen by the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    #[default]
    GeneralFitness,
    FatLoss,
    MuscleGain,
    Endurance,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::GeneralFitness => "general_fitness",
            GoalType::FatLoss => "fat_loss",
            GoalType::MuscleGain => "muscle_gain",
            GoalType::Endurance => "endurance",
        }
    }
}

impl FromStr for GoalType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general_fitness" => Ok(GoalType::GeneralFitness),
            "fat_loss" => Ok(GoalType::FatLoss),
            "muscle_gain" => Ok(GoalType::MuscleGain),
            "endurance" => Ok(GoalType::Endurance),
            other => Err(EngineError::invalid(format!("unknown goal type '{}'", other))),
        }
    }
}

/// Per-user targets the daily score is measured against
///
/// Owned by the goals collaborator; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct Goals {
    pub steps_target: u32,
    pub water_ml_target: u32,
    #[validate(range(min = 0.0, max = 24.0))]
    pub sleep_hours_target: f64,
    #[validate(range(max = 7))]
    pub workouts_per_week_target: u32,
    pub calories_target: u32,
    #[serde(default)]
    pub goal_type: GoalType,
}

impl Default for Goals {
    /// Targets applied when a user has not configured any
    fn default() -> Self {
        Self {
            steps_target: 8000,
            water_ml_target: 2000,
            sleep_hours_target: 8.0,
            workouts_per_week_target: 3,
            calories_target: 2000,
            goal_type: GoalType::GeneralFitness,
        }
    }
}

/// One user's materialized metrics for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub steps: u32,
    pub water_ml: u32,
    #[validate(range(min = 0.0))]
    pub sleep_hours: f64,
    pub workout_minutes: u32,
    /// Meal totals, informational only
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub protein_g: f64,
}

impl DailyMetrics {
    /// A day with nothing logged
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            steps: 0,
            water_ml: 0,
            sleep_hours: 0.0,
            workout_minutes: 0,
            calories: 0,
            protein_g: 0.0,
        }
    }

    pub fn has_workout(&self) -> bool {
        self.workout_minutes > 0
    }
}

// ============================================================================
// Gamification
// ============================================================================

/// Per-user progression state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GamificationState {
    pub xp: i64,
    pub level: u32,
    pub completion_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
}

impl Default for GamificationState {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            completion_streak: 0,
            last_completed_date: None,
        }
    }
}

/// Minimum water logged before the water quest counts as done
pub const WATER_QUEST_MIN_ML: u32 = 500;

/// The four fixed daily quests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestId {
    LogSteps,
    LogWater,
    LogSleep,
    DoWorkout,
}

impl QuestId {
    /// Template order for a new day
    pub const ALL: [QuestId; 4] = [
        QuestId::LogSteps,
        QuestId::LogWater,
        QuestId::LogSleep,
        QuestId::DoWorkout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestId::LogSteps => "log_steps",
            QuestId::LogWater => "log_water",
            QuestId::LogSleep => "log_sleep",
            QuestId::DoWorkout => "do_workout",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            QuestId::LogSteps => "Log your steps",
            QuestId::LogWater => "Drink & log 500ml water",
            QuestId::LogSleep => "Log sleep hours",
            QuestId::DoWorkout => "Log a workout session",
        }
    }

    pub fn xp_reward(&self) -> u32 {
        match self {
            QuestId::LogSteps => 15,
            QuestId::LogWater => 15,
            QuestId::LogSleep => 10,
            QuestId::DoWorkout => 20,
        }
    }

    /// Whether the day's logs already satisfy this quest
    pub fn is_satisfied_by(&self, metrics: &DailyMetrics) -> bool {
        match self {
            QuestId::LogSteps => metrics.steps > 0,
            QuestId::LogWater => metrics.water_ml >= WATER_QUEST_MIN_ML,
            QuestId::LogSleep => metrics.sleep_hours > 0.0,
            QuestId::DoWorkout => metrics.has_workout(),
        }
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestId::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| EngineError::invalid(format!("unknown quest '{}'", s)))
    }
}

/// One quest row for a user and date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyQuest {
    pub quest_id: QuestId,
    pub date: NaiveDate,
    pub title: String,
    pub xp_reward: u32,
    pub completed: bool,
}

impl DailyQuest {
    /// Fresh, uncompleted quest from its template
    pub fn from_template(quest_id: QuestId, date: NaiveDate) -> Self {
        Self {
            quest_id,
            date,
            title: quest_id.title().to_string(),
            xp_reward: quest_id.xp_reward(),
            completed: false,
        }
    }
}

/// Badges the engine knows how to award
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BadgeId {
    #[serde(rename = "first_log")]
    FirstLog,
    #[serde(rename = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    Streak7,
}

impl BadgeId {
    pub const ALL: [BadgeId; 3] = [BadgeId::FirstLog, BadgeId::Streak3, BadgeId::Streak7];

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeId::FirstLog => "first_log",
            BadgeId::Streak3 => "streak_3",
            BadgeId::Streak7 => "streak_7",
        }
    }

    pub fn badge(&self) -> &'static Badge {
        match self {
            BadgeId::FirstLog => &BADGE_CATALOG[0],
            BadgeId::Streak3 => &BADGE_CATALOG[1],
            BadgeId::Streak7 => &BADGE_CATALOG[2],
        }
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BadgeId::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| EngineError::invalid(format!("unknown badge '{}'", s)))
    }
}

/// Static badge definition
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Badge {
    pub id: BadgeId,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

/// Badge catalog, in `BadgeId` order
pub static BADGE_CATALOG: [Badge; 3] = [
    Badge {
        id: BadgeId::FirstLog,
        name: "First Log",
        icon: "🏁",
        description: "Completed every daily quest for the first time.",
    },
    Badge {
        id: BadgeId::Streak3,
        name: "On a Roll",
        icon: "🔥",
        description: "Completed all daily quests 3 days in a row.",
    },
    Badge {
        id: BadgeId::Streak7,
        name: "Unstoppable Week",
        icon: "🏆",
        description: "Completed all daily quests 7 days in a row.",
    },
];

/// A badge a user has earned, append-only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserBadge {
    pub badge_id: BadgeId,
    pub earned_on: NaiveDate,
}

/// Convert an untrusted storage integer into a non-negative count
pub fn non_negative(field: &str, value: i64) -> EngineResult<u32> {
    u32::try_from(value)
        .map_err(|_| EngineError::invalid(format!("{} must be between 0 and {}, got {}", field, u32::MAX, value)))
}
