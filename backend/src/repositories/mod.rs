//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod gamification;
pub mod goals;
pub mod metrics;

pub use gamification::{
    DailyQuestRecord, GamificationRepository, GamificationStateRecord, UserBadgeRecord,
};
pub use goals::{GoalsRecord, GoalsRepository};
pub use metrics::{DailyMetricsRecord, DailyMetricsRepository};
