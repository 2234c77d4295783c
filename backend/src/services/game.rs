//! Game service for quests, XP, streaks and badges
//!
//! Each request runs one read-apply-write cycle inside a transaction:
//! - Load (or create) the user's state row with its version
//! - Load the day's quests and earned badges
//! - Apply the transition in the pure engine
//! - Write back only if the version is unchanged
//!
//! A lost race rolls the transaction back and the whole cycle is retried.

use crate::config::GameConfig;
use crate::error::ApiError;
use crate::repositories::{
    DailyMetricsRepository, DailyQuestRecord, GamificationRepository, UserBadgeRecord,
};
use crate::telemetry;
use chrono::NaiveDate;
use fitquest_shared::{
    apply_quest_transition, EngineError, EngineResult, GameEvent, GameSnapshot, QuestId,
    QuestTransition, TransitionOutcome,
};
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Game service for business logic
pub struct GameService;

impl GameService {
    /// Current state for a date, creating the day's quests if needed
    pub async fn state(
        pool: &PgPool,
        config: &GameConfig,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<TransitionOutcome, ApiError> {
        Self::apply(pool, config, user_id, date, QuestTransition::Ensure).await
    }

    pub async fn complete(
        pool: &PgPool,
        config: &GameConfig,
        user_id: Uuid,
        date: NaiveDate,
        quest_id: QuestId,
    ) -> Result<TransitionOutcome, ApiError> {
        Self::apply(pool, config, user_id, date, QuestTransition::Complete(quest_id)).await
    }

    pub async fn uncomplete(
        pool: &PgPool,
        config: &GameConfig,
        user_id: Uuid,
        date: NaiveDate,
        quest_id: QuestId,
    ) -> Result<TransitionOutcome, ApiError> {
        Self::apply(pool, config, user_id, date, QuestTransition::Uncomplete(quest_id)).await
    }

    /// Complete every quest the day's logs already satisfy
    pub async fn sync(
        pool: &PgPool,
        config: &GameConfig,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<TransitionOutcome, ApiError> {
        let metrics = DailyMetricsRepository::get_day(pool, user_id, date)
            .await
            .map_err(ApiError::Internal)?
            .to_metrics()?;

        Self::apply(pool, config, user_id, date, QuestTransition::SyncFromMetrics(metrics)).await
    }

    /// Run a transition, retrying lost version races
    async fn apply(
        pool: &PgPool,
        config: &GameConfig,
        user_id: Uuid,
        date: NaiveDate,
        transition: QuestTransition,
    ) -> Result<TransitionOutcome, ApiError> {
        let operation = operation_name(&transition);
        let max_attempts = config.max_conflict_retries.saturating_add(1);
        let mut attempt = 1;

        loop {
            match Self::apply_once(pool, user_id, date, &transition).await {
                Ok(outcome) => {
                    record_events(&outcome.events);
                    if outcome.changed() {
                        info!(
                            user_id = %user_id,
                            date = %date,
                            operation,
                            xp = outcome.snapshot.state.xp,
                            level = outcome.snapshot.state.level,
                            streak = outcome.snapshot.state.completion_streak,
                            events = outcome.events.len(),
                            "Applied quest transition"
                        );
                    }
                    return Ok(outcome);
                }
                Err(ApiError::Conflict(message)) => {
                    telemetry::state_conflicts(operation).increment(1);
                    if attempt >= max_attempts {
                        warn!(
                            user_id = %user_id,
                            operation,
                            attempts = attempt,
                            "Giving up after repeated state conflicts"
                        );
                        return Err(ApiError::Conflict(message));
                    }
                    debug!(
                        user_id = %user_id,
                        operation,
                        attempt,
                        "Gamification state changed concurrently, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn apply_once(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
        transition: &QuestTransition,
    ) -> Result<TransitionOutcome, ApiError> {
        let mut tx = pool.begin().await?;

        GamificationRepository::ensure_state(&mut *tx, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let record = GamificationRepository::get_state(&mut *tx, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| {
                ApiError::Internal(anyhow::anyhow!("gamification state missing for {}", user_id))
            })?;

        let quests = GamificationRepository::get_quests(&mut *tx, user_id, date)
            .await
            .map_err(ApiError::Internal)?
            .iter()
            .map(DailyQuestRecord::to_quest)
            .collect::<EngineResult<Vec<_>>>()?;
        let badges = GamificationRepository::get_badges(&mut *tx, user_id)
            .await
            .map_err(ApiError::Internal)?
            .iter()
            .map(UserBadgeRecord::to_user_badge)
            .collect::<EngineResult<Vec<_>>>()?;

        let snapshot = GameSnapshot {
            state: record.to_state()?,
            date,
            quests,
            badges,
        };
        let outcome = apply_quest_transition(&snapshot, date, transition)?;

        if !outcome.changed() {
            tx.commit().await?;
            return Ok(outcome);
        }

        let written = GamificationRepository::update_state(
            &mut *tx,
            user_id,
            &outcome.snapshot.state,
            record.version,
        )
        .await
        .map_err(ApiError::Internal)?;
        if !written {
            // Dropping the transaction rolls back the quest rows created above
            return Err(EngineError::conflict(format!(
                "gamification state for user {} changed during update",
                user_id
            ))
            .into());
        }

        GamificationRepository::upsert_quests(&mut *tx, user_id, &outcome.snapshot.quests)
            .await
            .map_err(ApiError::Internal)?;

        let new_badges: Vec<_> = outcome.new_badges().collect();
        for badge in outcome
            .snapshot
            .badges
            .iter()
            .filter(|b| new_badges.contains(&b.badge_id))
        {
            GamificationRepository::insert_badge(&mut *tx, user_id, badge)
                .await
                .map_err(ApiError::Internal)?;
        }

        tx.commit().await?;
        Ok(outcome)
    }
}

fn operation_name(transition: &QuestTransition) -> &'static str {
    match transition {
        QuestTransition::Ensure => "ensure",
        QuestTransition::Complete(_) => "complete",
        QuestTransition::Uncomplete(_) => "uncomplete",
        QuestTransition::SyncFromMetrics(_) => "sync",
    }
}

/// Count committed events
fn record_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::QuestCompleted { quest_id, .. } => {
                telemetry::quests_completed(quest_id.as_str()).increment(1)
            }
            GameEvent::QuestUncompleted { quest_id, .. } => {
                telemetry::quests_uncompleted(quest_id.as_str()).increment(1)
            }
            GameEvent::DailyBonusAwarded { .. } => telemetry::daily_bonuses().increment(1),
            GameEvent::BadgeEarned { badge_id } => {
                telemetry::badges_earned(badge_id.as_str()).increment(1)
            }
            GameEvent::QuestCreated { .. } | GameEvent::LevelChanged { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitquest_shared::{BadgeId, DailyMetrics};

    #[test]
    fn test_operation_names() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(operation_name(&QuestTransition::Ensure), "ensure");
        assert_eq!(
            operation_name(&QuestTransition::Complete(QuestId::LogWater)),
            "complete"
        );
        assert_eq!(
            operation_name(&QuestTransition::Uncomplete(QuestId::LogWater)),
            "uncomplete"
        );
        assert_eq!(
            operation_name(&QuestTransition::SyncFromMetrics(DailyMetrics::empty(date))),
            "sync"
        );
    }

    #[test]
    fn test_record_events_without_recorder() {
        record_events(&[
            GameEvent::QuestCompleted {
                quest_id: QuestId::LogSteps,
                xp_awarded: 20,
            },
            GameEvent::DailyBonusAwarded { xp: 25, streak: 1 },
            GameEvent::BadgeEarned {
                badge_id: BadgeId::FirstLog,
            },
        ]);
    }
}
