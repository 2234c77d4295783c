//! Gamification repository for database operations
//!
//! Every function takes a connection so the service can run a whole
//! read-apply-write cycle inside one transaction.

use anyhow::Result;
use chrono::NaiveDate;
use fitquest_shared::validation::validate_xp;
use fitquest_shared::{
    non_negative, BadgeId, DailyQuest, EngineResult, GamificationState, QuestId, UserBadge,
};
use sqlx::PgConnection;
use uuid::Uuid;

// ============================================================================
// Records
// ============================================================================

/// Gamification state record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GamificationStateRecord {
    pub user_id: Uuid,
    pub xp: i64,
    pub level: i32,
    pub streak: i32,
    pub last_completed_date: Option<NaiveDate>,
    pub version: i64,
}

impl GamificationStateRecord {
    pub fn to_state(&self) -> EngineResult<GamificationState> {
        validate_xp(self.xp)?;
        Ok(GamificationState {
            xp: self.xp,
            level: non_negative("level", i64::from(self.level))?,
            completion_streak: non_negative("streak", i64::from(self.streak))?,
            last_completed_date: self.last_completed_date,
        })
    }
}

/// Daily quest record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyQuestRecord {
    pub quest_id: String,
    pub log_date: NaiveDate,
    pub title: String,
    pub xp_reward: i32,
    pub completed: bool,
}

impl DailyQuestRecord {
    pub fn to_quest(&self) -> EngineResult<DailyQuest> {
        Ok(DailyQuest {
            quest_id: self.quest_id.parse::<QuestId>()?,
            date: self.log_date,
            title: self.title.clone(),
            xp_reward: non_negative("xp_reward", i64::from(self.xp_reward))?,
            completed: self.completed,
        })
    }
}

/// Earned badge record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserBadgeRecord {
    pub badge_id: String,
    pub earned_on: NaiveDate,
}

impl UserBadgeRecord {
    pub fn to_user_badge(&self) -> EngineResult<UserBadge> {
        Ok(UserBadge {
            badge_id: self.badge_id.parse::<BadgeId>()?,
            earned_on: self.earned_on,
        })
    }
}

// ============================================================================
// Repository
// ============================================================================

/// Gamification repository
pub struct GamificationRepository;

impl GamificationRepository {
    /// Create the zero state row if the user has none
    pub async fn ensure_state(conn: &mut PgConnection, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO gamification_state (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Get the state row with its version
    pub async fn get_state(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Option<GamificationStateRecord>> {
        let record = sqlx::query_as::<_, GamificationStateRecord>(
            r#"
            SELECT user_id, xp, level, streak, last_completed_date, version
            FROM gamification_state
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Write the state if the stored version still matches
    ///
    /// Returns false when another writer got there first.
    pub async fn update_state(
        conn: &mut PgConnection,
        user_id: Uuid,
        state: &GamificationState,
        expected_version: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE gamification_state
            SET xp = $3,
                level = $4,
                streak = $5,
                last_completed_date = $6,
                version = version + 1,
                updated_at = NOW()
            WHERE user_id = $1 AND version = $2
            "#,
        )
        .bind(user_id)
        .bind(expected_version)
        .bind(state.xp)
        .bind(i32::try_from(state.level)?)
        .bind(i32::try_from(state.completion_streak)?)
        .bind(state.last_completed_date)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Quests stored for a date
    pub async fn get_quests(
        conn: &mut PgConnection,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<DailyQuestRecord>> {
        let records = sqlx::query_as::<_, DailyQuestRecord>(
            r#"
            SELECT quest_id, log_date, title, xp_reward, completed
            FROM daily_quests
            WHERE user_id = $1 AND log_date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }

    /// Insert or update the given quests
    pub async fn upsert_quests(
        conn: &mut PgConnection,
        user_id: Uuid,
        quests: &[DailyQuest],
    ) -> Result<()> {
        for quest in quests {
            sqlx::query(
                r#"
                INSERT INTO daily_quests (user_id, log_date, quest_id, title, xp_reward, completed)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (user_id, log_date, quest_id)
                DO UPDATE SET completed = EXCLUDED.completed, updated_at = NOW()
                "#,
            )
            .bind(user_id)
            .bind(quest.date)
            .bind(quest.quest_id.as_str())
            .bind(&quest.title)
            .bind(i32::try_from(quest.xp_reward)?)
            .bind(quest.completed)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Badges the user has earned, oldest first
    pub async fn get_badges(conn: &mut PgConnection, user_id: Uuid) -> Result<Vec<UserBadgeRecord>> {
        let records = sqlx::query_as::<_, UserBadgeRecord>(
            r#"
            SELECT badge_id, earned_on
            FROM user_badges
            WHERE user_id = $1
            ORDER BY earned_at, badge_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }

    /// Record an earned badge; an existing pair is left alone
    pub async fn insert_badge(conn: &mut PgConnection, user_id: Uuid, badge: &UserBadge) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_badges (user_id, badge_id, earned_on)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, badge_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(badge.badge_id.as_str())
        .bind(badge.earned_on)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
