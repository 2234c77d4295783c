//! Goals repository for database operations
//!
//! Goals are written by the profile collaborator; this side only reads them.

use anyhow::Result;
use fitquest_shared::{non_negative, EngineError, EngineResult, GoalType, Goals};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Goals record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalsRecord {
    pub user_id: Uuid,
    pub steps_target: i32,
    pub water_ml_target: i32,
    pub sleep_hours_target: Decimal,
    pub calories_target: i32,
    pub workouts_per_week_target: i32,
    pub goal_type: String,
}

impl GoalsRecord {
    /// Convert into engine goals, rejecting values the engine cannot score
    pub fn to_goals(&self) -> EngineResult<Goals> {
        let sleep_hours_target = self.sleep_hours_target.to_f64().ok_or_else(|| {
            EngineError::invalid(format!("sleep target {} is not representable", self.sleep_hours_target))
        })?;

        Ok(Goals {
            steps_target: non_negative("steps_target", i64::from(self.steps_target))?,
            water_ml_target: non_negative("water_ml_target", i64::from(self.water_ml_target))?,
            sleep_hours_target,
            workouts_per_week_target: non_negative(
                "workouts_per_week_target",
                i64::from(self.workouts_per_week_target),
            )?,
            calories_target: non_negative("calories_target", i64::from(self.calories_target))?,
            goal_type: self.goal_type.parse::<GoalType>()?,
        })
    }
}

/// Goals repository
pub struct GoalsRepository;

impl GoalsRepository {
    /// Get a user's goals, if they have configured any
    pub async fn get_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<GoalsRecord>> {
        let record = sqlx::query_as::<_, GoalsRecord>(
            r#"
            SELECT user_id, steps_target, water_ml_target, sleep_hours_target,
                   calories_target, workouts_per_week_target, goal_type
            FROM goals
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> GoalsRecord {
        GoalsRecord {
            user_id: Uuid::new_v4(),
            steps_target: 10_000,
            water_ml_target: 2500,
            sleep_hours_target: Decimal::new(75, 1),
            calories_target: 2200,
            workouts_per_week_target: 4,
            goal_type: "endurance".to_string(),
        }
    }

    #[test]
    fn test_record_to_goals() {
        let goals = record().to_goals().unwrap();
        assert_eq!(goals.steps_target, 10_000);
        assert_eq!(goals.sleep_hours_target, 7.5);
        assert_eq!(goals.workouts_per_week_target, 4);
        assert_eq!(goals.goal_type, GoalType::Endurance);
    }

    #[test]
    fn test_negative_target_rejected() {
        let mut bad = record();
        bad.water_ml_target = -1;
        assert!(bad.to_goals().is_err());
    }

    #[test]
    fn test_unknown_goal_type_rejected() {
        let mut bad = record();
        bad.goal_type = "bulking".to_string();
        assert!(matches!(bad.to_goals(), Err(EngineError::InvalidInput(_))));
    }
}
