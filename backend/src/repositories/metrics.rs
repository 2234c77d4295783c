//! Daily metrics repository
//!
//! Materializes one row per calendar day from the raw log tables. Days
//! without logs come back as zeros.

use anyhow::Result;
use chrono::NaiveDate;
use fitquest_shared::{non_negative, DailyMetrics, EngineError, EngineResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Per-day totals across the log tables
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyMetricsRecord {
    pub log_date: NaiveDate,
    pub steps: i64,
    pub water_ml: i64,
    pub sleep_hours: Decimal,
    pub workout_minutes: i64,
    pub calories: i64,
    pub protein_g: Decimal,
}

impl DailyMetricsRecord {
    pub fn to_metrics(&self) -> EngineResult<DailyMetrics> {
        Ok(DailyMetrics {
            date: self.log_date,
            steps: non_negative("steps", self.steps)?,
            water_ml: non_negative("water_ml", self.water_ml)?,
            sleep_hours: decimal_to_f64("sleep_hours", self.sleep_hours)?,
            workout_minutes: non_negative("workout_minutes", self.workout_minutes)?,
            calories: non_negative("calories", self.calories)?,
            protein_g: decimal_to_f64("protein_g", self.protein_g)?,
        })
    }
}

fn decimal_to_f64(field: &str, value: Decimal) -> EngineResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| EngineError::invalid(format!("{} value {} is not representable", field, value)))
}

/// Daily metrics repository
pub struct DailyMetricsRepository;

impl DailyMetricsRepository {
    /// One row per date in `start..=end`, ascending
    pub async fn get_range(
        pool: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetricsRecord>> {
        let records = sqlx::query_as::<_, DailyMetricsRecord>(
            r#"
            WITH days AS (
                SELECT d::date AS log_date
                FROM generate_series($2::date, $3::date, INTERVAL '1 day') AS d
            ),
            steps AS (
                SELECT log_date, SUM(steps)::BIGINT AS total
                FROM daily_logs
                WHERE user_id = $1 AND log_date BETWEEN $2 AND $3
                GROUP BY log_date
            ),
            water AS (
                SELECT log_date, SUM(ml)::BIGINT AS total
                FROM water_logs
                WHERE user_id = $1 AND log_date BETWEEN $2 AND $3
                GROUP BY log_date
            ),
            sleep AS (
                SELECT log_date, SUM(hours) AS total
                FROM sleep_logs
                WHERE user_id = $1 AND log_date BETWEEN $2 AND $3
                GROUP BY log_date
            ),
            workouts AS (
                SELECT log_date, SUM(duration_min)::BIGINT AS total
                FROM workout_logs
                WHERE user_id = $1 AND log_date BETWEEN $2 AND $3
                GROUP BY log_date
            ),
            nutrition AS (
                SELECT log_date, SUM(calories)::BIGINT AS calories, SUM(protein_g) AS protein_g
                FROM meals
                WHERE user_id = $1 AND log_date BETWEEN $2 AND $3
                GROUP BY log_date
            )
            SELECT days.log_date,
                   COALESCE(steps.total, 0) AS steps,
                   COALESCE(water.total, 0) AS water_ml,
                   COALESCE(sleep.total, 0)::NUMERIC AS sleep_hours,
                   COALESCE(workouts.total, 0) AS workout_minutes,
                   COALESCE(nutrition.calories, 0) AS calories,
                   COALESCE(nutrition.protein_g, 0)::NUMERIC AS protein_g
            FROM days
            LEFT JOIN steps ON steps.log_date = days.log_date
            LEFT JOIN water ON water.log_date = days.log_date
            LEFT JOIN sleep ON sleep.log_date = days.log_date
            LEFT JOIN workouts ON workouts.log_date = days.log_date
            LEFT JOIN nutrition ON nutrition.log_date = days.log_date
            ORDER BY days.log_date
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Totals for a single date
    pub async fn get_day(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<DailyMetricsRecord> {
        Self::get_range(pool, user_id, date, date)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no metrics row generated for {}", date))
    }
}
