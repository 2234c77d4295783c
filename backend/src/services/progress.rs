//! Progress service for daily scores, history and analytics
//!
//! Loads goals and materialized daily metrics, then hands them to the
//! scoring engine. Ranges are always fetched from the Monday of the first
//! week so workout pace counts days before the requested start.

use crate::error::ApiError;
use crate::repositories::{DailyMetricsRecord, DailyMetricsRepository, GoalsRepository};
use chrono::NaiveDate;
use fitquest_shared::types::{
    AnalyticsResponse, DailyScoreResponse, DayProgressResponse, HistoryResponse,
};
use fitquest_shared::series::on_track_percent;
use fitquest_shared::{
    aggregate_series, compute_fit_score, iso_date, score_date_range, week_start_monday, DayScore,
    EngineResult, Goals, ScoreLabel,
};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// Longest range a history or analytics request may cover
pub const MAX_RANGE_DAYS: i64 = 366;

/// Progress service for business logic
pub struct ProgressService;

impl ProgressService {
    /// The user's goals, or the defaults when none are configured
    pub async fn goals_for(pool: &PgPool, user_id: Uuid) -> Result<Goals, ApiError> {
        let record = GoalsRepository::get_by_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        match record {
            Some(record) => Ok(record.to_goals()?),
            None => Ok(Goals::default()),
        }
    }

    /// Score every day in `start..=end`
    pub async fn score_range(
        pool: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(Goals, Vec<DayScore>), ApiError> {
        check_range(start, end)?;

        let goals = Self::goals_for(pool, user_id).await?;
        let fetch_from = week_start_monday(start);
        let records = DailyMetricsRepository::get_range(pool, user_id, fetch_from, end)
            .await
            .map_err(ApiError::Internal)?;
        let metrics = records
            .iter()
            .map(DailyMetricsRecord::to_metrics)
            .collect::<EngineResult<Vec<_>>>()?;

        let days = score_date_range(start, end, metrics, &goals)?;
        debug!(
            user_id = %user_id,
            start = %start,
            end = %end,
            fetched_from = %fetch_from,
            days = days.len(),
            "Scored date range"
        );

        Ok((goals, days))
    }

    /// Today view for one date
    pub async fn day(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<DayProgressResponse, ApiError> {
        let (goals, days) = Self::score_range(pool, user_id, date, date).await?;
        let day = days
            .first()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("no score produced for {}", date)))?;
        let fit_score = compute_fit_score(&day.metrics, goals.steps_target)?;

        Ok(DayProgressResponse {
            day: DailyScoreResponse::from(day),
            goals,
            fit_score,
        })
    }

    /// History view, newest first
    pub async fn history(
        pool: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoryResponse, ApiError> {
        let (_, days) = Self::score_range(pool, user_id, start, end).await?;
        Ok(history_response(start, end, &days))
    }

    /// Analytics view, chronological with streaks
    pub async fn analytics(
        pool: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AnalyticsResponse, ApiError> {
        let (_, days) = Self::score_range(pool, user_id, start, end).await?;
        analytics_response(start, end, &days)
    }
}

/// Reject inverted and oversized ranges
pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), ApiError> {
    if start > end {
        return Err(ApiError::Validation(format!(
            "start date {} is after end date {}",
            start, end
        )));
    }
    let days = (end - start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(ApiError::Validation(format!(
            "date range covers {} days, at most {} allowed",
            days, MAX_RANGE_DAYS
        )));
    }
    Ok(())
}

fn history_response(start: NaiveDate, end: NaiveDate, days: &[DayScore]) -> HistoryResponse {
    let count = |label: ScoreLabel| days.iter().filter(|d| d.result.label == label).count() as u32;
    let scores: Vec<u8> = days.iter().map(|d| d.result.score).collect();

    HistoryResponse {
        start: iso_date(start),
        end: iso_date(end),
        days: days.iter().rev().map(DailyScoreResponse::from).collect(),
        on_track_percent: on_track_percent(&scores),
        great_days: count(ScoreLabel::Great),
        okay_days: count(ScoreLabel::Okay),
        behind_days: count(ScoreLabel::Behind),
    }
}

fn analytics_response(
    start: NaiveDate,
    end: NaiveDate,
    days: &[DayScore],
) -> Result<AnalyticsResponse, ApiError> {
    let scores: Vec<u8> = days.iter().map(|d| d.result.score).collect();

    Ok(AnalyticsResponse {
        start: iso_date(start),
        end: iso_date(end),
        series: days.iter().map(DailyScoreResponse::from).collect(),
        summary: aggregate_series(&scores)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitquest_shared::DailyMetrics;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn scored_week() -> Vec<DayScore> {
        // Monday full day, Tuesday empty, Wednesday steps and water only
        let rows = vec![
            DailyMetrics {
                steps: 9000,
                water_ml: 2100,
                sleep_hours: 8.0,
                workout_minutes: 30,
                ..DailyMetrics::empty(d("2024-01-08"))
            },
            DailyMetrics {
                steps: 8000,
                water_ml: 2000,
                ..DailyMetrics::empty(d("2024-01-10"))
            },
        ];
        score_date_range(d("2024-01-08"), d("2024-01-10"), rows, &Goals::default()).unwrap()
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(d("2024-01-01"), d("2024-01-01")).is_ok());
        assert!(check_range(d("2024-01-01"), d("2024-12-31")).is_ok());
        assert!(matches!(
            check_range(d("2024-01-02"), d("2024-01-01")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            check_range(d("2023-01-01"), d("2024-01-02")),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_history_is_newest_first() {
        let days = scored_week();
        let history = history_response(d("2024-01-08"), d("2024-01-10"), &days);

        assert_eq!(history.days.len(), 3);
        assert_eq!(history.days[0].date, "2024-01-10");
        assert_eq!(history.days[2].date, "2024-01-08");
        // Scores 4, 1 and 2 out of 12
        assert_eq!(history.on_track_percent, 58);
        assert_eq!(history.great_days, 1);
        // Wednesday: steps and water on, sleep off, pace 1 of 2
        assert_eq!(history.okay_days, 1);
        assert_eq!(history.behind_days, 1);
    }

    #[test]
    fn test_analytics_summary() {
        let days = scored_week();
        let analytics = analytics_response(d("2024-01-08"), d("2024-01-10"), &days).unwrap();

        assert_eq!(analytics.series[0].date, "2024-01-08");
        assert_eq!(analytics.summary.days, 3);
        assert_eq!(analytics.summary.best_streak, 1);
        assert_eq!(analytics.summary.current_streak, 0);
    }
}
