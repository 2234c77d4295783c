//! Input validation functions
//!
//! Range rules live on the models as `validator` derives; this module runs
//! them, adds the checks the derive cannot express (finiteness, XP sign) and
//! turns failures into `EngineError::InvalidInput` with user-facing labels.

use crate::errors::{EngineError, EngineResult};
use crate::models::{DailyMetrics, Goals};
use validator::{Validate, ValidationErrors};

/// Validate a goal configuration before scoring against it
pub fn validate_goals(goals: &Goals) -> EngineResult<()> {
    validate_finite("sleep_hours_target", goals.sleep_hours_target)?;
    goals.validate().map_err(into_engine_error)
}

/// Validate one day's metrics
pub fn validate_daily_metrics(metrics: &DailyMetrics) -> EngineResult<()> {
    validate_finite("sleep_hours", metrics.sleep_hours)?;
    validate_finite("protein_g", metrics.protein_g)?;
    metrics.validate().map_err(into_engine_error)
}

/// Validate a cumulative XP amount
pub fn validate_xp(xp: i64) -> EngineResult<()> {
    if xp < 0 {
        return Err(ValidationError::new("xp", &format!("cannot be negative (got {})", xp)).into());
    }
    Ok(())
}

/// Reject NaN and infinities, which range checks let through
pub fn validate_finite(field: &str, value: f64) -> EngineResult<()> {
    if value.is_nan() || value.is_infinite() {
        return Err(ValidationError::new(field, "must be a valid number").into());
    }
    Ok(())
}

fn into_engine_error(errors: ValidationErrors) -> EngineError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let field = field.to_string();
            let detail = errs
                .iter()
                .map(|e| match (&e.params.get("min"), &e.params.get("max")) {
                    (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
                    (None, Some(max)) => format!("must be at most {}", max),
                    (Some(min), None) => format!("must be at least {}", min),
                    (None, None) => e.code.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            ValidationError::new(&field, &detail).user_message()
        })
        .collect();
    messages.sort();
    EngineError::InvalidInput(messages.join("; "))
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "steps_target" => "Daily Step Goal",
        "water_ml_target" => "Daily Water Goal",
        "sleep_hours_target" => "Sleep Goal",
        "workouts_per_week_target" => "Workouts per Week",
        "calories_target" => "Daily Calorie Goal",
        "goal_type" => "Goal Type",
        "steps" => "Steps",
        "water_ml" => "Water",
        "sleep_hours" => "Sleep",
        "workout_minutes" => "Workout Minutes",
        "protein_g" => "Protein",
        "xp" => "XP",
        "date" => "Date",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::InvalidInput(err.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn metrics() -> DailyMetrics {
        DailyMetrics::empty(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
    }

    #[test]
    fn test_default_goals_are_valid() {
        assert!(validate_goals(&Goals::default()).is_ok());
    }

    #[test]
    fn test_workouts_per_week_above_seven_rejected() {
        let goals = Goals {
            workouts_per_week_target: 8,
            ..Goals::default()
        };
        let err = validate_goals(&goals).unwrap_err();
        match err {
            EngineError::InvalidInput(msg) => {
                assert!(msg.contains("Workouts per Week"), "unexpected message: {}", msg)
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_sleep_target_bounds() {
        for bad in [-0.5, 24.5, f64::NAN, f64::INFINITY] {
            let goals = Goals {
                sleep_hours_target: bad,
                ..Goals::default()
            };
            assert!(validate_goals(&goals).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_metrics_validation() {
        assert!(validate_daily_metrics(&metrics()).is_ok());

        let mut bad = metrics();
        bad.sleep_hours = -1.0;
        assert!(validate_daily_metrics(&bad).is_err());

        let mut nan = metrics();
        nan.protein_g = f64::NAN;
        assert!(validate_daily_metrics(&nan).is_err());
    }

    #[test]
    fn test_validate_xp() {
        assert!(validate_xp(0).is_ok());
        assert!(validate_xp(1_000_000).is_ok());
        assert_eq!(
            validate_xp(-5),
            Err(EngineError::InvalidInput("XP: cannot be negative (got -5)".to_string()))
        );
    }

    #[test]
    fn test_field_display_labels() {
        assert_eq!(get_field_display_label("water_ml_target"), "Daily Water Goal");
        assert_eq!(get_field_display_label("unknown_field"), "unknown_field");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_workout_targets_up_to_seven_valid(target in 0u32..=7) {
            let goals = Goals { workouts_per_week_target: target, ..Goals::default() };
            prop_assert!(validate_goals(&goals).is_ok());
        }

        #[test]
        fn prop_negative_xp_rejected(xp in i64::MIN..0) {
            prop_assert!(validate_xp(xp).is_err());
        }
    }
}
