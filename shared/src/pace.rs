//! Weekly workout pace tracking
//!
//! Workout pace is measured in distinct workout *days* per Monday-start week,
//! prorated by how far into the week a day falls.
//!
//! Counters are keyed by week start and hold the set of workout dates seen in
//! that week, so the count for any date is the number of workout dates on or
//! before it in the same week. Ascending traversal, out-of-order replay and
//! duplicate records all give the same answer.

use crate::calendar::{week_start_monday, DAYS_PER_WEEK};
use crate::errors::{EngineError, EngineResult};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Workout days expected by a 1-based day of the week
///
/// `ceil(target * day_index / 7)` computed in integers, so a 3-per-week target
/// expects 1 by Monday, 2 by Wednesday and 3 by Sunday.
pub fn expected_workout_days(workouts_per_week_target: u32, day_index: u32) -> EngineResult<u32> {
    if !(1..=DAYS_PER_WEEK).contains(&day_index) {
        return Err(EngineError::invalid(format!(
            "day index must be between 1 and 7, got {}",
            day_index
        )));
    }
    let prorated = (u64::from(workouts_per_week_target) * u64::from(day_index))
        .div_ceil(u64::from(DAYS_PER_WEEK));
    Ok(prorated as u32)
}

/// Per-week snapshot exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekPaceState {
    pub week_start: NaiveDate,
    pub workout_days_so_far: u32,
}

/// Distinct workout-day counters for one user
#[derive(Debug, Clone, Default)]
pub struct WeeklyPaceTracker {
    weeks: BTreeMap<NaiveDate, BTreeSet<NaiveDate>>,
}

impl WeeklyPaceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a day and return its workout-days-so-far count
    ///
    /// A day with `workout_minutes > 0` counts itself.
    pub fn record_day(&mut self, date: NaiveDate, workout_minutes: u32) -> u32 {
        if workout_minutes > 0 {
            self.weeks
                .entry(week_start_monday(date))
                .or_default()
                .insert(date);
        }
        self.workout_days_so_far(date)
    }

    /// Distinct workout days from the week's Monday through `date`
    pub fn workout_days_so_far(&self, date: NaiveDate) -> u32 {
        self.weeks
            .get(&week_start_monday(date))
            .map_or(0, |days| days.range(..=date).count() as u32)
    }

    /// Counter state for the week containing `date`, as of that date
    pub fn week_state(&self, date: NaiveDate) -> WeekPaceState {
        WeekPaceState {
            week_start: week_start_monday(date),
            workout_days_so_far: self.workout_days_so_far(date),
        }
    }

    /// Total distinct workout days recorded in the week starting `week_start`
    pub fn week_total(&self, week_start: NaiveDate) -> u32 {
        self.weeks.get(&week_start).map_or(0, |days| days.len() as u32)
    }

    /// Week starts with at least one recorded workout, ascending
    pub fn weeks(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{day_index_in_week, enumerate_dates_inclusive};
    use chrono::Duration;
    use proptest::prelude::*;
    use rstest::rstest;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[rstest]
    #[case(3, 1, 1)]
    #[case(3, 2, 1)]
    #[case(3, 3, 2)]
    #[case(3, 5, 3)]
    #[case(3, 7, 3)]
    #[case(7, 1, 1)]
    #[case(7, 7, 7)]
    #[case(5, 4, 3)]
    #[case(0, 1, 0)]
    #[case(0, 7, 0)]
    fn test_expected_workout_days(#[case] target: u32, #[case] day: u32, #[case] expected: u32) {
        assert_eq!(expected_workout_days(target, day).unwrap(), expected);
    }

    #[test]
    fn test_expected_rejects_bad_day_index() {
        assert!(expected_workout_days(3, 0).is_err());
        assert!(expected_workout_days(3, 8).is_err());
    }

    #[test]
    fn test_counts_distinct_days_within_week() {
        let mut tracker = WeeklyPaceTracker::new();
        // 2024-01-08 is a Monday
        assert_eq!(tracker.record_day(d("2024-01-08"), 30), 1);
        assert_eq!(tracker.record_day(d("2024-01-09"), 0), 1);
        assert_eq!(tracker.record_day(d("2024-01-10"), 45), 2);
        assert_eq!(tracker.week_total(d("2024-01-08")), 2);
    }

    #[test]
    fn test_resets_on_new_monday() {
        let mut tracker = WeeklyPaceTracker::new();
        for date in enumerate_dates_inclusive(d("2024-01-08"), d("2024-01-14")) {
            tracker.record_day(date, 20);
        }
        assert_eq!(tracker.workout_days_so_far(d("2024-01-14")), 7);
        assert_eq!(tracker.record_day(d("2024-01-15"), 0), 0);
        assert_eq!(tracker.record_day(d("2024-01-16"), 10), 1);
    }

    #[test]
    fn test_duplicate_record_does_not_double_count() {
        let mut tracker = WeeklyPaceTracker::new();
        tracker.record_day(d("2024-01-10"), 30);
        assert_eq!(tracker.record_day(d("2024-01-10"), 15), 1);
    }

    #[test]
    fn test_out_of_order_query_sees_only_earlier_days() {
        let mut tracker = WeeklyPaceTracker::new();
        tracker.record_day(d("2024-01-12"), 30);
        tracker.record_day(d("2024-01-08"), 30);
        assert_eq!(tracker.workout_days_so_far(d("2024-01-09")), 1);
        assert_eq!(tracker.workout_days_so_far(d("2024-01-12")), 2);
        assert_eq!(
            tracker.week_state(d("2024-01-14")),
            WeekPaceState {
                week_start: d("2024-01-08"),
                workout_days_so_far: 2,
            }
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: ascending replay matches the prior-count-plus-one rule
        #[test]
        fn prop_ascending_replay_matches_running_counter(
            workouts in prop::collection::vec(0u32..90, 1..60)
        ) {
            let start = d("2024-01-03");
            let mut tracker = WeeklyPaceTracker::new();
            let mut running: BTreeMap<NaiveDate, u32> = BTreeMap::new();

            for (i, minutes) in workouts.iter().enumerate() {
                let date = start + Duration::days(i as i64);
                let key = week_start_monday(date);
                let prior = running.get(&key).copied().unwrap_or(0);
                let used = if *minutes > 0 { prior + 1 } else { prior };
                running.insert(key, used);

                prop_assert_eq!(tracker.record_day(date, *minutes), used);
            }
        }

        /// Property: never more than the day index, so a week never leaks
        #[test]
        fn prop_count_bounded_by_day_index(
            workouts in prop::collection::vec(0u32..90, 1..60)
        ) {
            let start = d("2023-12-28");
            let mut tracker = WeeklyPaceTracker::new();
            for (i, minutes) in workouts.iter().enumerate() {
                let date = start + Duration::days(i as i64);
                let count = tracker.record_day(date, *minutes);
                prop_assert!(count <= day_index_in_week(date));
            }
        }

        /// Property: expectation never exceeds the weekly target
        #[test]
        fn prop_expected_bounded_by_target(target in 0u32..=7, day in 1u32..=7) {
            let expected = expected_workout_days(target, day).unwrap();
            prop_assert!(expected <= target);
            prop_assert_eq!(expected_workout_days(target, 7).unwrap(), target);
        }
    }
}
