//! Calendar and week arithmetic
//!
//! All dates are calendar days (`NaiveDate`) in the caller's local calendar.
//! Weeks start on Monday.

use crate::errors::{EngineError, EngineResult};
use chrono::{Datelike, Duration, NaiveDate};

/// Days in a week, used by the pace proration
pub const DAYS_PER_WEEK: u32 = 7;

/// Format a date as zero-padded `YYYY-MM-DD`
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a strict `YYYY-MM-DD` date string
///
/// Anything else (missing padding, trailing text, impossible days) is rejected
/// rather than coerced.
pub fn parse_iso_date(value: &str) -> EngineResult<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !well_formed {
        return Err(EngineError::invalid(format!(
            "malformed date '{}', expected YYYY-MM-DD",
            value
        )));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| EngineError::invalid(format!("invalid date '{}': {}", value, e)))
}

/// Monday on or before the given date
pub fn week_start_monday(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday();
    date - Duration::days(i64::from(offset))
}

/// Day of the week, Monday = 1 through Sunday = 7
pub fn day_index_in_week(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// Shift a date by a signed number of days
pub fn add_days(date: NaiveDate, delta: i64) -> NaiveDate {
    date + Duration::days(delta)
}

/// True when `earlier` is exactly the calendar day before `later`
pub fn is_previous_day(earlier: NaiveDate, later: NaiveDate) -> bool {
    later.pred_opt() == Some(earlier)
}

/// Lazy ascending iterator over an inclusive date range
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next.filter(|d| *d <= self.end) {
            Some(start) => {
                let len = (self.end - start).num_days() as usize + 1;
                (len, Some(len))
            }
            None => (0, Some(0)),
        }
    }
}

impl ExactSizeIterator for DateRange {}

/// Enumerate every date from `start` to `end` inclusive
///
/// Empty when `start > end`.
pub fn enumerate_dates_inclusive(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange {
        next: Some(start),
        end,
    }
}
