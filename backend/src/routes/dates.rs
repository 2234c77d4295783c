//! Date query parsing shared by the handlers

use crate::error::ApiError;
use chrono::{NaiveDate, Utc};
use fitquest_shared::parse_iso_date;
use fitquest_shared::types::{DayQuery, RangeQuery};

/// Today in UTC
///
/// The server has no notion of the caller's time zone. Near midnight this can
/// be a day off from the user's calendar, so clients send `date` explicitly.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The requested date, or the UTC date when none was given
pub fn resolve_day(query: &DayQuery) -> Result<NaiveDate, ApiError> {
    match query.date.as_deref() {
        Some(value) => Ok(parse_iso_date(value)?),
        None => Ok(today()),
    }
}

/// Both ends of an inclusive range
pub fn resolve_range(query: &RangeQuery) -> Result<(NaiveDate, NaiveDate), ApiError> {
    Ok((parse_iso_date(&query.start)?, parse_iso_date(&query.end)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_missing_date_is_today() {
        assert_eq!(resolve_day(&DayQuery::default()).unwrap(), today());
    }

    #[test]
    fn test_explicit_date_is_used_verbatim() {
        // A client east of UTC just past local midnight
        let local = today() + chrono::Duration::days(1);
        let query = DayQuery {
            date: Some(local.format("%Y-%m-%d").to_string()),
        };
        assert_eq!(resolve_day(&query).unwrap(), local);
    }

    #[rstest]
    #[case("2024-02-29", true)]
    #[case("2023-02-29", false)]
    #[case("2024-2-01", false)]
    #[case("yesterday", false)]
    #[case("", false)]
    fn test_resolve_day(#[case] input: &str, #[case] ok: bool) {
        let query = DayQuery {
            date: Some(input.to_string()),
        };
        let result = resolve_day(&query);
        assert_eq!(result.is_ok(), ok, "input {:?}", input);
        if !ok {
            assert!(matches!(result, Err(ApiError::Validation(_))));
        }
    }

    #[test]
    fn test_resolve_range() {
        let query = RangeQuery {
            start: "2024-01-01".to_string(),
            end: "2024-01-31".to_string(),
        };
        let (start, end) = resolve_range(&query).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        let bad = RangeQuery {
            start: "2024-01-01".to_string(),
            end: "31/01/2024".to_string(),
        };
        assert!(resolve_range(&bad).is_err());
    }
}
