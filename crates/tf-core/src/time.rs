//! Date, weekday and duration parsing.
//!
//! Durations are hours as `f64`, written either as `H:MM` (`7:45`) or as a
//! decimal with at most two fractional digits (`7.75`). Clock times in `day`
//! instructions use the same syntax and are hours since midnight.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;

use crate::error::ParseError;

/// Pre-compiled pattern for `H:MM` durations.
static HOURS_MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d\d)$").unwrap());

/// Pre-compiled pattern for decimal durations.
static DECIMAL_HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").unwrap());

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ParseError::InvalidDate(s.to_string()))
}

/// Parses a duration or clock time into hours.
///
/// Negative values cannot be expressed.
pub fn parse_duration(s: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::InvalidDuration(s.to_string());

    if let Some(caps) = HOURS_MINUTES_RE.captures(s) {
        let hours: f64 = caps[1].parse().map_err(|_| invalid())?;
        let minutes: f64 = caps[2].parse().map_err(|_| invalid())?;
        return Ok(hours + minutes / 60.0);
    }

    if DECIMAL_HOURS_RE.is_match(s) {
        return s.parse().map_err(|_| invalid());
    }

    Err(invalid())
}

/// Parses a three-letter lowercase weekday name.
pub fn parse_weekday(s: &str) -> Result<Weekday, ParseError> {
    match s {
        "mon" => Ok(Weekday::Mon),
        "tue" => Ok(Weekday::Tue),
        "wed" => Ok(Weekday::Wed),
        "thu" => Ok(Weekday::Thu),
        "fri" => Ok(Weekday::Fri),
        "sat" => Ok(Weekday::Sat),
        "sun" => Ok(Weekday::Sun),
        _ => Err(ParseError::UnknownWeekday(s.to_string())),
    }
}

/// Returns true on Saturdays and Sundays.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_hours_minutes() {
        assert_eq!(parse_duration("7:45").unwrap(), 7.75);
        assert_eq!(parse_duration("0:30").unwrap(), 0.5);
        assert_eq!(parse_duration("17:00").unwrap(), 17.0);
    }

    #[test]
    fn test_parse_duration_decimal() {
        assert_eq!(parse_duration("8").unwrap(), 8.0);
        assert_eq!(parse_duration("1.5").unwrap(), 1.5);
        assert_eq!(parse_duration("2.25").unwrap(), 2.25);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        for input in ["", "-1", "1.255", "7:5", "1:", ".5", "abc", "1,5"] {
            assert_eq!(
                parse_duration(input),
                Err(ParseError::InvalidDuration(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2012-08-05").unwrap(),
            NaiveDate::from_ymd_opt(2012, 8, 5).unwrap()
        );
        assert!(parse_date("2012-02-30").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("mon").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("sun").unwrap(), Weekday::Sun);
        assert_eq!(
            parse_weekday("Monday"),
            Err(ParseError::UnknownWeekday("Monday".to_string()))
        );
    }

    #[test]
    fn test_is_weekend() {
        // 2012-07-14 was a Saturday.
        assert!(is_weekend(NaiveDate::from_ymd_opt(2012, 7, 14).unwrap()));
        assert!(is_weekend(NaiveDate::from_ymd_opt(2012, 7, 15).unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2012, 7, 16).unwrap()));
    }
}
