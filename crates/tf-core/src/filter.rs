//! Date predicates selecting which days take part in a report.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::Serialize;

use crate::error::ParseError;
use crate::time::parse_date;

static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})$").unwrap());

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}(?:-\d{2}){2})\.\.(\d{4}(?:-\d{2}){2})$").unwrap());

/// A pure date predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayFilter {
    /// Every date passes.
    #[default]
    All,
    /// Dates within one calendar month.
    Month { year: i32, month: u32 },
    /// Dates between `start` and `end`, both inclusive.
    Range { start: NaiveDate, end: NaiveDate },
}

impl DayFilter {
    /// Returns true if `date` is selected.
    pub fn passes(&self, date: NaiveDate) -> bool {
        match *self {
            Self::All => true,
            Self::Month { year, month } => date.year() == year && date.month() == month,
            Self::Range { start, end } => start <= date && date <= end,
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Range { start, end } => write!(f, "{start}..{end}"),
        }
    }
}

impl FromStr for DayFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidFilter(s.to_string());

        if s == "all" {
            return Ok(Self::All);
        }

        if let Some(caps) = MONTH_RE.captures(s) {
            let year = caps[1].parse().map_err(|_| invalid())?;
            let month = caps[2].parse().map_err(|_| invalid())?;
            if !(1..=12).contains(&month) {
                return Err(invalid());
            }
            return Ok(Self::Month { year, month });
        }

        if let Some(caps) = RANGE_RE.captures(s) {
            let start = parse_date(&caps[1]).map_err(|_| invalid())?;
            let end = parse_date(&caps[2]).map_err(|_| invalid())?;
            return Ok(Self::Range { start, end });
        }

        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_filter() {
        let filter: DayFilter = "2012-07".parse().unwrap();
        assert_eq!(
            filter,
            DayFilter::Month {
                year: 2012,
                month: 7
            }
        );
        assert!(filter.passes(date(2012, 7, 1)));
        assert!(filter.passes(date(2012, 7, 31)));
        assert!(!filter.passes(date(2012, 8, 1)));
        assert!(!filter.passes(date(2011, 7, 15)));
    }

    #[test]
    fn test_range_filter_is_inclusive() {
        let filter: DayFilter = "2012-07-14..2012-08-01".parse().unwrap();
        assert!(!filter.passes(date(2012, 7, 13)));
        assert!(filter.passes(date(2012, 7, 14)));
        assert!(filter.passes(date(2012, 8, 1)));
        assert!(!filter.passes(date(2012, 8, 2)));
    }

    #[test]
    fn test_all_filter() {
        let filter: DayFilter = "all".parse().unwrap();
        assert!(filter.passes(date(1999, 12, 31)));
    }

    #[test]
    fn test_bad_filters() {
        for input in ["bad-filter-string", "2012-13", "2012-7", "2012-07-01..", "week"] {
            assert_eq!(
                input.parse::<DayFilter>(),
                Err(ParseError::InvalidFilter(input.to_string()))
            );
        }
    }

    #[test]
    fn test_display_round_trips_user_syntax() {
        for input in ["all", "2012-07", "2012-07-14..2012-08-01"] {
            let filter: DayFilter = input.parse().unwrap();
            assert_eq!(filter.to_string(), input);
        }
    }
}
