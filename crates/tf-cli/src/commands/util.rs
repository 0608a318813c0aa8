//! Shared utilities for report commands.

use chrono::NaiveDate;
use tf_core::{BalanceOptions, DayFilter};

/// Formats hours in a seven character column, with zero as `----.--`.
pub fn format_hours(hours: f64) -> String {
    if hours == 0.0 {
        "----.--".to_string()
    } else {
        format!("{hours:7.2}")
    }
}

/// Formats a date with its weekday, e.g. `2012-07-02 Mon`.
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d %a").to_string()
}

/// Column header of the balance report.
pub fn day_header() -> String {
    format!(
        "{:^15} {:>7} {:>7} {:>7} {:>7}",
        "when", "worked", "leave", "sick", "balance"
    )
}

/// Formats a description as a `; ` suffix, or nothing.
pub fn description_suffix(description: Option<&str>) -> String {
    description.map(|d| format!("; {d}")).unwrap_or_default()
}

/// A parsed `-f` filter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Selects the days that take part in the reports.
    pub filter: DayFilter,
    /// Balance rows requested with `day`, `week` and `month`.
    pub balance: BalanceOptions,
    /// The list as given, for report headings.
    pub label: String,
}

impl FilterSpec {
    /// Parses a comma separated filter list.
    ///
    /// The last date filter wins. Tokens that are neither a date filter nor
    /// `day`, `week` or `month` are returned separately and otherwise
    /// ignored. Without `week` or `month` every balance row kind is shown.
    pub fn parse(list: &str) -> (Self, Vec<String>) {
        let mut filter = DayFilter::All;
        let mut rejected = Vec::new();
        let (mut daily, mut weekly, mut monthly) = (false, false, false);

        let tokens: Vec<&str> = list.split(',').map(str::trim).collect();
        for &token in &tokens {
            match token {
                "day" => daily = true,
                "week" => weekly = true,
                "month" => monthly = true,
                _ => match token.parse() {
                    Ok(parsed) => filter = parsed,
                    Err(_) => rejected.push(token.to_string()),
                },
            }
        }

        let balance = if weekly || monthly {
            BalanceOptions {
                daily,
                weekly,
                monthly,
            }
        } else {
            BalanceOptions::default()
        };

        let spec = Self {
            filter,
            balance,
            label: tokens.join(", "),
        };
        (spec, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(0.0), "----.--");
        assert_eq!(format_hours(8.0), "   8.00");
        assert_eq!(format_hours(-1.5), "  -1.50");
        assert_eq!(format_hours(1234.567), "1234.57");
    }

    #[test]
    fn test_day_header_lines_up_with_rows() {
        let header = day_header();
        assert_eq!(header, "     when        worked   leave    sick balance");
        let monday = NaiveDate::from_ymd_opt(2012, 7, 2).unwrap();
        let row = format!("{}: {}", format_day(monday), format_hours(8.0));
        assert_eq!(row, "2012-07-02 Mon:    8.00");
        assert_eq!(row.len(), header.find("worked").unwrap() + "worked".len());
    }

    #[test]
    fn test_filter_spec_defaults() {
        let (spec, rejected) = FilterSpec::parse("all");
        assert!(rejected.is_empty());
        assert_eq!(spec.filter, DayFilter::All);
        assert_eq!(spec.balance, BalanceOptions::default());
        assert_eq!(spec.label, "all");
    }

    #[test]
    fn test_filter_spec_period_keywords() {
        let (spec, rejected) = FilterSpec::parse("2012-07,week");
        assert!(rejected.is_empty());
        assert_eq!(
            spec.filter,
            DayFilter::Month {
                year: 2012,
                month: 7
            }
        );
        assert_eq!(
            spec.balance,
            BalanceOptions {
                daily: false,
                weekly: true,
                monthly: false
            }
        );
        assert_eq!(spec.label, "2012-07, week");

        let (spec, _) = FilterSpec::parse("day");
        assert_eq!(spec.balance, BalanceOptions::default());
    }

    #[test]
    fn test_filter_spec_rejects_unknown_tokens() {
        let (spec, rejected) = FilterSpec::parse("2012-13,2012-07-01..2012-07-15,fortnight");
        assert_eq!(rejected, ["2012-13", "fortnight"]);
        assert_eq!(spec.filter.to_string(), "2012-07-01..2012-07-15");
    }
}
