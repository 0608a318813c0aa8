//! Error types for work log parsing.

use std::io;

use chrono::NaiveDate;
use thiserror::Error;

use crate::diagnostic::Severity;

/// Failures parsing a single token (date, weekday, duration, filter).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not a `YYYY-MM-DD` calendar date.
    #[error("bad date \"{0}\"")]
    InvalidDate(String),

    /// Neither `H:MM` nor a decimal with at most two fractional digits.
    #[error("bad time duration \"{0}\"")]
    InvalidDuration(String),

    /// Not one of `mon`, `tue`, ..., `sun`.
    #[error("unknown day \"{0}\"")]
    UnknownWeekday(String),

    /// Not `all`, `YYYY-MM` or `YYYY-MM-DD..YYYY-MM-DD`.
    #[error("bad time filter argument: {0}")]
    InvalidFilter(String),
}

/// Problems found while reading one line of a work log.
///
/// The reader reports these through its sink and carries on with the next
/// line; none of them aborts a read.
#[derive(Debug, Error)]
pub enum LineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("indentation contains both spaces and tabs")]
    MixedIndentation,

    #[error("work package indentation error")]
    BadIndentation,

    #[error("bad work package path \"{0}\"")]
    InvalidPackagePath(String),

    #[error("bad effort \"{0}\" in work package definition")]
    InvalidEffort(String),

    #[error("an activity must have a work package and a duration.")]
    IncompleteActivity,

    #[error("invalid activity work package \"{0}\".")]
    UnknownPackage(String),

    #[error("invalid activity duration \"{0}\".")]
    InvalidActivityDuration(String),

    #[error("no current day for instruction \"{0}\".")]
    NoCurrentDay(String),

    #[error("unexpected day argument list: \"{0}\".")]
    DayArguments(String),

    #[error("bad start time argument \"{0}\" in day spec.")]
    BadStartTime(String),

    #[error("bad end time argument \"{0}\" in day spec.")]
    BadEndTime(String),

    #[error("day {0} redefined.")]
    DayRedefined(NaiveDate),

    #[error("bad day range \"{0}\".")]
    BlockArguments(String),

    #[error("bad must-hours argument \"{0}\".")]
    MustHoursArgument(String),

    #[error("bad must-hours day range \"{0}\".")]
    MustHoursRange(String),

    #[error("bad time duration \"{hours}\" (\"{days}\").")]
    MustHoursDuration { hours: String, days: String },

    #[error("argument missing in instruction \"{0}\".")]
    MissingArgument(String),

    #[error("too many arguments in instruction \"{0}\".")]
    TooManyArguments(String),

    #[error("bad time \"{time}\" in instruction \"{instruction}\".")]
    BadTime { time: String, instruction: String },

    #[error("unknown instruction \"{0}\".")]
    UnknownInstruction(String),

    #[error("re-defining {0} (this file has already been read before)")]
    Redefinition(String),

    #[error("file {0} already processed")]
    ImportLoop(String),

    #[error("failed to open file {path}; {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read file; {0}")]
    ReadFailed(#[source] io::Error),
}

impl LineError {
    /// Severity this problem is reported with.
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Redefinition(_) | Self::ImportLoop(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redefinition_and_loops_are_warnings() {
        assert_eq!(
            LineError::Redefinition("activity".to_string()).severity(),
            Severity::Warning
        );
        assert_eq!(
            LineError::ImportLoop("a.fly".to_string()).severity(),
            Severity::Warning
        );
        assert_eq!(LineError::BadIndentation.severity(), Severity::Error);
    }

    #[test]
    fn test_parse_errors_render_transparently() {
        let err = LineError::from(ParseError::UnknownWeekday("funday".to_string()));
        assert_eq!(err.to_string(), "unknown day \"funday\"");
        assert_eq!(err.severity(), Severity::Error);
    }
}
