//! Core of the timeflies work log processor.
//!
//! This crate contains:
//! - Reading: the indentation-sensitive work log format, with imports
//! - The document model: days, work packages, activities and directives
//! - Tidy-up: settling required hours and full-day absences after reading
//! - Aggregation: rolling filtered activity hours up the work package tree
//! - Statistics: weekly/monthly/total balances and day reconciliation

mod aggregate;
pub mod day;
mod diagnostic;
mod error;
pub mod filter;
pub mod package;
mod reader;
mod statistics;
mod tidy;
pub mod time;
mod universe;

pub use aggregate::{SELF_NAME, ValueNode, calc_activity};
pub use day::{Adjustment, AdjustmentKind, Day, Directive, WeeklySchedule};
pub use diagnostic::{Diagnostic, ImportSite, Severity, Sink, plural};
pub use error::{LineError, ParseError};
pub use filter::DayFilter;
pub use package::{PackageId, PackageTree, ROOT_NAME, WorkPackage};
pub use reader::Reader;
pub use statistics::{
    BalanceOptions, BalanceReport, BalanceRow, CheckReport, DayRow, Finding, Scope, Statistics,
    Tally,
};
pub use universe::{Activity, ActivityId, InputFile, Universe};
