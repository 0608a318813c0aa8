//! Work hour balances and day reconciliation.
//!
//! Both reports are plain data. Rendering them is left to the caller.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::day::{Day, Directive};
use crate::filter::DayFilter;
use crate::time::is_weekend;
use crate::universe::Universe;

/// Must-hours assumed for a weekday without a day record.
const GAP_MUST_HOURS: f64 = 8.0;

/// Running hour totals over some period.
///
/// `balance` sums the balances of the days processed. Must-hours of
/// missing weekdays and `balance-must`/`balance-have` overrides change
/// `must` and `have` but leave it alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Tally {
    pub must: f64,
    pub have: f64,
    pub worked: f64,
    pub balance: f64,
    pub sick: f64,
    pub leave_taken: f64,
    pub leave_balance: f64,
}

impl Tally {
    /// Adds one day's contribution.
    pub fn add_day(&mut self, day: &Day) {
        let leave = day.leave().hours();
        self.must += day.effective_required();
        self.have += day.calc_have();
        self.worked += day.calc_worked();
        self.balance += day.calc_balance();
        self.sick += day.sick().hours();
        self.leave_taken += leave;
        self.leave_balance -= leave;
    }

    /// Counts a missing day record as required time if `date` is a weekday.
    /// Returns whether it was.
    pub fn increase_must_hours(&mut self, date: NaiveDate) -> bool {
        let weekday = !is_weekend(date);
        if weekday {
            self.must += GAP_MUST_HOURS;
        }
        weekday
    }

    /// Applies a directive. `Reset` clears everything.
    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Reset => *self = Self::default(),
            Directive::AddLeaveBalance(hours) => self.leave_balance += hours,
            Directive::SetMustHours(hours) => self.must = hours,
            Directive::SetHaveHours(hours) => self.have = hours,
        }
    }
}

/// The period an accumulator covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Week,
    Month,
    Total,
}

impl Scope {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Total => "total",
        }
    }
}

/// Which rows a balance report includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceOptions {
    pub daily: bool,
    pub weekly: bool,
    pub monthly: bool,
}

impl Default for BalanceOptions {
    fn default() -> Self {
        Self {
            daily: true,
            weekly: true,
            monthly: true,
        }
    }
}

/// One day of a balance report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRow {
    pub date: NaiveDate,
    pub worked: f64,
    pub leave: f64,
    pub sick: f64,
    pub balance: f64,
    /// Public holiday, leave, sick and off notes, in that order.
    pub notes: Vec<String>,
    /// Free-form `;` comments of the day.
    pub comments: Vec<String>,
}

impl DayRow {
    fn new(day: &Day) -> Self {
        let notes = [
            day.public_holiday(),
            day.leave().comment(),
            day.sick().comment(),
            day.off().comment(),
        ];
        Self {
            date: day.date(),
            worked: day.calc_worked(),
            leave: day.leave().hours(),
            sick: day.sick().hours(),
            balance: day.calc_balance(),
            notes: notes.into_iter().flatten().map(str::to_string).collect(),
            comments: day.comments().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BalanceRow {
    /// A weekday passing the filter with no day record, between two days
    /// that have one.
    MissingWeekday { date: NaiveDate },
    Day(DayRow),
    /// Accumulated totals. The label is the ISO week (`2012-27`), the month
    /// (`2012-07`) or `reset`, and absent for the grand total.
    Period {
        scope: Scope,
        label: Option<String>,
        tally: Tally,
    },
}

/// Rows of a balance report in chronological order, grand total last.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub filter: DayFilter,
    pub rows: Vec<BalanceRow>,
}

impl BalanceReport {
    /// The grand total row.
    pub fn total(&self) -> Option<&Tally> {
        self.rows.iter().rev().find_map(|row| match row {
            BalanceRow::Period {
                scope: Scope::Total,
                label: None,
                tally,
            } => Some(tally),
            _ => None,
        })
    }
}

/// A running tally that reports itself when reset.
#[derive(Debug)]
struct Accumulator {
    scope: Scope,
    enabled: bool,
    tally: Tally,
}

impl Accumulator {
    fn new(scope: Scope, enabled: bool) -> Self {
        Self {
            scope,
            enabled,
            tally: Tally::default(),
        }
    }

    fn process_day(&mut self, day: &Day, rows: &mut Vec<BalanceRow>) {
        for &directive in day.directives() {
            if directive == Directive::Reset {
                self.flush(Some("reset"), rows);
            } else {
                self.tally.apply(directive);
            }
        }
        self.tally.add_day(day);
    }

    /// Emits the tally if enabled, then clears it.
    fn flush(&mut self, label: Option<&str>, rows: &mut Vec<BalanceRow>) {
        if self.enabled {
            rows.push(BalanceRow::Period {
                scope: self.scope,
                label: label.map(str::to_string),
                tally: self.tally,
            });
        }
        self.tally.apply(Directive::Reset);
    }
}

/// Something off about a single day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Time at work differs from the time booked on activities.
    Unbalanced {
        date: NaiveDate,
        worked: f64,
        booked: f64,
        /// Booked minus worked.
        delta: f64,
    },
    ExcessSick {
        date: NaiveDate,
        sick: f64,
        required: f64,
    },
    ExcessLeave {
        date: NaiveDate,
        leave: f64,
        required: f64,
    },
    /// Sick and leave time together exceed the required time, though
    /// neither does on its own.
    ExcessLeaveAndSick {
        date: NaiveDate,
        total: f64,
        required: f64,
    },
}

impl Finding {
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Unbalanced { date, .. }
            | Self::ExcessSick { date, .. }
            | Self::ExcessLeave { date, .. }
            | Self::ExcessLeaveAndSick { date, .. } => *date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub filter: DayFilter,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn problems(&self) -> usize {
        self.findings.len()
    }

    pub fn is_ok(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Reports over the days of a tidied-up universe.
pub struct Statistics<'a> {
    universe: &'a Universe,
}

impl<'a> Statistics<'a> {
    pub const fn new(universe: &'a Universe) -> Self {
        Self { universe }
    }

    /// Chronological work hour balance of the days passing `filter`.
    ///
    /// Weekly and monthly totals are emitted whenever the ISO week or the
    /// month changes between two reported days, and once more at the end.
    /// Weekdays missing between two reported days count as
    /// [`GAP_MUST_HOURS`] required hours towards the grand total only,
    /// without changing its balance.
    pub fn calc_balance(&self, filter: &DayFilter, options: BalanceOptions) -> BalanceReport {
        let mut rows = Vec::new();
        let mut weekly = Accumulator::new(Scope::Week, options.weekly);
        let mut monthly = Accumulator::new(Scope::Month, options.monthly);
        let mut total = Accumulator::new(Scope::Total, true);
        let mut previous: Option<(NaiveDate, String, String)> = None;

        for day in self.universe.days().filter(|day| filter.passes(day.date())) {
            let date = day.date();
            let week = week_label(date);
            let month = month_label(date);

            if let Some((last, last_week, last_month)) = &previous {
                for gap in last.iter_days().skip(1).take_while(|gap| *gap < date) {
                    if filter.passes(gap) && total.tally.increase_must_hours(gap) {
                        rows.push(BalanceRow::MissingWeekday { date: gap });
                    }
                }
                if *last_week != week {
                    weekly.flush(Some(last_week.as_str()), &mut rows);
                }
                if *last_month != month {
                    monthly.flush(Some(last_month.as_str()), &mut rows);
                }
            }

            weekly.process_day(day, &mut rows);
            monthly.process_day(day, &mut rows);
            total.process_day(day, &mut rows);

            if options.daily && (day.calc_have() > 0.0 || day.is_workday()) {
                rows.push(BalanceRow::Day(DayRow::new(day)));
            }
            previous = Some((date, week, month));
        }

        let (last_week, last_month) = previous
            .map(|(_, week, month)| (Some(week), Some(month)))
            .unwrap_or_default();
        weekly.flush(last_week.as_deref(), &mut rows);
        monthly.flush(last_month.as_deref(), &mut rows);
        total.flush(None, &mut rows);

        tracing::debug!(%filter, rows = rows.len(), "calculated balance");
        BalanceReport {
            filter: *filter,
            rows,
        }
    }

    /// Compares time at work with booked time, and absences with required
    /// time, for each day passing `filter`.
    pub fn check_days(&self, filter: &DayFilter) -> CheckReport {
        let mut findings = Vec::new();

        for day in self.universe.days().filter(|day| filter.passes(day.date())) {
            let date = day.date();
            let worked = day.calc_worked();
            let booked = self.universe.booked_hours(day);
            let delta = booked - worked;
            if delta != 0.0 {
                findings.push(Finding::Unbalanced {
                    date,
                    worked,
                    booked,
                    delta,
                });
            }

            let required = day.required();
            let sick = day.sick().hours();
            let leave = day.leave().hours();
            let more_sick = sick > required;
            let more_leave = leave > required;

            if more_sick {
                findings.push(Finding::ExcessSick {
                    date,
                    sick,
                    required,
                });
            }
            if more_leave {
                findings.push(Finding::ExcessLeave {
                    date,
                    leave,
                    required,
                });
            }
            if !more_sick && !more_leave && sick + leave > required {
                findings.push(Finding::ExcessLeaveAndSick {
                    date,
                    total: sick + leave,
                    required,
                });
            }
        }

        tracing::debug!(%filter, problems = findings.len(), "checked days");
        CheckReport {
            filter: *filter,
            findings,
        }
    }
}

/// ISO week label, `YYYY-WW`.
fn week_label(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-{:02}", week.year(), week.week())
}

/// Calendar month label, `YYYY-MM`.
fn month_label(date: NaiveDate) -> String {
    format!("{}-{:02}", date.year(), date.month())
}
