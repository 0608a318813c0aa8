//! Day records: working hours, absences, schedule overrides and directives.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::time::is_weekend;
use crate::universe::ActivityId;

/// Hours required per weekday, Monday first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklySchedule([f64; 7]);

impl WeeklySchedule {
    /// A schedule requiring no hours on any day.
    pub const fn empty() -> Self {
        Self([0.0; 7])
    }

    /// Sets the required hours for one weekday.
    pub fn set(&mut self, weekday: Weekday, hours: f64) {
        self.0[weekday.num_days_from_monday() as usize] = hours;
    }

    /// Required hours for the given weekday.
    pub fn hours(&self, weekday: Weekday) -> f64 {
        self.0[weekday.num_days_from_monday() as usize]
    }

    /// Required hours for the weekday `date` falls on.
    pub fn hours_on(&self, date: NaiveDate) -> f64 {
        self.hours(date.weekday())
    }
}

/// Eight hours Monday to Friday, nothing on weekends.
impl Default for WeeklySchedule {
    fn default() -> Self {
        Self([8.0, 8.0, 8.0, 8.0, 8.0, 0.0, 0.0])
    }
}

/// Which of a day's hour adjustments an instruction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentKind {
    Off,
    Sick,
    Leave,
}

/// Hours taken off, sick or on leave, with an optional note.
///
/// A full-day adjustment has no hours of its own until tidy-up resolves it
/// to the day's required hours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adjustment {
    hours: f64,
    full_day: bool,
    comment: Option<String>,
}

impl Adjustment {
    pub const fn hours(&self) -> f64 {
        self.hours
    }

    pub const fn is_full_day(&self) -> bool {
        self.full_day
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Adds hours, dropping any full-day marker. Comments accumulate.
    pub fn add(&mut self, hours: f64, comment: Option<&str>) {
        if self.full_day {
            self.full_day = false;
            self.hours = 0.0;
        }
        self.hours += hours;

        if let Some(comment) = comment {
            self.comment = Some(match self.comment.take() {
                Some(existing) => format!("{existing}; {comment}"),
                None => comment.to_string(),
            });
        }
    }

    /// Marks the whole day. A new comment replaces the old one.
    pub fn set_full_day(&mut self, comment: Option<&str>) {
        self.full_day = true;
        self.hours = 0.0;
        if let Some(comment) = comment {
            self.comment = Some(comment.to_string());
        }
    }

    pub(crate) const fn resolve(&mut self, required: f64) {
        if self.full_day {
            self.hours = required;
        }
    }
}

/// An accumulator instruction attached to a day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive {
    /// Report and clear the running accumulators.
    Reset,
    /// Add hours to the leave balance.
    AddLeaveBalance(f64),
    /// Overwrite the running must-hours.
    SetMustHours(f64),
    /// Overwrite the running have-hours.
    SetHaveHours(f64),
}

/// Everything recorded for one calendar date.
#[derive(Debug, Clone)]
pub struct Day {
    date: NaiveDate,
    start: Option<f64>,
    stop: Option<f64>,
    pub(crate) off: Adjustment,
    pub(crate) sick: Adjustment,
    pub(crate) leave: Adjustment,
    pub(crate) required: f64,
    pub(crate) must_hours: Option<WeeklySchedule>,
    public_holiday: Option<String>,
    comments: Vec<String>,
    pub(crate) activities: Vec<ActivityId>,
    directives: Vec<Directive>,
}

impl Day {
    /// Creates an empty day. Required hours start from the default
    /// schedule and are settled by tidy-up.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            start: None,
            stop: None,
            off: Adjustment::default(),
            sick: Adjustment::default(),
            leave: Adjustment::default(),
            required: if is_weekend(date) { 0.0 } else { 8.0 },
            must_hours: None,
            public_holiday: None,
            comments: Vec::new(),
            activities: Vec::new(),
            directives: Vec::new(),
        }
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Sets start and stop clock times.
    ///
    /// Returns false, leaving the day untouched, if either was already set.
    pub const fn set_hours(&mut self, start: f64, stop: f64) -> bool {
        if self.start.is_some() || self.stop.is_some() {
            return false;
        }
        self.start = Some(start);
        self.stop = Some(stop);
        true
    }

    pub const fn start(&self) -> Option<f64> {
        self.start
    }

    pub const fn stop(&self) -> Option<f64> {
        self.stop
    }

    pub const fn off(&self) -> &Adjustment {
        &self.off
    }

    pub const fn sick(&self) -> &Adjustment {
        &self.sick
    }

    pub const fn leave(&self) -> &Adjustment {
        &self.leave
    }

    pub const fn adjustment_mut(&mut self, kind: AdjustmentKind) -> &mut Adjustment {
        match kind {
            AdjustmentKind::Off => &mut self.off,
            AdjustmentKind::Sick => &mut self.sick,
            AdjustmentKind::Leave => &mut self.leave,
        }
    }

    pub fn add_off(&mut self, hours: f64, comment: Option<&str>) {
        self.off.add(hours, comment);
    }

    pub fn add_sick(&mut self, hours: f64, comment: Option<&str>) {
        self.sick.add(hours, comment);
    }

    pub fn add_leave(&mut self, hours: f64, comment: Option<&str>) {
        self.leave.add(hours, comment);
    }

    /// Required hours from the weekly schedule. Only meaningful after tidy-up.
    pub const fn required(&self) -> f64 {
        self.required
    }

    /// Required hours, or zero on a public holiday.
    pub const fn effective_required(&self) -> f64 {
        if self.public_holiday.is_some() {
            0.0
        } else {
            self.required
        }
    }

    /// A day-level schedule override set with `must-hours`.
    pub const fn must_hours(&self) -> Option<&WeeklySchedule> {
        self.must_hours.as_ref()
    }

    pub fn set_public_holiday(&mut self, comment: Option<&str>) {
        self.public_holiday = Some(comment.unwrap_or("public holiday").to_string());
    }

    pub fn public_holiday(&self) -> Option<&str> {
        self.public_holiday.as_deref()
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn add_directive(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn activity_ids(&self) -> &[ActivityId] {
        &self.activities
    }

    /// Time at work: stop minus start, less time off.
    pub fn calc_worked(&self) -> f64 {
        let at_work = match (self.start, self.stop) {
            (Some(start), Some(stop)) => stop - start,
            _ => 0.0,
        };
        at_work - self.off.hours
    }

    /// Worked hours plus sick and leave hours.
    pub fn calc_have(&self) -> f64 {
        self.calc_worked() + self.sick.hours + self.leave.hours
    }

    pub fn calc_balance(&self) -> f64 {
        self.calc_have() - self.effective_required()
    }

    pub fn is_workday(&self) -> bool {
        self.required != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> Day {
        Day::new(s.parse().unwrap())
    }

    #[test]
    fn test_create_day() {
        let d = day("2012-08-05");
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2012, 8, 5).unwrap());
    }

    #[test]
    fn test_simple_have() {
        let mut d = day("2012-08-05");
        assert_eq!(d.calc_have(), 0.0);
        assert!(d.set_hours(8.0, 17.0));
        assert_eq!(d.calc_have(), 9.0);
        d.add_off(1.0, None);
        assert_eq!(d.calc_have(), 8.0);
    }

    #[test]
    fn test_hours_are_set_once() {
        let mut d = day("2012-08-06");
        assert!(d.set_hours(8.0, 17.0));
        assert!(!d.set_hours(9.0, 18.0));
        assert_eq!(d.start(), Some(8.0));
        assert_eq!(d.stop(), Some(17.0));
    }

    #[test]
    fn test_default_required_follows_weekday() {
        assert_eq!(day("2012-08-04").required(), 0.0); // Saturday
        assert_eq!(day("2012-08-06").required(), 8.0); // Monday
    }

    #[test]
    fn test_adjustment_add_accumulates_comments() {
        let mut d = day("2012-08-06");
        d.add_leave(2.0, Some("dentist"));
        d.add_leave(1.5, Some("bank"));
        assert_eq!(d.leave().hours(), 3.5);
        assert_eq!(d.leave().comment(), Some("dentist; bank"));
    }

    #[test]
    fn test_full_day_overrides_and_add_clears_it() {
        let mut adj = Adjustment::default();
        adj.add(2.0, Some("morning"));
        adj.set_full_day(None);
        assert!(adj.is_full_day());
        assert_eq!(adj.hours(), 0.0);
        assert_eq!(adj.comment(), Some("morning"));

        adj.resolve(8.0);
        assert_eq!(adj.hours(), 8.0);

        adj.add(1.0, None);
        assert!(!adj.is_full_day());
        assert_eq!(adj.hours(), 1.0);
    }

    #[test]
    fn test_public_holiday_zeroes_required() {
        let mut d = day("2012-08-06");
        d.set_public_holiday(None);
        assert_eq!(d.public_holiday(), Some("public holiday"));
        assert_eq!(d.effective_required(), 0.0);
        assert_eq!(d.calc_balance(), 0.0);
    }

    #[test]
    fn test_weekly_schedule_default() {
        let schedule = WeeklySchedule::default();
        assert_eq!(schedule.hours(Weekday::Fri), 8.0);
        assert_eq!(schedule.hours(Weekday::Sat), 0.0);
    }
}
