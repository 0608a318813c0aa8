//! The in-memory document built from all input files of one run.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::day::{Day, WeeklySchedule};
use crate::diagnostic::Severity;
use crate::package::{PackageId, PackageTree};

/// Stable index of an activity within its universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivityId(usize);

impl ActivityId {
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// Time logged against one work package on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    /// Hours, never negative.
    pub duration: f64,
    pub description: Option<String>,
    date: NaiveDate,
    #[serde(skip)]
    package: PackageId,
}

impl Activity {
    /// Date of the day this activity was logged on.
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Work package this activity was booked against.
    pub const fn package(&self) -> PackageId {
        self.package
    }
}

/// A processed input file and how deeply it was imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputFile {
    pub path: String,
    pub depth: usize,
}

/// Days, work packages and activities of one run, plus reader bookkeeping.
#[derive(Debug, Default)]
pub struct Universe {
    days: BTreeMap<NaiveDate, Day>,
    packages: PackageTree,
    activities: Vec<Activity>,
    pub(crate) must_hours: Option<WeeklySchedule>,
    current_day: Option<NaiveDate>,
    seen_files: HashSet<PathBuf>,
    input_files: Vec<InputFile>,
    errors: usize,
    warnings: usize,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Days in chronological order.
    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.days.values()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        self.days.get(&date)
    }

    pub(crate) fn days_mut(&mut self) -> impl Iterator<Item = &mut Day> {
        self.days.values_mut()
    }

    /// Selects the day for `date` as current, creating it if needed.
    pub fn select_day(&mut self, date: NaiveDate) -> &mut Day {
        self.current_day = Some(date);
        self.days.entry(date).or_insert_with(|| Day::new(date))
    }

    pub const fn current_day(&self) -> Option<NaiveDate> {
        self.current_day
    }

    pub fn current_day_mut(&mut self) -> Option<&mut Day> {
        let date = self.current_day?;
        self.days.get_mut(&date)
    }

    pub(crate) const fn set_current_day(&mut self, date: Option<NaiveDate>) {
        self.current_day = date;
    }

    pub const fn packages(&self) -> &PackageTree {
        &self.packages
    }

    pub const fn packages_mut(&mut self) -> &mut PackageTree {
        &mut self.packages
    }

    /// Looks up a work package by its dot-separated path from the root.
    pub fn work_package(&self, path: &str) -> Option<PackageId> {
        self.packages.find(self.packages.root(), path)
    }

    pub fn activity(&self, id: ActivityId) -> &Activity {
        &self.activities[id.0]
    }

    /// Resolves a list of activity ids.
    pub fn activities<'a>(&'a self, ids: &'a [ActivityId]) -> impl Iterator<Item = &'a Activity> {
        ids.iter().map(|&id| self.activity(id))
    }

    pub(crate) fn activity_list(&self) -> &[Activity] {
        &self.activities
    }

    /// Books an activity against a package on the day for `date`.
    ///
    /// The day is created if it does not exist yet.
    pub fn add_activity(
        &mut self,
        date: NaiveDate,
        package: PackageId,
        duration: f64,
        description: Option<String>,
    ) -> ActivityId {
        let id = ActivityId(self.activities.len());
        self.activities.push(Activity {
            duration,
            description,
            date,
            package,
        });
        self.days
            .entry(date)
            .or_insert_with(|| Day::new(date))
            .activities
            .push(id);
        self.packages.get_mut(package).activities.push(id);
        id
    }

    /// Hours booked to activities on `day`.
    pub fn booked_hours(&self, day: &Day) -> f64 {
        self.activities(day.activity_ids())
            .fold(0.0, |total, activity| total + activity.duration)
    }

    /// The global weekly must-hours schedule, if one was declared.
    pub const fn must_hours(&self) -> Option<&WeeklySchedule> {
        self.must_hours.as_ref()
    }

    pub const fn set_must_hours(&mut self, schedule: WeeklySchedule) {
        self.must_hours = Some(schedule);
    }

    /// Records an absolute input path. Returns true if it was seen before.
    pub fn remember(&mut self, path: PathBuf) -> bool {
        !self.seen_files.insert(path)
    }

    pub fn add_input_file(&mut self, path: impl Into<String>, depth: usize) {
        self.input_files.push(InputFile {
            path: path.into(),
            depth,
        });
    }

    /// Processed input files in reading order.
    pub fn input_files(&self) -> &[InputFile] {
        &self.input_files
    }

    pub(crate) const fn count(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
        }
    }

    pub const fn errors(&self) -> usize {
        self.errors
    }

    pub const fn warnings(&self) -> usize {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_days_are_chronological() {
        let mut universe = Universe::new();
        for d in ["2012-07-20", "2012-07-02", "2012-07-11"] {
            universe.select_day(date(d));
        }
        let dates: Vec<_> = universe.days().map(Day::date).collect();
        assert_eq!(
            dates,
            [date("2012-07-02"), date("2012-07-11"), date("2012-07-20")]
        );
        assert_eq!(universe.current_day(), Some(date("2012-07-11")));
    }

    #[test]
    fn test_add_activity_links_day_and_package() {
        let mut universe = Universe::new();
        let root = universe.packages().root();
        let wp = universe.packages_mut().find_or_create(root, "project.sub1");
        let id = universe.add_activity(date("2012-07-14"), wp, 2.5, Some("review".into()));

        let day = universe.day(date("2012-07-14")).unwrap();
        assert_eq!(day.activity_ids(), &[id]);
        assert_eq!(universe.packages().get(wp).activity_ids(), &[id]);
        assert_eq!(universe.activity(id).date(), date("2012-07-14"));
        assert_eq!(universe.activity(id).package(), wp);
        assert_eq!(universe.booked_hours(day), 2.5);
    }

    #[test]
    fn test_remember_reports_second_sighting() {
        let mut universe = Universe::new();
        assert!(!universe.remember(PathBuf::from("/tmp/a.fly")));
        assert!(universe.remember(PathBuf::from("/tmp/a.fly")));
        assert!(!universe.remember(PathBuf::from("/tmp/b.fly")));
    }
}
