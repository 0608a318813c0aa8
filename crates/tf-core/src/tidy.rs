//! Post-read normalization of a universe.

use crate::day::{Adjustment, WeeklySchedule};
use crate::universe::Universe;

impl Universe {
    /// Settles derived day data once all files are read.
    ///
    /// Walking days in date order, each day requires the hours of the most
    /// recent schedule: the global one (eight hours Monday to Friday if none
    /// was declared) until a day carries its own, which then holds for the
    /// days after it as well. Public holidays drop any leave or sick time,
    /// and full-day leave or sick time becomes the day's required hours.
    /// Activity lists end up sorted by date.
    ///
    /// Running it again is harmless.
    pub fn tidy_up(&mut self) {
        self.set_current_day(None);

        let mut schedule = *self.must_hours.get_or_insert_with(WeeklySchedule::default);
        let mut holidays = 0_usize;

        for day in self.days_mut() {
            if let Some(own) = day.must_hours {
                schedule = own;
            }
            day.required = schedule.hours_on(day.date());

            if day.public_holiday().is_some() {
                day.leave = Adjustment::default();
                day.sick = Adjustment::default();
                holidays += 1;
            }

            let required = day.required;
            day.leave.resolve(required);
            day.sick.resolve(required);
        }

        self.sort_activities();
        tracing::debug!(days = self.days().count(), holidays, "tidied up universe");
    }

    fn sort_activities(&mut self) {
        let dates: Vec<_> = self.activity_list().iter().map(|a| a.date()).collect();

        for day in self.days_mut() {
            day.activities.sort_by_key(|id| dates[id.index()]);
        }
        for package in self.packages_mut().nodes_mut() {
            package.activities.sort_by_key(|id| dates[id.index()]);
        }
    }
}
