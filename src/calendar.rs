use crate::settings::{Holiday, ProjectSettings};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

/// Upper bound on day-by-day calendar walks (roughly 13 years).
///
/// A calendar where no day is ever a working day would otherwise loop
/// forever. Walks that hit the cap return the last date reached; that date
/// is best effort, not a correct answer.
pub const MAX_CALENDAR_WALK: u32 = 5000;

/// Working-day view over a [`ProjectSettings`].
///
/// Built once per computation so make-up day lookups are O(1).
#[derive(Debug, Clone)]
pub struct WorkCalendar<'a> {
    settings: &'a ProjectSettings,
    make_up_days: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
}

impl<'a> WorkCalendar<'a> {
    pub fn new(settings: &'a ProjectSettings) -> Self {
        let non_working_days = if settings.include_weekends {
            HashSet::new()
        } else {
            HashSet::from([Weekday::Sat, Weekday::Sun])
        };

        Self {
            settings,
            make_up_days: settings.make_up_days.iter().copied().collect(),
            non_working_days,
        }
    }

    pub fn settings(&self) -> &'a ProjectSettings {
        self.settings
    }

    pub fn is_trivial(&self) -> bool {
        self.settings.is_trivial()
    }

    /// Check if a date counts as a working day.
    ///
    /// A make-up day always works; otherwise a holiday never works; otherwise
    /// the weekday rule decides.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        if self.make_up_days.contains(&date) {
            return true;
        }
        if self.holiday_containing(date).is_some() {
            return false;
        }
        !self.non_working_days.contains(&date.weekday())
    }

    pub fn holiday_containing(&self, date: NaiveDate) -> Option<&'a Holiday> {
        holiday_containing(date, &self.settings.holidays)
    }

    /// First working day on or after `from`.
    pub fn next_working_day(&self, from: NaiveDate) -> NaiveDate {
        let mut current = from;
        for _ in 0..MAX_CALENDAR_WALK {
            if self.is_working_day(current) {
                return current;
            }
            match current.succ_opt() {
                Some(next) => current = next,
                None => return current,
            }
        }
        tracing::warn!(%from, cap = MAX_CALENDAR_WALK, "no working day found within walk cap");
        current
    }

    /// Get all working days in a date range (inclusive)
    pub fn working_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| self.is_working_day(*day))
            .collect()
    }
}

/// Whether `date` is a working day under `settings`.
pub fn is_working_day(date: NaiveDate, settings: &ProjectSettings) -> bool {
    WorkCalendar::new(settings).is_working_day(date)
}

/// First holiday (in list order) whose closed range contains `date`.
pub fn holiday_containing(date: NaiveDate, holidays: &[Holiday]) -> Option<&Holiday> {
    holidays.iter().find(|holiday| holiday.contains(date))
}
