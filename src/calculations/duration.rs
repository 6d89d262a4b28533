use crate::calendar::{MAX_CALENDAR_WALK, WorkCalendar};
use crate::settings::ProjectSettings;
use crate::task::Task;
use chrono::{Duration, NaiveDate};
use rayon::prelude::*;

impl WorkCalendar<'_> {
    /// Count working days between `start` and `end`, both inclusive.
    ///
    /// Returns 0 when `end` precedes `start`.
    pub fn project_duration(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        if end < start {
            return 0;
        }
        if self.is_trivial() {
            return (end - start).num_days() + 1;
        }

        let mut count = 0;
        let mut current = start;
        while current <= end {
            if self.is_working_day(current) {
                count += 1;
            }
            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }
        count
    }

    /// End date of a task starting on `start` that spans `duration_days`
    /// working days.
    ///
    /// A non-working `start` is first moved forward to the next working day.
    /// Non-positive durations return `start` unchanged. The walk stops after
    /// [`MAX_CALENDAR_WALK`] days and returns the last date reached.
    pub fn project_date_add(&self, start: NaiveDate, duration_days: i64) -> NaiveDate {
        if duration_days <= 0 {
            return start;
        }
        if self.is_trivial() {
            return Duration::try_days(duration_days - 1)
                .and_then(|offset| start.checked_add_signed(offset))
                .unwrap_or(NaiveDate::MAX);
        }

        let mut current = self.next_working_day(start);
        if !self.is_working_day(current) {
            return current;
        }
        let mut steps = u32::try_from((current - start).num_days()).unwrap_or(MAX_CALENDAR_WALK);

        let mut seen = 1;
        while seen < duration_days {
            if steps >= MAX_CALENDAR_WALK {
                tracing::warn!(%start, duration_days, seen, "date walk hit cap");
                return current;
            }
            match current.succ_opt() {
                Some(next) => current = next,
                None => return current,
            }
            steps += 1;
            if self.is_working_day(current) {
                seen += 1;
            }
        }
        current
    }

    /// New `(start, end)` for a task moved to `new_start`, keeping its
    /// working-day duration.
    pub fn shift(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        new_start: NaiveDate,
    ) -> (NaiveDate, NaiveDate) {
        let duration = self.project_duration(start, end).max(1);
        (new_start, self.project_date_add(new_start, duration))
    }
}

/// Inclusive working-day count between two dates under `settings`.
pub fn project_duration(start: NaiveDate, end: NaiveDate, settings: &ProjectSettings) -> i64 {
    WorkCalendar::new(settings).project_duration(start, end)
}

/// End date for a task of `duration_days` working days starting on `start`.
pub fn project_date_add(
    start: NaiveDate,
    duration_days: i64,
    settings: &ProjectSettings,
) -> NaiveDate {
    WorkCalendar::new(settings).project_date_add(start, duration_days)
}

/// Recompute every task's derived `duration` from its dates.
pub fn refresh_durations(tasks: &mut [Task], settings: &ProjectSettings) {
    let calendar = WorkCalendar::new(settings);
    tasks
        .par_iter_mut()
        .for_each(|task| task.duration = calendar.project_duration(task.start, task.end));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Holiday;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reversed_range_is_zero_on_both_paths() {
        let trivial = ProjectSettings::all_days();
        let weekdays = ProjectSettings::default();
        assert_eq!(project_duration(d(2025, 1, 10), d(2025, 1, 6), &trivial), 0);
        assert_eq!(project_duration(d(2025, 1, 10), d(2025, 1, 6), &weekdays), 0);
    }

    #[test]
    fn date_add_on_weekend_start_moves_to_monday() {
        let settings = ProjectSettings::default();
        // 2025-01-04 is a Saturday
        assert_eq!(project_date_add(d(2025, 1, 4), 1, &settings), d(2025, 1, 6));
        assert_eq!(project_date_add(d(2025, 1, 4), 5, &settings), d(2025, 1, 10));
    }

    #[test]
    fn all_holiday_calendar_terminates() {
        let settings = ProjectSettings::all_days().with_holiday(Holiday::new(
            "forever",
            "Shutdown",
            NaiveDate::MIN,
            NaiveDate::MAX,
        ));
        let start = d(2025, 1, 6);
        let end = project_date_add(start, 3, &settings);
        assert_eq!(end, start + Duration::days(MAX_CALENDAR_WALK as i64));
    }
}
