use chrono::NaiveDate;
use schedule_engine::{Holiday, ProjectSettings, WorkCalendar, holiday_containing, is_working_day};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn default_calendar_weekends_unavailable() {
    let settings = ProjectSettings::default();
    // 2025-01-04 is a Saturday, 2025-01-05 is a Sunday
    assert!(!is_working_day(d(2025, 1, 4), &settings));
    assert!(!is_working_day(d(2025, 1, 5), &settings));
    assert!(is_working_day(d(2025, 1, 6), &settings));
}

#[test]
fn include_weekends_makes_saturday_working() {
    let settings = ProjectSettings::all_days();
    assert!(is_working_day(d(2025, 1, 4), &settings));
    assert!(is_working_day(d(2025, 1, 5), &settings));
}

#[test]
fn make_up_day_overrides_holiday_and_weekend() {
    let settings = ProjectSettings::default()
        .with_holiday(Holiday::new("cny", "Spring Festival", d(2025, 1, 28), d(2025, 2, 4)))
        // Wednesday inside the holiday, and a Sunday before it
        .with_make_up_day(d(2025, 1, 29))
        .with_make_up_day(d(2025, 1, 26));
    let cal = WorkCalendar::new(&settings);

    assert!(cal.is_working_day(d(2025, 1, 29)));
    assert!(cal.is_working_day(d(2025, 1, 26)));
    assert!(!cal.is_working_day(d(2025, 1, 28)));
    assert!(!cal.is_working_day(d(2025, 1, 30)));
}

#[test]
fn weekend_inside_holiday_stays_non_working() {
    let holiday = Holiday::new("h", "Break", d(2025, 1, 3), d(2025, 1, 6));
    let weekdays = ProjectSettings::default().with_holiday(holiday.clone());
    let all_days = ProjectSettings::all_days().with_holiday(holiday);

    // Saturday inside a holiday is off either way
    assert!(!is_working_day(d(2025, 1, 4), &weekdays));
    assert!(!is_working_day(d(2025, 1, 4), &all_days));
    // Holiday edges are inclusive
    assert!(!is_working_day(d(2025, 1, 3), &all_days));
    assert!(!is_working_day(d(2025, 1, 6), &all_days));
    assert!(is_working_day(d(2025, 1, 7), &all_days));
}

#[test]
fn overlapping_holidays_return_first_match() {
    let holidays = vec![
        Holiday::new("a", "First", d(2025, 5, 1), d(2025, 5, 5)),
        Holiday::new("b", "Second", d(2025, 5, 3), d(2025, 5, 7)),
    ];
    assert_eq!(holiday_containing(d(2025, 5, 4), &holidays).unwrap().id, "a");
    assert_eq!(holiday_containing(d(2025, 5, 6), &holidays).unwrap().id, "b");
    assert!(holiday_containing(d(2025, 5, 8), &holidays).is_none());
}

#[test]
fn predicate_is_total_over_far_dates() {
    let settings = ProjectSettings::default();
    let cal = WorkCalendar::new(&settings);
    // Neither extreme panics
    let _ = cal.is_working_day(NaiveDate::MIN);
    let _ = cal.is_working_day(NaiveDate::MAX);
}

#[test]
fn next_working_day_skips_weekend_and_holiday() {
    let settings = ProjectSettings::default().with_holiday(Holiday::single_day(d(2025, 1, 6)));
    let cal = WorkCalendar::new(&settings);
    // Saturday -> Sunday -> Monday holiday -> Tuesday
    assert_eq!(cal.next_working_day(d(2025, 1, 4)), d(2025, 1, 7));
    // Already a working day
    assert_eq!(cal.next_working_day(d(2025, 1, 8)), d(2025, 1, 8));
}

#[test]
fn working_days_in_range_lists_only_working_dates() {
    let settings = ProjectSettings::default().with_make_up_day(d(2025, 1, 11));
    let cal = WorkCalendar::new(&settings);
    let days = cal.working_days_in_range(d(2025, 1, 9), d(2025, 1, 13));
    assert_eq!(
        days,
        vec![d(2025, 1, 9), d(2025, 1, 10), d(2025, 1, 11), d(2025, 1, 13)]
    );
    assert!(cal.working_days_in_range(d(2025, 1, 13), d(2025, 1, 9)).is_empty());
}
