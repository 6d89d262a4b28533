use crate::calculations::backward_pass::GapModel;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

const DEFAULT_WORKING_DAY_HOURS: f64 = 8.0;

/// A named, closed interval of non-working days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Holiday {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start,
            end,
        }
    }

    /// Single-day holiday with a generated id and name. Used when upgrading
    /// files that stored holidays as bare date strings.
    pub fn single_day(date: NaiveDate) -> Self {
        Self::new(
            format!("holiday-{date}"),
            format!("Holiday {date}"),
            date,
            date,
        )
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HolidayRecord {
    Interval(Holiday),
    Legacy(NaiveDate),
}

fn deserialize_holidays<'de, D>(deserializer: D) -> Result<Vec<Holiday>, D::Error>
where
    D: Deserializer<'de>,
{
    let records = Vec::<HolidayRecord>::deserialize(deserializer)?;
    let mut upgraded = 0usize;
    let holidays = records
        .into_iter()
        .map(|record| match record {
            HolidayRecord::Interval(holiday) => holiday,
            HolidayRecord::Legacy(date) => {
                upgraded += 1;
                Holiday::single_day(date)
            }
        })
        .collect();
    if upgraded > 0 {
        tracing::info!(upgraded, "upgraded legacy single-date holidays to intervals");
    }
    Ok(holidays)
}

fn default_working_day_hours() -> f64 {
    DEFAULT_WORKING_DAY_HOURS
}

/// Project-wide calendar configuration.
///
/// Classification precedence for a date: make-up day, then holiday, then
/// weekend exclusion. See [`crate::calendar::WorkCalendar::is_working_day`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    /// When true, Saturday and Sunday count as working days.
    #[serde(default)]
    pub include_weekends: bool,
    #[serde(default, deserialize_with = "deserialize_holidays")]
    pub holidays: Vec<Holiday>,
    /// Dates forced to be working days regardless of weekend or holiday status.
    #[serde(default)]
    pub make_up_days: Vec<NaiveDate>,
    /// Nominal hours per working day; only used to convert effort into hours.
    #[serde(default = "default_working_day_hours")]
    pub working_day_hours: f64,
    #[serde(default, skip_serializing_if = "GapModel::is_default")]
    pub critical_path_mode: GapModel,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            include_weekends: false,
            holidays: Vec::new(),
            make_up_days: Vec::new(),
            working_day_hours: DEFAULT_WORKING_DAY_HOURS,
            critical_path_mode: GapModel::default(),
        }
    }
}

impl ProjectSettings {
    /// Every calendar day is a working day: weekends included, no holidays,
    /// no make-up days.
    pub fn all_days() -> Self {
        Self {
            include_weekends: true,
            ..Self::default()
        }
    }

    pub fn with_holiday(mut self, holiday: Holiday) -> Self {
        self.holidays.push(holiday);
        self
    }

    pub fn with_make_up_day(mut self, date: NaiveDate) -> Self {
        self.add_make_up_day(date);
        self
    }

    pub fn with_critical_path_mode(mut self, mode: GapModel) -> Self {
        self.critical_path_mode = mode;
        self
    }

    pub fn add_holiday(&mut self, holiday: Holiday) {
        self.holidays.push(holiday);
    }

    pub fn add_make_up_day(&mut self, date: NaiveDate) {
        if !self.make_up_days.contains(&date) {
            self.make_up_days.push(date);
        }
    }

    /// True when no calendar rule can exclude a day, so date math can skip
    /// the day-by-day walk.
    pub fn is_trivial(&self) -> bool {
        self.include_weekends && self.holidays.is_empty() && self.make_up_days.is_empty()
    }

    pub fn effort_hours(&self, days: f64) -> f64 {
        days * self.working_day_hours
    }
}
