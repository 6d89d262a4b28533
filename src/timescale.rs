//! Date to offset projection for timeline renderers.
//!
//! Offsets are expressed in caller units (`unit_size` per scale unit, e.g.
//! pixels per day or per month). Every projection is monotone: a later date
//! never maps to a smaller offset.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest span ever returned by [`span_of`], so zero-length or sub-unit
/// bars stay visible and clickable.
pub const MIN_SPAN: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeScale {
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
}

impl TimeScale {
    pub const ALL: [TimeScale; 6] = [
        TimeScale::Day,
        TimeScale::Week,
        TimeScale::Month,
        TimeScale::Quarter,
        TimeScale::HalfYear,
        TimeScale::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeScale::Day => "day",
            TimeScale::Week => "week",
            TimeScale::Month => "month",
            TimeScale::Quarter => "quarter",
            TimeScale::HalfYear => "halfyear",
            TimeScale::Year => "year",
        }
    }

    fn rank(self) -> usize {
        Self::ALL.iter().position(|scale| *scale == self).unwrap_or(0)
    }

    /// Next finer scale; `Day` stays `Day`.
    pub fn zoom_in(self) -> Self {
        Self::ALL[self.rank().saturating_sub(1)]
    }

    /// Next coarser scale; `Year` stays `Year`.
    pub fn zoom_out(self) -> Self {
        Self::ALL[(self.rank() + 1).min(Self::ALL.len() - 1)]
    }

    /// Scale units from `reference` to `date`; negative before the reference.
    pub fn units_between(self, reference: NaiveDate, date: NaiveDate) -> f64 {
        match self {
            TimeScale::Day => (date - reference).num_days() as f64,
            TimeScale::Week => (date - reference).num_days() as f64 / 7.0,
            // Quarter and half-year only change label density.
            TimeScale::Month | TimeScale::Quarter | TimeScale::HalfYear => {
                month_index(date) - month_index(reference)
            }
            TimeScale::Year => year_index(date) - year_index(reference),
        }
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeScale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|scale| scale.as_str() == normalized)
            .ok_or_else(|| format!("unknown time scale '{value}'"))
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map_or(31, |last| last.day())
}

/// Months since year 0 plus the fraction of the month already elapsed.
fn month_index(date: NaiveDate) -> f64 {
    let whole = f64::from(date.year()) * 12.0 + f64::from(date.month0());
    whole + f64::from(date.day0()) / f64::from(days_in_month(date))
}

/// Years plus day-of-year fraction, approximated over 365 days.
fn year_index(date: NaiveDate) -> f64 {
    f64::from(date.year()) + f64::from(date.ordinal0()) / 365.0
}

/// Offset of `date` from `reference` at the given scale.
pub fn position_of(date: NaiveDate, reference: NaiveDate, scale: TimeScale, unit_size: f64) -> f64 {
    scale.units_between(reference, date) * unit_size
}

/// Length of a bar covering `start..=end`, never smaller than [`MIN_SPAN`].
pub fn span_of(start: NaiveDate, end: NaiveDate, scale: TimeScale, unit_size: f64) -> f64 {
    let end_exclusive = end.succ_opt().unwrap_or(end);
    let width = scale.units_between(start, end_exclusive) * unit_size;
    width.max(MIN_SPAN)
}
