// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Symbolic time ranges and their resolution into concrete windows.

use crate::{
    date::{self, DayKey},
    error::{Error, Result},
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, str::FromStr};

/// A range selector as shown in the analytics filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    OneWeek,
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    YearToDate,
}

impl TimeRange {
    pub const ALL: [TimeRange; 6] = [
        TimeRange::OneWeek,
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
        TimeRange::YearToDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::OneWeek => "1W",
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::SixMonths => "6M",
            TimeRange::OneYear => "1Y",
            TimeRange::YearToDate => "YTD",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        TimeRange::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidTimeRange(s.to_string()))
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TimeRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A concrete window: `start` is local midnight (inclusive), `end` is "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRangeWindow<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> TimeRangeWindow<Tz> {
    pub fn start_day(&self) -> DayKey {
        DayKey::new(self.start.date_naive())
    }

    pub fn end_day(&self) -> DayKey {
        DayKey::new(self.end.date_naive())
    }

    /// Number of calendar days covered, both endpoints included.
    pub fn num_days(&self) -> usize {
        let span = (self.end.date_naive() - self.start.date_naive()).num_days();
        usize::try_from(span + 1).unwrap_or(0)
    }
}

/// Resolve `range` against the instant `now`.
///
/// `1W` is a fixed window of today plus the six days before it. Month and year
/// ranges use calendar arithmetic on the same day-of-month; a day that does not
/// exist in the target month rolls forward into the next one (Mar 31 minus one
/// month is Mar 3, or Mar 2 in a leap year).
pub fn resolve<Tz: TimeZone>(range: TimeRange, now: &DateTime<Tz>) -> TimeRangeWindow<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();

    let start_date = match range {
        TimeRange::OneWeek => today - Duration::days(6),
        TimeRange::OneMonth => shift_months_back(today, 1),
        TimeRange::ThreeMonths => shift_months_back(today, 3),
        TimeRange::SixMonths => shift_months_back(today, 6),
        TimeRange::OneYear => shift_months_back(today, 12),
        TimeRange::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
    };

    TimeRangeWindow {
        start: date::local_midnight(start_date, &tz),
        end: now.clone(),
    }
}

/// Subtract whole months keeping the day-of-month, overflowing into the following
/// month when the target month is too short.
fn shift_months_back(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 - months;
    let (year, month0) = (total.div_euclid(12), total.rem_euclid(12) as u32);

    // Only fails outside chrono's representable years.
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .map(|first| first + Duration::days(i64::from(date.day()) - 1))
        .unwrap_or(date)
}
