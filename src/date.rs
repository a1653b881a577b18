// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar day keys in the viewer's local time zone.
//!
//! Every grouping in the engine goes through [`to_local_day_key`]: a drink logged at
//! 23:30 local time belongs to that local day even when UTC has already rolled over.

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, str::FromStr};

/// A local calendar day, rendered as `YYYY-MM-DD`.
///
/// Ordering matches both chronological and lexicographic order of the rendered key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Short human label used on single-day chart buckets, e.g. `Mar 4`.
    pub fn short_label(self) -> String {
        self.0.format("%b %-d").to_string()
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for DayKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidDayKey(s.to_string());

        let mut parts = s.split('-');
        let (Some(y), Some(m), Some(d), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if y.len() != 4 || m.len() != 2 || d.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        let day: u32 = d.parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// The local calendar day containing `ts`, as seen from `tz`.
///
/// The date is read from the local wall clock, never from the UTC representation.
pub fn to_local_day_key<Src: TimeZone, Tz: TimeZone>(ts: &DateTime<Src>, tz: &Tz) -> DayKey {
    DayKey(ts.with_timezone(tz).date_naive())
}

/// Local midnight at the start of `key`.
pub fn from_local_day_key<Tz: TimeZone>(key: DayKey, tz: &Tz) -> DateTime<Tz> {
    local_midnight(key.0, tz)
}

/// The first instant of `date` on the local wall clock.
///
/// Zones that skip midnight for daylight saving start the day at the first valid
/// local time after the gap.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt;
    }
    (1..=24)
        .find_map(|hours| {
            tz.from_local_datetime(&(naive + Duration::hours(hours)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

/// Every day from `start` to `end`, both inclusive. Empty if `end < start`.
pub fn day_range(start: DayKey, end: DayKey) -> impl Iterator<Item = DayKey> {
    start
        .0
        .iter_days()
        .take_while(move |d| *d <= end.0)
        .map(DayKey)
}
