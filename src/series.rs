// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily series: one entry per local calendar day, gap-filled over a window.

use crate::{
    date::{self, DayKey},
    model::{DrinkLogEntry, DrinkType},
    range::TimeRangeWindow,
};
use chrono::{TimeZone, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything logged on one local calendar day.
///
/// `count`, `types`, `hours`, `drink_ids` and `captions` always have the same length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub date: DayKey,
    pub count: usize,
    pub types: Vec<DrinkType>,
    /// Local hour of day (0..=23) of each drink.
    pub hours: Vec<u32>,
    pub drink_ids: Vec<String>,
    pub captions: Vec<Option<String>>,
}

impl DailyEntry {
    /// A zero-filled placeholder for a day with no drinks.
    pub fn empty(date: DayKey) -> Self {
        Self {
            date,
            count: 0,
            types: Vec::new(),
            hours: Vec::new(),
            drink_ids: Vec::new(),
            captions: Vec::new(),
        }
    }

    pub fn push(&mut self, drink_type: DrinkType, hour: u32, id: &str, caption: Option<&str>) {
        self.count += 1;
        self.types.push(drink_type);
        self.hours.push(hour);
        self.drink_ids.push(id.to_string());
        self.captions.push(caption.map(str::to_string));
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Group logs by local calendar day, ordered by date. Days without drinks are absent.
///
/// Entries whose `created_at` does not parse are skipped with a warning.
pub fn group_by_day<Tz: TimeZone>(logs: &[DrinkLogEntry], tz: &Tz) -> Vec<DailyEntry> {
    let mut by_day: BTreeMap<DayKey, DailyEntry> = BTreeMap::new();
    let mut skipped = 0usize;

    for log in logs {
        let Some(ts) = log.timestamp() else {
            tracing::warn!(
                id = %log.id,
                created_at = %log.created_at,
                "skipping drink log with unparseable timestamp"
            );
            skipped += 1;
            continue;
        };

        let local = ts.with_timezone(tz);
        let day = date::to_local_day_key(&ts, tz);
        by_day
            .entry(day)
            .or_insert_with(|| DailyEntry::empty(day))
            .push(
                log.drink_type,
                local.hour(),
                &log.id,
                log.caption.as_deref(),
            );
    }

    tracing::debug!(
        logs = logs.len(),
        days = by_day.len(),
        skipped,
        "grouped drink logs by day"
    );

    by_day.into_values().collect()
}

/// Build the dense daily series for `window`: exactly one entry per calendar day from
/// the window's start day to its end day, zero-filled where nothing was logged.
///
/// Logs outside the window are ignored.
pub fn build_daily_series<Tz: TimeZone>(
    logs: &[DrinkLogEntry],
    window: &TimeRangeWindow<Tz>,
) -> Vec<DailyEntry> {
    let tz = window.start.timezone();
    let mut by_day: BTreeMap<DayKey, DailyEntry> = group_by_day(logs, &tz)
        .into_iter()
        .map(|entry| (entry.date, entry))
        .collect();

    date::day_range(window.start_day(), window.end_day())
        .map(|day| by_day.remove(&day).unwrap_or_else(|| DailyEntry::empty(day)))
        .collect()
}

/// Daily drink counts, in series order.
pub fn counts(series: &[DailyEntry]) -> Vec<usize> {
    series.iter().map(|d| d.count).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{Duration, NaiveDate};

    /// A dense series starting on 2025-01-01 with the given per-day types.
    pub fn series_of(days: &[&[DrinkType]]) -> Vec<DailyEntry> {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        days.iter()
            .enumerate()
            .map(|(i, types)| {
                let mut entry = DailyEntry::empty(DayKey::new(start + Duration::days(i as i64)));
                for (n, t) in types.iter().enumerate() {
                    entry.push(*t, 20, &format!("d{i}-{n}"), None);
                }
                entry
            })
            .collect()
    }

    /// A dense series of beers with the given daily counts.
    pub fn series_from_counts(counts: &[usize]) -> Vec<DailyEntry> {
        let beers: Vec<Vec<DrinkType>> = counts
            .iter()
            .map(|&n| vec![DrinkType::Beer; n])
            .collect();
        let days: Vec<&[DrinkType]> = beers.iter().map(Vec::as_slice).collect();
        series_of(&days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{self, TimeRange};
    use chrono::FixedOffset;

    fn log(id: &str, drink_type: DrinkType, created_at: &str) -> DrinkLogEntry {
        DrinkLogEntry {
            id: id.to_string(),
            drink_type,
            created_at: created_at.to_string(),
            caption: Some(format!("caption {id}")),
            user_id: "u1".to_string(),
        }
    }

    fn tz() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn now() -> chrono::DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_group_uses_local_day_and_hour() {
        // 02:00 UTC on the 6th is 21:00 on the 5th in UTC-5.
        let logs = vec![
            log("a", DrinkType::Beer, "2025-03-06T02:00:00Z"),
            log("b", DrinkType::Wine, "2025-03-05T18:00:00Z"),
        ];
        let grouped = group_by_day(&logs, &tz());
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].date.to_string(), "2025-03-05");
        assert_eq!(grouped[0].hours, vec![21, 13]);
        assert_eq!(grouped[0].drink_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_group_sorted_by_date() {
        let logs = vec![
            log("c", DrinkType::Shot, "2025-03-08T18:00:00Z"),
            log("a", DrinkType::Beer, "2025-03-01T18:00:00Z"),
            log("b", DrinkType::Beer, "2025-03-04T18:00:00Z"),
        ];
        let dates: Vec<String> = group_by_day(&logs, &tz())
            .iter()
            .map(|d| d.date.to_string())
            .collect();
        assert_eq!(dates, ["2025-03-01", "2025-03-04", "2025-03-08"]);
    }

    #[test]
    fn test_densify_fills_every_day() {
        let logs = vec![
            log("a", DrinkType::Beer, "2025-03-05T18:00:00Z"),
            log("b", DrinkType::Beer, "2025-03-05T19:00:00Z"),
            log("c", DrinkType::Wine, "2025-03-09T18:00:00Z"),
        ];
        let window = range::resolve(TimeRange::OneWeek, &now());
        let series = build_daily_series(&logs, &window);

        assert_eq!(series.len(), window.num_days());
        assert_eq!(counts(&series), vec![0, 2, 0, 0, 0, 1, 0]);
        for pair in series.windows(2) {
            assert_eq!(pair[0].date.date().succ_opt(), Some(pair[1].date.date()));
        }
    }

    #[test]
    fn test_densify_month_window_length() {
        let window = range::resolve(TimeRange::OneMonth, &now());
        let series = build_daily_series(&[], &window);
        // 2025-02-10 through 2025-03-10.
        assert_eq!(series.len(), 29);
        assert!(series.iter().all(DailyEntry::is_empty));
        assert_eq!(series.first().unwrap().date.to_string(), "2025-02-10");
        assert_eq!(series.last().unwrap().date.to_string(), "2025-03-10");
    }

    #[test]
    fn test_logs_outside_window_are_ignored() {
        let logs = vec![
            log("old", DrinkType::Beer, "2025-01-05T18:00:00Z"),
            log("in", DrinkType::Beer, "2025-03-09T18:00:00Z"),
        ];
        let window = range::resolve(TimeRange::OneWeek, &now());
        let series = build_daily_series(&logs, &window);
        assert_eq!(counts(&series).iter().sum::<usize>(), 1);
    }

    #[test]
    fn test_malformed_timestamp_is_skipped() {
        let logs = vec![
            log("bad", DrinkType::Beer, "yesterday-ish"),
            log("good", DrinkType::Shot, "2025-03-09T18:00:00Z"),
        ];
        let window = range::resolve(TimeRange::OneWeek, &now());
        let series = build_daily_series(&logs, &window);
        let ids: Vec<&str> = series
            .iter()
            .flat_map(|d| d.drink_ids.iter().map(String::as_str))
            .collect();
        assert_eq!(ids, ["good"]);
    }

    #[test]
    fn test_entry_arrays_stay_aligned() {
        let logs = vec![
            log("a", DrinkType::Beer, "2025-03-09T18:00:00Z"),
            log("b", DrinkType::Cocktail, "2025-03-09T20:00:00Z"),
        ];
        let window = range::resolve(TimeRange::OneWeek, &now());
        for entry in build_daily_series(&logs, &window) {
            assert_eq!(entry.count, entry.types.len());
            assert_eq!(entry.count, entry.hours.len());
            assert_eq!(entry.count, entry.drink_ids.len());
            assert_eq!(entry.count, entry.captions.len());
        }
    }
}
