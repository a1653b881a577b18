// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-size buckets of per-type counts for stacked trend charts.

use crate::{
    date::DayKey, model::DrinkType, range::TimeRange, series::DailyEntry, stats,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Days per bucket for a given range.
pub fn bucket_days(range: TimeRange) -> usize {
    match range {
        TimeRange::OneWeek => 1,
        TimeRange::OneMonth => 7,
        TimeRange::ThreeMonths => 14,
        _ => 30,
    }
}

/// One bar of the trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBucket {
    /// First day covered by this bucket.
    pub date: DayKey,
    /// `Mar 4` for single-day buckets, `W1`, `W2`, ... otherwise.
    pub label: String,
    pub type_counts: BTreeMap<DrinkType, usize>,
}

impl TrendBucket {
    pub fn total(&self) -> usize {
        self.type_counts.values().sum()
    }

    pub fn count(&self, drink_type: DrinkType) -> usize {
        self.type_counts.get(&drink_type).copied().unwrap_or(0)
    }
}

/// Buckets plus the stacking order shared by all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub bucket_days: usize,
    /// Types ranked by their total over the whole series, highest first.
    pub type_order: Vec<DrinkType>,
    pub buckets: Vec<TrendBucket>,
}

impl TrendSeries {
    /// Counts of `bucket` in stacking order.
    pub fn stack(&self, bucket: &TrendBucket) -> Vec<(DrinkType, usize)> {
        self.type_order
            .iter()
            .map(|t| (*t, bucket.count(*t)))
            .collect()
    }

    pub fn max_total(&self) -> usize {
        self.buckets.iter().map(TrendBucket::total).max().unwrap_or(0)
    }
}

/// Bucket `series` using the bucket size for `range`.
pub fn build_trend(series: &[DailyEntry], range: TimeRange) -> TrendSeries {
    build_buckets(series, bucket_days(range))
}

/// Partition `series` into runs of `bucket_days` days and sum per-type counts in each.
///
/// Every full run becomes a bucket, even an empty one. A trailing partial run is kept
/// only if it holds at least one drink.
pub fn build_buckets(series: &[DailyEntry], bucket_days: usize) -> TrendSeries {
    let bucket_days = bucket_days.max(1);
    let mut buckets = Vec::new();

    for chunk in series.chunks(bucket_days) {
        let mut type_counts = BTreeMap::new();
        for t in chunk.iter().flat_map(|d| d.types.iter()) {
            *type_counts.entry(*t).or_insert(0) += 1;
        }

        if chunk.len() < bucket_days && type_counts.is_empty() {
            continue;
        }

        let date = chunk[0].date;
        let label = if bucket_days == 1 {
            date.short_label()
        } else {
            format!("W{}", buckets.len() + 1)
        };
        buckets.push(TrendBucket {
            date,
            label,
            type_counts,
        });
    }

    TrendSeries {
        bucket_days,
        type_order: stats::type_tally(series).into_iter().map(|(t, _)| t).collect(),
        buckets,
    }
}
