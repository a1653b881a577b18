// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate statistics over a dense daily series.

use crate::{model::DrinkType, series::DailyEntry};
use chrono::Datelike;
use serde::Serialize;

/// Shown in place of a favorite type when nothing was logged.
pub const NO_FAVORITE: &str = "N/A";

/// Summary numbers for one user over one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_drinks: usize,
    /// Full precision; round only when displaying.
    pub avg_per_day: f64,
    pub most_in_a_day: usize,
    /// Every type tied for the highest tally, joined with `/`, or [`NO_FAVORITE`].
    pub most_common_type: String,
    /// Tally of each of the favorite types.
    pub favorite_count: usize,
    pub unique_types: usize,
    pub longest_streak: usize,
    pub current_streak: usize,
    pub days_since_last_drink: usize,
}

/// Compute all aggregate statistics for `series`.
///
/// `series` must be dense (one entry per calendar day, in date order) for the streak
/// and recency numbers to mean consecutive days.
pub fn compute_stats(series: &[DailyEntry]) -> AggregateStats {
    let total_drinks: usize = series.iter().map(|d| d.count).sum();
    let avg_per_day = if series.is_empty() {
        0.0
    } else {
        total_drinks as f64 / series.len() as f64
    };
    let most_in_a_day = series.iter().map(|d| d.count).max().unwrap_or(0);

    let tally = type_tally(series);
    let (most_common_type, favorite_count) = favorite_types(&tally);

    AggregateStats {
        total_drinks,
        avg_per_day,
        most_in_a_day,
        most_common_type,
        favorite_count,
        unique_types: tally.len(),
        longest_streak: longest_streak(series),
        current_streak: current_streak(series),
        days_since_last_drink: days_since_last_drink(series),
    }
}

/// Per-type totals, highest first. Equal totals keep the order in which the types
/// were first seen walking the series.
pub fn type_tally(series: &[DailyEntry]) -> Vec<(DrinkType, usize)> {
    let mut tally: Vec<(DrinkType, usize)> = Vec::new();
    for t in series.iter().flat_map(|d| d.types.iter().copied()) {
        match tally.iter_mut().find(|(seen, _)| *seen == t) {
            Some((_, n)) => *n += 1,
            None => tally.push((t, 1)),
        }
    }
    // Stable sort keeps first-seen order among ties.
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
}

/// Join every type tied for the top tally with `/`.
fn favorite_types(tally: &[(DrinkType, usize)]) -> (String, usize) {
    let Some(&(_, top)) = tally.first() else {
        return (NO_FAVORITE.to_string(), 0);
    };
    let names: Vec<&str> = tally
        .iter()
        .take_while(|(_, n)| *n == top)
        .map(|(t, _)| t.as_str())
        .collect();
    (names.join("/"), top)
}

/// Longest run of consecutive days with at least one drink.
pub fn longest_streak(series: &[DailyEntry]) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for day in series {
        if day.is_empty() {
            run = 0;
        } else {
            run += 1;
            longest = longest.max(run);
        }
    }
    longest
}

/// Run of drinking days ending at the last day of the series.
///
/// A quiet last day ("today" is not over yet) does not break a run through the
/// day before it.
pub fn current_streak(series: &[DailyEntry]) -> usize {
    let mut days = series.iter().rev().peekable();
    if days.peek().is_some_and(|d| d.is_empty()) {
        days.next();
    }
    days.take_while(|d| !d.is_empty()).count()
}

/// Zero days at the end of the series. Saturates at the series length when nothing
/// was logged at all.
pub fn days_since_last_drink(series: &[DailyEntry]) -> usize {
    series.iter().rev().take_while(|d| d.is_empty()).count()
}

/// Drinks per weekday, Monday first.
pub fn weekday_histogram(series: &[DailyEntry]) -> [usize; 7] {
    let mut histogram = [0; 7];
    for day in series {
        histogram[day.date.date().weekday().num_days_from_monday() as usize] += day.count;
    }
    histogram
}

/// Drinks per local hour of day.
pub fn hour_histogram(series: &[DailyEntry]) -> [usize; 24] {
    let mut histogram = [0; 24];
    for hour in series.iter().flat_map(|d| d.hours.iter()) {
        if let Some(slot) = histogram.get_mut(*hour as usize) {
            *slot += 1;
        }
    }
    histogram
}
