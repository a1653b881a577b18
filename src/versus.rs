// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Head-to-head comparison of two users over the same window.

use crate::{
    series::DailyEntry,
    stats::{self, AggregateStats},
};
use serde::Serialize;
use std::fmt;

/// Everything shown on one side of a versus screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersusCard {
    pub label: String,
    pub stats: AggregateStats,
    pub cheers_received: usize,
    pub friend_count: usize,
    pub medal_count: u64,
}

impl VersusCard {
    pub fn new(
        label: impl Into<String>,
        series: &[DailyEntry],
        cheers_received: usize,
        friend_count: usize,
        medal_count: u64,
    ) -> Self {
        Self {
            label: label.into(),
            stats: stats::compute_stats(series),
            cheers_received,
            friend_count,
            medal_count,
        }
    }

    fn value(&self, metric: Metric) -> MetricValue {
        let count = |n: usize| MetricValue::Count(n as u64);
        match metric {
            Metric::TotalDrinks => count(self.stats.total_drinks),
            Metric::CheersReceived => count(self.cheers_received),
            Metric::Friends => count(self.friend_count),
            Metric::Medals => MetricValue::Count(self.medal_count),
            Metric::CurrentStreak => count(self.stats.current_streak),
            Metric::UniqueTypes => count(self.stats.unique_types),
            Metric::AvgPerDay => MetricValue::Average(self.stats.avg_per_day),
            Metric::FavoriteType => MetricValue::Favorite {
                name: self.stats.most_common_type.clone(),
                count: self.stats.favorite_count,
            },
        }
    }
}

/// A compared row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    TotalDrinks,
    CheersReceived,
    Friends,
    Medals,
    CurrentStreak,
    UniqueTypes,
    AvgPerDay,
    FavoriteType,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::TotalDrinks,
        Metric::CheersReceived,
        Metric::Friends,
        Metric::Medals,
        Metric::CurrentStreak,
        Metric::UniqueTypes,
        Metric::AvgPerDay,
        Metric::FavoriteType,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalDrinks => "Total drinks",
            Metric::CheersReceived => "Cheers received",
            Metric::Friends => "Friends",
            Metric::Medals => "Medals",
            Metric::CurrentStreak => "Current streak",
            Metric::UniqueTypes => "Drink types",
            Metric::AvgPerDay => "Avg / day",
            Metric::FavoriteType => "Favorite",
        }
    }

    /// Whether this row counts toward the win tally. The favorite type is categorical
    /// and only displayed.
    pub fn is_scored(self) -> bool {
        self != Metric::FavoriteType
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum MetricValue {
    Count(u64),
    Average(f64),
    Favorite { name: String, count: usize },
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{n}"),
            MetricValue::Average(avg) => write!(f, "{avg:.2}"),
            MetricValue::Favorite { name, count: 0 } => f.write_str(name),
            MetricValue::Favorite { name, count } => write!(f, "{name} ({count})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Left,
    Right,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub metric: Metric,
    pub left: MetricValue,
    pub right: MetricValue,
    /// `None` for display-only rows.
    pub winner: Option<Winner>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
    pub left_wins: usize,
    pub right_wins: usize,
}

impl Comparison {
    /// The side with more row wins, or a tie.
    pub fn overall(&self) -> Winner {
        pick(self.left_wins, self.right_wins)
    }
}

/// Compare two cards row by row. Strictly greater wins; equal values tie and count
/// for neither side.
pub fn compare(left: &VersusCard, right: &VersusCard) -> Comparison {
    let mut left_wins = 0;
    let mut right_wins = 0;

    let rows = Metric::ALL
        .into_iter()
        .map(|metric| {
            let (l, r) = (left.value(metric), right.value(metric));
            let winner = metric.is_scored().then(|| match (&l, &r) {
                (MetricValue::Count(a), MetricValue::Count(b)) => pick(*a, *b),
                (MetricValue::Average(a), MetricValue::Average(b)) => pick(*a, *b),
                _ => Winner::Tie,
            });
            match winner {
                Some(Winner::Left) => left_wins += 1,
                Some(Winner::Right) => right_wins += 1,
                _ => {}
            }
            ComparisonRow {
                metric,
                left: l,
                right: r,
                winner,
            }
        })
        .collect();

    Comparison {
        rows,
        left_wins,
        right_wins,
    }
}

fn pick<T: PartialOrd>(left: T, right: T) -> Winner {
    if left > right {
        Winner::Left
    } else if right > left {
        Winner::Right
    } else {
        Winner::Tie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::DrinkType, series::test_support::{series_from_counts, series_of}};

    fn row(comparison: &Comparison, metric: Metric) -> &ComparisonRow {
        comparison.rows.iter().find(|r| r.metric == metric).unwrap()
    }

    #[test]
    fn test_equal_totals_tie() {
        let left = VersusCard::new("left", &series_from_counts(&[2, 3]), 0, 0, 0);
        let right = VersusCard::new("right", &series_from_counts(&[5, 0]), 0, 0, 0);
        let comparison = compare(&left, &right);

        assert_eq!(row(&comparison, Metric::TotalDrinks).winner, Some(Winner::Tie));
        assert_eq!(row(&comparison, Metric::AvgPerDay).winner, Some(Winner::Tie));
    }

    #[test]
    fn test_win_tally() {
        let left = VersusCard::new("left", &series_from_counts(&[1, 1, 1]), 4, 2, 1);
        let right = VersusCard::new("right", &series_from_counts(&[0, 0, 2]), 7, 2, 0);
        let comparison = compare(&left, &right);

        assert_eq!(row(&comparison, Metric::TotalDrinks).winner, Some(Winner::Left));
        assert_eq!(row(&comparison, Metric::CheersReceived).winner, Some(Winner::Right));
        assert_eq!(row(&comparison, Metric::Friends).winner, Some(Winner::Tie));
        assert_eq!(row(&comparison, Metric::Medals).winner, Some(Winner::Left));
        assert_eq!(row(&comparison, Metric::CurrentStreak).winner, Some(Winner::Left));
        assert_eq!(row(&comparison, Metric::UniqueTypes).winner, Some(Winner::Tie));
        assert_eq!(row(&comparison, Metric::AvgPerDay).winner, Some(Winner::Left));

        assert_eq!(comparison.left_wins, 4);
        assert_eq!(comparison.right_wins, 1);
        assert_eq!(comparison.overall(), Winner::Left);
    }

    #[test]
    fn test_favorite_is_display_only() {
        let left = VersusCard::new("left", &series_of(&[&[DrinkType::Wine, DrinkType::Wine]]), 0, 0, 0);
        let right = VersusCard::new("right", &series_of(&[&[DrinkType::Beer]]), 0, 0, 0);
        let comparison = compare(&left, &right);

        let favorite = row(&comparison, Metric::FavoriteType);
        assert_eq!(favorite.winner, None);
        assert_eq!(favorite.left.to_string(), "Wine (2)");
        assert_eq!(favorite.right.to_string(), "Beer (1)");
        assert_eq!(comparison.rows.len(), Metric::ALL.len());
    }

    #[test]
    fn test_empty_cards_tie_everywhere() {
        let left = VersusCard::new("left", &[], 0, 0, 0);
        let right = VersusCard::new("right", &[], 0, 0, 0);
        let comparison = compare(&left, &right);

        assert_eq!((comparison.left_wins, comparison.right_wins), (0, 0));
        assert_eq!(comparison.overall(), Winner::Tie);
        assert_eq!(row(&comparison, Metric::FavoriteType).left.to_string(), "N/A");
        assert_eq!(row(&comparison, Metric::AvgPerDay).left.to_string(), "0.00");
    }
}
