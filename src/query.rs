// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text reports and exports of derived statistics.

use crate::{
    db,
    range::{self, TimeRange, TimeRangeWindow},
    series::{self, DailyEntry},
    social,
    stats::{self, AggregateStats},
    trend::{self, TrendSeries},
    versus::{self, Comparison, VersusCard, Winner},
};
use anyhow::{Context, Result};
use camino::Utf8Path;
use chrono::{DateTime, TimeZone};
use rusqlite::Connection;
use std::{
    fmt::Write as _,
    fs::File,
    io::{BufWriter, Write},
};

pub enum QueryKind {
    Stats { user: String, range: TimeRange },
    Trend { user: String, range: TimeRange },
    Versus { left: String, right: String, range: TimeRange },
    Social { user: String },
}

pub enum ExportKind {
    Csv { output: String, user: String, range: TimeRange },
    Json { output: String, user: String, range: TimeRange },
}

/// One user's dense series and statistics over a window.
pub struct UserAnalysis {
    pub user_id: String,
    pub series: Vec<DailyEntry>,
    pub stats: AggregateStats,
}

/// Load `user_id`'s logs and compute their series and statistics over `window`.
pub fn analyze<Tz: TimeZone>(
    conn: &Connection,
    user_id: &str,
    window: &TimeRangeWindow<Tz>,
) -> Result<UserAnalysis> {
    let logs = db::load_user_logs(conn, user_id)?;
    let series = series::build_daily_series(&logs, window);
    let stats = stats::compute_stats(&series);
    Ok(UserAnalysis {
        user_id: user_id.to_string(),
        series,
        stats,
    })
}

pub fn run_query<Tz: TimeZone>(conn: &Connection, query: QueryKind, now: &DateTime<Tz>) -> Result<()> {
    let report = match query {
        QueryKind::Stats { user, range } => {
            let analysis = analyze(conn, &user, &range::resolve(range, now))?;
            render_stats(&analysis, range)
        }
        QueryKind::Trend { user, range } => {
            let analysis = analyze(conn, &user, &range::resolve(range, now))?;
            render_trend(&user, &trend::build_trend(&analysis.series, range))
        }
        QueryKind::Versus { left, right, range } => {
            let window = range::resolve(range, now);
            let comparison = versus::compare(
                &versus_card(conn, &left, &window)?,
                &versus_card(conn, &right, &window)?,
            );
            render_versus(&left, &right, &comparison)
        }
        QueryKind::Social { user } => render_social(conn, &user)?,
    };
    print!("{}", report);
    Ok(())
}

pub fn run_export<Tz: TimeZone>(conn: &Connection, export: ExportKind, now: &DateTime<Tz>) -> Result<()> {
    match export {
        ExportKind::Csv {
            output,
            user,
            range,
        } => {
            let analysis = analyze(conn, &user, &range::resolve(range, now))?;
            export_csv(&analysis.series, output.as_ref())?;
        }
        ExportKind::Json {
            output,
            user,
            range,
        } => {
            let analysis = analyze(conn, &user, &range::resolve(range, now))?;
            export_json(&analysis.series, output.as_ref())?;
        }
    }
    Ok(())
}

/// Build a versus card for `user_id` from everything in the store.
pub fn versus_card<Tz: TimeZone>(
    conn: &Connection,
    user_id: &str,
    window: &TimeRangeWindow<Tz>,
) -> Result<VersusCard> {
    let analysis = analyze(conn, user_id, window)?;
    let cheers = social::cheers_summary(user_id, &db::load_cheers(conn)?, &db::load_all_logs(conn)?);
    let friends = social::friend_ids(user_id, &db::load_friendships(conn)?);
    let medals = db::medal_count(conn, user_id)?;

    Ok(VersusCard::new(
        user_id,
        &analysis.series,
        cheers.received,
        friends.len(),
        medals,
    ))
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn render_stats(analysis: &UserAnalysis, range: TimeRange) -> String {
    let stats = &analysis.stats;
    let mut out = String::new();

    let _ = writeln!(out, "\nDrink statistics for {} ({})", analysis.user_id, range);
    if let (Some(first), Some(last)) = (analysis.series.first(), analysis.series.last()) {
        let _ = writeln!(out, "  Window:          {} to {}", first.date, last.date);
    }
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "  Total drinks:    {}", format_number(stats.total_drinks as u64));
    let _ = writeln!(out, "  Avg per day:     {:.2}", stats.avg_per_day);
    let _ = writeln!(out, "  Most in a day:   {}", stats.most_in_a_day);
    let _ = writeln!(out, "  Favorite:        {}", stats.most_common_type);
    let _ = writeln!(out, "  Longest streak:  {} days", stats.longest_streak);
    let _ = writeln!(out, "  Current streak:  {} days", stats.current_streak);
    let _ = writeln!(out, "  Since last drink: {} days", stats.days_since_last_drink);

    let _ = writeln!(out, "\n{:<6} {:>8}", "Day", "Drinks");
    for (name, count) in WEEKDAYS.iter().zip(stats::weekday_histogram(&analysis.series)) {
        let _ = writeln!(out, "{:<6} {:>8}", name, count);
    }

    let hours = stats::hour_histogram(&analysis.series);
    if let Some((peak, count)) = hours
        .iter()
        .enumerate()
        .filter(|(_, n)| **n > 0)
        .max_by_key(|(_, n)| **n)
    {
        let _ = writeln!(out, "\nPeak hour: {:02}:00 ({} drinks)", peak, count);
    }

    out
}

fn render_trend(user: &str, trend: &TrendSeries) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\nDrink trend for {} ({}-day buckets)",
        user, trend.bucket_days
    );
    let _ = write!(out, "{:<8} {:>6}", "Bucket", "Total");
    for t in &trend.type_order {
        let _ = write!(out, " {:>8}", t.as_str());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "=".repeat(15 + 9 * trend.type_order.len()));

    for bucket in &trend.buckets {
        let _ = write!(out, "{:<8} {:>6}", bucket.label, bucket.total());
        for (_, count) in trend.stack(bucket) {
            let _ = write!(out, " {:>8}", count);
        }
        let _ = writeln!(out);
    }

    out
}

fn render_versus(left: &str, right: &str, comparison: &Comparison) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n{:<16} {:>14} {:>14}", "", left, right);
    let _ = writeln!(out, "{}", "=".repeat(46));
    for row in &comparison.rows {
        let marker = match row.winner {
            Some(Winner::Left) => "<",
            Some(Winner::Right) => ">",
            Some(Winner::Tie) => "=",
            None => " ",
        };
        let _ = writeln!(
            out,
            "{:<16} {:>14} {:>14}  {}",
            row.metric.label(),
            row.left.to_string(),
            row.right.to_string(),
            marker
        );
    }
    let _ = writeln!(
        out,
        "\nScore: {} {} - {} {}",
        left, comparison.left_wins, comparison.right_wins, right
    );

    out
}

fn render_social(conn: &Connection, user: &str) -> Result<String> {
    let logs = db::load_all_logs(conn)?;
    let cheers = db::load_cheers(conn)?;
    let friendships = db::load_friendships(conn)?;

    let summary = social::cheers_summary(user, &cheers, &logs);
    let friends = social::friend_ids(user, &friendships);
    let pending = social::pending_incoming(user, &friendships);
    let suggestions = social::suggest_mutual_friends(user, &friendships);

    let mut out = String::new();
    let _ = writeln!(out, "\nSocial summary for {}", user);
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "  Friends:          {}", friends.len());
    let _ = writeln!(out, "  Pending requests: {}", pending.len());
    let _ = writeln!(out, "  Cheers received:  {}", summary.received);
    let _ = writeln!(out, "  Cheers given:     {}", summary.given);
    let _ = writeln!(out, "  Cheers per post:  {:.2}", summary.avg_per_post);

    let _ = writeln!(out, "\nTop fans:");
    for fan in summary.top_fans.iter().take(social::TOP_USERS_SHOWN) {
        let _ = writeln!(out, "  {:<20} {:>5}", fan.user_id, fan.count);
    }
    let _ = writeln!(out, "\nMost cheered:");
    for cheered in summary.top_cheered.iter().take(social::TOP_USERS_SHOWN) {
        let _ = writeln!(out, "  {:<20} {:>5}", cheered.user_id, cheered.count);
    }
    let _ = writeln!(out, "\nPeople you may know:");
    for suggestion in &suggestions {
        let _ = writeln!(
            out,
            "  {:<20} {:>2} mutual",
            suggestion.user_id, suggestion.mutual_count
        );
    }

    Ok(out)
}

/// Write the daily series as CSV.
pub fn write_csv<W: Write>(series: &[DailyEntry], mut writer: W) -> Result<()> {
    writeln!(writer, "date,count,types,hours,drink_ids")?;
    for day in series {
        let types: Vec<&str> = day.types.iter().map(|t| t.as_str()).collect();
        let hours: Vec<String> = day.hours.iter().map(u32::to_string).collect();
        writeln!(
            writer,
            "{},{},{},{},{}",
            day.date,
            day.count,
            types.join(";"),
            hours.join(";"),
            day.drink_ids.join(";")
        )?;
    }
    Ok(())
}

fn export_csv(series: &[DailyEntry], output: &Utf8Path) -> Result<()> {
    let file = File::create(output.as_std_path())
        .with_context(|| format!("failed to create file at {}", output))?;
    let mut writer = BufWriter::new(file);
    write_csv(series, &mut writer)?;
    writer.flush()?;

    println!("Exported to {}.", output);
    Ok(())
}

fn export_json(series: &[DailyEntry], output: &Utf8Path) -> Result<()> {
    let json = serde_json::to_string_pretty(series)?;

    let mut file = File::create(output.as_std_path())
        .with_context(|| format!("failed to create file at {}", output))?;
    file.write_all(json.as_bytes())?;

    println!("Exported to {}.", output);
    Ok(())
}

/// Format a number with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Snapshot;
    use chrono::FixedOffset;

    fn seeded_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        let snapshot: Snapshot = serde_json::from_str(
            r#"{
                "logs": [
                    {"id": "a1", "drinkType": "Beer", "createdAt": "2025-03-08T20:00:00Z", "userId": "alice"},
                    {"id": "a2", "drinkType": "Beer", "createdAt": "2025-03-09T20:00:00Z", "userId": "alice"},
                    {"id": "a3", "drinkType": "Wine", "createdAt": "2025-03-09T21:00:00Z", "userId": "alice"},
                    {"id": "b1", "drinkType": "Shot", "createdAt": "2025-03-09T22:00:00Z", "userId": "bob"}
                ],
                "friendships": [
                    {"requesterId": "alice", "addresseeId": "bob", "status": "accepted"},
                    {"requesterId": "bob", "addresseeId": "carol", "status": "accepted"},
                    {"requesterId": "dave", "addresseeId": "alice", "status": "pending"}
                ],
                "cheers": [
                    {"contentId": "a1", "actorId": "bob"},
                    {"contentId": "a2", "actorId": "bob"},
                    {"contentId": "b1", "actorId": "alice"}
                ],
                "medals": [{"userId": "bob", "count": 2}]
            }"#,
        )
        .unwrap();
        db::import_snapshot(&conn, &snapshot).unwrap();
        conn
    }

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 10, 12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_analyze_and_render_stats() {
        let conn = seeded_db();
        let window = range::resolve(TimeRange::OneWeek, &now());
        let analysis = analyze(&conn, "alice", &window).unwrap();

        assert_eq!(analysis.series.len(), 7);
        assert_eq!(analysis.stats.total_drinks, 3);
        assert_eq!(analysis.stats.current_streak, 2);

        let report = render_stats(&analysis, TimeRange::OneWeek);
        assert!(report.contains("Total drinks:    3"));
        assert!(report.contains("Avg per day:     0.43"));
        assert!(report.contains("Favorite:        Beer"));
        assert!(report.contains("Peak hour: 20:00 (2 drinks)"));
    }

    #[test]
    fn test_versus_card_pulls_social_numbers() {
        let conn = seeded_db();
        let window = range::resolve(TimeRange::OneWeek, &now());
        let alice = versus_card(&conn, "alice", &window).unwrap();
        let bob = versus_card(&conn, "bob", &window).unwrap();

        assert_eq!(alice.cheers_received, 2);
        assert_eq!(alice.friend_count, 1);
        assert_eq!(bob.friend_count, 2);
        assert_eq!(bob.medal_count, 2);

        let comparison = versus::compare(&alice, &bob);
        let report = render_versus("alice", "bob", &comparison);
        assert!(report.contains(&format!(
            "Score: alice {} - {} bob",
            comparison.left_wins, comparison.right_wins
        )));
    }

    #[test]
    fn test_render_social() {
        let conn = seeded_db();
        let report = render_social(&conn, "alice").unwrap();
        assert!(report.contains("Friends:          1"));
        assert!(report.contains("Pending requests: 1"));
        assert!(report.contains("Cheers per post:  0.67"));
        assert!(report.contains("carol"));
    }

    #[test]
    fn test_render_trend() {
        let conn = seeded_db();
        let window = range::resolve(TimeRange::OneMonth, &now());
        let analysis = analyze(&conn, "alice", &window).unwrap();
        let trend = trend::build_trend(&analysis.series, TimeRange::OneMonth);
        let report = render_trend("alice", &trend);
        assert!(report.contains("7-day buckets"));
        assert!(report.contains("W1"));
    }

    #[test]
    fn test_write_csv() {
        let conn = seeded_db();
        let window = range::resolve(TimeRange::OneWeek, &now());
        let analysis = analyze(&conn, "alice", &window).unwrap();

        let mut buf = Vec::new();
        write_csv(&analysis.series, &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "date,count,types,hours,drink_ids");
        assert_eq!(lines[1], "2025-03-04,0,,,");
        assert_eq!(lines[6], "2025-03-09,2,Beer;Wine,20;21,a2;a3");
    }
}
