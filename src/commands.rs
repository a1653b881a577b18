// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command implementations.

use crate::{
    backend, charts, config, db,
    model::Snapshot,
    query,
    range::{self, TimeRange},
    trend,
};
use anyhow::{Context, Result};
use camino::Utf8Path;
use chrono::{DateTime, TimeZone};

/// Run the import command: load a JSON snapshot into the store.
pub fn run_import(database: &Utf8Path, file: &Utf8Path) -> Result<()> {
    let content = std::fs::read_to_string(file.as_std_path())
        .with_context(|| format!("failed to read snapshot at {}", file))?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot at {}", file))?;

    println!("Initializing database at {}", database);
    let conn = db::init_db(database).context("failed to initialize database")?;

    let counts = db::import_snapshot(&conn, &snapshot)?;
    tracing::info!(?counts, %file, "imported snapshot");

    println!(
        "Imported {} drink logs, {} friendships, {} cheers, {} medal counts",
        query::format_number(counts.logs as u64),
        query::format_number(counts.friendships as u64),
        query::format_number(counts.cheers as u64),
        query::format_number(counts.medals as u64),
    );
    Ok(())
}

/// Run the collect command: page through the backend feed and store every log.
pub async fn run_collect(database: &Utf8Path, config: &config::Config) -> Result<()> {
    println!("Initializing database at {}", database);
    let conn = db::init_db(database).context("failed to initialize database")?;

    println!("\nCollecting feed from {}...", config.backend.base_url);
    let items = backend::fetch_feed(&config.backend)
        .await
        .context("failed to fetch feed")?;

    let unparseable = items.iter().filter(|item| item.timestamp().is_none()).count();
    if unparseable > 0 {
        tracing::warn!(unparseable, "feed contains logs with unparseable timestamps");
    }

    let snapshot = Snapshot {
        logs: items,
        ..Snapshot::default()
    };
    let counts = db::import_snapshot(&conn, &snapshot)?;

    println!("  Recorded {} drink logs", query::format_number(counts.logs as u64));
    println!("\nCollection complete.");
    Ok(())
}

/// Run the charts command.
pub fn run_charts<Tz: TimeZone>(
    database: &Utf8Path,
    user: &str,
    range: TimeRange,
    output_dir: &Utf8Path,
    now: &DateTime<Tz>,
) -> Result<()> {
    let conn = db::init_db(database).context("failed to open database")?;
    let analysis = query::analyze(&conn, user, &range::resolve(range, now))?;
    let trend = trend::build_trend(&analysis.series, range);
    charts::generate_charts(user, &analysis.series, &trend, output_dir)?;
    Ok(())
}
