// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing and command dispatch.

use crate::{commands, config, db, logging, query, range::TimeRange};
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use chrono::Local;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "drinklog.db", global = true)]
    database: Utf8PathBuf,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: Utf8PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Import a JSON snapshot of logs, friendships, cheers and medals
    Import {
        /// Snapshot file to import
        #[arg(short, long)]
        file: Utf8PathBuf,
    },

    /// Collect drink logs from the backend feed
    Collect,

    /// Show aggregate statistics for a user
    Stats {
        /// User id (defaults to `viewer` from the config)
        #[arg(short, long)]
        user: Option<String>,

        /// Time range: 1W, 1M, 3M, 6M, 1Y or YTD
        #[arg(short, long)]
        range: Option<TimeRange>,
    },

    /// Show per-type counts in fixed-size buckets
    Trend {
        /// User id (defaults to `viewer` from the config)
        #[arg(short, long)]
        user: Option<String>,

        /// Time range: 1W, 1M, 3M, 6M, 1Y or YTD
        #[arg(short, long)]
        range: Option<TimeRange>,
    },

    /// Compare two users head to head
    Versus {
        /// Left-hand user id (defaults to `viewer` from the config)
        #[arg(short, long)]
        left: Option<String>,

        /// Right-hand user id
        #[arg(short = 'R', long)]
        right: String,

        /// Time range: 1W, 1M, 3M, 6M, 1Y or YTD
        #[arg(short, long)]
        range: Option<TimeRange>,
    },

    /// Show cheers and friend suggestions for a user
    Social {
        /// User id (defaults to `viewer` from the config)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Generate charts for a user
    Charts {
        /// User id (defaults to `viewer` from the config)
        #[arg(short, long)]
        user: Option<String>,

        /// Time range: 1W, 1M, 3M, 6M, 1Y or YTD
        #[arg(short, long)]
        range: Option<TimeRange>,

        /// Output directory for charts
        #[arg(short, long, default_value = "charts")]
        output: Utf8PathBuf,
    },

    /// Export a user's daily series
    Export {
        #[command(subcommand)]
        export_type: ExportType,
    },
}

#[derive(Parser, Debug)]
enum ExportType {
    /// Export to CSV format
    Csv {
        /// Output file path
        #[arg(short, long)]
        output: Utf8PathBuf,

        /// User id (defaults to `viewer` from the config)
        #[arg(short, long)]
        user: Option<String>,

        /// Time range: 1W, 1M, 3M, 6M, 1Y or YTD
        #[arg(short, long)]
        range: Option<TimeRange>,
    },

    /// Export to JSON format
    Json {
        /// Output file path
        #[arg(short, long)]
        output: Utf8PathBuf,

        /// User id (defaults to `viewer` from the config)
        #[arg(short, long)]
        user: Option<String>,

        /// Time range: 1W, 1M, 3M, 6M, 1Y or YTD
        #[arg(short, long)]
        range: Option<TimeRange>,
    },
}

/// Parse arguments and dispatch to the appropriate command.
pub async fn dispatch() -> Result<()> {
    let args = Args::parse();
    let config =
        config::Config::load_or_default(&args.config).context("failed to load configuration")?;
    logging::init(&config.logging);

    let now = Local::now();

    match args.command {
        Command::Import { file } => {
            commands::run_import(&args.database, &file)?;
        }
        Command::Collect => {
            commands::run_collect(&args.database, &config).await?;
        }
        Command::Charts {
            user,
            range,
            output,
        } => {
            let user = config.user(user.as_deref())?;
            commands::run_charts(&args.database, user, config.range(range), &output, &now)?;
        }
        Command::Stats { user, range } => {
            let conn = db::init_db(&args.database).context("failed to open database")?;
            let query_kind = query::QueryKind::Stats {
                user: config.user(user.as_deref())?.to_string(),
                range: config.range(range),
            };
            query::run_query(&conn, query_kind, &now)?;
        }
        Command::Trend { user, range } => {
            let conn = db::init_db(&args.database).context("failed to open database")?;
            let query_kind = query::QueryKind::Trend {
                user: config.user(user.as_deref())?.to_string(),
                range: config.range(range),
            };
            query::run_query(&conn, query_kind, &now)?;
        }
        Command::Versus { left, right, range } => {
            let conn = db::init_db(&args.database).context("failed to open database")?;
            let query_kind = query::QueryKind::Versus {
                left: config.user(left.as_deref())?.to_string(),
                right,
                range: config.range(range),
            };
            query::run_query(&conn, query_kind, &now)?;
        }
        Command::Social { user } => {
            let conn = db::init_db(&args.database).context("failed to open database")?;
            let query_kind = query::QueryKind::Social {
                user: config.user(user.as_deref())?.to_string(),
            };
            query::run_query(&conn, query_kind, &now)?;
        }
        Command::Export { export_type } => {
            let conn = db::init_db(&args.database).context("failed to open database")?;
            let export_kind = match export_type {
                ExportType::Csv {
                    output,
                    user,
                    range,
                } => query::ExportKind::Csv {
                    output: output.to_string(),
                    user: config.user(user.as_deref())?.to_string(),
                    range: config.range(range),
                },
                ExportType::Json {
                    output,
                    user,
                    range,
                } => query::ExportKind::Json {
                    output: output.to_string(),
                    user: config.user(user.as_deref())?.to_string(),
                    range: config.range(range),
                },
            };
            query::run_export(&conn, export_kind, &now)?;
        }
    }

    Ok(())
}
