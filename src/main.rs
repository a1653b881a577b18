// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drink log analytics command-line tool.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    drinklog_stats::dispatch::dispatch().await
}
