// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drink log analytics: daily series, aggregate statistics, trend buckets, head-to-head
//! comparisons and social aggregates.

pub mod backend;
pub mod charts;
pub mod commands;
pub mod config;
pub mod date;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;
pub mod range;
pub mod series;
pub mod social;
pub mod stats;
pub mod trend;
pub mod versus;
