// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the aggregation core.

use thiserror::Error;

/// Errors produced while parsing inputs to the aggregation core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A range tag other than `1W`, `1M`, `3M`, `6M`, `1Y` or `YTD`.
    #[error("invalid time range '{0}' (expected 1W, 1M, 3M, 6M, 1Y or YTD)")]
    InvalidTimeRange(String),

    /// A calendar day key that is not a valid `YYYY-MM-DD` date.
    #[error("invalid day key '{0}' (expected YYYY-MM-DD)")]
    InvalidDayKey(String),

    /// A drink type name that does not match any known type.
    #[error("unknown drink type '{0}'")]
    InvalidDrinkType(String),
}

/// Result type alias for the aggregation core.
pub type Result<T> = std::result::Result<T, Error>;
