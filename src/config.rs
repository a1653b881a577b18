// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the drink log statistics tool.

use crate::range::TimeRange;
use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// User id used when a command is run without `--user`.
    pub viewer: Option<String>,
    pub default_range: TimeRange,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// Environment variable holding the bearer token.
    pub token_env: String,
    pub page_size: usize,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path.as_std_path())
            .with_context(|| format!("failed to read config file at {}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file at {}", path))
    }

    /// Load configuration, falling back to defaults if the file does not exist.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self> {
        if path.as_std_path().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the user a command runs for.
    pub fn user<'a>(&'a self, explicit: Option<&'a str>) -> Result<&'a str> {
        explicit
            .or(self.viewer.as_deref())
            .context("no user given: pass --user or set `viewer` in the config file")
    }

    /// Resolve the range a command runs for.
    pub fn range(&self, explicit: Option<TimeRange>) -> TimeRange {
        explicit.unwrap_or(self.default_range)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewer: None,
            default_range: TimeRange::OneMonth,
            backend: BackendConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            token_env: "DRINKLOG_TOKEN".to_string(),
            page_size: 50,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            viewer: Some("user-1".to_string()),
            ..Config::default()
        };
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed.viewer.as_deref(), Some("user-1"));
        assert_eq!(parsed.default_range, config.default_range);
        assert_eq!(parsed.backend.page_size, config.backend.page_size);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
viewer = "abc"
default_range = "3M"

[backend]
base_url = "https://drinks.example.com"

[logging]
level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.viewer.as_deref(), Some("abc"));
        assert_eq!(config.default_range, TimeRange::ThreeMonths);
        assert_eq!(config.backend.base_url, "https://drinks.example.com");
        assert_eq!(config.backend.token_env, "DRINKLOG_TOKEN");
        assert_eq!(config.backend.page_size, 50);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_user_resolution() {
        let config = Config::default();
        assert!(config.user(None).is_err());
        assert_eq!(config.user(Some("x")).unwrap(), "x");

        let config = Config {
            viewer: Some("v".to_string()),
            ..Config::default()
        };
        assert_eq!(config.user(None).unwrap(), "v");
        assert_eq!(config.range(Some(TimeRange::OneYear)), TimeRange::OneYear);
        assert_eq!(config.range(None), TimeRange::OneMonth);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_or_default(Utf8Path::new("/nonexistent/drinklog.toml")).unwrap();
        assert!(config.viewer.is_none());
    }
}
