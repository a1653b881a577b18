// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only client for the hosted backend's feed API.

use crate::{config::BackendConfig, model::DrinkLogEntry};
use anyhow::{Context, Result};
use serde::Deserialize;

/// Response body of `/api/feed`.
#[derive(Debug, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub items: Vec<DrinkLogEntry>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Parse one feed page, turning an `{"error": ...}` body into an error.
pub fn parse_feed_page(body: &str) -> Result<Vec<DrinkLogEntry>> {
    let page: FeedPage = serde_json::from_str(body).context("failed to parse feed response")?;
    if let Some(error) = page.error {
        anyhow::bail!("backend returned an error: {}", error);
    }
    Ok(page.items)
}

/// Fetch the whole feed visible to the token's owner, page by page.
pub async fn fetch_feed(config: &BackendConfig) -> Result<Vec<DrinkLogEntry>> {
    let token = std::env::var(&config.token_env)
        .with_context(|| format!("environment variable {} is not set", config.token_env))?;

    let client = reqwest::Client::new();
    let base_url = config.base_url.trim_end_matches('/');
    let page_size = config.page_size.max(1);
    let mut all_items = Vec::new();
    let mut offset = 0;

    loop {
        let url = format!(
            "{}/api/feed?limit={}&offset={}",
            base_url, page_size, offset
        );

        let response = client
            .get(&url)
            .header("User-Agent", "drinklog-stats")
            .bearer_auth(&token)
            .send()
            .await
            .with_context(|| format!("failed to fetch feed at offset {}", offset))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read feed response at offset {}", offset))?;

        if !status.is_success() {
            anyhow::bail!(
                "feed request failed with status {} at offset {}: {}",
                status,
                offset,
                body
            );
        }

        let items = parse_feed_page(&body)?;
        tracing::debug!(offset, items = items.len(), "fetched feed page");

        let is_last_page = items.len() < page_size;
        offset += items.len();
        all_items.extend(items);

        if is_last_page {
            break;
        }
    }

    Ok(all_items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DrinkType;

    #[test]
    fn test_parse_feed_page() {
        let body = r#"{"items": [
            {"id": "a", "drink_type": "Seltzer", "created_at": "2025-05-01 21:00:00+00", "caption": "patio", "user_id": "u1"},
            {"id": "b", "drinkType": "Beer", "createdAt": "2025-05-01T22:00:00Z", "userId": "u2"}
        ]}"#;
        let items = parse_feed_page(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].drink_type, DrinkType::Seltzer);
        assert!(items[0].timestamp().is_some());
        assert_eq!(items[1].user_id, "u2");
    }

    #[test]
    fn test_parse_feed_error() {
        let err = parse_feed_page(r#"{"error": "Unauthorized"}"#).unwrap_err();
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_parse_empty_feed() {
        assert!(parse_feed_page(r#"{"items": []}"#).unwrap().is_empty());
        assert!(parse_feed_page("not json").is_err());
    }
}
