// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Records exchanged with the hosted backend.
//!
//! These are read-only snapshots: the aggregation core never mutates them, it only
//! folds over borrowed slices.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// The kind of drink a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DrinkType {
    Beer,
    Seltzer,
    Wine,
    Cocktail,
    Shot,
    Spirit,
    Other,
}

impl DrinkType {
    pub const ALL: [DrinkType; 7] = [
        DrinkType::Beer,
        DrinkType::Seltzer,
        DrinkType::Wine,
        DrinkType::Cocktail,
        DrinkType::Shot,
        DrinkType::Spirit,
        DrinkType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DrinkType::Beer => "Beer",
            DrinkType::Seltzer => "Seltzer",
            DrinkType::Wine => "Wine",
            DrinkType::Cocktail => "Cocktail",
            DrinkType::Shot => "Shot",
            DrinkType::Spirit => "Spirit",
            DrinkType::Other => "Other",
        }
    }
}

impl fmt::Display for DrinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrinkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        DrinkType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidDrinkType(s.to_string()))
    }
}

// Unknown names from the backend fold into `Other` rather than failing the whole snapshot.
impl<'de> Deserialize<'de> for DrinkType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or(DrinkType::Other))
    }
}

/// A single logged drink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkLogEntry {
    pub id: String,
    #[serde(alias = "drink_type")]
    pub drink_type: DrinkType,
    /// Creation time as sent by the backend; parsed lazily by [`DrinkLogEntry::timestamp`].
    #[serde(alias = "created_at")]
    pub created_at: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(alias = "user_id")]
    pub user_id: String,
}

impl DrinkLogEntry {
    /// Parse `created_at` into an instant, or `None` if it is malformed.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and the space-separated Postgres form (`2024-05-01 22:13:00.123+00`).
/// Timestamps without an offset are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .into_iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// State of a friendship row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Declined,
    #[serde(other)]
    Unknown,
}

impl FriendshipStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
            FriendshipStatus::Declined => "declined",
            FriendshipStatus::Unknown => "unknown",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "pending" => FriendshipStatus::Pending,
            "accepted" => FriendshipStatus::Accepted,
            "declined" => FriendshipStatus::Declined,
            _ => FriendshipStatus::Unknown,
        }
    }
}

/// A relationship row between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    #[serde(alias = "requester_id")]
    pub requester_id: String,
    #[serde(alias = "addressee_id")]
    pub addressee_id: String,
    pub status: FriendshipStatus,
    #[serde(default, alias = "created_at")]
    pub created_at: String,
}

impl Friendship {
    /// The other side of this row, if `user_id` is one of its two ends.
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        if self.requester_id == user_id {
            Some(&self.addressee_id)
        } else if self.addressee_id == user_id {
            Some(&self.requester_id)
        } else {
            None
        }
    }
}

/// A "cheers" interaction: `actor_id` cheered the drink log `content_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cheer {
    #[serde(alias = "content_id")]
    pub content_id: String,
    #[serde(alias = "actor_id")]
    pub actor_id: String,
}

/// Number of medals (achievements) a user holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedalCount {
    #[serde(alias = "user_id")]
    pub user_id: String,
    pub count: u64,
}

/// A point-in-time export of everything the engine consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub logs: Vec<DrinkLogEntry>,
    #[serde(default)]
    pub friendships: Vec<Friendship>,
    #[serde(default)]
    pub cheers: Vec<Cheer>,
    #[serde(default)]
    pub medals: Vec<MedalCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_drink_type_parse() {
        assert_eq!("beer".parse::<DrinkType>().unwrap(), DrinkType::Beer);
        assert_eq!(" Cocktail ".parse::<DrinkType>().unwrap(), DrinkType::Cocktail);
        assert!("mead".parse::<DrinkType>().is_err());
    }

    #[test]
    fn test_unknown_drink_type_deserializes_to_other() {
        let json = r#"{"id":"a","drinkType":"Mead","createdAt":"2025-01-01T00:00:00Z","userId":"u"}"#;
        let entry: DrinkLogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.drink_type, DrinkType::Other);
        assert_eq!(entry.caption, None);
    }

    #[test]
    fn test_snake_case_aliases() {
        let json = r#"{"id":"a","drink_type":"Wine","created_at":"2025-01-01T00:00:00Z","caption":"hi","user_id":"u"}"#;
        let entry: DrinkLogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.drink_type, DrinkType::Wine);
        assert_eq!(entry.user_id, "u");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2025-03-04T22:15:00.123+02:00").unwrap();
        assert_eq!(rfc.hour(), 20);

        let pg = parse_timestamp("2025-03-04 22:15:00.5+00").unwrap();
        assert_eq!((pg.day(), pg.hour()), (4, 22));

        let naive = parse_timestamp("2025-03-04T01:02:03").unwrap();
        assert_eq!(naive.hour(), 1);

        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_friendship_status_fallback() {
        let json = r#"{"requesterId":"a","addresseeId":"b","status":"blocked"}"#;
        let row: Friendship = serde_json::from_str(json).unwrap();
        assert_eq!(row.status, FriendshipStatus::Unknown);
        assert_eq!(row.counterpart("a"), Some("b"));
        assert_eq!(row.counterpart("c"), None);
    }
}
