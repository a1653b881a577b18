// Copyright (c) The drinklog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local snapshot store for drink logs and social rows.

use crate::model::{Cheer, DrinkLogEntry, DrinkType, Friendship, FriendshipStatus, MedalCount, Snapshot};
use anyhow::{Context, Result};
use camino::Utf8Path;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Open the database at `path` and make sure the schema exists.
pub fn init_db(path: &Utf8Path) -> Result<Connection> {
    let conn = Connection::open(path.as_std_path())
        .with_context(|| format!("failed to open database at {}", path))?;

    // journal_mode and synchronous persist in the file; the rest are per-connection.
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA temp_store = MEMORY;
        "#,
    )
    .context("failed to set database pragmas")?;

    init_schema(&conn)?;
    Ok(conn)
}

/// Create tables and indexes if they are missing.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS drink_logs (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            drink_type TEXT NOT NULL,
            created_at TEXT NOT NULL,        -- as sent by the backend, parsed on read
            caption TEXT
        ) WITHOUT ROWID;

        CREATE TABLE IF NOT EXISTS friendships (
            requester_id TEXT NOT NULL,
            addressee_id TEXT NOT NULL,
            status TEXT NOT NULL,            -- 'pending', 'accepted', 'declined'
            created_at TEXT NOT NULL DEFAULT '',
            PRIMARY KEY (requester_id, addressee_id)
        ) WITHOUT ROWID;

        CREATE TABLE IF NOT EXISTS cheers (
            content_id TEXT NOT NULL,        -- drink log id
            actor_id TEXT NOT NULL,
            PRIMARY KEY (content_id, actor_id)
        ) WITHOUT ROWID;

        CREATE TABLE IF NOT EXISTS medals (
            user_id TEXT PRIMARY KEY,
            count INTEGER NOT NULL
        ) WITHOUT ROWID;

        CREATE INDEX IF NOT EXISTS idx_drink_logs_user ON drink_logs(user_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_cheers_actor ON cheers(actor_id);
        "#,
    )
    .context("failed to initialize database schema")?;
    Ok(())
}

/// Row counts written by [`import_snapshot`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportCounts {
    pub logs: usize,
    pub friendships: usize,
    pub cheers: usize,
    pub medals: usize,
}

/// Write every record of `snapshot` in one transaction. Existing rows with the same
/// key are replaced, so re-importing a snapshot is idempotent.
pub fn import_snapshot(conn: &Connection, snapshot: &Snapshot) -> Result<ImportCounts> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to start import transaction")?;

    for log in &snapshot.logs {
        insert_drink_log(&tx, log)?;
    }
    for row in &snapshot.friendships {
        insert_friendship(&tx, row)?;
    }
    for cheer in &snapshot.cheers {
        insert_cheer(&tx, cheer)?;
    }
    for medal in &snapshot.medals {
        insert_medal_count(&tx, medal)?;
    }

    tx.commit().context("failed to commit import")?;

    Ok(ImportCounts {
        logs: snapshot.logs.len(),
        friendships: snapshot.friendships.len(),
        cheers: snapshot.cheers.len(),
        medals: snapshot.medals.len(),
    })
}

/// Insert a drink log.
pub fn insert_drink_log(conn: &Connection, log: &DrinkLogEntry) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO drink_logs (id, user_id, drink_type, created_at, caption)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            log.id,
            log.user_id,
            log.drink_type.as_str(),
            log.created_at,
            log.caption
        ],
    )
    .with_context(|| format!("failed to insert drink log '{}'", log.id))?;
    Ok(())
}

/// Insert a friendship row.
pub fn insert_friendship(conn: &Connection, row: &Friendship) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO friendships (requester_id, addressee_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            row.requester_id,
            row.addressee_id,
            row.status.as_str(),
            row.created_at
        ],
    )
    .context("failed to insert friendship")?;
    Ok(())
}

/// Insert a cheer.
pub fn insert_cheer(conn: &Connection, cheer: &Cheer) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO cheers (content_id, actor_id) VALUES (?1, ?2)",
        params![cheer.content_id, cheer.actor_id],
    )
    .context("failed to insert cheer")?;
    Ok(())
}

/// Insert or update a user's medal count.
pub fn insert_medal_count(conn: &Connection, medal: &MedalCount) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO medals (user_id, count) VALUES (?1, ?2)",
        params![medal.user_id, medal.count as i64],
    )
    .context("failed to insert medal count")?;
    Ok(())
}

fn drink_log_from_row(row: &Row<'_>) -> rusqlite::Result<DrinkLogEntry> {
    let drink_type: String = row.get(2)?;
    Ok(DrinkLogEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        drink_type: drink_type.parse().unwrap_or(DrinkType::Other),
        created_at: row.get(3)?,
        caption: row.get(4)?,
    })
}

/// All drink logs of one user, oldest first.
pub fn load_user_logs(conn: &Connection, user_id: &str) -> Result<Vec<DrinkLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, drink_type, created_at, caption
         FROM drink_logs
         WHERE user_id = ?1
         ORDER BY created_at, id",
    )?;
    let logs = stmt
        .query_map([user_id], drink_log_from_row)?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to load drink logs for '{}'", user_id))?;
    Ok(logs)
}

/// Every stored drink log, oldest first.
pub fn load_all_logs(conn: &Connection) -> Result<Vec<DrinkLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, drink_type, created_at, caption
         FROM drink_logs
         ORDER BY created_at, id",
    )?;
    let logs = stmt
        .query_map([], drink_log_from_row)?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to load drink logs")?;
    Ok(logs)
}

/// Every stored friendship row.
pub fn load_friendships(conn: &Connection) -> Result<Vec<Friendship>> {
    let mut stmt = conn.prepare(
        "SELECT requester_id, addressee_id, status, created_at
         FROM friendships
         ORDER BY created_at, requester_id, addressee_id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let status: String = row.get(2)?;
            Ok(Friendship {
                requester_id: row.get(0)?,
                addressee_id: row.get(1)?,
                status: FriendshipStatus::from_db(&status),
                created_at: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to load friendships")?;
    Ok(rows)
}

/// Every stored cheer.
pub fn load_cheers(conn: &Connection) -> Result<Vec<Cheer>> {
    let mut stmt = conn.prepare("SELECT content_id, actor_id FROM cheers ORDER BY content_id, actor_id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Cheer {
                content_id: row.get(0)?,
                actor_id: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to load cheers")?;
    Ok(rows)
}

/// Medal count for a user, 0 if none is recorded.
pub fn medal_count(conn: &Connection, user_id: &str) -> Result<u64> {
    let count: Option<i64> = conn
        .query_row(
            "SELECT count FROM medals WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )
        .optional()
        .context("failed to load medal count")?;
    Ok(count.map_or(0, |n| n.max(0) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn sample_snapshot() -> Snapshot {
        serde_json::from_str(
            r#"{
                "logs": [
                    {"id": "l2", "drinkType": "Wine", "createdAt": "2025-03-02T20:00:00Z", "caption": null, "userId": "me"},
                    {"id": "l1", "drinkType": "Beer", "createdAt": "2025-03-01T20:00:00Z", "caption": "first", "userId": "me"},
                    {"id": "l3", "drinkType": "Shot", "createdAt": "2025-03-01T21:00:00Z", "userId": "you"}
                ],
                "friendships": [
                    {"requesterId": "me", "addresseeId": "you", "status": "accepted", "createdAt": "2025-01-01"}
                ],
                "cheers": [
                    {"contentId": "l1", "actorId": "you"}
                ],
                "medals": [
                    {"userId": "me", "count": 4}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_import_and_load() {
        let conn = memory_db();
        let counts = import_snapshot(&conn, &sample_snapshot()).unwrap();
        assert_eq!(
            counts,
            ImportCounts {
                logs: 3,
                friendships: 1,
                cheers: 1,
                medals: 1
            }
        );

        let mine = load_user_logs(&conn, "me").unwrap();
        let ids: Vec<&str> = mine.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["l1", "l2"]);
        assert_eq!(mine[0].caption.as_deref(), Some("first"));
        assert_eq!(mine[1].drink_type, DrinkType::Wine);

        assert_eq!(load_all_logs(&conn).unwrap().len(), 3);
        assert_eq!(load_friendships(&conn).unwrap()[0].status, FriendshipStatus::Accepted);
        assert_eq!(load_cheers(&conn).unwrap()[0].actor_id, "you");
        assert_eq!(medal_count(&conn, "me").unwrap(), 4);
        assert_eq!(medal_count(&conn, "nobody").unwrap(), 0);
    }

    #[test]
    fn test_reimport_is_idempotent() {
        let conn = memory_db();
        import_snapshot(&conn, &sample_snapshot()).unwrap();
        import_snapshot(&conn, &sample_snapshot()).unwrap();

        assert_eq!(load_all_logs(&conn).unwrap().len(), 3);
        assert_eq!(load_cheers(&conn).unwrap().len(), 1);
    }
}
