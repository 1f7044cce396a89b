//! Session record persistence
//!
//! A draw result is stored as one JSON record under a fixed key. The record is
//! written once and is never updated in place: it only goes away by deletion.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::debug;

use super::parse::{is_constraint_violation, parse_datetime, OptionalExt};
use crate::error::{Error, Result};
use crate::invariants::check_stored_draw;
use crate::models::DrawResult;

/// Key of the single session record
pub const SESSION_KEY: &str = "giftdraw.session";

/// Session record store
pub struct SessionStore<'a> {
    conn: &'a Connection,
}

impl<'a> SessionStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Write a draw result. Fails with `AlreadyCommitted` if the key is taken.
    pub fn save(&self, key: &str, result: &DrawResult) -> Result<()> {
        let value = serde_json::to_string(result)?;

        let inserted = self.conn.execute(
            "INSERT INTO session_records (key, value, written_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        );

        match inserted {
            Ok(_) => {
                debug!(key, draw_id = %result.id(), "Session record written");
                Ok(())
            }
            Err(e) if is_constraint_violation(&e) => Err(Error::AlreadyCommitted),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the draw result stored under a key.
    ///
    /// A record that parses but breaks the draw invariants is `CorruptRecord`.
    pub fn load(&self, key: &str) -> Result<Option<DrawResult>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM session_records WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        let Some(json) = value else {
            return Ok(None);
        };
        let result: DrawResult = serde_json::from_str(&json)?;
        check_stored_draw(&result)?;
        Ok(Some(result))
    }

    /// When the record under a key was written
    pub fn written_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let written_at = self
            .conn
            .query_row(
                "SELECT written_at FROM session_records WHERE key = ?1",
                params![key],
                |row| parse_datetime(&row.get::<_, String>(0)?),
            )
            .optional()?;
        Ok(written_at)
    }

    /// Delete the record under a key. Returns false if there was none.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM session_records WHERE key = ?1",
            params![key],
        )?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::draw;
    use crate::roster::Roster;
    use crate::storage::Database;

    fn make_draw() -> DrawResult {
        let roster: Roster = ["Alice", "Bob", "Carol", "Dave"].into_iter().collect();
        draw(&roster).unwrap()
    }

    #[test]
    fn test_save_load() {
        let db = Database::open_in_memory().unwrap();
        let store = SessionStore::new(&db.conn);
        let result = make_draw();

        store.save(SESSION_KEY, &result).unwrap();

        let loaded = store.load(SESSION_KEY).unwrap().unwrap();
        assert_eq!(loaded, result);
        assert!(store.written_at(SESSION_KEY).unwrap().is_some());
    }

    #[test]
    fn test_load_missing() {
        let db = Database::open_in_memory().unwrap();
        let store = SessionStore::new(&db.conn);

        assert!(store.load(SESSION_KEY).unwrap().is_none());
        assert!(store.written_at(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn test_second_write_refused() {
        let db = Database::open_in_memory().unwrap();
        let store = SessionStore::new(&db.conn);
        let first = make_draw();
        store.save(SESSION_KEY, &first).unwrap();

        let err = store.save(SESSION_KEY, &make_draw()).unwrap_err();
        assert!(matches!(err, Error::AlreadyCommitted));

        // The original record is untouched
        assert_eq!(store.load(SESSION_KEY).unwrap().unwrap(), first);
    }

    #[test]
    fn test_delete_then_write_again() {
        let db = Database::open_in_memory().unwrap();
        let store = SessionStore::new(&db.conn);
        store.save(SESSION_KEY, &make_draw()).unwrap();

        assert!(store.delete(SESSION_KEY).unwrap());
        assert!(!store.delete(SESSION_KEY).unwrap());
        assert!(store.load(SESSION_KEY).unwrap().is_none());

        store.save(SESSION_KEY, &make_draw()).unwrap();
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO session_records (key, value, written_at) VALUES (?1, ?2, ?3)",
                params![SESSION_KEY, "{not json", Utc::now().to_rfc3339()],
            )
            .unwrap();

        let store = SessionStore::new(&db.conn);
        assert!(matches!(
            store.load(SESSION_KEY),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_invalid_draw_record_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let record = serde_json::json!({
            "id": "6f1c2d0e-4b7a-4c55-9a61-0d3c7e5b9f21",
            "drawn_at": "2025-12-01T18:00:00Z",
            "results": [
                {"giver": "Alice", "receiver": "Alice", "code": "AAAAAA"},
                {"giver": "Bob", "receiver": "Carol", "code": "AAAAAA"},
                {"giver": "Carol", "receiver": "Bob", "code": "CCCCCC"}
            ]
        });
        db.conn
            .execute(
                "INSERT INTO session_records (key, value, written_at) VALUES (?1, ?2, ?3)",
                params![SESSION_KEY, record.to_string(), Utc::now().to_rfc3339()],
            )
            .unwrap();

        let store = SessionStore::new(&db.conn);
        let err = store.load(SESSION_KEY).unwrap_err();
        assert!(matches!(err, Error::CorruptRecord(_)));
        assert!(err.is_corrupt_record());
    }
}
