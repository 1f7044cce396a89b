//! SQLite storage layer for giftdraw

mod migrations;
mod parse;
mod session;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

use crate::error::Result;
use crate::models::DrawResult;

pub use session::{SessionStore, SESSION_KEY};
pub use traits::DrawRepository;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Get session record store
    pub fn sessions(&self) -> SessionStore<'_> {
        SessionStore::new(&self.conn)
    }
}

impl DrawRepository for Database {
    fn save_draw(&self, result: &DrawResult) -> Result<()> {
        self.sessions().save(SESSION_KEY, result)
    }

    fn load_draw(&self) -> Result<Option<DrawResult>> {
        self.sessions().load(SESSION_KEY)
    }

    fn delete_draw(&self) -> Result<bool> {
        self.sessions().delete(SESSION_KEY)
    }
}
