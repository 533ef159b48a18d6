//! SQLite-backed key-value store for the timer snapshot.
//!
//! The engine state is saved as one JSON document under [`STATE_KEY`] and
//! restored verbatim; there is no schema for its fields.

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::warn;

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::timer::TimerState;

pub const STATE_KEY: &str = "timer_state";

/// Loads and saves the timer snapshot.
pub trait StateStore {
    /// Previously saved state, or `None` if nothing usable is stored.
    fn load_state(&self) -> Result<Option<TimerState>>;

    fn save_state(&self, state: &TimerState) -> Result<()>;
}

/// SQLite database holding the kv table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/breakbank.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("breakbank.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl StateStore for Database {
    /// An unreadable snapshot is logged and treated as absent.
    fn load_state(&self) -> Result<Option<TimerState>> {
        let Some(json) = self.kv_get(STATE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<TimerState>(&json) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(error = %e, "discarding unreadable timer snapshot");
                Ok(None)
            }
        }
    }

    fn save_state(&self, state: &TimerState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.kv_set(STATE_KEY, &json)?;
        Ok(())
    }
}
