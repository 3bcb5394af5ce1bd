//! SQLite-based persistence.
//!
//! Provides persistent storage for:
//! - The settings blob and other JSON values in a key-value table
//! - The append-only exercise log
//! - Hydration timestamps
//! - Body-part history and the serialized timer/session snapshot

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::app::AppSnapshot;
use crate::body::Category;
use crate::error::DatabaseError;
use crate::ledger::{BodyPartHistory, ExerciseLogEntry, Ledger};
use crate::settings::{Settings, STORAGE_KEY};

const HISTORY_KEY: &str = "body_part_history";
const SNAPSHOT_KEY: &str = "app_snapshot";

/// SQLite database holding everything that outlives a process.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/actearly/actearly.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        Self::open_at(data_dir()?.join("actearly.db"))
    }

    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
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
            );

            CREATE TABLE IF NOT EXISTS exercise_log (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                name      TEXT NOT NULL,
                category  TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS hydration_log (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_exercise_log_timestamp ON exercise_log(timestamp);
            CREATE INDEX IF NOT EXISTS idx_hydration_log_timestamp ON hydration_log(timestamp);",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn kv_get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DatabaseError> {
        let Some(raw) = self.kv_get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| DatabaseError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn kv_set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DatabaseError> {
        let raw = serde_json::to_string(value).map_err(|e| DatabaseError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(key, &raw)
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Saved settings, or `None` when nothing usable is stored. Read,
    /// decode and validation failures are logged, never returned.
    pub fn load_settings(&self) -> Option<Settings> {
        match self.kv_get_json::<Settings>(STORAGE_KEY) {
            Ok(Some(settings)) => match settings.validate() {
                Ok(()) => Some(settings),
                Err(e) => {
                    tracing::warn!("ignoring saved settings: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("ignoring saved settings: {e}");
                None
            }
        }
    }

    /// Saved settings or defaults.
    pub fn load_settings_or_default(&self) -> Settings {
        self.load_settings().unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), DatabaseError> {
        self.kv_set_json(STORAGE_KEY, settings)
    }

    // ── Ledger ───────────────────────────────────────────────────────

    pub fn append_log(&self, entries: &[ExerciseLogEntry]) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        insert_log(&tx, entries)?;
        tx.commit()?;
        Ok(())
    }

    /// All log entries in insertion order. Rows with an unknown category
    /// are skipped.
    pub fn load_log(&self) -> Result<Vec<ExerciseLogEntry>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, category, timestamp FROM exercise_log ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (name, category, timestamp) = row?;
            match category.parse::<Category>() {
                Ok(category) => entries.push(ExerciseLogEntry {
                    name,
                    category,
                    timestamp,
                }),
                Err(e) => tracing::warn!("skipping log entry '{name}': {e}"),
            }
        }
        Ok(entries)
    }

    pub fn log_hydration(&self, timestamp: u64) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO hydration_log (timestamp) VALUES (?1)",
            params![timestamp],
        )?;
        Ok(())
    }

    pub fn load_hydration(&self) -> Result<Vec<u64>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT timestamp FROM hydration_log ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, u64>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn save_history(&self, history: &BodyPartHistory) -> Result<(), DatabaseError> {
        self.kv_set_json(HISTORY_KEY, history)
    }

    /// Stored history; a corrupt blob reads as empty.
    pub fn load_history(&self) -> BodyPartHistory {
        match self.kv_get_json(HISTORY_KEY) {
            Ok(history) => history.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("ignoring saved body-part history: {e}");
                BodyPartHistory::default()
            }
        }
    }

    pub fn load_ledger(&self) -> Result<Ledger, DatabaseError> {
        Ok(Ledger::new(
            self.load_history(),
            self.load_log()?,
            self.load_hydration()?,
        ))
    }

    /// Persist one finished session: its log entries and the updated history.
    pub fn record_completion(
        &self,
        entries: &[ExerciseLogEntry],
        history: &BodyPartHistory,
    ) -> Result<(), DatabaseError> {
        let raw = serde_json::to_string(history).map_err(|e| DatabaseError::Corrupt {
            key: HISTORY_KEY.to_string(),
            message: e.to_string(),
        })?;
        let tx = self.conn.unchecked_transaction()?;
        insert_log(&tx, entries)?;
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![HISTORY_KEY, raw],
        )?;
        tx.commit()?;
        Ok(())
    }

    // ── Runtime snapshot ─────────────────────────────────────────────

    pub fn save_snapshot(&self, snapshot: &AppSnapshot) -> Result<(), DatabaseError> {
        self.kv_set_json(SNAPSHOT_KEY, snapshot)
    }

    pub fn load_snapshot(&self) -> Option<AppSnapshot> {
        match self.kv_get_json(SNAPSHOT_KEY) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("ignoring saved timer state: {e}");
                None
            }
        }
    }
}

fn insert_log(conn: &Connection, entries: &[ExerciseLogEntry]) -> Result<(), rusqlite::Error> {
    let mut stmt =
        conn.prepare("INSERT INTO exercise_log (name, category, timestamp) VALUES (?1, ?2, ?3)")?;
    for entry in entries {
        stmt.execute(params![entry.name, entry.category.as_str(), entry.timestamp])?;
    }
    Ok(())
}
