pub mod schema;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Raw rows persisted for one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRows {
    pub rows_json: String,
    pub fetched_at: DateTime<Utc>,
}

/// A weight code the user produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeRecord {
    pub id: i64,
    pub code: String,
    pub created_at: String,
}

pub struct Database {
    conn: Connection,
}

/// Thread-safe wrapper around Database.
#[derive(Clone)]
pub struct SharedDatabase {
    inner: Arc<Mutex<Database>>,
}

impl SharedDatabase {
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        let db = Database::open(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(db)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Database> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up cached rows for a variable in a dataset.
    pub fn cached_rows(&self, source_id: &str, dataset: &str) -> Result<Option<CachedRows>, rusqlite::Error> {
        self.lock().cached_rows(source_id, dataset)
    }

    /// Cache fetched rows, replacing any older copy.
    pub fn store_rows(&self, source_id: &str, dataset: &str, rows_json: &str) -> Result<(), rusqlite::Error> {
        self.lock().store_rows(source_id, dataset, rows_json)
    }

    /// Drop every cached row set.
    pub fn clear_cache(&self) -> Result<usize, rusqlite::Error> {
        self.lock().clear_cache()
    }

    pub fn cached_label(&self, source_id: &str, dataset: &str) -> Result<Option<String>, rusqlite::Error> {
        self.lock().cached_label(source_id, dataset)
    }

    pub fn store_label(&self, source_id: &str, dataset: &str, label: &str) -> Result<(), rusqlite::Error> {
        self.lock().store_label(source_id, dataset, label)
    }

    /// Record a code unless it equals the most recent one. Returns whether it was stored.
    pub fn record_code(&self, code: &str) -> Result<bool, rusqlite::Error> {
        self.lock().record_code(code)
    }

    pub fn last_code(&self) -> Result<Option<String>, rusqlite::Error> {
        self.lock().last_code()
    }

    pub fn recent_codes(&self, limit: usize) -> Result<Vec<CodeRecord>, rusqlite::Error> {
        self.lock().recent_codes(limit)
    }
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        schema::migrate(&conn)?;
        Ok(Self { conn })
    }

    pub fn cached_rows(&self, source_id: &str, dataset: &str) -> Result<Option<CachedRows>, rusqlite::Error> {
        let found: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT rows_json, fetched_at FROM stat_cache WHERE source_id = ?1 AND dataset = ?2",
                rusqlite::params![source_id, dataset],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(found.map(|(rows_json, fetched_at)| CachedRows {
            rows_json,
            // An unreadable timestamp counts as long expired.
            fetched_at: DateTime::parse_from_rfc3339(&fetched_at)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }))
    }

    pub fn store_rows(&self, source_id: &str, dataset: &str, rows_json: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO stat_cache (source_id, dataset, rows_json, fetched_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![source_id, dataset, rows_json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn clear_cache(&self) -> Result<usize, rusqlite::Error> {
        self.conn.execute("DELETE FROM stat_cache", [])
    }

    pub fn cached_label(&self, source_id: &str, dataset: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT label FROM variable_labels WHERE source_id = ?1 AND dataset = ?2",
                rusqlite::params![source_id, dataset],
                |row| row.get(0),
            )
            .optional()
    }

    pub fn store_label(&self, source_id: &str, dataset: &str, label: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO variable_labels (source_id, dataset, label) VALUES (?1, ?2, ?3)",
            rusqlite::params![source_id, dataset, label],
        )?;
        Ok(())
    }

    pub fn record_code(&self, code: &str) -> Result<bool, rusqlite::Error> {
        if self.last_code()?.as_deref() == Some(code) {
            return Ok(false);
        }
        self.conn.execute(
            "INSERT INTO codes (code, created_at) VALUES (?1, datetime('now'))",
            rusqlite::params![code],
        )?;
        Ok(true)
    }

    pub fn last_code(&self) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row("SELECT code FROM codes ORDER BY id DESC LIMIT 1", [], |row| row.get(0))
            .optional()
    }

    fn row_to_code(row: &rusqlite::Row) -> rusqlite::Result<CodeRecord> {
        Ok(CodeRecord {
            id: row.get(0)?,
            code: row.get(1)?,
            created_at: row.get(2)?,
        })
    }

    pub fn recent_codes(&self, limit: usize) -> Result<Vec<CodeRecord>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, code, created_at FROM codes ORDER BY id DESC LIMIT ?1")?;
        let rows = stmt.query_map(rusqlite::params![limit as i64], Self::row_to_code)?;
        rows.collect()
    }
}
