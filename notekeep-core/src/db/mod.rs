mod folders;
mod history;
mod notes;
mod query;
mod schema;
mod tags;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, Row, ToSql};

use crate::error::{Result, StoreError};
use crate::models::NoteType;

/// How long a write waits for another process holding the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the note store.
///
/// Construct once at startup and clone into every consumer; clones share the
/// same connection. Each public operation takes the connection for its whole
/// duration, and every multi-statement write runs in a single
/// `BEGIN IMMEDIATE` transaction, so writers are serialized both inside the
/// process and across processes sharing the file.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path.parent().ok_or_else(|| {
            StoreError::StorageUnavailable(format!(
                "database path {} has no parent directory",
                path.display()
            ))
        })?;
        std::fs::create_dir_all(parent).map_err(|e| {
            StoreError::StorageUnavailable(format!("cannot create {}: {e}", parent.display()))
        })?;

        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::debug!("Opened database at {}", path.display());
        Self::from_connection(conn)
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    /// `<data dir>/notekeep/notes.db` for the current platform.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "notekeep").ok_or_else(|| {
            StoreError::StorageUnavailable("could not determine data directory".to_string())
        })?;
        Ok(dirs.data_dir().join("notes.db"))
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Creates every relation that does not exist yet. Safe to call on every start.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn();
        schema::run_migrations(&conn)
    }

    pub fn migrate(&self) -> Result<()> {
        self.ensure_schema()
    }

    /// Seeds default folders and tags into an empty store.
    /// Returns whether anything was written.
    pub fn seed_defaults(&self) -> Result<bool> {
        let mut conn = self.conn();
        schema::seed_defaults(&mut conn)
    }

    /// A panic while holding the lock cannot leave a half-applied write
    /// behind (the open transaction rolls back on drop), so a poisoned lock
    /// is still safe to use.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn get_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl ToSql for NoteType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for NoteType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        NoteType::from_str(raw)
            .ok_or_else(|| FromSqlError::Other(format!("unknown note type '{raw}'").into()))
    }
}
