use chrono::Utc;
use rusqlite::{params, Connection};

use super::{format_timestamp, get_timestamp, Database};
use crate::error::{Result, StoreError};
use crate::models::{HistoryEntry, CONTENT_MODIFIED_CHANGE, INITIAL_CHANGE};

/// Attempts at appending a change before giving up on a version collision.
const MAX_APPEND_ATTEMPTS: usize = 3;

impl Database {
    /// Snapshots of a note in ascending version order. Empty for unknown notes.
    pub fn list_history(&self, note_id: &str) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn();
        list_history(&conn, note_id)
    }

    /// Like [`Database::list_history`], but fails with
    /// [`StoreError::NotFound`] when the note does not exist.
    pub fn get_note_history(&self, note_id: &str) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn();

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?)",
            [note_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StoreError::not_found("note", note_id));
        }

        list_history(&conn, note_id)
    }
}

/// Records version 1 of a freshly created note.
pub(super) fn record_initial(conn: &Connection, note_id: &str, content: &str) -> Result<HistoryEntry> {
    insert_entry(conn, note_id, 1, content, INITIAL_CHANGE)
}

/// Appends the next version for a content change.
///
/// The version is `max + 1` read inside the caller's write transaction. The
/// unique `(note_id, version)` index catches anything that slips past that;
/// on a collision the version is recomputed and the insert retried.
pub(super) fn record_change(conn: &Connection, note_id: &str, content: &str) -> Result<HistoryEntry> {
    let mut attempt = 1;
    loop {
        let version = next_version(conn, note_id)?;
        match insert_entry(conn, note_id, version, content, CONTENT_MODIFIED_CHANGE) {
            Err(StoreError::Storage(e))
                if attempt < MAX_APPEND_ATTEMPTS && StoreError::is_unique_violation(&e) =>
            {
                tracing::warn!(
                    "History version {} for note {} already taken, retrying",
                    version,
                    note_id
                );
                attempt += 1;
            }
            result => return result,
        }
    }
}

fn next_version(conn: &Connection, note_id: &str) -> Result<i64> {
    let max: Option<i64> = conn.query_row(
        "SELECT MAX(version) FROM note_history WHERE note_id = ?",
        [note_id],
        |row| row.get(0),
    )?;
    Ok(max.unwrap_or(0) + 1)
}

fn insert_entry(
    conn: &Connection,
    note_id: &str,
    version: i64,
    content: &str,
    changes: &str,
) -> Result<HistoryEntry> {
    let now = Utc::now();

    conn.execute(
        "INSERT INTO note_history (note_id, version, content, changes, timestamp)
         VALUES (?, ?, ?, ?, ?)",
        params![note_id, version, content, changes, format_timestamp(now)],
    )?;

    tracing::debug!("Recorded version {} of note {}", version, note_id);

    Ok(HistoryEntry {
        id: conn.last_insert_rowid(),
        note_id: note_id.to_string(),
        version,
        content: content.to_string(),
        changes: changes.to_string(),
        timestamp: now,
    })
}

fn list_history(conn: &Connection, note_id: &str) -> Result<Vec<HistoryEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, note_id, version, content, changes, timestamp
         FROM note_history WHERE note_id = ? ORDER BY version",
    )?;

    let entries = stmt
        .query_map([note_id], |row| {
            Ok(HistoryEntry {
                id: row.get(0)?,
                note_id: row.get(1)?,
                version: row.get(2)?,
                content: row.get(3)?,
                changes: row.get(4)?,
                timestamp: get_timestamp(row, 5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(entries)
}
