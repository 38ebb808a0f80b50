use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

use super::query::fetch_note;
use super::{format_timestamp, get_timestamp, history, tags, Database};
use crate::error::{Result, StoreError};
use crate::models::{CreateNoteInput, Note, NoteType, UpdateNoteInput};

/// The stored columns an update needs to decide what changed.
struct StoredNote {
    title: String,
    content: String,
    note_type: NoteType,
    created_at: DateTime<Utc>,
}

impl Database {
    /// Creates a note, links its known tags and, for code notes, records
    /// version 1 of its history. All in one transaction.
    ///
    /// `folder_id` is stored as given, even if no such folder exists.
    pub fn create_note(&self, input: CreateNoteInput) -> Result<Note> {
        let mut conn = self.conn();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let id = Uuid::new_v4().to_string();
        let now = format_timestamp(Utc::now());

        tx.execute(
            "INSERT INTO notes (id, title, content, type, folder_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                input.title,
                input.content,
                input.note_type,
                input.folder_id,
                now,
                now,
            ],
        )?;

        tags::link_tags(&tx, &id, &input.tag_names)?;

        if input.note_type.is_versioned() {
            history::record_initial(&tx, &id, &input.content)?;
        }

        let note = fetch_note(&tx, &id)?.ok_or_else(|| StoreError::not_found("note", &id))?;
        tx.commit()?;

        tracing::debug!("Created {} note {}", note.note_type, note.id);
        Ok(note)
    }

    /// Applies a partial update. Returns `None` if the note does not exist.
    ///
    /// Supplying a title or content (even an unchanged one) refreshes
    /// `updated_at` once. A code note whose content differs from the stored
    /// content gets a new history version. `tag_names: Some(_)` replaces the
    /// tag set. The whole update is one transaction.
    pub fn update_note(&self, id: &str, input: UpdateNoteInput) -> Result<Option<Note>> {
        let mut conn = self.conn();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(stored) = load_stored_note(&tx, id)? else {
            return Ok(None);
        };

        if input.title.is_some() || input.content.is_some() {
            // Never let a clock step make updated_at precede created_at.
            let now = Utc::now().max(stored.created_at);
            let title = input.title.as_deref().unwrap_or(&stored.title);
            let content = input.content.as_deref().unwrap_or(&stored.content);

            tx.execute(
                "UPDATE notes SET title = ?, content = ?, updated_at = ? WHERE id = ?",
                params![title, content, format_timestamp(now), id],
            )?;

            if stored.note_type.is_versioned() && content != stored.content {
                history::record_change(&tx, id, content)?;
            }
        }

        if let Some(tag_names) = &input.tag_names {
            tags::replace_note_tags(&tx, id, tag_names)?;
        }

        let note = fetch_note(&tx, id)?;
        tx.commit()?;

        tracing::debug!("Updated note {}", id);
        Ok(note)
    }

    /// Deletes a note together with its tag links and history.
    /// Returns whether a note was removed.
    pub fn delete_note(&self, id: &str) -> Result<bool> {
        let conn = self.conn();
        let rows = conn.execute("DELETE FROM notes WHERE id = ?", [id])?;
        if rows > 0 {
            tracing::debug!("Deleted note {}", id);
        }
        Ok(rows > 0)
    }
}

fn load_stored_note(conn: &Connection, id: &str) -> Result<Option<StoredNote>> {
    let stored = conn
        .query_row(
            "SELECT title, content, type, created_at FROM notes WHERE id = ?",
            [id],
            |row| {
                Ok(StoredNote {
                    title: row.get(0)?,
                    content: row.get(1)?,
                    note_type: row.get(2)?,
                    created_at: get_timestamp(row, 3)?,
                })
            },
        )
        .optional()?;
    Ok(stored)
}
