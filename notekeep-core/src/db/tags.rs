use rusqlite::{params, Connection, OptionalExtension};

use super::Database;
use crate::error::{Result, StoreError};
use crate::models::{CreateTagInput, Tag};

impl Database {
    /// Looks up a tag id by exact name. Never creates tags.
    pub fn resolve_tag_id(&self, name: &str) -> Result<Option<i64>> {
        let conn = self.conn();
        resolve_tag_id(&conn, name)
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, name, color FROM tags ORDER BY name")?;

        let tags = stmt
            .query_map([], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tags)
    }

    /// Creates a tag. Fails with [`StoreError::DuplicateKey`] if the name is taken.
    pub fn create_tag(&self, input: CreateTagInput) -> Result<Tag> {
        let conn = self.conn();

        conn.execute(
            "INSERT INTO tags (name, color) VALUES (?, ?)",
            params![input.name, input.color],
        )
        .map_err(|e| {
            if StoreError::is_unique_violation(&e) {
                StoreError::DuplicateKey(format!("tag '{}' already exists", input.name))
            } else {
                e.into()
            }
        })?;

        let tag = Tag {
            id: conn.last_insert_rowid(),
            name: input.name,
            color: input.color,
        };
        tracing::debug!("Created tag {} ({})", tag.name, tag.id);
        Ok(tag)
    }
}

pub(super) fn resolve_tag_id(conn: &Connection, name: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row("SELECT id FROM tags WHERE name = ?", [name], |row| row.get(0))
        .optional()?;
    Ok(id)
}

/// Links every resolvable name to the note. Unknown names are skipped and
/// repeated names collapse into one association.
pub(super) fn link_tags(conn: &Connection, note_id: &str, names: &[String]) -> Result<()> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO note_tags (note_id, tag_id) VALUES (?, ?)")?;

    for name in names {
        match resolve_tag_id(conn, name)? {
            Some(tag_id) => {
                stmt.execute(params![note_id, tag_id])?;
            }
            None => tracing::debug!("Skipping unknown tag '{}' for note {}", name, note_id),
        }
    }

    Ok(())
}

/// Replaces the note's whole tag set. Must run inside the caller's transaction.
pub(super) fn replace_note_tags(conn: &Connection, note_id: &str, names: &[String]) -> Result<()> {
    conn.execute("DELETE FROM note_tags WHERE note_id = ?", [note_id])?;
    link_tags(conn, note_id, names)
}
