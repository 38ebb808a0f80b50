use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{format_timestamp, get_timestamp, Database};
use crate::error::{Result, StoreError};
use crate::models::{CreateFolderInput, Folder};

const SELECT_FOLDERS: &str = "
    SELECT f.id, f.name, f.created_at,
           (SELECT COUNT(*) FROM notes n WHERE n.folder_id = f.id)
    FROM folders f";

impl Database {
    /// All folders ordered by name, each with its note count.
    pub fn list_folders(&self) -> Result<Vec<Folder>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{SELECT_FOLDERS} ORDER BY f.name, f.id"))?;

        let folders = stmt
            .query_map([], map_folder)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(folders)
    }

    pub fn get_folder(&self, id: &str) -> Result<Option<Folder>> {
        let conn = self.conn();
        get_folder(&conn, id)
    }

    /// Creates a folder under the caller's id, or a generated UUID.
    /// Fails with [`StoreError::DuplicateKey`] if the id is taken.
    pub fn create_folder(&self, input: CreateFolderInput) -> Result<Folder> {
        let conn = self.conn();
        let id = input.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Utc::now();

        conn.execute(
            "INSERT INTO folders (id, name, created_at) VALUES (?, ?, ?)",
            params![id, input.name, format_timestamp(now)],
        )
        .map_err(|e| {
            if StoreError::is_unique_violation(&e) {
                StoreError::DuplicateKey(format!("folder '{id}' already exists"))
            } else {
                e.into()
            }
        })?;

        tracing::debug!("Created folder {}", id);

        // A caller-chosen id may already be referenced by notes.
        get_folder(&conn, &id)?.ok_or_else(|| StoreError::not_found("folder", id))
    }

    /// Renames a folder in place. Returns `None` if it does not exist.
    pub fn rename_folder(&self, id: &str, name: &str) -> Result<Option<Folder>> {
        let conn = self.conn();
        let rows = conn.execute("UPDATE folders SET name = ? WHERE id = ?", [name, id])?;
        if rows == 0 {
            return Ok(None);
        }
        get_folder(&conn, id)
    }

    /// Deletes a folder. Notes filed in it are kept and keep pointing at
    /// the removed id.
    pub fn delete_folder(&self, id: &str) -> Result<bool> {
        let conn = self.conn();
        let rows = conn.execute("DELETE FROM folders WHERE id = ?", [id])?;
        Ok(rows > 0)
    }
}

fn get_folder(conn: &Connection, id: &str) -> Result<Option<Folder>> {
    let folder = conn
        .query_row(&format!("{SELECT_FOLDERS} WHERE f.id = ?"), [id], map_folder)
        .optional()?;
    Ok(folder)
}

fn map_folder(row: &rusqlite::Row<'_>) -> rusqlite::Result<Folder> {
    Ok(Folder {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: get_timestamp(row, 2)?,
        note_count: row.get(3)?,
    })
}
