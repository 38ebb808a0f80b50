//! Filtered note listings.
//!
//! Notes are outer-joined with their tags, one row per (note, tag) pair, and
//! folded back into one hydrated [`Note`] per id. Rows arrive ordered by the
//! note sort key, so all rows of a note are adjacent and folding is a single
//! pass.

use rusqlite::{params_from_iter, Connection};

use super::{get_timestamp, Database};
use crate::error::Result;
use crate::models::{Note, NoteFilter, NoteTag};

const SELECT_NOTES: &str = "
    SELECT n.id, n.title, n.content, n.type, n.folder_id, n.created_at, n.updated_at,
           t.name, t.color
    FROM notes n
    LEFT JOIN note_tags nt ON nt.note_id = n.id
    LEFT JOIN tags t ON t.id = nt.tag_id
    WHERE 1 = 1";

// Tie-break on rowid so notes updated in the same microsecond still come
// back in a stable order.
const ORDER_NOTES: &str = " ORDER BY n.updated_at DESC, n.rowid DESC, t.name";

impl Database {
    /// Lists notes matching every given filter, most recently updated first.
    ///
    /// The tag filter only decides which notes match; each returned note
    /// still carries all of its tags. Empty filter strings count as absent.
    pub fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        let conn = self.conn();
        query_notes(&conn, None, filter)
    }

    /// Fetches one hydrated note by exact id.
    pub fn get_note(&self, id: &str) -> Result<Option<Note>> {
        let conn = self.conn();
        fetch_note(&conn, id)
    }
}

pub(super) fn fetch_note(conn: &Connection, id: &str) -> Result<Option<Note>> {
    let notes = query_notes(conn, Some(id), &NoteFilter::default())?;
    Ok(notes.into_iter().next())
}

fn query_notes(conn: &Connection, id: Option<&str>, filter: &NoteFilter) -> Result<Vec<Note>> {
    let mut sql = String::from(SELECT_NOTES);
    let mut params: Vec<String> = Vec::new();

    if let Some(id) = id {
        sql.push_str(" AND n.id = ?");
        params.push(id.to_string());
    }

    if let Some(folder_id) = non_empty(&filter.folder_id) {
        sql.push_str(" AND n.folder_id = ?");
        params.push(folder_id.to_string());
    }

    if let Some(search) = non_empty(&filter.search) {
        sql.push_str(" AND (n.title LIKE ? ESCAPE '\\' OR n.content LIKE ? ESCAPE '\\')");
        let pattern = format!("%{}%", escape_like(search));
        params.push(pattern.clone());
        params.push(pattern);
    }

    if let Some(tag) = non_empty(&filter.tag) {
        sql.push_str(
            " AND EXISTS (SELECT 1 FROM note_tags ft JOIN tags ftt ON ftt.id = ft.tag_id
                          WHERE ft.note_id = n.id AND ftt.name = ?)",
        );
        params.push(tag.to_string());
    }

    sql.push_str(ORDER_NOTES);

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(params.iter()))?;

    let mut notes: Vec<Note> = Vec::new();
    while let Some(row) = rows.next()? {
        let note_id: String = row.get(0)?;
        let tag = match (row.get::<_, Option<String>>(7)?, row.get::<_, Option<String>>(8)?) {
            (Some(name), Some(color)) => Some(NoteTag { name, color }),
            _ => None,
        };

        if let Some(current) = notes.last_mut().filter(|n| n.id == note_id) {
            current.tags.extend(tag);
            continue;
        }

        notes.push(Note {
            id: note_id,
            title: row.get(1)?,
            content: row.get(2)?,
            note_type: row.get(3)?,
            folder_id: row.get(4)?,
            created_at: get_timestamp(row, 5)?,
            updated_at: get_timestamp(row, 6)?,
            tags: tag.into_iter().collect(),
        });
    }

    Ok(notes)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Escapes LIKE wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("print(2)"), "print(2)");
    }

    #[test]
    fn non_empty_treats_blank_as_absent() {
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some("work".to_string())), Some("work"));
    }
}
