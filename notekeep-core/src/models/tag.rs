use serde::{Deserialize, Serialize};

/// A named, colored label attachable to many notes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    /// Globally unique.
    pub name: String,
    /// Presentation token, e.g. `bg-green-500`. Stored verbatim.
    pub color: String,
}

/// Input for creating a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagInput {
    pub name: String,
    pub color: String,
}

/// A tag as it appears on a hydrated note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteTag {
    pub name: String,
    pub color: String,
}
