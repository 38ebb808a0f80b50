use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named grouping container for notes.
///
/// Folder ids are opaque strings. Callers may choose them (`"work"`), otherwise
/// a UUID is generated on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Number of notes whose `folder_id` points at this folder.
    #[serde(default)]
    pub note_count: i64,
}

/// Input for creating a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderInput {
    /// Caller-supplied id. `None` generates a UUID.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// Input for renaming a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameFolderInput {
    pub name: String,
}
