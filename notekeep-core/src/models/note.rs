use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NoteTag;
use crate::error::StoreError;

/// A short text artifact, optionally filed in a folder and tagged.
///
/// Returned fully hydrated: `tags` holds every tag attached to the note,
/// regardless of any tag filter used to find it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    /// Folder reference. Not checked against existing folders and may dangle.
    pub folder_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Attached tags, sorted by name.
    #[serde(default)]
    pub tags: Vec<NoteTag>,
}

impl Note {
    /// Tag names in the order they appear in `tags`.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

/// The fixed kind of a note.
///
/// - `Text`: free prose
/// - `Code`: source snippet, the only kind with revision history
/// - `List`: checklist style content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum NoteType {
    Text,
    Code,
    List,
}

impl NoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Code => "code",
            Self::List => "list",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "code" => Some(Self::Code),
            "list" => Some(Self::List),
            _ => None,
        }
    }

    /// Like [`NoteType::from_str`], but reports unknown values as
    /// [`StoreError::InvalidArgument`].
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        Self::from_str(s).ok_or_else(|| {
            StoreError::InvalidArgument(format!(
                "unknown note type '{s}', expected one of: text, code, list"
            ))
        })
    }

    /// Whether content changes of this kind are recorded in history.
    pub fn is_versioned(&self) -> bool {
        matches!(self, Self::Code)
    }
}

impl TryFrom<String> for NoteType {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNoteInput {
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    #[serde(default)]
    pub folder_id: Option<String>,
    /// Names of existing tags to attach. Unknown names are ignored.
    #[serde(default)]
    pub tag_names: Vec<String>,
}

/// Input for updating a note. Absent fields are left untouched.
///
/// `tag_names: Some(vec![])` clears all tags; `None` keeps them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNoteInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tag_names: Option<Vec<String>>,
}

/// Filters for listing notes. All filters combine with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteFilter {
    /// Exact folder id match.
    #[serde(default)]
    pub folder_id: Option<String>,
    /// Substring match against title or content.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact tag name the note must carry.
    #[serde(default)]
    pub tag: Option<String>,
}
