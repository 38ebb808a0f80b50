use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Change label recorded for the first snapshot of a code note.
pub const INITIAL_CHANGE: &str = "initial";

/// Change label recorded whenever a code note's content changes.
pub const CONTENT_MODIFIED_CHANGE: &str = "content modified";

/// An immutable snapshot of a code note's content.
///
/// Versions start at 1 and increase by one per content change, with no gaps.
/// Entries are never edited; they disappear only when the note is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: i64,
    pub note_id: String,
    pub version: i64,
    /// Full content of the note at this version.
    pub content: String,
    /// Change label, see [`INITIAL_CHANGE`] and [`CONTENT_MODIFIED_CHANGE`].
    pub changes: String,
    pub timestamp: DateTime<Utc>,
}
