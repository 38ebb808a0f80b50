//! Domain models for notekeep.
//!
//! # Core Concepts
//!
//! - [`Folder`]: Named grouping container. Notes reference folders by id, but
//!   the reference is not enforced: deleting a folder leaves its notes in place.
//! - [`Tag`]: Named, colored label with a globally unique name. Notes link to
//!   tags many-to-many; the link itself has no identity.
//! - [`Note`]: The primary content entity, one of [`NoteType::Text`],
//!   [`NoteType::Code`] or [`NoteType::List`]. The type is fixed at creation.
//! - [`HistoryEntry`]: Immutable content snapshot of a code note, numbered by
//!   version. Append-only; removed only together with the owning note.

mod folder;
mod history;
mod note;
mod tag;

pub use folder::*;
pub use history::*;
pub use note::*;
pub use tag::*;
