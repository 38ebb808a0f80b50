//! Error taxonomy for store operations.
//!
//! Lookup misses are not errors: single-entity reads and writes return
//! `Ok(None)` or `Ok(false)`. [`StoreError::NotFound`] is reserved for
//! operations whose contract requires the entity to exist.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A unique constraint rejected the write (tag name, folder id).
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The database file could not be located or opened.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Whether the underlying SQLite error is a UNIQUE/PRIMARY KEY violation.
    pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
    }
}

/// Result type for all store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
