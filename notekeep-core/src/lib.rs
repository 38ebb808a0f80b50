//! Storage and query engine for notekeep.
//!
//! Notes live in folders, carry tags, and (for code notes) keep an
//! append-only revision history. Everything goes through a [`db::Database`]
//! handle that callers construct once and clone where needed.

pub mod db;
pub mod error;
pub mod models;

pub use db::Database;
pub use error::{Result, StoreError};
