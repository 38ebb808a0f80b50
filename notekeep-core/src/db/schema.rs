use chrono::Utc;
use rusqlite::{params, Connection, TransactionBehavior};

use super::format_timestamp;
use crate::error::Result;

struct Migration {
    version: &'static str,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "001",
        name: "initial",
        sql: include_str!("migrations/001_initial.sql"),
    },
    Migration {
        version: "002",
        name: "history_versions",
        sql: include_str!("migrations/002_history_versions.sql"),
    },
];

/// Folders created on first start, as (id, name).
const DEFAULT_FOLDERS: &[(&str, &str)] = &[
    ("personal", "Personal"),
    ("work", "Work"),
    ("projects", "Projects"),
    ("learning", "Learning"),
];

/// Tags created on first start, as (name, color).
const DEFAULT_TAGS: &[(&str, &str)] = &[
    ("important", "bg-red-500"),
    ("javascript", "bg-yellow-500"),
    ("python", "bg-green-500"),
    ("react", "bg-blue-500"),
    ("idea", "bg-purple-500"),
    ("todo", "bg-orange-500"),
    ("backend", "bg-indigo-500"),
    ("frontend", "bg-pink-500"),
    ("algorithms", "bg-cyan-500"),
    ("projects", "bg-teal-500"),
    ("mobile", "bg-rose-500"),
    ("database", "bg-violet-500"),
];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )?;

    let applied = get_applied_migrations(conn)?;

    for migration in MIGRATIONS {
        if !applied.iter().any(|v| v == migration.version) {
            apply_migration(conn, migration)?;
        }
    }

    Ok(())
}

/// Inserts the default folders and tag palette into an empty database.
///
/// Returns `false` without writing anything once any folder exists, so it is
/// safe to call on every start.
pub fn seed_defaults(conn: &mut Connection) -> Result<bool> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let folder_count: i64 = tx.query_row("SELECT COUNT(*) FROM folders", [], |row| row.get(0))?;
    if folder_count > 0 {
        return Ok(false);
    }

    let now = format_timestamp(Utc::now());
    for (id, name) in DEFAULT_FOLDERS {
        tx.execute(
            "INSERT INTO folders (id, name, created_at) VALUES (?, ?, ?)",
            params![id, name, now],
        )?;
    }
    for (name, color) in DEFAULT_TAGS {
        tx.execute(
            "INSERT OR IGNORE INTO tags (name, color) VALUES (?, ?)",
            params![name, color],
        )?;
    }
    tx.commit()?;

    tracing::info!(
        "Seeded {} folders and {} tags",
        DEFAULT_FOLDERS.len(),
        DEFAULT_TAGS.len()
    );
    Ok(true)
}

fn get_applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(versions)
}

fn apply_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    tracing::info!(
        "Applying migration {}: {}",
        migration.version,
        migration.name
    );

    let now = format_timestamp(Utc::now());
    conn.execute_batch(&format!(
        "BEGIN IMMEDIATE; {} INSERT INTO schema_migrations (version, name, applied_at) VALUES ('{}', '{}', '{}'); COMMIT;",
        migration.sql, migration.version, migration.name, now
    ))
    .inspect_err(|e| {
        tracing::error!(
            "Failed to apply migration {}: {}: {}",
            migration.version,
            migration.name,
            e
        );
        let _ = conn.execute_batch("ROLLBACK");
    })?;

    tracing::info!("Migration {} applied successfully", migration.version);
    Ok(())
}
