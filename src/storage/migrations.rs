//! Database migrations for mindful.
//!
//! Each migration upgrades the schema by one version. Migrations run
//! automatically when the database is opened.

use rusqlite::Connection;
use tracing::info;

use crate::error::MindfulError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 for a new database.
pub fn get_version(conn: &Connection) -> Result<i32, MindfulError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| MindfulError::Database(format!("Failed to get schema version: {e}")))
}

fn set_version(conn: &Connection, version: i32) -> Result<(), MindfulError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| MindfulError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), MindfulError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        info!(version, "applying journal schema migration");
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> Result<(), MindfulError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(MindfulError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: journal entries.
fn migrate_v1(conn: &Connection) -> Result<(), MindfulError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS journal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            date TEXT NOT NULL,
            note TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_journal_entries_date
        ON journal_entries(date);

        CREATE INDEX IF NOT EXISTS idx_journal_entries_user
        ON journal_entries(user);
        ",
    )
    .map_err(|e| MindfulError::Database(format!("Migration v1 failed: {e}")))
}
