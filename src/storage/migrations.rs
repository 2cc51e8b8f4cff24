//! Database migrations for flowclock.
//!
//! Each migration upgrades the schema by one version. The schema version is
//! kept in `PRAGMA user_version`, so table creation happens exactly once per
//! database file.

use rusqlite::Connection;
use tracing::info;

use crate::error::FlowError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 for a new database.
pub fn get_version(conn: &Connection) -> Result<i32, FlowError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| FlowError::Database(format!("Failed to get schema version: {e}")))
}

fn set_version(conn: &Connection, version: i32) -> Result<(), FlowError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| FlowError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), FlowError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        run_migration(conn, version)?;
        set_version(conn, version)?;
        info!(version, "applied schema migration");
    }

    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> Result<(), FlowError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(FlowError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: the session log.
///
/// `date_time` is the instant the session ended (start + actual minutes);
/// `started_at` is the countdown start.
fn migrate_v1(conn: &Connection) -> Result<(), FlowError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS focus_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date_time TEXT NOT NULL,
            started_at TEXT NOT NULL,
            category TEXT NOT NULL,
            task TEXT NOT NULL,
            estimated_minutes INTEGER NOT NULL,
            actual_minutes REAL NOT NULL,
            completed INTEGER NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            focus_level INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_focus_sessions_started
        ON focus_sessions(started_at);
        ",
    )
    .map_err(|e| FlowError::Database(format!("Migration v1 failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_v1() {
        let conn = Connection::open_in_memory().unwrap();

        run(&conn).unwrap();
        assert_eq!(get_version(&conn).unwrap(), CURRENT_VERSION);

        conn.execute(
            "INSERT INTO focus_sessions
             (date_time, started_at, category, task, estimated_minutes,
              actual_minutes, completed, focus_level)
             VALUES ('2026-03-14 09:25:00.000', '2026-03-14 09:00:00.000',
                     'Work', 'Emails', 25, 25.0, 1, 4)",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_migration_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run(&conn).unwrap();
        run(&conn).unwrap();

        assert_eq!(get_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_get_version_new_database() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_version(&conn).unwrap(), 0);
    }
}
