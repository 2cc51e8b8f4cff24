//! Append-only session log.
//!
//! Persists finished session records to the local database. Records are
//! never updated or deleted once written.

use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Row};
use tracing::{debug, warn};

use super::record::{RecordDraft, SessionRecord};
use crate::error::FlowError;
use crate::storage::Database;

/// Text form of timestamps in the database. Sorts chronologically.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const SELECT_COLUMNS: &str = r"SELECT id, started_at, category, task, estimated_minutes,
                                      actual_minutes, completed, notes, focus_level
                               FROM focus_sessions";

/// A row as stored, before validation.
struct StoredRow {
    id: i64,
    started_at: String,
    category: String,
    task: String,
    estimated_minutes: i64,
    actual_minutes: f64,
    completed: bool,
    notes: String,
    focus_level: i64,
}

/// Storage for finished focus sessions.
#[derive(Debug)]
pub struct SessionLog {
    db: Database,
}

impl SessionLog {
    /// Create a log backed by an open database.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Open (or create) the log at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_at(path: &Path) -> Result<Self, FlowError> {
        Ok(Self::with_database(Database::open_at(path)?))
    }

    /// Open the log at `path` only if the file already exists.
    ///
    /// Read-only commands use this so that looking at history never creates
    /// a store; `None` means "no sessions yet".
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be opened.
    pub fn open_existing(path: &Path) -> Result<Option<Self>, FlowError> {
        if !path.exists() {
            debug!(path = %path.display(), "no session log yet");
            return Ok(None);
        }
        Self::open_at(path).map(Some)
    }

    /// Append one record. Returns its row id.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Database` if the insert fails; nothing is written
    /// in that case.
    pub fn append(&self, record: &SessionRecord) -> Result<i64, FlowError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO focus_sessions
              (date_time, started_at, category, task, estimated_minutes,
               actual_minutes, completed, notes, focus_level)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                format_timestamp(record.end_timestamp),
                format_timestamp(record.start_timestamp),
                record.category,
                record.task_name,
                record.estimated_minutes,
                record.actual_minutes,
                record.completed,
                record.notes,
                i64::from(record.focus_level),
            ],
        )
        .map_err(|e| FlowError::Database(format!("Failed to append session: {e}")))?;

        let id = conn.last_insert_rowid();
        debug!(id, task = %record.task_name, "session appended");
        Ok(id)
    }

    /// Every record, in append order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_all(&self) -> Result<Vec<SessionRecord>, FlowError> {
        self.query(&format!("{SELECT_COLUMNS} ORDER BY id"), &[])
    }

    /// Records whose start falls on `date`, in append order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_day(&self, date: NaiveDate) -> Result<Vec<SessionRecord>, FlowError> {
        let from = date.and_time(NaiveTime::MIN);
        let to = from + Duration::days(1);

        self.query(
            &format!("{SELECT_COLUMNS} WHERE started_at >= ?1 AND started_at < ?2 ORDER BY id"),
            &[&format_timestamp(from), &format_timestamp(to)],
        )
    }

    /// The most recent `limit` records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>, FlowError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query(&format!("{SELECT_COLUMNS} ORDER BY id DESC LIMIT ?1"), &[&limit])
    }

    /// Number of stored rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[cfg(test)]
    pub fn count(&self) -> Result<usize, FlowError> {
        let count: i64 = self
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM focus_sessions", [], |row| row.get(0))
            .map_err(|e| FlowError::Database(format!("Failed to count sessions: {e}")))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn query(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<SessionRecord>, FlowError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| FlowError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, read_row)
            .map_err(|e| FlowError::Database(format!("Failed to query sessions: {e}")))?;

        let mut records = Vec::new();
        for row in rows {
            // A partially written or hand-edited row must not hide the rest.
            let decoded = row
                .map_err(|e| FlowError::Database(e.to_string()))
                .and_then(row_to_record);
            match decoded {
                Ok(record) => records.push(record),
                Err(e) => warn!("skipping unreadable session row: {e}"),
            }
        }

        Ok(records)
    }
}

fn read_row(row: &Row) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        id: row.get(0)?,
        started_at: row.get(1)?,
        category: row.get(2)?,
        task: row.get(3)?,
        estimated_minutes: row.get(4)?,
        actual_minutes: row.get(5)?,
        completed: row.get(6)?,
        notes: row.get(7)?,
        focus_level: row.get(8)?,
    })
}

fn row_to_record(row: StoredRow) -> Result<SessionRecord, FlowError> {
    let start_timestamp = parse_timestamp(&row.started_at).ok_or_else(|| {
        FlowError::InvalidRecord(format!("row {}: bad start time {:?}", row.id, row.started_at))
    })?;
    let estimated_minutes = u32::try_from(row.estimated_minutes).map_err(|_| {
        FlowError::InvalidRecord(format!(
            "row {}: bad estimate {}",
            row.id, row.estimated_minutes
        ))
    })?;

    RecordDraft {
        category: row.category,
        task_name: row.task,
        estimated_minutes,
        actual_minutes: row.actual_minutes,
        completed: row.completed,
        notes: row.notes,
        focus_level: row.focus_level,
        start_timestamp,
    }
    .finalize()
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
}
