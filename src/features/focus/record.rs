//! Session records.
//!
//! A [`SessionRecord`] is the immutable description of one finished work
//! interval. Records are produced by the session clock (or by `flowclock log`
//! for sessions entered after the fact) and consumed by the aggregator.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Placeholder used when a session is started without a task name.
pub const DEFAULT_TASK_NAME: &str = "Unnamed Task";

/// Notes placeholder written by older logs; treated as "no notes".
pub const LEGACY_EMPTY_NOTES: &str = "No notes provided.";

/// A 1-5 self-rating of concentration quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct FocusLevel(u8);

impl FocusLevel {
    /// Lowest valid rating.
    pub const MIN: u8 = 1;
    /// Highest valid rating.
    pub const MAX: u8 = 5;

    /// Validate a raw rating.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidRating` if `value` is outside 1..=5.
    pub fn new(value: i64) -> Result<Self, FlowError> {
        match u8::try_from(value) {
            Ok(v) if (Self::MIN..=Self::MAX).contains(&v) => Ok(Self(v)),
            _ => Err(FlowError::InvalidRating(value)),
        }
    }

    /// The rating as an integer.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for FocusLevel {
    type Error = FlowError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FocusLevel> for i64 {
    fn from(level: FocusLevel) -> Self {
        Self::from(level.0)
    }
}

impl std::fmt::Display for FocusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

/// One completed (or partially completed) work interval.
///
/// Invariant: `end_timestamp == start_timestamp + actual_minutes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Category tag (Work, Study, ...).
    pub category: String,
    /// Display name of the task.
    pub task_name: String,
    /// Planned duration in whole minutes.
    pub estimated_minutes: u32,
    /// Time actually spent, in minutes (2-decimal precision).
    pub actual_minutes: f64,
    /// False when the session was stopped early and saved as partial progress.
    pub completed: bool,
    /// Free-form reflection, possibly empty.
    pub notes: String,
    /// Self-rated focus quality.
    pub focus_level: FocusLevel,
    /// When the countdown began.
    pub start_timestamp: NaiveDateTime,
    /// `start_timestamp + actual_minutes`.
    pub end_timestamp: NaiveDateTime,
}

/// Unvalidated record fields.
///
/// All record construction goes through [`RecordDraft::finalize`] so the
/// invariants live in one place.
#[derive(Debug, Clone)]
pub struct RecordDraft {
    /// Category tag.
    pub category: String,
    /// Task name; blank names become [`DEFAULT_TASK_NAME`].
    pub task_name: String,
    /// Planned minutes.
    pub estimated_minutes: u32,
    /// Minutes spent; rounded to hundredths on finalize.
    pub actual_minutes: f64,
    /// Completion flag.
    pub completed: bool,
    /// Notes; trimmed on finalize.
    pub notes: String,
    /// Raw focus rating.
    pub focus_level: i64,
    /// Start instant.
    pub start_timestamp: NaiveDateTime,
}

impl RecordDraft {
    /// Validate the draft and derive the end timestamp.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidRating` for a rating outside 1..=5 and
    /// `FlowError::InvalidRecord` for a negative or non-finite duration, or one
    /// whose end falls outside the representable calendar.
    pub fn finalize(self) -> Result<SessionRecord, FlowError> {
        let focus_level = FocusLevel::new(self.focus_level)?;

        if !self.actual_minutes.is_finite() || self.actual_minutes < 0.0 {
            return Err(FlowError::InvalidRecord(format!(
                "actual minutes must be a non-negative number, got {}",
                self.actual_minutes
            )));
        }

        let actual_minutes = round_hundredths(self.actual_minutes);
        let end_timestamp = minutes_to_duration(actual_minutes)
            .and_then(|d| self.start_timestamp.checked_add_signed(d))
            .ok_or_else(|| {
                FlowError::InvalidRecord(format!(
                    "actual minutes {actual_minutes} put the end out of range"
                ))
            })?;

        let task_name = match self.task_name.trim() {
            "" => DEFAULT_TASK_NAME.to_string(),
            name => name.to_string(),
        };

        Ok(SessionRecord {
            category: self.category.trim().to_string(),
            task_name,
            estimated_minutes: self.estimated_minutes,
            actual_minutes,
            completed: self.completed,
            notes: self.notes.trim().to_string(),
            focus_level,
            start_timestamp: self.start_timestamp,
            end_timestamp,
        })
    }
}

impl SessionRecord {
    /// Calendar day the session started on.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.start_timestamp.date()
    }

    /// Whether the interval ends after the midnight following its start.
    ///
    /// A session ending exactly at midnight still belongs to its start day.
    #[must_use]
    pub fn crosses_midnight(&self) -> bool {
        let next_midnight = self.day().succ_opt().map(|d| d.and_time(chrono::NaiveTime::MIN));
        next_midnight.map_or(true, |midnight| self.end_timestamp > midnight)
    }

    /// Milliseconds this session overlaps the window `[start, end)`.
    ///
    /// Zero when the intervals do not intersect.
    #[must_use]
    pub fn overlap_millis(&self, start: NaiveDateTime, end: NaiveDateTime) -> i64 {
        let overlap_start = self.start_timestamp.max(start);
        let overlap_end = self.end_timestamp.min(end);
        (overlap_end - overlap_start).num_milliseconds().max(0)
    }

    /// Actual minutes as an exact count of hundredths.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn actual_hundredths(&self) -> i64 {
        (self.actual_minutes * 100.0).round() as i64
    }

    /// Notes worth showing in a report (non-empty, not the legacy placeholder).
    #[must_use]
    pub fn display_notes(&self) -> Option<&str> {
        let notes = self.notes.trim();
        if notes.is_empty() || notes == LEGACY_EMPTY_NOTES {
            None
        } else {
            Some(notes)
        }
    }
}

/// Round to two decimal places.
#[must_use]
pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert fractional minutes to a millisecond-precision duration.
///
/// `None` when the value does not fit a `Duration`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn minutes_to_duration(minutes: f64) -> Option<Duration> {
    let millis = (minutes * 60_000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}
