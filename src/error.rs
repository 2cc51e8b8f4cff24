//! Error types for flowclock.

use chrono::NaiveDate;
use thiserror::Error;

use crate::features::focus::Phase;

/// Errors produced by the session clock, the aggregator, and the storage layer.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Estimated minutes were zero, negative, or not a whole number.
    #[error("invalid duration: {0} (expected a positive whole number of minutes)")]
    InvalidDuration(String),

    /// Focus level outside 1..=5.
    #[error("invalid focus rating {0}: must be between 1 and 5")]
    InvalidRating(i64),

    /// A command was issued from a phase that does not permit it.
    #[error("cannot {command} while {phase}")]
    IllegalTransition {
        /// The rejected command.
        command: &'static str,
        /// Phase the clock was in when the command arrived.
        phase: Phase,
    },

    /// Hourly aggregation input spans more than one calendar day.
    #[error(
        "records span more than one calendar day ({first} to {last}); \
         hourly focus quality needs single-day input"
    )]
    CrossMidnight {
        /// Reference day (date of the earliest start).
        first: NaiveDate,
        /// Day on which the offending record ends.
        last: NaiveDate,
    },

    /// A session record violates its invariants.
    #[error("invalid session record: {0}")]
    InvalidRecord(String),

    /// Storage failure.
    #[error("database error: {0}")]
    Database(String),

    /// Configuration problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl FlowError {
    /// Whether the driver can recover by re-prompting the user.
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidDuration(_) | Self::InvalidRating(_) | Self::IllegalTransition { .. }
        )
    }
}
