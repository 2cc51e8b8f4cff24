//! Date and time parsing for command-line input.
//!
//! All times are local wall-clock times without an offset, matching how
//! session records are stored.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::FlowError;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a day: `today`, `yesterday`, or `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns `FlowError::Parse` for anything else.
pub fn parse_day(input: &str, today: NaiveDate) -> Result<NaiveDate, FlowError> {
    match input.trim().to_lowercase().as_str() {
        "today" | "t" => Ok(today),
        "yesterday" | "y" => Ok(today - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d").map_err(|_| {
            FlowError::Parse(format!(
                "invalid date {input:?} (expected YYYY-MM-DD, today, or yesterday)"
            ))
        }),
    }
}

/// Parse a session start: `YYYY-MM-DD HH:MM[:SS]` or a bare `HH:MM[:SS]`
/// meaning that time on `today`.
///
/// # Errors
///
/// Returns `FlowError::Parse` for anything else.
pub fn parse_start(input: &str, today: NaiveDate) -> Result<NaiveDateTime, FlowError> {
    let text = input.trim();

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Ok(dt);
    }

    ["%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
        .map(|time| today.and_time(time))
        .ok_or_else(|| {
            FlowError::Parse(format!(
                "invalid start time {input:?} (expected \"YYYY-MM-DD HH:MM\" or \"HH:MM\")"
            ))
        })
}
