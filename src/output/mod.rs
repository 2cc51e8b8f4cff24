//! Output formatting for flowclock.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::FlowError;
use crate::features::focus::SessionRecord;

pub use json::*;
pub use pretty::*;

/// Format a list of records based on output format.
///
/// # Errors
///
/// Returns `FlowError::Json` if JSON serialization fails.
pub fn format_history(
    records: &[SessionRecord],
    format: OutputFormat,
) -> Result<String, FlowError> {
    match format {
        OutputFormat::Pretty => Ok(format_records(records)),
        OutputFormat::Json => to_json(&records),
    }
}

/// Format a freshly logged record based on output format.
///
/// # Errors
///
/// Returns `FlowError::Json` if JSON serialization fails.
pub fn format_record(record: &SessionRecord, format: OutputFormat) -> Result<String, FlowError> {
    match format {
        OutputFormat::Pretty => Ok(format_logged(record)),
        OutputFormat::Json => to_json(record),
    }
}
