//! JSON output formatting for flowclock.

use serde::Serialize;

use crate::error::FlowError;

/// Serialize any value as pretty-printed JSON.
///
/// # Errors
///
/// Returns `FlowError::Json` if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, FlowError> {
    Ok(serde_json::to_string_pretty(value)?)
}
