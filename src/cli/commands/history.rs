//! `history` command.

use super::Context;
use crate::error::FlowError;
use crate::output::format_history;

/// Show the most recent `limit` sessions.
///
/// # Errors
///
/// Returns an error if the log cannot be read.
pub fn history(ctx: &Context, limit: usize) -> Result<String, FlowError> {
    let records = ctx.read_log(|log| log.recent(limit))?;
    format_history(&records, ctx.format)
}
