//! `log` command: record a session after the fact.

use chrono::Local;
use tracing::info;

use super::Context;
use crate::cli::args::LogArgs;
use crate::core::parse_start;
use crate::error::FlowError;
use crate::features::focus::{parse_minutes, RecordDraft};
use crate::output::format_record;

/// Validate `args` into a record and append it.
///
/// # Errors
///
/// Returns an error for invalid input or if the log cannot be written.
pub fn log(ctx: &Context, args: LogArgs) -> Result<String, FlowError> {
    let start_timestamp = parse_start(&args.start, Local::now().date_naive())?;

    let estimated = match args.estimate.as_deref() {
        Some(text) => parse_minutes(text)?,
        None => i64::from(ctx.config.timer.default_minutes),
    };
    let estimated_minutes =
        u32::try_from(estimated).map_err(|_| FlowError::InvalidDuration(estimated.to_string()))?;

    let category = ctx.config.resolve_category(
        args.category
            .as_deref()
            .unwrap_or_else(|| ctx.config.default_category()),
    )?;

    let record = RecordDraft {
        category,
        task_name: args
            .task
            .unwrap_or_else(|| ctx.config.timer.default_task_name.clone()),
        estimated_minutes,
        actual_minutes: args.minutes,
        completed: !args.abandoned,
        notes: args.notes.unwrap_or_default(),
        focus_level: args.focus,
        start_timestamp,
    }
    .finalize()?;

    let id = ctx.open_log()?.append(&record)?;
    info!(id, task = %record.task_name, "logged session manually");

    format_record(&record, ctx.format)
}
