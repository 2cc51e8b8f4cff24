//! `report` command.

use chrono::Local;

use super::Context;
use crate::cli::args::OutputFormat;
use crate::core::parse_day;
use crate::error::FlowError;
use crate::features::focus::DailyReport;
use crate::output::to_json;

/// Build and format the report for the day named by `date`.
///
/// # Errors
///
/// Returns an error if the date is invalid or the log cannot be read.
pub fn report(ctx: &Context, date: &str) -> Result<String, FlowError> {
    let day = parse_day(date, Local::now().date_naive())?;
    let records = ctx.read_log(|log| log.load_day(day))?;
    let report = DailyReport::build(&records, day)?;

    match ctx.format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Pretty => Ok(report.format(ctx.config.report.bar_width)),
    }
}
