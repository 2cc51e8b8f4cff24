//! `start` command: run a session from countdown to log.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use colored::Colorize;
use tracing::{error, warn};

use super::Context;
use crate::cli::args::{OutputFormat, StartArgs};
use crate::error::FlowError;
use crate::features::focus::{
    parse_minutes, AlarmPlayer, FocusLevel, SessionClock, SessionLog, SessionRecord, SilentAlarm,
    TerminalBell,
};
use crate::output::{format_record, to_json};
use crate::tui::{self, Exit};

/// Run the countdown screen, then collect the review and log the record.
///
/// # Errors
///
/// Returns an error for invalid arguments, terminal failures, closed
/// input, or a log write the user gave up retrying.
pub fn start(ctx: &Context, args: &StartArgs) -> Result<String, FlowError> {
    let minutes = match args.minutes.as_deref() {
        Some(text) => parse_minutes(text)?,
        None => i64::from(ctx.config.timer.default_minutes),
    };
    let category = ctx.config.resolve_category(
        args.category
            .as_deref()
            .unwrap_or_else(|| ctx.config.default_category()),
    )?;
    let task = args
        .task
        .clone()
        .unwrap_or_else(|| ctx.config.timer.default_task_name.clone());

    let alarm: Box<dyn AlarmPlayer> = if ctx.config.timer.alarm && !args.no_alarm {
        Box::new(TerminalBell::new(Duration::from_secs(
            ctx.config.timer.alarm_interval_secs,
        )))
    } else {
        Box::new(SilentAlarm)
    };

    let mut clock = SessionClock::new(alarm);
    clock.start(minutes, &category, &task)?;

    if tui::run_countdown(&mut clock)? == Exit::Discarded {
        return Ok(match ctx.format {
            OutputFormat::Json => "null".to_string(),
            OutputFormat::Pretty => "Session discarded.".dimmed().to_string(),
        });
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompts = io::stderr();

    let record = review(&mut clock, &mut input, &mut prompts)?;

    let saved = save_with_retry(
        || ctx.open_log(),
        &record,
        &mut input,
        &mut prompts,
    );
    if let Err(e) = saved {
        error!("session could not be saved: {e}");
        // Never drop a finished session silently.
        println!("{}", to_json(&record)?);
        return Err(e);
    }

    clock.reset_for_next()?;
    format_record(&record, ctx.format)
}

/// Prompt for a rating and notes until the clock accepts them.
fn review<A, R, W>(
    clock: &mut SessionClock<A>,
    input: &mut R,
    out: &mut W,
) -> Result<SessionRecord, FlowError>
where
    A: AlarmPlayer,
    R: BufRead,
    W: Write,
{
    loop {
        write!(out, "Focus level (1-5): ")?;
        out.flush()?;
        let line = read_line(input)?.ok_or_else(|| {
            FlowError::Parse("input closed before a focus level was given".to_string())
        })?;

        let Ok(rating) = line.trim().parse::<i64>() else {
            writeln!(out, "Please enter a whole number from 1 to 5.")?;
            continue;
        };
        if let Err(e) = FocusLevel::new(rating) {
            writeln!(out, "{e}")?;
            continue;
        }

        write!(out, "Notes (optional): ")?;
        out.flush()?;
        let notes = read_line(input)?.unwrap_or_default();

        match clock.submit_review(rating, notes.trim()) {
            Err(e @ FlowError::InvalidRating(_)) => writeln!(out, "{e}")?,
            other => return other,
        }
    }
}

/// Append `record`, asking whether to retry after each failure.
fn save_with_retry<F, R, W>(
    mut open: F,
    record: &SessionRecord,
    input: &mut R,
    out: &mut W,
) -> Result<i64, FlowError>
where
    F: FnMut() -> Result<SessionLog, FlowError>,
    R: BufRead,
    W: Write,
{
    let mut attempt = 1_u32;
    loop {
        match open().and_then(|log| log.append(record)) {
            Ok(id) => return Ok(id),
            Err(e) => {
                warn!(attempt, "failed to save session: {e}");
                writeln!(out, "Could not save the session: {e}")?;
                write!(out, "Retry? [Y/n] ")?;
                out.flush()?;

                let answer = read_line(input)?.unwrap_or_else(|| "n".to_string());
                if !matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes") {
                    return Err(e);
                }
                attempt += 1;
            }
        }
    }
}

/// Read one line; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>, FlowError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::Phase;
    use std::cell::Cell;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn reviewing_clock() -> SessionClock<SilentAlarm> {
        let mut clock = SessionClock::new(SilentAlarm);
        clock.start(25, "Work", "Draft").unwrap();
        for _ in 0..90 {
            clock.tick();
        }
        clock.finish().unwrap();
        clock
    }

    #[test]
    fn test_review_reprompts_until_valid() {
        let mut clock = reviewing_clock();
        let mut input = Cursor::new("great\n7\n4\n  felt sharp  \n");
        let mut out = Vec::new();

        let record = review(&mut clock, &mut input, &mut out).unwrap();
        assert_eq!(record.focus_level.get(), 4);
        assert_eq!(record.notes, "felt sharp");
        assert!((record.actual_minutes - 1.5).abs() < f64::EPSILON);
        assert_eq!(clock.phase(), Phase::Logged);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Please enter a whole number"));
        assert!(shown.contains("invalid focus rating 7"));
    }

    #[test]
    fn test_review_closed_input() {
        let mut clock = reviewing_clock();
        let mut input = Cursor::new("");
        let mut out = Vec::new();

        assert!(matches!(
            review(&mut clock, &mut input, &mut out),
            Err(FlowError::Parse(_))
        ));
        assert_eq!(clock.phase(), Phase::Review);
    }

    #[test]
    fn test_review_missing_notes_is_empty() {
        let mut clock = reviewing_clock();
        let mut input = Cursor::new("3\n");
        let mut out = Vec::new();

        let record = review(&mut clock, &mut input, &mut out).unwrap();
        assert!(record.notes.is_empty());
    }

    #[test]
    fn test_save_retries_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flowclock.db");
        let calls = Cell::new(0);

        let mut clock = reviewing_clock();
        let record = clock.submit_review(5, "").unwrap();

        let mut input = Cursor::new("\n");
        let mut out = Vec::new();
        let id = save_with_retry(
            || {
                calls.set(calls.get() + 1);
                if calls.get() == 1 {
                    Err(FlowError::Database("disk full".to_string()))
                } else {
                    SessionLog::open_at(&path)
                }
            },
            &record,
            &mut input,
            &mut out,
        )
        .unwrap();

        assert_eq!(id, 1);
        assert_eq!(calls.get(), 2);
        assert!(String::from_utf8(out).unwrap().contains("disk full"));

        let stored = SessionLog::open_existing(&path).unwrap().unwrap().load_all().unwrap();
        assert_eq!(stored, vec![record]);
    }

    #[test]
    fn test_save_gives_up_when_declined() {
        let mut clock = reviewing_clock();
        let record = clock.submit_review(2, "").unwrap();

        let mut input = Cursor::new("n\n");
        let mut out = Vec::new();
        let result = save_with_retry(
            || Err(FlowError::Database("read-only".to_string())),
            &record,
            &mut input,
            &mut out,
        );

        assert!(matches!(result, Err(FlowError::Database(_))));
        assert_eq!(clock.last_record(), Some(&record));
    }
}
