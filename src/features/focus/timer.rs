//! Duration parsing and formatting for focus sessions.

use chrono::Duration;

use crate::error::FlowError;

/// Format a second count as MM:SS (minutes grow past 59).
#[must_use]
pub fn format_mmss(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

/// Format fractional minutes, e.g. `90.5` -> "1h 30m".
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.round() as i64;
    match (total / 60, total % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Parse a planned duration like "25", "25m", "1h", or "1h30m" into whole
/// minutes.
///
/// # Errors
///
/// Returns `FlowError::InvalidDuration` for empty, zero, fractional, or
/// seconds-granular input.
pub fn parse_minutes(s: &str) -> Result<i64, FlowError> {
    let invalid = || FlowError::InvalidDuration(s.trim().to_string());
    let text = s.trim().to_lowercase();

    // Bare number means minutes
    if let Ok(minutes) = text.parse::<i64>() {
        return if minutes > 0 { Ok(minutes) } else { Err(invalid()) };
    }

    let mut total: i64 = 0;
    let mut current = String::new();
    let mut saw_unit = false;

    for c in text.chars() {
        if c.is_ascii_digit() {
            current.push(c);
            continue;
        }
        if current.is_empty() {
            return Err(invalid());
        }
        let num: i64 = current.parse().map_err(|_| invalid())?;
        current.clear();

        let scaled = match c {
            'h' => num.checked_mul(60),
            'm' => Some(num),
            _ => None,
        };
        total = scaled
            .and_then(|v| total.checked_add(v))
            .ok_or_else(invalid)?;
        saw_unit = true;
    }

    // Trailing number after a unit, as in "1h30"
    if !current.is_empty() {
        let num: i64 = current.parse().map_err(|_| invalid())?;
        total = total.checked_add(num).ok_or_else(invalid)?;
    }

    if saw_unit && total > 0 {
        Ok(total)
    } else {
        Err(invalid())
    }
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let empty = width - filled;

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
