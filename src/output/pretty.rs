//! Human-readable output for session records.

use colored::Colorize;

use crate::features::focus::{format_minutes, render_progress_bar, SessionRecord};

/// Truncate to `max` characters, adding an ellipsis when cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Short confirmation after a session is logged.
#[must_use]
pub fn format_logged(record: &SessionRecord) -> String {
    let status = if record.completed {
        "Session logged".green()
    } else {
        "Partial session logged".yellow()
    };

    let mut lines = vec![
        format!("{}: {}", status.bold(), record.task_name),
        format!("   Category: {}", record.category),
        format!(
            "   Time:     {} - {} ({} of {} planned)",
            record.start_timestamp.format("%H:%M"),
            record.end_timestamp.format("%H:%M"),
            format_minutes(record.actual_minutes),
            format_minutes(f64::from(record.estimated_minutes)),
        ),
        format!(
            "   Planned:  {} {:.0}%",
            render_progress_bar(planned_share(record), 20),
            planned_share(record) * 100.0
        ),
        format!("   Focus:    {}", record.focus_level),
    ];
    if let Some(notes) = record.display_notes() {
        lines.push(format!("   Notes:    {notes}"));
    }
    lines.join("\n")
}

/// Fraction of the planned time actually used, capped at 1.0.
fn planned_share(record: &SessionRecord) -> f64 {
    if record.estimated_minutes == 0 {
        return 1.0;
    }
    (record.actual_minutes / f64::from(record.estimated_minutes)).min(1.0)
}

/// Table of records.
#[must_use]
pub fn format_records(records: &[SessionRecord]) -> String {
    if records.is_empty() {
        return "No sessions logged yet.\n\nStart one with: flowclock start".to_string();
    }

    let mut lines = Vec::new();
    lines.push("Session History".bold().to_string());
    lines.push("═".repeat(72));
    lines.push(format!(
        "{:<16} {:<10} {:<24} {:>8} {:>5}  {}",
        "Started", "Category", "Task", "Actual", "Focus", "Done"
    ));
    lines.push("─".repeat(72));

    for record in records {
        let done = if record.completed {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };
        lines.push(format!(
            "{:<16} {:<10} {:<24} {:>8} {:>5}  {}",
            record.start_timestamp.format("%Y-%m-%d %H:%M"),
            truncate(&record.category, 10),
            truncate(&record.task_name, 24),
            format_minutes(record.actual_minutes),
            record.focus_level,
            done
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::RecordDraft;
    use chrono::NaiveDate;

    fn record(task: &str, completed: bool) -> SessionRecord {
        RecordDraft {
            category: "Study".to_string(),
            task_name: task.to_string(),
            estimated_minutes: 30,
            actual_minutes: 42.0,
            completed,
            notes: "good run".to_string(),
            focus_level: 5,
            start_timestamp: NaiveDate::from_ymd_opt(2026, 3, 14)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
        .finalize()
        .unwrap()
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long task name", 10), "a very ...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_format_logged() {
        colored::control::set_override(false);
        let text = format_logged(&record("Chapter 4", false));
        assert!(text.starts_with("Partial session logged: Chapter 4"));
        assert!(text.contains("09:00 - 09:42 (42m of 30m planned)"));
        assert!(text.contains("Focus:    5/5"));
        assert!(text.contains("[████████████████████] 100%"));
        assert!(text.contains("good run"));
    }

    #[test]
    fn test_format_records() {
        assert!(format_records(&[]).contains("No sessions logged yet"));

        let text = format_records(&[record("Chapter 4", true)]);
        assert!(text.contains("2026-03-14 09:00"));
        assert!(text.contains("Chapter 4"));
        assert!(text.contains("42m"));
    }
}
