//! Daily focus reports.
//!
//! Summarizes one calendar day of session history: KPIs, hourly focus
//! quality, time per category, and session notes.

use chrono::{NaiveDate, NaiveTime};
use colored::Colorize;
use serde::Serialize;
use tracing::warn;

use super::aggregate::{category_totals, hourly_focus_quality, HourlyQuality};
use super::record::{minutes_to_duration, SessionRecord};
use super::timer::{format_duration, format_minutes};
use crate::error::FlowError;

const FULL_BLOCK: char = '█';

/// Minutes spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    /// Category tag.
    pub category: String,
    /// Total actual minutes.
    pub minutes: f64,
    /// Share of the day's total, 0-100.
    pub percent: f64,
}

/// A note attached to a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionNote {
    /// Session start time.
    pub started: NaiveTime,
    /// Task name.
    pub task_name: String,
    /// Note text.
    pub notes: String,
}

/// Focus report for a single day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    /// Report day.
    pub date: NaiveDate,
    /// Sum of actual minutes.
    pub total_minutes: f64,
    /// Number of sessions.
    pub sessions: usize,
    /// Sessions that ran to completion.
    pub completed_sessions: usize,
    /// Sessions saved as partial progress.
    pub abandoned_sessions: usize,
    /// Unweighted mean focus level, if any sessions exist.
    pub mean_focus: Option<f64>,
    /// Overlap-weighted focus per active hour.
    pub hourly: Vec<HourlyQuality>,
    /// Minutes per category, largest first.
    pub categories: Vec<CategoryShare>,
    /// Non-empty session notes in start order.
    pub notes: Vec<SessionNote>,
    /// Sessions left out of the hourly chart because they run past midnight.
    pub excluded_from_hourly: usize,
}

impl DailyReport {
    /// Build the report for `date` from `records`.
    ///
    /// Records starting on other days are ignored. Records that run past
    /// midnight count toward totals and categories but not the hourly chart.
    ///
    /// # Errors
    ///
    /// Propagates aggregation errors.
    #[allow(clippy::cast_precision_loss)]
    pub fn build(records: &[SessionRecord], date: NaiveDate) -> Result<Self, FlowError> {
        let mut day: Vec<SessionRecord> = records
            .iter()
            .filter(|r| r.day() == date)
            .cloned()
            .collect();
        day.sort_by_key(|r| r.start_timestamp);

        let (within, spilling): (Vec<_>, Vec<_>) =
            day.iter().cloned().partition(|r| !r.crosses_midnight());
        if !spilling.is_empty() {
            warn!(
                count = spilling.len(),
                %date,
                "sessions running past midnight left out of the hourly chart"
            );
        }

        let hourly = hourly_focus_quality(&within)?;

        let total_hundredths: i64 = day.iter().map(SessionRecord::actual_hundredths).sum();
        let total_minutes = total_hundredths as f64 / 100.0;

        let mut categories: Vec<CategoryShare> = category_totals(&day)
            .into_iter()
            .map(|(category, minutes)| CategoryShare {
                percent: if total_minutes > 0.0 {
                    minutes / total_minutes * 100.0
                } else {
                    0.0
                },
                category,
                minutes,
            })
            .collect();
        categories.sort_by(|a, b| {
            b.minutes
                .total_cmp(&a.minutes)
                .then_with(|| a.category.cmp(&b.category))
        });

        let completed_sessions = day.iter().filter(|r| r.completed).count();
        let mean_focus = (!day.is_empty()).then(|| {
            let sum: u32 = day.iter().map(|r| u32::from(r.focus_level.get())).sum();
            f64::from(sum) / day.len() as f64
        });

        let notes = day
            .iter()
            .filter_map(|r| {
                r.display_notes().map(|notes| SessionNote {
                    started: r.start_timestamp.time(),
                    task_name: r.task_name.clone(),
                    notes: notes.to_string(),
                })
            })
            .collect();

        Ok(Self {
            date,
            total_minutes,
            sessions: day.len(),
            completed_sessions,
            abandoned_sessions: day.len() - completed_sessions,
            mean_focus,
            hourly,
            categories,
            notes,
            excluded_from_hourly: spilling.len(),
        })
    }

    /// Whether the day has no sessions at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sessions == 0
    }

    /// Format the report for terminal display.
    #[must_use]
    pub fn format(&self, bar_width: usize) -> String {
        let mut lines = Vec::new();

        lines.push(
            format!("Focus Report: {}", self.date.format("%A, %B %-d, %Y"))
                .bold()
                .to_string(),
        );
        lines.push("═".repeat(50));

        if self.is_empty() {
            lines.push(String::new());
            lines.push("  No sessions logged.".dimmed().to_string());
            return lines.join("\n");
        }

        lines.push(String::new());
        lines.push("Summary".bold().to_string());
        lines.push("─".repeat(40));
        let total = minutes_to_duration(self.total_minutes)
            .map_or_else(|| format_minutes(self.total_minutes), format_duration);
        lines.push(format!("  Total focus time:    {total}"));
        lines.push(format!("  Sessions:            {}", self.sessions));
        lines.push(format!("  Completed:           {}", self.completed_sessions));
        lines.push(format!("  Partial:             {}", self.abandoned_sessions));
        if let Some(mean) = self.mean_focus {
            lines.push(format!("  Mean focus:          {mean:.1}/5"));
        }
        lines.push(String::new());

        if !self.hourly.is_empty() {
            lines.push("Focus Quality by Hour".bold().to_string());
            lines.push("─".repeat(40));
            lines.extend(self.hourly_chart(bar_width));
            if self.excluded_from_hourly > 0 {
                lines.push(
                    format!(
                        "  ({} session(s) past midnight not charted)",
                        self.excluded_from_hourly
                    )
                    .dimmed()
                    .to_string(),
                );
            }
            lines.push(String::new());
        }

        lines.push("Time by Category".bold().to_string());
        lines.push("─".repeat(40));
        let label_width = self
            .categories
            .iter()
            .map(|c| c.category.chars().count())
            .max()
            .unwrap_or(0);
        for share in &self.categories {
            lines.push(format!(
                "  {:<label_width$} |{} {:>7} {:>5.1}%",
                share.category,
                bar(share.percent, 100.0, bar_width),
                format_minutes(share.minutes),
                share.percent,
            ));
        }

        if !self.notes.is_empty() {
            lines.push(String::new());
            lines.push("Notes".bold().to_string());
            lines.push("─".repeat(40));
            for note in &self.notes {
                lines.push(format!(
                    "  {} {}: {}",
                    note.started.format("%H:%M").to_string().cyan(),
                    note.task_name,
                    note.notes
                ));
            }
        }

        lines.join("\n")
    }

    fn hourly_chart(&self, bar_width: usize) -> Vec<String> {
        let (Some(first), Some(last)) = (self.hourly.first(), self.hourly.last()) else {
            return Vec::new();
        };

        (first.hour..=last.hour)
            .map(|hour| match self.hourly.iter().find(|h| h.hour == hour) {
                Some(h) => format!(
                    "  {hour:02}:00 |{} {:.1}",
                    bar(h.quality, 5.0, bar_width),
                    h.quality
                ),
                None => format!("  {hour:02}:00 |"),
            })
            .collect()
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar(value: f64, max: f64, width: usize) -> String {
    let len = ((value / max).clamp(0.0, 1.0) * width as f64).round() as usize;
    let mut out = FULL_BLOCK.to_string().repeat(len);
    out.push_str(&" ".repeat(width - len));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::record::{RecordDraft, LEGACY_EMPTY_NOTES};
    use chrono::NaiveDateTime;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn record(
        category: &str,
        start: NaiveDateTime,
        minutes: f64,
        focus: i64,
        notes: &str,
        completed: bool,
    ) -> SessionRecord {
        RecordDraft {
            category: category.to_string(),
            task_name: format!("{category} task"),
            estimated_minutes: 25,
            actual_minutes: minutes,
            completed,
            notes: notes.to_string(),
            focus_level: focus,
            start_timestamp: start,
        }
        .finalize()
        .unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_empty_day() {
        let report = DailyReport::build(&[], day()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.mean_focus, None);
        assert!(report.hourly.is_empty());
        assert!(report.categories.is_empty());
        assert!(report.format(20).contains("No sessions logged"));
    }

    #[test]
    fn test_build_summary() {
        let records = vec![
            record("Work", at(14, 9, 0), 35.0, 4, "wrote intro", true),
            record("Study", at(14, 11, 0), 25.0, 2, LEGACY_EMPTY_NOTES, false),
            record("Work", at(14, 13, 0), 40.0, 3, "", true),
            record("Work", at(13, 9, 0), 60.0, 5, "other day", true),
        ];
        let report = DailyReport::build(&records, day()).unwrap();

        assert_eq!(report.sessions, 3);
        assert_eq!(report.completed_sessions, 2);
        assert_eq!(report.abandoned_sessions, 1);
        assert!((report.total_minutes - 100.0).abs() < 1e-9);
        assert!((report.mean_focus.unwrap() - 3.0).abs() < 1e-9);

        assert_eq!(report.categories[0].category, "Work");
        assert!((report.categories[0].percent - 75.0).abs() < 1e-9);
        assert!((report.categories[1].percent - 25.0).abs() < 1e-9);

        assert_eq!(report.notes.len(), 1);
        assert_eq!(report.notes[0].notes, "wrote intro");

        let hours: Vec<u32> = report.hourly.iter().map(|h| h.hour).collect();
        assert_eq!(hours, vec![9, 11, 13]);
    }

    #[test]
    fn test_cross_midnight_excluded_from_hourly() {
        let records = vec![
            record("Work", at(14, 22, 0), 30.0, 4, "", true),
            record("Code", at(14, 23, 30), 90.0, 5, "", true),
        ];
        let report = DailyReport::build(&records, day()).unwrap();

        assert_eq!(report.excluded_from_hourly, 1);
        assert_eq!(report.hourly.len(), 1);
        assert_eq!(report.hourly[0].hour, 22);
        assert!((report.total_minutes - 120.0).abs() < 1e-9);
        assert!(report.format(10).contains("past midnight"));
    }

    #[test]
    fn test_format_includes_sections() {
        colored::control::set_override(false);
        let records = vec![
            record("Work", at(14, 9, 0), 35.0, 4, "wrote intro", true),
            record("Study", at(14, 11, 0), 25.0, 2, "", true),
        ];
        let text = DailyReport::build(&records, day()).unwrap().format(10);

        assert!(text.contains("Summary"));
        assert!(text.contains("Focus Quality by Hour"));
        assert!(text.contains("09:00 |████████   4.0"));
        assert!(text.contains("  10:00 |\n"));
        assert!(text.contains("Time by Category"));
        assert!(text.contains("wrote intro"));
    }

    #[test]
    fn test_report_serializes() {
        let records = vec![record("Work", at(14, 9, 0), 35.0, 4, "", true)];
        let report = DailyReport::build(&records, day()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["date"], "2026-03-14");
        assert_eq!(json["hourly"][0]["hour"], 9);
        assert_eq!(json["hourly"][0]["quality"], 4.0);
    }
}
