//! UI rendering for the countdown screen.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::features::focus::{format_mmss, AlarmPlayer, ClockSnapshot, Phase};
use crate::tui::app::CountdownApp;

const HELP: &str = " space pause · a silence · f finish · s save partial · d discard ";

/// Render the countdown screen.
pub fn render<A: AlarmPlayer>(frame: &mut Frame<'_>, app: &CountdownApp<'_, A>) {
    let snapshot = app.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Clock
            Constraint::Length(3), // Progress
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, &snapshot, chunks[0]);
    render_clock(frame, &snapshot, chunks[1]);
    render_progress(frame, &snapshot, chunks[2]);
    render_status_bar(frame, app.status.as_deref(), chunks[3]);
}

fn render_header(frame: &mut Frame<'_>, snapshot: &ClockSnapshot, area: Rect) {
    let title = format!(" {} [{}] ", snapshot.task_name, snapshot.category);

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

fn render_clock(frame: &mut Frame<'_>, snapshot: &ClockSnapshot, area: Rect) {
    let (time, label, color) = match snapshot.phase {
        Phase::Overtime => (
            format!("+{}", format_mmss(snapshot.overtime_seconds)),
            "overtime",
            Color::Red,
        ),
        _ => (
            format_mmss(snapshot.remaining_seconds),
            "remaining",
            Color::Green,
        ),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            time,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
    ];
    if snapshot.paused {
        lines.push(Line::from(Span::styled(
            "PAUSED",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    } else if snapshot.alarm_sounding {
        lines.push(Line::from(Span::styled(
            "ALARM",
            Style::default().fg(Color::Red).add_modifier(Modifier::SLOW_BLINK),
        )));
    }

    let clock = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(clock, area);
}

fn render_progress(frame: &mut Frame<'_>, snapshot: &ClockSnapshot, area: Rect) {
    let color = if snapshot.phase == Phase::Overtime {
        Color::Red
    } else {
        Color::Green
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} min planned ", snapshot.estimated_minutes)),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(snapshot.progress.clamp(0.0, 1.0));

    frame.render_widget(gauge, area);
}

fn render_status_bar(frame: &mut Frame<'_>, status: Option<&str>, area: Rect) {
    let text = status.map_or_else(|| HELP.to_string(), |s| format!(" {s} "));

    let status_bar =
        Paragraph::new(text).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::{SessionClock, SilentAlarm};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::{Duration, Instant};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_render_countdown() {
        let mut clock = SessionClock::new(SilentAlarm);
        clock.start(25, "Study", "Chapter 4").unwrap();
        let app = CountdownApp::new(&mut clock, Instant::now());

        let mut terminal = Terminal::new(TestBackend::new(70, 12)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Chapter 4 [Study]"));
        assert!(text.contains("25:00"));
        assert!(text.contains("remaining"));
        assert!(text.contains("25 min planned"));
    }

    #[test]
    fn test_render_overtime() {
        let mut clock = SessionClock::new(SilentAlarm);
        clock.start(1, "Work", "Emails").unwrap();
        let t0 = Instant::now();
        let mut app = CountdownApp::new(&mut clock, t0);
        app.advance(t0 + Duration::from_secs(65));

        let mut terminal = Terminal::new(TestBackend::new(70, 12)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("+00:05"));
        assert!(text.contains("overtime"));
        assert!(text.contains("Time's up"));
    }
}
