//! Full-screen countdown for a focus session.
//!
//! Built with ratatui and crossterm. The screen drives a running
//! [`SessionClock`] until the user finishes, saves partial progress, or
//! discards; rating the session happens after the terminal is restored.

mod app;
mod event;
mod ui;

pub use app::{CountdownApp, Exit};
pub use event::{action_for_key, Action};

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::error::FlowError;
use crate::features::focus::{AlarmPlayer, SessionClock};

const MAX_POLL: Duration = Duration::from_millis(250);

/// Run the countdown screen for a clock that has just been started.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn.
pub fn run_countdown<A: AlarmPlayer>(clock: &mut SessionClock<A>) -> Result<Exit, FlowError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        disable_raw_mode().ok();
        return Err(e.into());
    }

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .map_err(FlowError::from)
        .and_then(|mut terminal| {
            let mut app = CountdownApp::new(clock, Instant::now());
            let result = run_app(&mut terminal, &mut app);
            terminal.show_cursor().ok();
            result
        });

    // Restore terminal
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen).ok();

    result
}

fn run_app<B: Backend, A: AlarmPlayer>(
    terminal: &mut Terminal<B>,
    app: &mut CountdownApp<'_, A>,
) -> Result<Exit, FlowError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(exit) = app.exit() {
            return Ok(exit);
        }

        let timeout = app.time_until_tick(Instant::now()).min(MAX_POLL);
        if let Some(action) = event::poll_action(timeout)? {
            app.apply(action)?;
        }

        app.advance(Instant::now());
    }
}
