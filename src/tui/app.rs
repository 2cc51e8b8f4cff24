//! Countdown screen state.
//!
//! Owns the tick schedule: one `SessionClock::tick` per elapsed monotonic
//! second, catching up if the loop falls behind.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::FlowError;
use crate::features::focus::{AlarmPlayer, ClockSnapshot, Phase, SessionClock, TickOutcome};
use crate::tui::event::Action;

const TICK: Duration = Duration::from_secs(1);

/// How the countdown screen ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The clock is in review and needs a rating.
    Review,
    /// The session was discarded.
    Discarded,
}

/// State for the countdown screen.
pub struct CountdownApp<'a, A: AlarmPlayer> {
    clock: &'a mut SessionClock<A>,
    next_tick: Instant,
    /// Status message to display.
    pub status: Option<String>,
    exit: Option<Exit>,
}

impl<'a, A: AlarmPlayer> CountdownApp<'a, A> {
    /// Drive `clock`, which must already be counting down, starting at `now`.
    pub fn new(clock: &'a mut SessionClock<A>, now: Instant) -> Self {
        Self {
            clock,
            next_tick: now + TICK,
            status: None,
            exit: None,
        }
    }

    /// Run every tick that is due at `now`.
    pub fn advance(&mut self, now: Instant) {
        while now >= self.next_tick {
            self.next_tick += TICK;
            if self.clock.tick() == TickOutcome::Alarmed {
                self.status = Some("Time's up! a: silence, f: finish".to_string());
            }
        }
    }

    /// Time left until the next tick is due.
    #[must_use]
    pub fn time_until_tick(&self, now: Instant) -> Duration {
        self.next_tick.saturating_duration_since(now)
    }

    /// Apply a user command.
    ///
    /// Commands the clock rejects are shown as a status message.
    ///
    /// # Errors
    ///
    /// Returns clock errors that are not caused by user input.
    pub fn apply(&mut self, action: Action) -> Result<(), FlowError> {
        debug!(?action, phase = %self.clock.phase(), "key action");

        let result = match action {
            Action::TogglePause => self.clock.toggle_pause().map(|paused| {
                self.status = Some(if paused { "Paused" } else { "Resumed" }.to_string());
            }),
            Action::Silence => self.clock.acknowledge_alarm().map(|()| {
                self.status = Some("Alarm silenced".to_string());
            }),
            Action::Finish => self.clock.finish().map(|()| self.exit = Some(Exit::Review)),
            Action::SavePartial => self.clock.abandon().map(|()| self.exit = Some(Exit::Review)),
            Action::Discard => self.clock.discard().map(|()| self.exit = Some(Exit::Discarded)),
        };

        match result {
            Err(e) if e.is_user_input() => {
                self.status = Some(e.to_string());
                Ok(())
            }
            other => other,
        }
    }

    /// Set once the screen should close.
    #[must_use]
    pub const fn exit(&self) -> Option<Exit> {
        self.exit
    }

    /// Clock state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> ClockSnapshot {
        self.clock.snapshot()
    }

    /// Current clock phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.clock.phase()
    }
}
