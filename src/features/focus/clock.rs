//! The session clock state machine.
//!
//! A [`SessionClock`] owns exactly one in-flight session:
//!
//! ```text
//! Idle -> CountingDown -> (alarm) -> Overtime -> Review -> Logged -> Idle
//! ```
//!
//! Pausing is a flag orthogonal to `CountingDown` and `Overtime`. The clock has
//! no notion of wall-clock time beyond the start instant: the driver calls
//! [`SessionClock::tick`] once per elapsed second.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::alarm::AlarmPlayer;
use super::record::{round_hundredths, FocusLevel, RecordDraft, SessionRecord};
use crate::error::FlowError;

/// Lifecycle phase of the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No session.
    Idle,
    /// Counting down towards the planned deadline.
    CountingDown,
    /// Deadline passed; accumulating extra time.
    Overtime,
    /// Timing stopped; waiting for a focus rating.
    Review,
    /// Record produced; waiting for `reset_for_next`.
    Logged,
}

impl Phase {
    /// Whether time is being tracked in this phase.
    #[must_use]
    pub const fn is_timing(self) -> bool {
        matches!(self, Self::CountingDown | Self::Overtime)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Idle => "idle",
            Self::CountingDown => "counting down",
            Self::Overtime => "in overtime",
            Self::Review => "in review",
            Self::Logged => "logged",
        };
        f.write_str(text)
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused, or not in a timing phase.
    Ignored,
    /// One second counted down.
    Counted,
    /// The countdown hit zero: alarm started, now in overtime.
    Alarmed,
    /// One second of overtime accrued.
    Overtime,
}

/// Read-only view of the clock for renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Pause flag.
    pub paused: bool,
    /// Seconds left on the countdown (zero outside `CountingDown`).
    pub remaining_seconds: u64,
    /// Seconds of overtime accrued.
    pub overtime_seconds: u64,
    /// Fraction of the planned time used, 0.0 to 1.0.
    pub progress: f64,
    /// Whether the alarm is sounding.
    pub alarm_sounding: bool,
    /// Planned minutes.
    pub estimated_minutes: u32,
    /// Category tag.
    pub category: String,
    /// Task name.
    pub task_name: String,
    /// Start instant, if a session exists.
    pub started_at: Option<NaiveDateTime>,
}

/// State machine for a single focus session.
#[derive(Debug)]
pub struct SessionClock<A: AlarmPlayer> {
    alarm: A,
    phase: Phase,
    is_paused: bool,
    remaining_seconds: u64,
    elapsed_overtime_seconds: u64,
    estimated_minutes: u32,
    category: String,
    task_name: String,
    started_at: Option<NaiveDateTime>,
    actual_minutes: Option<f64>,
    completed: bool,
    alarm_sounding: bool,
    last_record: Option<SessionRecord>,
}

impl<A: AlarmPlayer> SessionClock<A> {
    /// Create an idle clock that will use `alarm` at the deadline.
    pub fn new(alarm: A) -> Self {
        Self {
            alarm,
            phase: Phase::Idle,
            is_paused: false,
            remaining_seconds: 0,
            elapsed_overtime_seconds: 0,
            estimated_minutes: 0,
            category: String::new(),
            task_name: String::new(),
            started_at: None,
            actual_minutes: None,
            completed: true,
            alarm_sounding: false,
            last_record: None,
        }
    }

    /// Start a countdown now.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::IllegalTransition` unless idle, and
    /// `FlowError::InvalidDuration` if `estimated_minutes` is not positive.
    pub fn start(
        &mut self,
        estimated_minutes: i64,
        category: &str,
        task_name: &str,
    ) -> Result<(), FlowError> {
        self.start_at(estimated_minutes, category, task_name, Local::now().naive_local())
    }

    /// Start a countdown that began at `started_at`.
    ///
    /// # Errors
    ///
    /// Same as [`SessionClock::start`].
    pub fn start_at(
        &mut self,
        estimated_minutes: i64,
        category: &str,
        task_name: &str,
        started_at: NaiveDateTime,
    ) -> Result<(), FlowError> {
        self.require(&[Phase::Idle], "start a session")?;

        let minutes = u32::try_from(estimated_minutes)
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| FlowError::InvalidDuration(estimated_minutes.to_string()))?;

        self.phase = Phase::CountingDown;
        self.is_paused = false;
        self.remaining_seconds = u64::from(minutes) * 60;
        self.elapsed_overtime_seconds = 0;
        self.estimated_minutes = minutes;
        self.category = category.to_string();
        self.task_name = task_name.to_string();
        self.started_at = Some(started_at);
        self.actual_minutes = None;
        self.completed = true;
        self.last_record = None;

        debug!(minutes, category, task_name, "countdown started");
        Ok(())
    }

    /// Advance by exactly one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_paused {
            return TickOutcome::Ignored;
        }

        match self.phase {
            Phase::CountingDown => {
                self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
                if self.remaining_seconds > 0 {
                    return TickOutcome::Counted;
                }

                // Alarmed is transient: sound once, then straight into overtime.
                self.alarm.play();
                self.alarm_sounding = true;
                self.phase = Phase::Overtime;
                self.elapsed_overtime_seconds = 0;
                debug!("deadline reached, entering overtime");
                TickOutcome::Alarmed
            }
            Phase::Overtime => {
                self.elapsed_overtime_seconds += 1;
                TickOutcome::Overtime
            }
            Phase::Idle | Phase::Review | Phase::Logged => TickOutcome::Ignored,
        }
    }

    /// Suspend ticking without leaving the current phase.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::IllegalTransition` outside a timing phase or when
    /// already paused.
    pub fn pause(&mut self) -> Result<(), FlowError> {
        self.require(&[Phase::CountingDown, Phase::Overtime], "pause")?;
        if self.is_paused {
            return Err(self.illegal("pause again"));
        }
        self.is_paused = true;
        debug!(phase = %self.phase, "paused");
        Ok(())
    }

    /// Resume ticking. Resuming into overtime also silences the alarm.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::IllegalTransition` outside a timing phase or when
    /// not paused.
    pub fn resume(&mut self) -> Result<(), FlowError> {
        self.require(&[Phase::CountingDown, Phase::Overtime], "resume")?;
        if !self.is_paused {
            return Err(self.illegal("resume a running session"));
        }
        self.is_paused = false;
        if self.phase == Phase::Overtime {
            self.silence();
        }
        debug!(phase = %self.phase, "resumed");
        Ok(())
    }

    /// Pause if running, resume if paused. Returns the new pause flag.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::IllegalTransition` outside a timing phase.
    pub fn toggle_pause(&mut self) -> Result<bool, FlowError> {
        if self.is_paused {
            self.resume()?;
        } else {
            self.pause()?;
        }
        Ok(self.is_paused)
    }

    /// Silence the alarm while staying in overtime.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::IllegalTransition` unless in overtime.
    pub fn acknowledge_alarm(&mut self) -> Result<(), FlowError> {
        self.require(&[Phase::Overtime], "silence the alarm")?;
        self.silence();
        Ok(())
    }

    /// Stop timing and move to review.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::IllegalTransition` outside a timing phase.
    pub fn finish(&mut self) -> Result<(), FlowError> {
        self.freeze("finish", true)
    }

    /// Stop timing early; the record will be marked incomplete.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::IllegalTransition` outside a timing phase.
    pub fn abandon(&mut self) -> Result<(), FlowError> {
        self.freeze("save partial progress", false)
    }

    /// Rate the session and produce its record.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::IllegalTransition` unless in review and
    /// `FlowError::InvalidRating` for a rating outside 1..=5. The clock is
    /// left untouched on error.
    pub fn submit_review(
        &mut self,
        focus_level: i64,
        notes: &str,
    ) -> Result<SessionRecord, FlowError> {
        self.require(&[Phase::Review], "submit a review")?;
        FocusLevel::new(focus_level)?;

        let started_at = self
            .started_at
            .ok_or_else(|| FlowError::InvalidRecord("session has no start time".to_string()))?;
        let actual_minutes = self
            .actual_minutes
            .ok_or_else(|| FlowError::InvalidRecord("session has no frozen duration".to_string()))?;

        let record = RecordDraft {
            category: self.category.clone(),
            task_name: self.task_name.clone(),
            estimated_minutes: self.estimated_minutes,
            actual_minutes,
            completed: self.completed,
            notes: notes.to_string(),
            focus_level,
            start_timestamp: started_at,
        }
        .finalize()?;

        self.phase = Phase::Logged;
        self.last_record = Some(record.clone());
        info!(
            task = %record.task_name,
            minutes = record.actual_minutes,
            focus = record.focus_level.get(),
            "session reviewed"
        );
        Ok(record)
    }

    /// Drop the in-flight session without producing a record.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::IllegalTransition` when already idle.
    pub fn discard(&mut self) -> Result<(), FlowError> {
        if self.phase == Phase::Idle {
            return Err(self.illegal("discard"));
        }
        debug!(phase = %self.phase, "session discarded");
        self.clear();
        Ok(())
    }

    /// Return to idle after a session has been logged.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::IllegalTransition` unless logged.
    pub fn reset_for_next(&mut self) -> Result<(), FlowError> {
        self.require(&[Phase::Logged], "reset")?;
        self.clear();
        Ok(())
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Pause flag.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Seconds left, only while counting down.
    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u64> {
        (self.phase == Phase::CountingDown).then_some(self.remaining_seconds)
    }

    /// Seconds of overtime, only while in overtime.
    #[must_use]
    pub fn overtime_seconds(&self) -> Option<u64> {
        (self.phase == Phase::Overtime).then_some(self.elapsed_overtime_seconds)
    }

    /// Planned minutes of the current session.
    #[must_use]
    pub const fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }

    /// Duration frozen by `finish`/`abandon`.
    #[must_use]
    pub const fn actual_minutes(&self) -> Option<f64> {
        self.actual_minutes
    }

    /// Whether the alarm is currently sounding.
    #[must_use]
    pub const fn alarm_sounding(&self) -> bool {
        self.alarm_sounding
    }

    /// The record produced by the last `submit_review`, kept until reset.
    #[must_use]
    pub const fn last_record(&self) -> Option<&SessionRecord> {
        self.last_record.as_ref()
    }

    /// Fraction of the planned time used, capped at 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        let total = u64::from(self.estimated_minutes) * 60;
        match self.phase {
            Phase::CountingDown if total > 0 => {
                (total - self.remaining_seconds.min(total)) as f64 / total as f64
            }
            Phase::Idle | Phase::CountingDown => 0.0,
            Phase::Overtime | Phase::Review | Phase::Logged => 1.0,
        }
    }

    /// Snapshot for display.
    #[must_use]
    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            phase: self.phase,
            paused: self.is_paused,
            remaining_seconds: self.remaining_seconds().unwrap_or(0),
            overtime_seconds: self.elapsed_overtime_seconds,
            progress: self.progress(),
            alarm_sounding: self.alarm_sounding,
            estimated_minutes: self.estimated_minutes,
            category: self.category.clone(),
            task_name: self.task_name.clone(),
            started_at: self.started_at,
        }
    }

    fn freeze(&mut self, command: &'static str, completed: bool) -> Result<(), FlowError> {
        self.require(&[Phase::CountingDown, Phase::Overtime], command)?;

        let planned_seconds = u64::from(self.estimated_minutes) * 60;
        let spent_seconds = match self.phase {
            Phase::CountingDown => planned_seconds.saturating_sub(self.remaining_seconds),
            _ => planned_seconds + self.elapsed_overtime_seconds,
        };
        #[allow(clippy::cast_precision_loss)]
        let actual = round_hundredths(spent_seconds as f64 / 60.0);

        self.silence();
        self.is_paused = false;
        self.actual_minutes = Some(actual);
        self.completed = completed;
        self.phase = Phase::Review;
        debug!(actual_minutes = actual, completed, "timing stopped");
        Ok(())
    }

    fn silence(&mut self) {
        if self.alarm_sounding {
            self.alarm.stop();
            self.alarm_sounding = false;
        }
    }

    fn clear(&mut self) {
        self.silence();
        self.phase = Phase::Idle;
        self.is_paused = false;
        self.remaining_seconds = 0;
        self.elapsed_overtime_seconds = 0;
        self.estimated_minutes = 0;
        self.category.clear();
        self.task_name.clear();
        self.started_at = None;
        self.actual_minutes = None;
        self.completed = true;
        self.last_record = None;
    }

    fn require(&self, allowed: &[Phase], command: &'static str) -> Result<(), FlowError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(self.illegal(command))
        }
    }

    const fn illegal(&self, command: &'static str) -> FlowError {
        FlowError::IllegalTransition {
            command,
            phase: self.phase,
        }
    }
}
