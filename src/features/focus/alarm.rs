//! Alarm side effects.
//!
//! The session clock calls [`AlarmPlayer::play`] once when the countdown
//! reaches zero and [`AlarmPlayer::stop`] whenever the user acknowledges,
//! resumes into overtime, finishes, or discards. Both are fire-and-forget.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// Audible cue played at the deadline.
#[cfg_attr(test, automock)]
pub trait AlarmPlayer {
    /// Start an indefinitely repeating cue.
    fn play(&mut self);

    /// Halt the cue. Must be a no-op on a silent player.
    fn stop(&mut self);
}

impl<T: AlarmPlayer + ?Sized> AlarmPlayer for Box<T> {
    fn play(&mut self) {
        (**self).play();
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}

/// Alarm that never makes a sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlarm;

impl AlarmPlayer for SilentAlarm {
    fn play(&mut self) {}

    fn stop(&mut self) {}
}

/// Rings the terminal bell on a background thread until stopped.
///
/// `stop` only clears the current ring's flag; threads are joined on drop.
#[derive(Debug)]
pub struct TerminalBell {
    interval: Duration,
    ringing: Option<Arc<AtomicBool>>,
    workers: Vec<JoinHandle<()>>,
}

impl TerminalBell {
    /// Create a bell that rings once per `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(100)),
            ringing: None,
            workers: Vec::new(),
        }
    }

    /// Whether the bell is currently ringing.
    #[must_use]
    pub fn is_ringing(&self) -> bool {
        self.ringing
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

impl AlarmPlayer for TerminalBell {
    fn play(&mut self) {
        if self.is_ringing() {
            return;
        }
        self.workers.retain(|handle| !handle.is_finished());

        // Each ring gets its own flag so a stopped thread never resumes.
        let flag = Arc::new(AtomicBool::new(true));
        let ringing = Arc::clone(&flag);
        let interval = self.interval;
        let spawned = thread::Builder::new()
            .name("flowclock-alarm".to_string())
            .spawn(move || {
                let slice = Duration::from_millis(50);
                while ringing.load(Ordering::SeqCst) {
                    let mut stderr = std::io::stderr();
                    let _ = stderr.write_all(b"\x07");
                    let _ = stderr.flush();

                    let mut waited = Duration::ZERO;
                    while waited < interval && ringing.load(Ordering::SeqCst) {
                        thread::sleep(slice);
                        waited += slice;
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                self.ringing = Some(flag);
                self.workers.push(handle);
            }
            Err(e) => tracing::warn!("failed to start alarm thread: {e}"),
        }
    }

    fn stop(&mut self) {
        if let Some(flag) = self.ringing.take() {
            flag.store(false, Ordering::SeqCst);
        }
    }
}

impl Drop for TerminalBell {
    fn drop(&mut self) {
        self.stop();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("alarm thread panicked");
            }
        }
    }
}
