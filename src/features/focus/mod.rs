//! Focus sessions.
//!
//! - [`SessionClock`]: the countdown/overtime/review state machine
//! - [`SessionRecord`]: the immutable result of a finished session
//! - [`hourly_focus_quality`] and [`category_totals`]: pure projections over
//!   records
//! - [`SessionLog`]: the append-only store
//! - [`DailyReport`]: one day of history, ready for display

pub mod aggregate;
pub mod alarm;
pub mod clock;
pub mod record;
pub mod report;
pub mod storage;
pub mod timer;

pub use aggregate::{category_totals, hourly_focus_quality, HourlyQuality};
pub use alarm::{AlarmPlayer, SilentAlarm, TerminalBell};
pub use clock::{ClockSnapshot, Phase, SessionClock, TickOutcome};
pub use record::{FocusLevel, RecordDraft, SessionRecord, DEFAULT_TASK_NAME};
pub use report::{CategoryShare, DailyReport, SessionNote};
pub use storage::SessionLog;
pub use timer::{format_duration, format_minutes, format_mmss, parse_minutes, render_progress_bar};
