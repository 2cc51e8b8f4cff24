//! flowclock - a focus session timer
//!
//! Runs planned work sessions through a countdown/overtime/review state
//! machine, logs each finished session to `SQLite`, and reports focus quality
//! hour by hour.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::FlowError;
pub use features::focus::{
    category_totals, hourly_focus_quality, DailyReport, SessionClock, SessionLog, SessionRecord,
};
