//! Shared utilities for flowclock.

mod datetime;

pub use datetime::{parse_day, parse_start};
