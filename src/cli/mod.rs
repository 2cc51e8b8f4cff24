//! Command-line interface for flowclock.

pub mod args;
pub mod commands;
