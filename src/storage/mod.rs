//! Storage layer for flowclock.
//!
//! SQLite-based persistence for the focus session log.

mod database;
mod migrations;

pub use database::Database;
