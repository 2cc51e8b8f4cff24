//! Feature implementations for flowclock.
//!
//! - Focus sessions: clock, records, aggregation, log, reports

pub mod focus;
