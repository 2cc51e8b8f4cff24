//! Configuration management for flowclock.
//!
//! This module handles loading and saving configuration from `~/.flowclock/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ColorSetting, Config, GeneralConfig, ReportConfig, TimerConfig};
