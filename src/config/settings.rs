//! Configuration settings for flowclock.
//!
//! Settings are loaded from `~/.flowclock/config.yaml`. Every field has a
//! default, so partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::FlowError;
use crate::features::focus::DEFAULT_TASK_NAME;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Countdown settings.
    pub timer: TimerConfig,
    /// Allowed session categories.
    pub categories: Vec<String>,
    /// Report rendering settings.
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Countdown settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Planned minutes when `--minutes` is not given.
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
    /// Ring the terminal bell at the deadline.
    #[serde(default = "default_true")]
    pub alarm: bool,
    /// Seconds between bell rings.
    #[serde(default = "default_alarm_interval")]
    pub alarm_interval_secs: u64,
    /// Task name when none is given.
    #[serde(default = "default_task_name")]
    pub default_task_name: String,
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Width of chart bars in characters.
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
}

const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_minutes() -> u32 {
    25
}

const fn default_true() -> bool {
    true
}

const fn default_alarm_interval() -> u64 {
    1
}

fn default_task_name() -> String {
    DEFAULT_TASK_NAME.to_string()
}

fn default_categories() -> Vec<String> {
    ["Work", "Study", "Code", "Admin", "Personal"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

const fn default_bar_width() -> usize {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            timer: TimerConfig::default(),
            categories: default_categories(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            alarm: default_true(),
            alarm_interval_secs: default_alarm_interval(),
            default_task_name: default_task_name(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// holds invalid values.
    pub fn load_from_path(path: &Path) -> Result<Self, FlowError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            FlowError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            FlowError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &Path) -> Result<(), FlowError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| FlowError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            FlowError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Check values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Config` describing the first bad value.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.timer.default_minutes == 0 {
            return Err(FlowError::Config(
                "timer.default_minutes must be at least 1".to_string(),
            ));
        }
        if self.report.bar_width == 0 {
            return Err(FlowError::Config(
                "report.bar_width must be at least 1".to_string(),
            ));
        }
        if let Some(blank) = self.categories.iter().find(|c| c.trim().is_empty()) {
            return Err(FlowError::Config(format!(
                "categories must not contain blank names ({blank:?})"
            )));
        }
        Ok(())
    }

    /// Match `input` against the configured categories, ignoring case.
    ///
    /// Returns the configured spelling. An empty category list accepts
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Config` naming the allowed set for unknown input.
    pub fn resolve_category(&self, input: &str) -> Result<String, FlowError> {
        let wanted = input.trim();
        if self.categories.is_empty() {
            return Ok(wanted.to_string());
        }

        self.categories
            .iter()
            .find(|c| c.eq_ignore_ascii_case(wanted))
            .cloned()
            .ok_or_else(|| {
                FlowError::Config(format!(
                    "unknown category {wanted:?} (expected one of: {})",
                    self.categories.join(", ")
                ))
            })
    }

    /// Category used when none is given.
    #[must_use]
    pub fn default_category(&self) -> &str {
        self.categories.first().map_or("Work", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.general.default_output, OutputFormat::Pretty);
        assert_eq!(config.general.color, ColorSetting::Auto);
        assert_eq!(config.timer.default_minutes, 25);
        assert!(config.timer.alarm);
        assert_eq!(config.timer.default_task_name, "Unnamed Task");
        assert_eq!(config.categories.len(), 5);
        assert_eq!(config.report.bar_width, 30);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from_path(&temp_dir.path().join("config.yaml")).unwrap();
        assert_eq!(config.default_category(), "Work");
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut config = Config::default();
        config.timer.default_minutes = 50;
        config.categories = vec!["Deep".to_string(), "Shallow".to_string()];
        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();
        assert_eq!(loaded.timer.default_minutes, 50);
        assert_eq!(loaded.categories, vec!["Deep", "Shallow"]);
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let partial_yaml = r"
timer:
  default_minutes: 45
";
        std::fs::write(&config_path, partial_yaml).unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.timer.default_minutes, 45);
        assert!(config.timer.alarm);
        assert_eq!(config.categories[0], "Work");
        assert_eq!(config.general.default_output, OutputFormat::Pretty);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "timer:\n  default_minutes: 0\n").unwrap();

        assert!(matches!(
            Config::load_from_path(&config_path),
            Err(FlowError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_category() {
        let config = Config::default();
        assert_eq!(config.resolve_category("study").unwrap(), "Study");
        assert_eq!(config.resolve_category(" CODE ").unwrap(), "Code");

        let err = config.resolve_category("Gaming").unwrap_err();
        assert!(err.to_string().contains("Work, Study, Code, Admin, Personal"));
    }

    #[test]
    fn test_empty_category_list_accepts_anything() {
        let config = Config {
            categories: Vec::new(),
            ..Config::default()
        };
        assert_eq!(config.resolve_category("Gaming").unwrap(), "Gaming");
    }
}
