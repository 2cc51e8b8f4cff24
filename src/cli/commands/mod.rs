//! Command implementations for flowclock.
//!
//! Every command returns the text to print; `main` does the printing.

mod completions;
mod config;
mod history;
mod log;
mod report;
mod start;

pub use completions::completions;
pub use config::{categories, config};
pub use history::history;
pub use log::log;
pub use report::report;
pub use start::start;

use crate::cli::args::OutputFormat;
use crate::config::{Config, Paths};
use crate::error::FlowError;
use crate::features::focus::{SessionLog, SessionRecord};

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Data paths.
    pub paths: Paths,
    /// Loaded configuration.
    pub config: Config,
    /// Output format for this invocation.
    pub format: OutputFormat,
}

impl Context {
    /// Load the config under `paths`; `format` overrides the configured
    /// default output.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is invalid.
    pub fn load(paths: Paths, format: Option<OutputFormat>) -> Result<Self, FlowError> {
        let config = Config::load_from_path(&paths.config_file)?;
        let format = format.unwrap_or(config.general.default_output);
        Ok(Self {
            paths,
            config,
            format,
        })
    }

    /// Open the session log for writing, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_log(&self) -> Result<SessionLog, FlowError> {
        self.paths.ensure_dirs()?;
        SessionLog::open_at(&self.paths.database)
    }

    /// Run `read` against the log, or return an empty list if there is no
    /// log yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the log exists but cannot be read.
    pub fn read_log<F>(&self, read: F) -> Result<Vec<SessionRecord>, FlowError>
    where
        F: FnOnce(&SessionLog) -> Result<Vec<SessionRecord>, FlowError>,
    {
        SessionLog::open_existing(&self.paths.database)?
            .map_or_else(|| Ok(Vec::new()), |log| read(&log))
    }
}
