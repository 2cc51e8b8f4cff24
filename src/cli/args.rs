use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "flowclock")]
#[command(about = "A focus session timer that reports focus quality by hour")]
#[command(long_about = "flowclock - focus sessions with a countdown, overtime, and a daily report

Plan a block of work, count it down in the terminal, keep going into overtime
if you need to, then rate your focus from 1 to 5. Every session is logged, and
the daily report shows how your focus held up hour by hour.

QUICK START:
  flowclock start -m 25 -c work -t \"Write intro\"   Start a 25 minute session
  flowclock report                                  Today's focus report
  flowclock history                                 Recent sessions

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  flowclock <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Data directory (config.yaml and flowclock.db)
    #[arg(long, global = true, env = "FLOWCLOCK_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a focus session
    ///
    /// Opens a full-screen countdown. When time runs out the alarm rings and
    /// the clock keeps counting overtime until you finish.
    ///
    /// # Keys
    ///
    ///   space / p    Pause or resume
    ///   a            Silence the alarm
    ///   f / Enter    Finish and rate the session
    ///   s            Save partial progress and rate
    ///   d / Esc / q  Discard without logging
    ///
    /// # Examples
    ///
    ///   flowclock start                         Default length and category
    ///   flowclock start -m 50 -c study -t "Ch. 4"
    ///   flowclock start -m 1h30m --no-alarm
    #[command(alias = "s")]
    Start(StartArgs),

    /// Log a session after the fact
    ///
    /// # Examples
    ///
    ///   flowclock log --start "2026-03-14 09:00" --minutes 35 --focus 4
    ///   flowclock log --start 14:00 --minutes 20 --focus 2 --abandoned
    Log(LogArgs),

    /// Show recent sessions, newest first
    #[command(alias = "h")]
    History {
        /// Number of sessions to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Show the focus report for a day
    ///
    /// Totals, hourly focus quality, time by category, and notes.
    ///
    /// # Examples
    ///
    ///   flowclock report
    ///   flowclock report --date yesterday
    ///   flowclock report --date 2026-03-14 -o json
    #[command(alias = "r")]
    Report {
        /// Day to report on (YYYY-MM-DD, today, yesterday)
        #[arg(short, long, default_value = "today")]
        date: String,
    },

    /// List the configured categories
    Categories,

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Example: flowclock completions zsh > ~/.zsh/completions/_flowclock
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for `start`.
#[derive(Args, Debug, Clone, Default)]
pub struct StartArgs {
    /// Planned length: minutes, or forms like 1h30m
    #[arg(short, long)]
    pub minutes: Option<String>,

    /// Category (matched case-insensitively against the configured list)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Task name
    #[arg(short, long)]
    pub task: Option<String>,

    /// Do not ring the terminal bell at the deadline
    #[arg(long)]
    pub no_alarm: bool,
}

/// Arguments for `log`.
#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// When the session started ("YYYY-MM-DD HH:MM" or "HH:MM" for today)
    #[arg(long)]
    pub start: String,

    /// Minutes actually spent
    #[arg(short, long)]
    pub minutes: f64,

    /// Focus rating, 1-5
    #[arg(short, long)]
    pub focus: i64,

    /// Planned minutes (defaults to timer.default_minutes)
    #[arg(short, long)]
    pub estimate: Option<String>,

    /// Category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Task name
    #[arg(short, long)]
    pub task: Option<String>,

    /// Notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Mark the session as stopped early
    #[arg(long)]
    pub abandoned: bool,
}

/// Arguments for `config`.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the data directory paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_start_args() {
        let cli = Cli::try_parse_from([
            "flowclock", "start", "-m", "50", "-c", "study", "-t", "Ch. 4",
        ])
        .unwrap();
        match cli.command {
            Commands::Start(args) => {
                assert_eq!(args.minutes.as_deref(), Some("50"));
                assert_eq!(args.category.as_deref(), Some("study"));
                assert_eq!(args.task.as_deref(), Some("Ch. 4"));
                assert!(!args.no_alarm);
            }
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["flowclock", "history", "-n", "3", "-o", "json", "-vv"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::History { limit: 3 }));
    }

    #[test]
    fn test_log_requires_focus() {
        let parsed =
            Cli::try_parse_from(["flowclock", "log", "--start", "09:00", "--minutes", "10"]);
        assert!(parsed.is_err());
    }
}
