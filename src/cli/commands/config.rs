//! `config` and `categories` commands.

use colored::Colorize;
use serde_json::json;

use super::Context;
use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::error::FlowError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the config cannot be serialized or written.
pub fn config(ctx: &Context, cmd: ConfigCommands) -> Result<String, FlowError> {
    match cmd {
        ConfigCommands::Show => match ctx.format {
            OutputFormat::Json => to_json(&ctx.config),
            OutputFormat::Pretty => serde_yaml::to_string(&ctx.config)
                .map_err(|e| FlowError::Config(format!("Failed to serialize config: {e}"))),
        },

        ConfigCommands::Init { force } => {
            let path = &ctx.paths.config_file;
            if path.exists() && !force {
                return Err(FlowError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            ctx.paths.ensure_dirs()?;
            ctx.config.save_to_path(path)?;

            match ctx.format {
                OutputFormat::Json => to_json(&json!({ "written": path })),
                OutputFormat::Pretty => Ok(format!("{} {}", "Wrote".green(), path.display())),
            }
        }

        ConfigCommands::Path => match ctx.format {
            OutputFormat::Json => to_json(&json!({
                "root": ctx.paths.root,
                "config": ctx.paths.config_file,
                "database": ctx.paths.database,
            })),
            OutputFormat::Pretty => Ok(format!(
                "root:     {}\nconfig:   {}\ndatabase: {}",
                ctx.paths.root.display(),
                ctx.paths.config_file.display(),
                ctx.paths.database.display()
            )),
        },
    }
}

/// List the configured categories.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn categories(ctx: &Context) -> Result<String, FlowError> {
    match ctx.format {
        OutputFormat::Json => to_json(&ctx.config.categories),
        OutputFormat::Pretty => {
            if ctx.config.categories.is_empty() {
                return Ok("No categories configured; any name is accepted.".to_string());
            }
            Ok(ctx
                .config
                .categories
                .iter()
                .map(|c| format!("  {c}"))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}
