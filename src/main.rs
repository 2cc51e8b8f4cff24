use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flowclock::cli::args::{Cli, Commands};
use flowclock::cli::commands::{self, Context};
use flowclock::config::{ColorSetting, Paths};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "flowclock=warn",
        1 => "flowclock=info",
        _ => "flowclock=debug",
    };
    let env_filter =
        EnvFilter::try_from_env("FLOWCLOCK_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = Paths::resolve(cli.home)?;
    let ctx = Context::load(paths, cli.output)
        .context("could not load configuration")?;

    match ctx.config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }

    let output = match cli.command {
        Commands::Start(args) => commands::start(&ctx, &args)?,
        Commands::Log(args) => commands::log(&ctx, args)?,
        Commands::History { limit } => commands::history(&ctx, limit)?,
        Commands::Report { date } => commands::report(&ctx, &date)?,
        Commands::Categories => commands::categories(&ctx)?,
        Commands::Config(args) => commands::config(&ctx, args.command)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
