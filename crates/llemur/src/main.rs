mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use llemur_core::{logging, Config};
use std::path::PathBuf;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let log = config.log();
    let level = cli.log_level.as_deref().unwrap_or(&log.level);
    let log_file = log.file.as_ref().map(PathBuf::from);
    let _guard = logging::init(level, cli.verbose, log_file.as_deref())?;

    if let Some(warning) = config.version_warning() {
        tracing::warn!("{}", warning);
    }
    tracing::debug!(command = ?cli.command, "starting");

    commands::execute(cli.command, &config)
}
