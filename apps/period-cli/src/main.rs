//! Period CLI - convert between ISO-8601 intervals and database range literals

use anyhow::Context;
use clap::Parser;
use period_cli::{logging_config, run_command, Cli};
use period_core::{init_tracing, load_config};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The subscriber depends on the loaded config, so events raised while
    // loading it are dropped; the source is reported once tracing is up.
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&logging_config(&cli, &config))?;
    match &cli.config {
        Some(path) => info!(path = %path.display(), "Loaded configuration"),
        None => info!("Using default configuration"),
    }

    run_command(&cli.command, &mut std::io::stdout().lock())?;
    Ok(())
}
