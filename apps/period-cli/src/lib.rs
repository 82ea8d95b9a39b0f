//! Period CLI library
//!
//! Argument parsing and command execution for the `period` binary. Output goes
//! to a caller-supplied writer so commands can be exercised in tests.

use clap::{Parser, Subcommand};
use period_core::{
    parse_db_period, parse_iso_period, ObservabilityConfig, PeriodConfig, Result,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "period")]
#[command(about = "Convert between ISO-8601 intervals and database range literals")]
#[command(version)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(long, short, env = "PERIOD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Convert a database range literal to an ISO-8601 interval
    ToIso {
        /// Range literal, e.g. ["2014-03-01 13:00:00+00","2015-05-11 15:30:00+00"]
        period: String,
    },
    /// Convert an ISO-8601 interval to a database range literal
    ToDb {
        /// Interval, e.g. 2014-03-01T13:00:00Z/2015-05-11T15:30:00Z
        period: String,
    },
    /// Detect the grammar of a period and print both renderings
    Check {
        /// Range literal or ISO-8601 interval
        period: String,
    },
}

/// Logging settings for this invocation; `--verbose` forces `debug`
#[must_use]
pub fn logging_config(cli: &Cli, config: &PeriodConfig) -> ObservabilityConfig {
    let mut observability = config.observability.clone();
    if cli.verbose {
        observability.log_level = "debug".to_string();
    }
    observability
}

/// Execute a command, writing its output to `writer`
///
/// # Errors
/// Returns a format error for malformed periods, or an IO error if writing fails
pub fn run_command<W: Write>(command: &Commands, writer: &mut W) -> Result<()> {
    match command {
        Commands::ToIso { period } => {
            writeln!(writer, "{}", period_core::to_iso8601(period)?)?;
        }
        Commands::ToDb { period } => {
            writeln!(writer, "{}", period_core::to_db_period(period)?)?;
        }
        Commands::Check { period } => {
            let (grammar, interval) = if period.starts_with('[') {
                ("range literal", parse_db_period(period)?)
            } else {
                ("ISO-8601 interval", parse_iso_period(period)?)
            };
            debug!(grammar, "detected period grammar");
            writeln!(writer, "grammar: {grammar}")?;
            writeln!(writer, "iso8601: {}", interval.to_iso8601())?;
            writeln!(writer, "db:      {}", interval.to_db_period())?;
            if interval.start > interval.end {
                writeln!(writer, "note:    start is after end")?;
            }
        }
    }
    Ok(())
}
