//! Structured logging setup
//!
//! Log level and format come from [`ObservabilityConfig`]; `RUST_LOG`, when
//! set, overrides the configured level.

use crate::error::PeriodError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Error types for observability operations
#[derive(Error, Debug)]
pub enum ObservabilityError {
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),
}

/// Result type for observability operations
pub type Result<T> = std::result::Result<T, ObservabilityError>;

/// Configuration for logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Enable JSON logging format
    pub json_logs: bool,

    /// Service name attached to the startup event
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            service_name: "period-codec".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Validate the logging settings
    ///
    /// # Errors
    /// Returns a configuration error if the log level is not recognised
    pub fn validate(&self) -> std::result::Result<(), PeriodError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(PeriodError::configuration(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }
}

/// Install the global tracing subscriber
///
/// # Errors
/// Returns an error if the log level is invalid or a subscriber is already installed
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    config
        .log_level
        .parse::<Level>()
        .map_err(|e| ObservabilityError::TracingInit(format!("Invalid log level: {e}")))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_writer(std::io::stderr);
        registry
            .with(json_layer)
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    } else {
        let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
        registry
            .with(fmt_layer)
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    }

    info!(
        service = %config.service_name,
        level = %config.log_level,
        "Tracing initialized"
    );
    Ok(())
}
