//! Structured logging setup.
//!
//! One call to [`init_logging`] at startup wires `tracing-subscriber` with an
//! env-filter level and either JSON (production) or pretty (development)
//! output. Everything else in the workspace just emits `tracing` events.

use portico_config::LogSettings;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging initialization failures.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The filter string or subscriber setup was rejected.
    #[error("failed to initialize logging: {0}")]
    Init(String),
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,
    /// Filter directive, e.g. `info` or `portico=debug,warn`.
    pub level: String,
    /// JSON output instead of human-readable.
    pub json_format: bool,
    /// Service name added to every line.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            service_name: "portico".to_string(),
        }
    }
}

impl LogConfig {
    /// Builds a logging configuration from the loaded settings.
    #[must_use]
    pub fn from_settings(settings: &LogSettings, service_name: impl Into<String>) -> Self {
        Self {
            enabled: true,
            level: settings.level.clone(),
            json_format: settings.json,
            service_name: service_name.into(),
        }
    }

    /// Human-readable output at debug level.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            service_name: "portico".to_string(),
        }
    }
}

/// Initializes the global tracing subscriber.
///
/// # Errors
///
/// Returns `LoggingError::Init` if the filter is invalid or a subscriber was
/// already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| LoggingError::Init(format!("invalid log level: {e}")))?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter);
        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_filter(filter);
        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
    }

    tracing::info!(service = %config.service_name, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert!(config.json_format);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert!(!config.json_format);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_from_settings() {
        let settings = LogSettings {
            level: "warn".to_string(),
            json: false,
        };
        let config = LogConfig::from_settings(&settings, "edge-gateway");
        assert_eq!(config.level, "warn");
        assert!(!config.json_format);
        assert_eq!(config.service_name, "edge-gateway");
    }

    #[test]
    fn test_disabled_init_is_ok() {
        let config = LogConfig {
            enabled: false,
            ..LogConfig::default()
        };
        assert!(init_logging(&config).is_ok());
    }
}
