//! Logging setup
//!
//! Structured logging through `tracing`, written to stderr so generated
//! output and command summaries on stdout stay clean.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{Error, Result};

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Number of `-v` flags: 0 = warn, 1 = info, 2 = debug, 3+ = trace
    pub verbosity: u8,
    /// Line format
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            format: LogFormat::Compact,
        }
    }
}

impl ObservabilityConfig {
    /// Config for the given verbosity
    #[must_use]
    pub fn new(verbosity: u8) -> Self {
        Self {
            verbosity,
            ..Default::default()
        }
    }

    /// Emit JSON lines
    #[must_use]
    pub const fn with_json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    /// Filter directive used when `RUST_LOG` is unset
    #[must_use]
    pub fn default_directive(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "info,schemagen=debug",
            _ => "trace",
        }
    }
}

/// Initialize logging
///
/// `RUST_LOG` takes precedence over the verbosity in `config`.
///
/// # Errors
///
/// Returns [`Error::Config`] if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use schemagen::observability::{self, ObservabilityConfig};
///
/// # fn main() -> schemagen::Result<()> {
/// observability::init(&ObservabilityConfig::new(1))?;
/// tracing::info!("generator started");
/// # Ok(())
/// # }
/// ```
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| Error::Config(format!("logging already initialised: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.verbosity, 0);
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.default_directive(), "warn");
    }

    #[test]
    fn test_builder() {
        let config = ObservabilityConfig::new(2).with_json();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.default_directive(), "info,schemagen=debug");
        assert_eq!(ObservabilityConfig::new(9).default_directive(), "trace");
    }
}
