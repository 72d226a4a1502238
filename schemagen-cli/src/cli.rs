//! Command-line surface

use clap::{Parser, Subcommand, ValueEnum};
use schemagen::observability::ObservabilityConfig;

use crate::commands::{GenerateCommand, InitCommand, TablesCommand};

/// Generate typed sqlx data-access modules from MySQL tables
#[derive(Debug, Parser)]
#[command(name = "schemagen")]
#[command(version)]
#[command(about = "Generate typed sqlx data-access modules from MySQL tables", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Compact, global = true)]
    pub log_format: LogFormatArg,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate modules for one or more tables
    Generate(GenerateCommand),
    /// List the tables of the configured database
    Tables(TablesCommand),
    /// Write a starter schemagen.toml
    Init(InitCommand),
}

/// `--log-format` values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    /// Compact human-readable lines
    #[default]
    Compact,
    /// One JSON object per line
    Json,
}

impl Cli {
    /// Logging configuration for the parsed flags
    #[must_use]
    pub fn observability(&self) -> ObservabilityConfig {
        let config = ObservabilityConfig::new(self.verbose);
        match self.log_format {
            LogFormatArg::Compact => config,
            LogFormatArg::Json => config.with_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use schemagen::observability::LogFormat;

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_maps_to_logging() {
        let cli = Cli::try_parse_from(["schemagen", "-vv", "--log-format", "json", "tables", "--database", "shop"])
            .unwrap();
        let config = cli.observability();
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.format, LogFormat::Json);
    }
}
