//! Connection flags shared by commands that read a schema

use anyhow::{Context, Result};
use clap::Args;
use schemagen::config::GeneratorConfig;
use schemagen::schema::{MemorySchemaSource, MySqlSchemaSource, SchemaSource};
use std::path::PathBuf;

/// Where the schema comes from
///
/// Flags override values from the configuration file and `SCHEMAGEN_*`
/// environment variables.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Configuration file
    #[arg(long, value_name = "FILE", default_value = GeneratorConfig::FILE_NAME)]
    pub config: PathBuf,

    /// Read table metadata from a JSON snapshot instead of a live database
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Database (schema) name
    #[arg(short, long)]
    pub database: Option<String>,

    /// Server host
    #[arg(long)]
    pub host: Option<String>,

    /// Server port
    #[arg(long)]
    pub port: Option<u16>,

    /// User name
    #[arg(short, long)]
    pub user: Option<String>,

    /// Password
    #[arg(long, env = "MYSQL_PWD", hide_env_values = true)]
    pub password: Option<String>,
}

impl SourceArgs {
    /// Load configuration and apply the connection flags on top
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file or environment holds an
    /// invalid value.
    pub fn load_config(&self) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::load_from(&self.config)
            .with_context(|| format!("Failed to load configuration from {}", self.config.display()))?;
        self.apply(&mut config);
        Ok(config)
    }

    /// Apply the connection flags to `config`
    pub fn apply(&self, config: &mut GeneratorConfig) {
        let database = &mut config.database;
        if let Some(name) = &self.database {
            database.name.clone_from(name);
        }
        if let Some(host) = &self.host {
            database.host.clone_from(host);
        }
        if let Some(port) = self.port {
            database.port = port;
        }
        if let Some(user) = &self.user {
            database.user.clone_from(user);
        }
        if self.password.is_some() {
            database.password.clone_from(&self.password);
        }
    }

    /// Open the schema source and validate the configuration
    ///
    /// A snapshot supplies the database name when none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete, the snapshot
    /// cannot be read, or the database is unreachable.
    pub fn open(&self, config: &mut GeneratorConfig) -> Result<Box<dyn SchemaSource>> {
        if let Some(path) = &self.snapshot {
            let source = MemorySchemaSource::from_json_file(path)
                .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
            if config.database.name.trim().is_empty() {
                config.database.name = source.database().to_string();
            }
            config.validate()?;
            tracing::debug!(snapshot = %path.display(), "using schema snapshot");
            return Ok(Box::new(source));
        }

        config.validate()?;
        let source = MySqlSchemaSource::connect(&config.database).with_context(|| {
            format!(
                "Failed to connect to {}",
                config.database.url_without_password()
            )
        })?;
        Ok(Box::new(source))
    }
}
