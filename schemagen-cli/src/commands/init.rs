//! Configuration file bootstrap

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use schemagen::config::GeneratorConfig;
use std::fs;
use std::path::PathBuf;

/// Write a starter configuration file
#[derive(Debug, Clone, Args)]
pub struct InitCommand {
    /// Where to write the file
    #[arg(long, value_name = "FILE", default_value = GeneratorConfig::FILE_NAME)]
    pub path: PathBuf,

    /// Database name to pre-fill
    #[arg(short, long)]
    pub database: Option<String>,

    /// Replace an existing file
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    /// Render the file contents
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn render(&self) -> Result<String> {
        let mut config = GeneratorConfig::default();
        if let Some(name) = &self.database {
            config.database.name.clone_from(name);
        }
        let body = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
        Ok(format!(
            "# schemagen configuration\n# Environment variables override these values: SCHEMAGEN_DATABASE__HOST, ...\n\n{body}"
        ))
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists (without `--force`) or cannot be
    /// written.
    pub fn execute(&self) -> Result<()> {
        if self.path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists. Use --force to replace it.",
                self.path.display()
            );
        }

        fs::write(&self.path, self.render()?)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        println!(
            "{} {}",
            style("✓ Created").green().bold(),
            self.path.display()
        );
        println!();
        println!("{}", style("Next steps:").bold());
        println!("  1. Set [database] name, host and user");
        println!("  2. Export MYSQL_PWD if the server needs a password");
        println!("  3. Run: schemagen generate --table <name>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn command(path: PathBuf, force: bool) -> InitCommand {
        InitCommand {
            path,
            database: Some("shop".to_string()),
            force,
        }
    }

    #[test]
    fn test_rendered_file_round_trips_through_loader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schemagen.toml");
        command(path.clone(), false).execute().unwrap();

        let config = GeneratorConfig::load_from(&path).unwrap();
        assert_eq!(config.database.name, "shop");
        assert_eq!(config.database.port, 3306);
    }

    #[test]
    fn test_existing_file_requires_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schemagen.toml");
        fs::write(&path, "# mine\n").unwrap();

        assert!(command(path.clone(), false).execute().is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        command(path.clone(), true).execute().unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[database]"));
    }
}
