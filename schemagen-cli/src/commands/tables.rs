//! Table listing command

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use super::SourceArgs;

/// List the tables of the configured database
#[derive(Debug, Clone, Args)]
pub struct TablesCommand {
    /// Schema source
    #[command(flatten)]
    pub source: SourceArgs,
}

impl TablesCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or the table list
    /// cannot be read.
    pub fn execute(&self) -> Result<()> {
        let mut config = self.source.load_config()?;
        let source = self.source.open(&mut config)?;
        let tables = source.tables().context("Failed to list tables")?;

        println!(
            "{} {} ({} tables)",
            style("Database").bold(),
            style(source.database()).cyan().bold(),
            tables.len()
        );
        for table in &tables {
            println!("  {table}");
        }
        Ok(())
    }
}
