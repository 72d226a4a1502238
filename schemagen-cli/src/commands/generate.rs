//! Module generation command

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use schemagen::config::GeneratorConfig;
use schemagen::generator::{GenerationContext, Generator, RunReport, WriteOutcome};
use schemagen::schema::BooleanDetection;
use std::path::{Path, PathBuf};

use super::SourceArgs;

/// Generate data-access modules
#[derive(Debug, Clone, Args)]
pub struct GenerateCommand {
    /// Table to generate (repeatable)
    #[arg(short, long = "table", value_name = "TABLE", required_unless_present = "all")]
    pub tables: Vec<String>,

    /// Generate every table in the database
    #[arg(long, conflicts_with = "tables")]
    pub all: bool,

    /// Root of the generated package
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Do not run rustfmt on written files
    #[arg(long)]
    pub no_format: bool,

    /// How tinyint columns are classified
    #[arg(long, value_enum)]
    pub boolean_detection: Option<Detection>,

    /// Schema source
    #[command(flatten)]
    pub source: SourceArgs,
}

/// `--boolean-detection` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Detection {
    /// Sample the column's distinct values
    Sampled,
    /// Use the declared display width only
    Declared,
}

impl From<Detection> for BooleanDetection {
    fn from(value: Detection) -> Self {
        match value {
            Detection::Sampled => Self::Sampled,
            Detection::Declared => Self::Declared,
        }
    }
}

impl GenerateCommand {
    /// Apply the output and type flags to `config`
    pub fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(output) = &self.output {
            config.output.dir.clone_from(output);
        }
        if self.no_format {
            config.output.format = false;
        }
        if let Some(detection) = self.boolean_detection {
            config.types.boolean_detection = detection.into();
        }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if a table name is empty, the configuration is
    /// incomplete, or generation fails.
    pub fn execute(&self) -> Result<()> {
        if self.tables.iter().any(|t| t.trim().is_empty()) {
            anyhow::bail!("Table names must not be empty");
        }

        let mut config = self.source.load_config()?;
        self.apply(&mut config);
        let source = self.source.open(&mut config)?;

        println!(
            "\n{} {} {}",
            style("Generating modules for").cyan().bold(),
            style(&config.database.name).green().bold(),
            style("...").cyan().bold()
        );

        let generator = Generator::new(&config).context("Failed to create generator")?;
        let mut context = GenerationContext::new(source.as_ref());

        let report = if self.all {
            generator.run_all(&mut context)
        } else {
            generator.run(&mut context, &self.tables)
        }
        .context("Generation failed")?;

        print_report(&report, &config.output.dir);
        Ok(())
    }
}

fn print_report(report: &RunReport, root: &Path) {
    println!(
        "\n{} {} table(s):",
        style("Generated").green().bold(),
        report.tables.len()
    );

    for artifact in &report.artifacts {
        let path = root.join(&artifact.path);
        match artifact.outcome {
            WriteOutcome::Written => println!(
                "  {} {} {}",
                style("✓").green(),
                path.display(),
                style(format!("({})", artifact.description)).dim()
            ),
            WriteOutcome::Overwritten => println!(
                "  {} {} {}",
                style("↻").yellow(),
                path.display(),
                style("(regenerated)").dim()
            ),
            WriteOutcome::Skipped => println!(
                "  {} {} {}",
                style("-").dim(),
                path.display(),
                style("(exists, kept)").dim()
            ),
        }
    }

    for table in &report.skipped_tables {
        println!("  {} {table} listed more than once", style("!").yellow());
    }

    println!("\n{}", style("Next steps:").bold());
    println!("  1. Declare the generated modules: mod connection; mod date; mod utils; mod models;");
    println!("  2. Add sqlx (mysql, runtime-tokio, chrono), tokio, chrono, serde and thiserror");
    println!("  3. Set DATABASE_URL before running the generated code");
    println!("  4. Put custom queries in dao.rs and bo.rs; they are never overwritten");
}
