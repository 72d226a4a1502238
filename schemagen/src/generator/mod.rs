//! Generation orchestrator
//!
//! Drives one run: emit the shared artifacts once, then for each requested
//! table introspect, resolve, synthesize and emit. A run that generated any
//! table finishes by rewriting `src/models/mod.rs`. The write policy of every
//! artifact comes from its [`ArtifactKind`]; the orchestrator is the only
//! place that consults it.
//!
//! Any error aborts the run. Files already written for earlier tables stay on
//! disk.

mod artifact;
mod context;

pub use artifact::{
    ArtifactKind, ArtifactReport, GeneratedFile, RunReport, WriteOutcome, WritePolicy,
};
pub use context::GenerationContext;

use crate::config::GeneratorConfig;
use crate::entity::EntitySpec;
use crate::output::{NoopFormatter, OutputWriter, Rustfmt, SourceFormatter};
use crate::schema::{BooleanDetection, Introspector};
use crate::synth::{CrudPlan, ExampleValues};
use crate::templates::TemplateRegistry;
use crate::{Error, Result};

/// Renders and writes the generated package
pub struct Generator {
    templates: TemplateRegistry,
    writer: OutputWriter,
    formatter: Box<dyn SourceFormatter>,
    detection: BooleanDetection,
    default_url: String,
}

impl Generator {
    /// Create a generator from configuration
    ///
    /// `rustfmt` runs after each write when `output.format` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if an embedded template fails to compile.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let formatter: Box<dyn SourceFormatter> = if config.output.format {
            Box::new(Rustfmt::new())
        } else {
            Box::new(NoopFormatter)
        };

        Ok(Self {
            templates: TemplateRegistry::new()?,
            writer: OutputWriter::new(&config.output.dir),
            formatter,
            detection: config.types.boolean_detection,
            default_url: format!("{:?}", config.database.url_without_password()),
        })
    }

    /// Replace the post-write formatter
    #[must_use]
    pub fn with_formatter(mut self, formatter: impl SourceFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Output writer
    #[must_use]
    pub fn writer(&self) -> &OutputWriter {
        &self.writer
    }

    /// Generate the given tables
    ///
    /// Tables already processed in `context` are skipped without error.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if a table name is empty or two tables map to the
    ///   same module directory
    /// - [`Error::SchemaNotFound`] if a table has no columns
    /// - [`Error::Introspection`], [`Error::Io`], [`Error::Template`] or
    ///   [`Error::MalformedEnum`] from the pipeline stages
    pub fn run(&self, context: &mut GenerationContext<'_>, tables: &[String]) -> Result<RunReport> {
        if tables.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::Config("table name must not be empty".to_string()));
        }
        for table in tables {
            context.claim_module(table)?;
        }

        let mut report = RunReport::default();
        self.ensure_shared(context, &mut report)?;

        for table in tables {
            if !context.mark_processed(table) {
                tracing::debug!(table = %table, "table already processed in this run");
                report.skipped_tables.push(table.clone());
                continue;
            }
            self.generate_table(context, table, &mut report)?;
            report.tables.push(table.clone());
        }

        if !report.tables.is_empty() {
            let file = self.render_models_root()?;
            report.artifacts.push(self.emit(file)?);
        }

        tracing::info!(
            tables = report.tables.len(),
            written = report.count(WriteOutcome::Written),
            overwritten = report.count(WriteOutcome::Overwritten),
            skipped = report.count(WriteOutcome::Skipped),
            "generation finished"
        );
        Ok(report)
    }

    /// Generate every table the schema source lists
    ///
    /// # Errors
    ///
    /// Same as [`Generator::run`], plus [`Error::Introspection`] if the table
    /// list cannot be read.
    pub fn run_all(&self, context: &mut GenerationContext<'_>) -> Result<RunReport> {
        let tables = context.source().tables()?;
        tracing::info!(database = %context.source().database(), count = tables.len(), "generating all tables");
        self.run(context, &tables)
    }

    fn ensure_shared(&self, context: &mut GenerationContext<'_>, report: &mut RunReport) -> Result<()> {
        if context.shared_emitted() {
            return Ok(());
        }
        for file in self.render_shared(context.source().database())? {
            report.artifacts.push(self.emit(file)?);
        }
        context.set_shared_emitted();
        Ok(())
    }

    fn generate_table(
        &self,
        context: &mut GenerationContext<'_>,
        table: &str,
        report: &mut RunReport,
    ) -> Result<()> {
        let _span = tracing::info_span!("table", table).entered();
        tracing::info!("introspecting");

        let source = context.source();
        let columns = Introspector::new(source, self.detection).introspect(table)?;
        let entity = EntitySpec::build(table, source.database(), columns)?;
        let plan = CrudPlan::synthesize(&entity);

        context.record_examples(table, plan.examples.clone());
        let examples = context.examples(table).cloned().unwrap_or_default();

        for file in self.render_table(&plan, &examples)? {
            report.artifacts.push(self.emit(file)?);
        }
        Ok(())
    }

    /// Render the artifacts shared by every table
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if rendering fails.
    pub fn render_shared(&self, database: &str) -> Result<Vec<GeneratedFile>> {
        let ctx = minijinja::context! {
            database => database,
            default_url => &self.default_url,
        };

        ArtifactKind::SHARED
            .iter()
            .map(|&kind| -> Result<GeneratedFile> {
                Ok(GeneratedFile {
                    path: kind.relative_path(""),
                    content: self.templates.render(kind.template(), &ctx)?,
                    description: kind.description(""),
                    kind,
                })
            })
            .collect()
    }

    /// Render `src/models/mod.rs` from the model directories on disk
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if `src/models` cannot be listed, or
    /// [`Error::Template`] if rendering fails.
    pub fn render_models_root(&self) -> Result<GeneratedFile> {
        let kind = ArtifactKind::ModelsRoot;
        let modules = self.writer.model_modules()?;
        Ok(GeneratedFile {
            path: kind.relative_path(""),
            content: self
                .templates
                .render(kind.template(), &minijinja::context! { modules => modules })?,
            description: kind.description(""),
            kind,
        })
    }

    /// Render the per-table artifacts for a plan
    ///
    /// `examples` seeds the test skeleton and the usage examples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if rendering fails.
    pub fn render_table(&self, plan: &CrudPlan, examples: &ExampleValues) -> Result<Vec<GeneratedFile>> {
        let seeded = CrudPlan {
            examples: examples.clone(),
            ..plan.clone()
        };

        ArtifactKind::PER_TABLE
            .iter()
            .map(|&kind| -> Result<GeneratedFile> {
                Ok(GeneratedFile {
                    path: kind.relative_path(&plan.module),
                    content: self.templates.render(kind.template(), &seeded)?,
                    description: kind.description(&plan.entity),
                    kind,
                })
            })
            .collect()
    }

    fn emit(&self, file: GeneratedFile) -> Result<ArtifactReport> {
        let existed = self.writer.exists(&file.path);

        let outcome = if existed && file.kind.policy() == WritePolicy::CreateOnce {
            tracing::debug!(path = %file.path.display(), "keeping existing file");
            WriteOutcome::Skipped
        } else {
            let written = self.writer.write(&file.path, &file.content)?;
            if let Err(e) = self.formatter.format(&written) {
                tracing::warn!(path = %written.display(), error = %e, "formatting failed");
            }
            if existed {
                WriteOutcome::Overwritten
            } else {
                WriteOutcome::Written
            }
        };

        Ok(ArtifactReport {
            path: file.path,
            description: file.description,
            kind: file.kind,
            outcome,
        })
    }
}
