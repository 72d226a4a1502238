//! Testing utilities
//!
//! Fixtures for exercising the generator without a live database:
//!
//! - [`sample_source`]: an in-memory schema covering every key shape
//! - [`sample_config`]: configuration writing into a given directory with
//!   formatting disabled
//! - [`RecordingFormatter`]: a formatter that records the paths it was given
//! - [`FailingSource`]: a schema source whose every query fails
//!
//! # Example
//!
//! ```rust
//! use schemagen::generator::{GenerationContext, Generator};
//! use schemagen::testing::{sample_config, sample_source};
//!
//! # fn main() -> schemagen::Result<()> {
//! let dir = tempfile::tempdir().map_err(|e| schemagen::Error::io("tempdir", e))?;
//! let source = sample_source();
//! let generator = Generator::new(&sample_config(dir.path()))?;
//! let mut context = GenerationContext::new(&source);
//!
//! let report = generator.run(&mut context, &["users".to_string()])?;
//! assert_eq!(report.tables, vec!["users".to_string()]);
//! # Ok(())
//! # }
//! ```

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::GeneratorConfig;
use crate::output::SourceFormatter;
use crate::schema::{ColumnDescriptor, MemorySchemaSource, SchemaSource};
use crate::{Error, Result};

/// Database name used by [`sample_source`]
pub const SAMPLE_DATABASE: &str = "shop";

/// In-memory schema with four tables
///
/// - `users`: auto-increment `int` key, text default, nullable text, an enum,
///   a sampled boolean `tinyint`, a sampled integer `tinyint` and timestamps
/// - `memberships`: composite `(user_id, group_id)` key
/// - `codes`: single `varchar` key
/// - `audit_log`: no primary key
#[must_use]
pub fn sample_source() -> MemorySchemaSource {
    MemorySchemaSource::new(SAMPLE_DATABASE)
        .with_table(
            "users",
            vec![
                ColumnDescriptor::new("id", "int")
                    .with_full_type("int(11)")
                    .primary()
                    .with_extra("auto_increment"),
                ColumnDescriptor::new("name", "varchar")
                    .with_full_type("varchar(64)")
                    .with_default("guest"),
                ColumnDescriptor::new("email", "varchar")
                    .with_full_type("varchar(255)")
                    .nullable(),
                ColumnDescriptor::new("grade", "enum")
                    .with_full_type("enum('A','B','C')")
                    .with_default("A"),
                ColumnDescriptor::new("active", "tinyint")
                    .with_full_type("tinyint(1)")
                    .with_default("1"),
                ColumnDescriptor::new("level", "tinyint").with_full_type("tinyint(4)"),
                ColumnDescriptor::new("created_at", "datetime"),
                ColumnDescriptor::new("deleted_at", "datetime").nullable(),
            ],
        )
        .with_samples(
            "users",
            "active",
            vec![Some("0".to_string()), Some("1".to_string()), None],
        )
        .with_samples(
            "users",
            "level",
            vec![Some("0".to_string()), Some("1".to_string()), Some("7".to_string())],
        )
        .with_table(
            "memberships",
            vec![
                ColumnDescriptor::new("user_id", "int").primary(),
                ColumnDescriptor::new("group_id", "int").primary(),
                ColumnDescriptor::new("role", "varchar").with_full_type("varchar(32)"),
            ],
        )
        .with_table(
            "codes",
            vec![
                ColumnDescriptor::new("code", "varchar")
                    .with_full_type("varchar(16)")
                    .primary(),
                ColumnDescriptor::new("label", "text"),
            ],
        )
        .with_table(
            "audit_log",
            vec![
                ColumnDescriptor::new("event", "varchar").with_full_type("varchar(128)"),
                ColumnDescriptor::new("at", "timestamp"),
            ],
        )
}

/// Configuration for [`sample_source`] writing below `dir`
///
/// Formatting is disabled so tests do not depend on `rustfmt`.
#[must_use]
pub fn sample_config(dir: &Path) -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.database.name = SAMPLE_DATABASE.to_string();
    config.output.dir = dir.to_path_buf();
    config.output.format = false;
    config
}

/// Formatter that records every path it is asked to format
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingFormatter {
    calls: Rc<RefCell<Vec<PathBuf>>>,
    fail: bool,
}

impl RecordingFormatter {
    /// Formatter that succeeds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatter that records and then fails every call
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Paths formatted so far
    #[must_use]
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl SourceFormatter for RecordingFormatter {
    fn format(&self, path: &Path) -> std::result::Result<(), String> {
        self.calls.borrow_mut().push(path.to_path_buf());
        if self.fail {
            Err("formatter unavailable".to_string())
        } else {
            Ok(())
        }
    }
}

/// Schema source that is never reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSource;

impl SchemaSource for FailingSource {
    fn database(&self) -> &str {
        SAMPLE_DATABASE
    }

    fn columns(&self, _table: &str) -> Result<Vec<ColumnDescriptor>> {
        Err(Error::Introspection("connection refused".to_string()))
    }

    fn distinct_values(&self, _table: &str, _column: &str) -> Result<Vec<Option<String>>> {
        Err(Error::Introspection("connection refused".to_string()))
    }

    fn tables(&self) -> Result<Vec<String>> {
        Err(Error::Introspection("connection refused".to_string()))
    }
}
