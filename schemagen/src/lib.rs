//! # schemagen
//!
//! Inspects a MySQL table's schema (and, where the schema is ambiguous, its
//! live data) and synthesizes a typed `sqlx` data-access module for it: an
//! entity struct, insert-or-update/delete/read operations, and enum
//! validation.
//!
//! ## Pipeline
//!
//! ```text
//! Generator ──► Introspector ──► (type resolution, primary keys, enums)
//!                                   │
//!                                   ▼
//!                             CrudPlan ──► templates ──► OutputWriter
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schemagen::config::GeneratorConfig;
//! use schemagen::generator::{GenerationContext, Generator};
//! use schemagen::schema::MySqlSchemaSource;
//!
//! # fn main() -> schemagen::Result<()> {
//! let config = GeneratorConfig::load()?;
//! config.validate()?;
//!
//! let source = MySqlSchemaSource::connect(&config.database)?;
//! let generator = Generator::new(&config)?;
//! let mut context = GenerationContext::new(&source);
//!
//! let report = generator.run(&mut context, &["users".to_string()])?;
//! for artifact in &report.artifacts {
//!     println!("{} ({:?})", artifact.path.display(), artifact.outcome);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod entity;
pub mod enums;
pub mod error;
pub mod generator;
pub mod keys;
pub mod naming;
pub mod observability;
pub mod output;
pub mod resolve;
pub mod schema;
pub mod synth;
pub mod templates;
pub mod testing;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::GeneratorConfig;
    pub use crate::entity::{EntityColumn, EntitySpec};
    pub use crate::enums::EnumConstraint;
    pub use crate::error::{Error, Result};
    pub use crate::generator::{GenerationContext, Generator, RunReport};
    pub use crate::keys::{KeyCardinality, PrimaryKeySpec};
    pub use crate::resolve::{BaseKind, Nullability, TypeDescriptor};
    pub use crate::schema::{BooleanDetection, ColumnDescriptor, KeyRole, SchemaSource};
    pub use crate::synth::CrudPlan;
}
