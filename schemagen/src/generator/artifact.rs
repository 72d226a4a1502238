//! Artifact kinds and their write policies

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Whether an existing file may be replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Fully owned by the generator, rewritten every run
    AlwaysOverwrite,
    /// Written only when absent so hand edits survive
    CreateOnce,
}

/// Every file the generator can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Shared connection-pool accessor
    Connection,
    /// Shared nullable timestamp wrapper
    Date,
    /// Shared validation and argument helpers
    Utils,
    /// Per-table module root
    ModuleRoot,
    /// Per-table entity and CRUD operations
    Crud,
    /// Per-table custom data-access methods
    Dao,
    /// Per-table custom business-object methods
    Bo,
    /// Per-table test skeleton
    Tests,
    /// Per-table usage examples
    Examples,
    /// `models/mod.rs` declaring every model directory on disk
    ModelsRoot,
}

impl ArtifactKind {
    /// Artifacts emitted once per run, before any table
    pub const SHARED: [Self; 3] = [Self::Connection, Self::Date, Self::Utils];

    /// Artifacts emitted for every table, in emission order
    pub const PER_TABLE: [Self; 6] = [
        Self::Crud,
        Self::ModuleRoot,
        Self::Dao,
        Self::Bo,
        Self::Tests,
        Self::Examples,
    ];

    /// Write policy of this kind
    ///
    /// # Examples
    ///
    /// ```
    /// use schemagen::generator::{ArtifactKind, WritePolicy};
    ///
    /// assert_eq!(ArtifactKind::Crud.policy(), WritePolicy::AlwaysOverwrite);
    /// assert_eq!(ArtifactKind::Dao.policy(), WritePolicy::CreateOnce);
    /// ```
    #[must_use]
    pub const fn policy(self) -> WritePolicy {
        match self {
            Self::Connection | Self::Date | Self::Crud | Self::ModelsRoot => {
                WritePolicy::AlwaysOverwrite
            }
            Self::Utils | Self::ModuleRoot | Self::Dao | Self::Bo | Self::Tests | Self::Examples => {
                WritePolicy::CreateOnce
            }
        }
    }

    /// Template used to render this kind
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Date => "date",
            Self::Utils => "utils",
            Self::ModuleRoot => "mod",
            Self::Crud => "crud",
            Self::Dao => "dao",
            Self::Bo => "bo",
            Self::Tests => "tests",
            Self::Examples => "examples",
            Self::ModelsRoot => "models",
        }
    }

    /// Path relative to the output root
    ///
    /// `module` is ignored for shared kinds and [`ArtifactKind::ModelsRoot`].
    #[must_use]
    pub fn relative_path(self, module: &str) -> PathBuf {
        let src = Path::new("src");
        let table_dir = src.join("models").join(module);
        match self {
            Self::Connection => src.join("connection.rs"),
            Self::Date => src.join("date.rs"),
            Self::Utils => src.join("utils.rs"),
            Self::ModuleRoot => table_dir.join("mod.rs"),
            Self::Crud => table_dir.join("crud.rs"),
            Self::Dao => table_dir.join("dao.rs"),
            Self::Bo => table_dir.join("bo.rs"),
            Self::Tests => table_dir.join("tests.rs"),
            Self::Examples => table_dir.join("examples.rs"),
            Self::ModelsRoot => src.join("models").join("mod.rs"),
        }
    }

    /// Human-readable description for reports
    #[must_use]
    pub fn description(self, entity: &str) -> String {
        match self {
            Self::Connection => "Connection pool accessor".to_string(),
            Self::Date => "Nullable timestamp type".to_string(),
            Self::Utils => "Validation and argument helpers".to_string(),
            Self::ModuleRoot => format!("Module root for {entity}"),
            Self::Crud => format!("Entity and CRUD operations for {entity}"),
            Self::Dao => format!("Custom data access for {entity}"),
            Self::Bo => format!("Custom business logic for {entity}"),
            Self::Tests => format!("Test skeleton for {entity}"),
            Self::Examples => format!("Usage examples for {entity}"),
            Self::ModelsRoot => "Model module declarations".to_string(),
        }
    }
}

/// A rendered file waiting to be written
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Path relative to the output root
    pub path: PathBuf,
    /// File contents
    pub content: String,
    /// Human-readable description
    pub description: String,
    /// Artifact kind, which decides the write policy
    pub kind: ArtifactKind,
}

/// What happened to one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    /// Did not exist, now written
    Written,
    /// Existed and was replaced
    Overwritten,
    /// Existed and was left alone
    Skipped,
}

/// Report line for one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    /// Path relative to the output root
    pub path: PathBuf,
    /// Human-readable description
    pub description: String,
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Outcome
    pub outcome: WriteOutcome,
}

/// Summary of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Every artifact considered, in emission order
    pub artifacts: Vec<ArtifactReport>,
    /// Tables generated in this run
    pub tables: Vec<String>,
    /// Table names skipped because they were already processed
    pub skipped_tables: Vec<String>,
}

impl RunReport {
    /// Number of artifacts with the given outcome
    #[must_use]
    pub fn count(&self, outcome: WriteOutcome) -> usize {
        self.artifacts.iter().filter(|a| a.outcome == outcome).count()
    }

    /// Report line for a relative path
    #[must_use]
    pub fn artifact(&self, path: &Path) -> Option<&ArtifactReport> {
        self.artifacts.iter().find(|a| a.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies() {
        for kind in [
            ArtifactKind::Connection,
            ArtifactKind::Date,
            ArtifactKind::Crud,
            ArtifactKind::ModelsRoot,
        ] {
            assert_eq!(kind.policy(), WritePolicy::AlwaysOverwrite, "{kind:?}");
        }
        for kind in [
            ArtifactKind::Utils,
            ArtifactKind::ModuleRoot,
            ArtifactKind::Dao,
            ArtifactKind::Bo,
            ArtifactKind::Tests,
            ArtifactKind::Examples,
        ] {
            assert_eq!(kind.policy(), WritePolicy::CreateOnce, "{kind:?}");
        }
    }

    #[test]
    fn test_paths() {
        assert_eq!(
            ArtifactKind::Crud.relative_path("users"),
            PathBuf::from("src/models/users/crud.rs")
        );
        assert_eq!(
            ArtifactKind::Utils.relative_path("ignored"),
            PathBuf::from("src/utils.rs")
        );
        assert_eq!(
            ArtifactKind::ModelsRoot.relative_path("users"),
            PathBuf::from("src/models/mod.rs")
        );
    }

    #[test]
    fn test_report_counts() {
        let report = RunReport {
            artifacts: vec![
                ArtifactReport {
                    path: PathBuf::from("a"),
                    description: String::new(),
                    kind: ArtifactKind::Crud,
                    outcome: WriteOutcome::Overwritten,
                },
                ArtifactReport {
                    path: PathBuf::from("b"),
                    description: String::new(),
                    kind: ArtifactKind::Dao,
                    outcome: WriteOutcome::Skipped,
                },
            ],
            ..RunReport::default()
        };
        assert_eq!(report.count(WriteOutcome::Skipped), 1);
        assert_eq!(report.count(WriteOutcome::Written), 0);
        assert_eq!(
            report.artifact(Path::new("a")).map(|a| a.outcome),
            Some(WriteOutcome::Overwritten)
        );
    }
}
