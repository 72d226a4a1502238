//! In-memory schema source
//!
//! Backs the test suite and the `--snapshot` mode of the CLI, where a JSON
//! dump of table metadata stands in for a live database:
//!
//! ```json
//! {
//!   "database": "shop",
//!   "tables": {
//!     "orders": {
//!       "columns": [
//!         { "name": "id", "native_type": "int", "key_role": "primary", "extra": "auto_increment" },
//!         { "name": "status", "native_type": "enum", "full_type": "enum('new','paid')" }
//!       ],
//!       "samples": { "archived": ["0", "1", null] }
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::{ColumnDescriptor, SchemaSource};
use crate::{Error, Result};

/// Metadata and sampled values for one table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Columns in declaration order
    pub columns: Vec<ColumnDescriptor>,
    /// Distinct values per column, used for boolean disambiguation
    #[serde(default)]
    pub samples: HashMap<String, Vec<Option<String>>>,
}

/// Schema source backed by in-memory table snapshots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySchemaSource {
    database: String,
    #[serde(default)]
    tables: BTreeMap<String, TableSnapshot>,
}

impl MemorySchemaSource {
    /// Create an empty source for the named database
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            tables: BTreeMap::new(),
        }
    }

    /// Load a snapshot from a JSON file
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the file cannot be read
    /// - [`Error::Introspection`] if the JSON does not match the snapshot shape
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&raw).map_err(|e| {
            Error::Introspection(format!("invalid snapshot {}: {e}", path.display()))
        })
    }

    /// Parse a snapshot from a JSON string
    ///
    /// # Errors
    ///
    /// Returns [`Error::Introspection`] if the JSON does not match the snapshot shape.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Introspection(e.to_string()))
    }

    /// Add (or replace) a table
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        self.tables.entry(table.into()).or_default().columns = columns;
        self
    }

    /// Set the distinct values reported for a column
    #[must_use]
    pub fn with_samples(
        mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        values: Vec<Option<String>>,
    ) -> Self {
        self.tables
            .entry(table.into())
            .or_default()
            .samples
            .insert(column.into(), values);
        self
    }
}

impl SchemaSource for MemorySchemaSource {
    fn database(&self) -> &str {
        &self.database
    }

    fn columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        Ok(self
            .tables
            .get(table)
            .map(|snapshot| snapshot.columns.clone())
            .unwrap_or_default())
    }

    fn distinct_values(&self, table: &str, column: &str) -> Result<Vec<Option<String>>> {
        Ok(self
            .tables
            .get(table)
            .and_then(|snapshot| snapshot.samples.get(column))
            .cloned()
            .unwrap_or_default())
    }

    fn tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::KeyRole;

    const SNAPSHOT: &str = r#"{
        "database": "shop",
        "tables": {
            "orders": {
                "columns": [
                    { "name": "id", "native_type": "int", "key_role": "primary", "extra": "auto_increment" },
                    { "name": "archived", "native_type": "tinyint", "full_type": "tinyint(1)", "nullable": true }
                ],
                "samples": { "archived": ["0", "1", null] }
            },
            "customers": {
                "columns": [ { "name": "email", "native_type": "varchar" } ]
            }
        }
    }"#;

    #[test]
    fn test_from_json() {
        let source = MemorySchemaSource::from_json(SNAPSHOT).unwrap();
        assert_eq!(source.database(), "shop");
        assert_eq!(source.tables().unwrap(), vec!["customers", "orders"]);

        let columns = source.columns("orders").unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].key_role, KeyRole::Primary);
        assert_eq!(columns[0].extra.as_deref(), Some("auto_increment"));
        assert!(columns[1].nullable);

        let samples = source.distinct_values("orders", "archived").unwrap();
        assert_eq!(samples, vec![Some("0".into()), Some("1".into()), None]);
    }

    #[test]
    fn test_unknown_table_is_empty() {
        let source = MemorySchemaSource::from_json(SNAPSHOT).unwrap();
        assert!(source.columns("nope").unwrap().is_empty());
        assert!(source.distinct_values("nope", "x").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_introspection_error() {
        let err = MemorySchemaSource::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Introspection(_)));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let source = MemorySchemaSource::from_json_file(&path).unwrap();
        assert_eq!(source.columns("customers").unwrap().len(), 1);

        let err = MemorySchemaSource::from_json_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
