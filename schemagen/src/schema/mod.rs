//! Schema source abstraction and column metadata
//!
//! A [`SchemaSource`] answers the two questions the generator needs from a
//! relational catalog: "which columns does table X have" and "which distinct
//! values does column Y of table X currently hold". The live implementation
//! is [`MySqlSchemaSource`]; [`MemorySchemaSource`] serves tests and offline
//! snapshots.

mod introspect;
mod memory;
mod mysql;

pub use introspect::{classify_samples, BooleanDetection, BooleanHint, IntrospectedColumn, Introspector};
pub use memory::{MemorySchemaSource, TableSnapshot};
pub use mysql::MySqlSchemaSource;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Role a column plays in the table's keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    /// Not part of the primary key
    #[default]
    None,
    /// Part of the primary key
    Primary,
}

impl KeyRole {
    /// Map an `information_schema.COLUMNS.COLUMN_KEY` value
    ///
    /// Only `PRI` denotes the primary key; `UNI` and `MUL` are ordinary
    /// indexes and carry no key semantics for code generation.
    #[must_use]
    pub fn from_column_key(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("PRI") {
            Self::Primary
        } else {
            Self::None
        }
    }
}

/// Column metadata as reported by the schema source
///
/// Immutable once read; every later stage derives from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,
    /// Whether the column accepts NULL
    #[serde(default)]
    pub nullable: bool,
    /// Key role
    #[serde(default)]
    pub key_role: KeyRole,
    /// Native data type (e.g. `int`, `tinyint`, `varchar`)
    pub native_type: String,
    /// Full column type (e.g. `enum('A','B')`, `tinyint(1)`)
    #[serde(default)]
    pub full_type: String,
    /// Raw default value
    #[serde(default)]
    pub default_value: Option<String>,
    /// Extra attributes (e.g. `auto_increment`)
    #[serde(default)]
    pub extra: Option<String>,
}

impl ColumnDescriptor {
    /// Create a NOT NULL, non-key column whose full type equals its native type
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        let native_type = native_type.into();
        Self {
            name: name.into(),
            nullable: false,
            key_role: KeyRole::None,
            full_type: native_type.clone(),
            native_type,
            default_value: None,
            extra: None,
        }
    }

    /// Mark the column as nullable
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the column as part of the primary key
    #[must_use]
    pub const fn primary(mut self) -> Self {
        self.key_role = KeyRole::Primary;
        self
    }

    /// Set the full column type
    #[must_use]
    pub fn with_full_type(mut self, full_type: impl Into<String>) -> Self {
        self.full_type = full_type.into();
        self
    }

    /// Set the raw default value
    #[must_use]
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Set the extra attributes
    #[must_use]
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Whether the column is part of the primary key
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.key_role == KeyRole::Primary
    }

    /// Whether the column is a single-byte integer that may really be a boolean
    #[must_use]
    pub fn is_boolean_ambiguous(&self) -> bool {
        self.native_type.eq_ignore_ascii_case("tinyint")
    }
}

/// Relational metadata catalog consulted during generation
///
/// Implementations must be usable through a shared reference; the generator
/// runs sequentially and reuses one source (and its connection) for the
/// whole run.
pub trait SchemaSource {
    /// Name of the database (schema) being inspected
    fn database(&self) -> &str;

    /// Columns of `table` in declaration order
    ///
    /// An unknown table yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Introspection`] if the catalog cannot be queried.
    fn columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>>;

    /// Distinct values currently stored in `column`, rendered as text
    ///
    /// `None` entries are SQL NULLs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Introspection`] if the query fails.
    fn distinct_values(&self, table: &str, column: &str) -> Result<Vec<Option<String>>>;

    /// Every table in the database
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Introspection`] if the catalog cannot be queried.
    fn tables(&self) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_role_from_column_key() {
        assert_eq!(KeyRole::from_column_key("PRI"), KeyRole::Primary);
        assert_eq!(KeyRole::from_column_key("pri"), KeyRole::Primary);
        assert_eq!(KeyRole::from_column_key("UNI"), KeyRole::None);
        assert_eq!(KeyRole::from_column_key("MUL"), KeyRole::None);
        assert_eq!(KeyRole::from_column_key(""), KeyRole::None);
    }

    #[test]
    fn test_descriptor_builder() {
        let column = ColumnDescriptor::new("active", "tinyint")
            .with_full_type("tinyint(1)")
            .nullable()
            .with_default("1");

        assert_eq!(column.name, "active");
        assert!(column.nullable);
        assert!(!column.is_primary());
        assert!(column.is_boolean_ambiguous());
        assert_eq!(column.full_type, "tinyint(1)");
        assert_eq!(column.default_value.as_deref(), Some("1"));
    }

    #[test]
    fn test_descriptor_deserializes_with_defaults() {
        let column: ColumnDescriptor =
            serde_json::from_str(r#"{"name":"id","native_type":"int","key_role":"primary"}"#)
                .unwrap();
        assert!(column.is_primary());
        assert!(!column.nullable);
        assert_eq!(column.full_type, "");
        assert!(column.default_value.is_none());
    }
}
