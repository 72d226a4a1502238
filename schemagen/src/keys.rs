//! Primary key analysis
//!
//! Collects the primary-key columns of an entity in declaration order and
//! derives the facts the synthesizer branches on: cardinality, whether an
//! auto-assigned id can be captured on insert, and example values for
//! scaffolding.

use serde::Serialize;

use crate::entity::EntityColumn;
use crate::naming::Naming;
use crate::resolve::{BaseKind, TypeDescriptor};

/// Number of primary-key columns, as it affects generated operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCardinality {
    /// No usable key: only bulk reads, queries and exec are generated
    None,
    /// One key column: single-parameter lookups, id capture on insert
    Single,
    /// Several key columns: one parameter per column, combined with AND
    Composite,
}

/// One column of the primary key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyColumn {
    /// Column name
    pub column: String,
    /// Field identifier on the entity
    pub field: String,
    /// Resolved type
    pub ty: TypeDescriptor,
}

impl KeyColumn {
    /// Lookup parameter name, never a raw identifier
    #[must_use]
    pub fn param(&self) -> String {
        let bare = Naming::bare_ident(&self.field);
        if Naming::is_keyword(bare) {
            format!("{bare}_key")
        } else {
            bare.to_string()
        }
    }

    /// Representative argument for this key in examples and test skeletons
    ///
    /// # Examples
    ///
    /// ```
    /// use schemagen::keys::KeyColumn;
    /// use schemagen::resolve::{BaseKind, TypeDescriptor};
    ///
    /// let key = KeyColumn {
    ///     column: "code".into(),
    ///     field: "code".into(),
    ///     ty: TypeDescriptor::plain(BaseKind::String),
    /// };
    /// assert_eq!(key.example_literal(), "\"12345\"");
    /// ```
    #[must_use]
    pub fn example_literal(&self) -> String {
        match self.ty.base {
            BaseKind::String | BaseKind::StringEnum => "\"12345\"".to_string(),
            BaseKind::Float => "12345.0".to_string(),
            BaseKind::Timestamp => "NaiveDateTime::default()".to_string(),
            BaseKind::Bool => "true".to_string(),
            BaseKind::Int => "12345".to_string(),
        }
    }
}

/// Ordered primary-key columns of a table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrimaryKeySpec {
    columns: Vec<KeyColumn>,
}

impl PrimaryKeySpec {
    /// Collect every primary-key column in declaration order
    ///
    /// Columns are expected to be unique by name already; a repeated name is
    /// still collected only once.
    #[must_use]
    pub fn analyze(columns: &[EntityColumn]) -> Self {
        let mut keys: Vec<KeyColumn> = Vec::new();

        for column in columns.iter().filter(|c| c.descriptor.is_primary()) {
            if keys.iter().any(|k| k.column == column.descriptor.name) {
                continue;
            }
            keys.push(KeyColumn {
                column: column.descriptor.name.clone(),
                field: column.field.clone(),
                ty: column.ty,
            });
        }

        Self { columns: keys }
    }

    /// Key columns in declaration order
    #[must_use]
    pub fn columns(&self) -> &[KeyColumn] {
        &self.columns
    }

    /// Whether the table has no usable key
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether `column` is part of the key
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|k| k.column == column)
    }

    /// Key cardinality
    #[must_use]
    pub fn cardinality(&self) -> KeyCardinality {
        match self.columns.len() {
            0 => KeyCardinality::None,
            1 => KeyCardinality::Single,
            _ => KeyCardinality::Composite,
        }
    }

    /// The key column whose generated value is captured after insert
    ///
    /// Only a single, non-nullable integer or text key qualifies; composite
    /// keys are assumed to be assigned by the caller.
    #[must_use]
    pub fn id_capture(&self) -> Option<&KeyColumn> {
        match self.columns.as_slice() {
            [key] if !key.ty.is_nullable()
                && matches!(key.ty.base, BaseKind::Int | BaseKind::String) =>
            {
                Some(key)
            }
            _ => None,
        }
    }

    /// `WHERE` predicate matching the full key, in declaration order
    ///
    /// # Examples
    ///
    /// ```
    /// use schemagen::entity::EntitySpec;
    /// use schemagen::schema::{ColumnDescriptor, IntrospectedColumn};
    ///
    /// let columns = ["a", "b"]
    ///     .into_iter()
    ///     .map(|name| IntrospectedColumn {
    ///         descriptor: ColumnDescriptor::new(name, "int").primary(),
    ///         hint: None,
    ///     })
    ///     .collect();
    /// let entity = EntitySpec::build("pairs", "db", columns).unwrap();
    /// assert_eq!(entity.primary_key.predicate(), "`a` = ? AND `b` = ?");
    /// ```
    #[must_use]
    pub fn predicate(&self) -> String {
        self.columns
            .iter()
            .map(|k| format!("`{}` = ?", k.column.replace('`', "``")))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Default ordering used in examples: the first key column, descending
    #[must_use]
    pub fn default_order(&self) -> Option<String> {
        self.columns
            .first()
            .map(|k| format!("`{}` DESC", k.column.replace('`', "``")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::EnumConstraint;
    use crate::schema::ColumnDescriptor;

    fn column(descriptor: ColumnDescriptor, ty: TypeDescriptor) -> EntityColumn {
        EntityColumn {
            field: Naming::field_ident(&descriptor.name),
            descriptor,
            ty,
            enum_constraint: None::<EnumConstraint>,
            default_value: None,
            default_literal: None,
        }
    }

    #[test]
    fn test_no_key() {
        let spec = PrimaryKeySpec::analyze(&[column(
            ColumnDescriptor::new("name", "varchar"),
            TypeDescriptor::plain(BaseKind::String),
        )]);
        assert!(spec.is_empty());
        assert_eq!(spec.cardinality(), KeyCardinality::None);
        assert!(spec.id_capture().is_none());
        assert!(spec.default_order().is_none());
    }

    #[test]
    fn test_single_int_key() {
        let spec = PrimaryKeySpec::analyze(&[
            column(
                ColumnDescriptor::new("id", "int").primary(),
                TypeDescriptor::plain(BaseKind::Int),
            ),
            column(
                ColumnDescriptor::new("name", "varchar"),
                TypeDescriptor::plain(BaseKind::String),
            ),
        ]);
        assert_eq!(spec.cardinality(), KeyCardinality::Single);
        assert_eq!(spec.id_capture().map(|k| k.column.as_str()), Some("id"));
        assert_eq!(spec.predicate(), "`id` = ?");
        assert_eq!(spec.default_order().as_deref(), Some("`id` DESC"));
        assert_eq!(spec.columns()[0].example_literal(), "12345");
    }

    #[test]
    fn test_composite_key_keeps_declaration_order() {
        let spec = PrimaryKeySpec::analyze(&[
            column(
                ColumnDescriptor::new("b", "int").primary(),
                TypeDescriptor::plain(BaseKind::Int),
            ),
            column(
                ColumnDescriptor::new("x", "int"),
                TypeDescriptor::plain(BaseKind::Int),
            ),
            column(
                ColumnDescriptor::new("a", "int").primary(),
                TypeDescriptor::plain(BaseKind::Int),
            ),
        ]);
        assert_eq!(spec.cardinality(), KeyCardinality::Composite);
        assert_eq!(spec.predicate(), "`b` = ? AND `a` = ?");
        assert!(spec.id_capture().is_none());
        assert!(spec.contains("a"));
        assert!(!spec.contains("x"));
    }

    #[test]
    fn test_duplicate_key_rows_collected_once() {
        let id = column(
            ColumnDescriptor::new("id", "int").primary(),
            TypeDescriptor::plain(BaseKind::Int),
        );
        let spec = PrimaryKeySpec::analyze(&[id.clone(), id]);
        assert_eq!(spec.cardinality(), KeyCardinality::Single);
    }

    #[test]
    fn test_float_key_has_no_capture() {
        let spec = PrimaryKeySpec::analyze(&[column(
            ColumnDescriptor::new("ratio", "double").primary(),
            TypeDescriptor::plain(BaseKind::Float),
        )]);
        assert!(spec.id_capture().is_none());
        assert_eq!(spec.columns()[0].example_literal(), "12345.0");
    }

    #[test]
    fn test_keyword_param_names() {
        let key = KeyColumn {
            column: "type".into(),
            field: "r#type".into(),
            ty: TypeDescriptor::plain(BaseKind::String),
        };
        assert_eq!(key.param(), "type_key");

        let key = KeyColumn {
            column: "self".into(),
            field: "self_".into(),
            ty: TypeDescriptor::plain(BaseKind::Int),
        };
        assert_eq!(key.param(), "self_");
    }
}
