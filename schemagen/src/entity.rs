//! Fully resolved description of one table

use std::collections::HashSet;

use crate::enums::EnumConstraint;
use crate::keys::PrimaryKeySpec;
use crate::naming::Naming;
use crate::resolve::{default_literal, normalize_default, resolve_column, BaseKind, TypeDescriptor};
use crate::schema::{ColumnDescriptor, IntrospectedColumn};
use crate::{Error, Result};

/// A column with everything derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct EntityColumn {
    /// Column metadata as read
    pub descriptor: ColumnDescriptor,
    /// Field identifier on the entity struct
    pub field: String,
    /// Resolved target type
    pub ty: TypeDescriptor,
    /// Allowed values, for enum columns
    pub enum_constraint: Option<EnumConstraint>,
    /// Normalised default value
    pub default_value: Option<String>,
    /// Default rendered as a Rust expression of [`Self::ty`]
    pub default_literal: Option<String>,
}

impl EntityColumn {
    /// Column name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Backtick-quoted column name for SQL
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("`{}`", self.descriptor.name.replace('`', "``"))
    }

    /// Select-list expression producing a value the generated decoder accepts
    ///
    /// Columns whose wire type does not decode directly into the field type
    /// are cast: decimals to `DOUBLE`, dates to `DATETIME`, unsigned and
    /// boolean integers to `SIGNED`, non-character text to `CHAR`.
    ///
    /// Integer fields are `i64`. A `bigint unsigned` value above `i64::MAX`
    /// wraps to a negative number under `CAST … AS SIGNED`.
    #[must_use]
    pub fn select_expr(&self) -> String {
        let native = self.descriptor.native_type.to_ascii_lowercase();
        let unsigned = self.descriptor.full_type.to_ascii_lowercase().contains("unsigned");
        let quoted = self.quoted();
        let cast = match self.ty.base {
            BaseKind::Float if native != "double" => Some("DOUBLE"),
            BaseKind::Timestamp if native == "date" => Some("DATETIME"),
            BaseKind::Bool => Some("SIGNED"),
            BaseKind::Int if unsigned || matches!(native.as_str(), "bit" | "year") => Some("SIGNED"),
            BaseKind::String if !is_character_type(&native) => Some("CHAR"),
            _ => None,
        };

        cast.map_or_else(
            || quoted.clone(),
            |target| format!("CAST({quoted} AS {target}) AS {quoted}"),
        )
    }
}

fn is_unsigned_bigint(descriptor: &ColumnDescriptor) -> bool {
    descriptor.native_type.eq_ignore_ascii_case("bigint")
        && descriptor.full_type.to_ascii_lowercase().contains("unsigned")
}

/// Native types that decode as `String` without a cast
fn is_character_type(native: &str) -> bool {
    matches!(
        native,
        "char" | "varchar" | "tinytext" | "text" | "mediumtext" | "longtext" | "enum" | "set"
    )
}

/// Everything the synthesizer needs to know about one table
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpec {
    /// Table name as in the schema
    pub table: String,
    /// Database (schema) name
    pub database: String,
    /// Entity struct name
    pub entity_name: String,
    /// Module and directory name
    pub module_name: String,
    /// Columns in declaration order
    pub columns: Vec<EntityColumn>,
    /// Primary key
    pub primary_key: PrimaryKeySpec,
}

impl EntitySpec {
    /// Resolve introspected columns into an entity
    ///
    /// # Errors
    ///
    /// - [`Error::SchemaNotFound`] if `columns` is empty
    /// - [`Error::MalformedEnum`] if an enum column's type cannot be parsed
    pub fn build(
        table: &str,
        database: &str,
        columns: Vec<IntrospectedColumn>,
    ) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::SchemaNotFound {
                table: table.to_string(),
            });
        }

        let mut seen_names = HashSet::new();
        let mut seen_fields = HashSet::new();
        let mut resolved = Vec::with_capacity(columns.len());

        for IntrospectedColumn { descriptor, hint } in columns {
            if !seen_names.insert(descriptor.name.clone()) {
                continue;
            }

            let ty = resolve_column(&descriptor, hint);
            tracing::debug!(table, column = %descriptor.name, native = %descriptor.full_type, resolved = %ty, "resolved column type");

            let enum_constraint = if ty.base == BaseKind::StringEnum {
                let constraint = EnumConstraint::parse(&descriptor.name, &descriptor.full_type)?
                    .ok_or_else(|| Error::MalformedEnum {
                        column: descriptor.name.clone(),
                        column_type: descriptor.full_type.clone(),
                    })?;
                Some(constraint)
            } else {
                None
            };

            let default_value =
                normalize_default(descriptor.default_value.as_deref(), descriptor.nullable);
            let default_literal = default_value
                .as_deref()
                .and_then(|value| default_literal(&ty, value));

            if let (Some(value), None) = (default_value.as_deref(), default_literal.as_ref()) {
                if !ty.is_nullable() {
                    tracing::debug!(table, column = %descriptor.name, default = value, "default has no literal form; dropped");
                }
            }
            if ty.base == BaseKind::Int && is_unsigned_bigint(&descriptor) {
                tracing::warn!(table, column = %descriptor.name, "bigint unsigned decodes as i64; values above i64::MAX wrap");
            }
            if let (Some(constraint), Some(value)) = (&enum_constraint, default_value.as_deref()) {
                if let Err(err) = constraint.validate(&descriptor.name, value) {
                    tracing::warn!(table, "suspicious column default: {err}");
                }
            }

            let field = unique_ident(Naming::field_ident(&descriptor.name), &mut seen_fields);

            resolved.push(EntityColumn {
                descriptor,
                field,
                ty,
                enum_constraint,
                default_value,
                default_literal,
            });
        }

        let primary_key = PrimaryKeySpec::analyze(&resolved);

        Ok(Self {
            table: table.to_string(),
            database: database.to_string(),
            entity_name: Naming::entity_name(table),
            module_name: Naming::module_name(table),
            columns: resolved,
            primary_key,
        })
    }

    /// Look up a column by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&EntityColumn> {
        self.columns.iter().find(|c| c.descriptor.name == name)
    }

    /// Backtick-quoted table name for SQL
    #[must_use]
    pub fn quoted_table(&self) -> String {
        format!("`{}`", self.table.replace('`', "``"))
    }

    /// Columns outside the primary key, in declaration order
    pub fn non_key_columns(&self) -> impl Iterator<Item = &EntityColumn> {
        self.columns
            .iter()
            .filter(|c| !self.primary_key.contains(c.name()))
    }

    /// First free-text column outside the key, used by example scaffolding
    #[must_use]
    pub fn example_column(&self) -> Option<&EntityColumn> {
        self.non_key_columns()
            .find(|c| c.ty.base == BaseKind::String)
    }
}

/// Suffix `ident` until it is unique within the entity
fn unique_ident(ident: String, seen: &mut HashSet<String>) -> String {
    if seen.insert(ident.clone()) {
        return ident;
    }

    let bare = Naming::bare_ident(&ident).to_string();
    let mut n = 2;
    loop {
        let candidate = format!("{bare}_{n}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BooleanHint;

    fn col(descriptor: ColumnDescriptor) -> IntrospectedColumn {
        IntrospectedColumn {
            descriptor,
            hint: None,
        }
    }

    #[test]
    fn test_empty_table_is_schema_not_found() {
        let err = EntitySpec::build("ghost", "db", vec![]).unwrap_err();
        assert!(matches!(err, Error::SchemaNotFound { table } if table == "ghost"));
    }

    #[test]
    fn test_build_resolves_columns() {
        let entity = EntitySpec::build(
            "order_items",
            "shop",
            vec![
                col(ColumnDescriptor::new("id", "int").primary()),
                col(ColumnDescriptor::new("status", "enum").with_full_type("enum('new','paid')").with_default("new")),
                col(ColumnDescriptor::new("price", "decimal").with_full_type("decimal(10,2)").nullable()),
                IntrospectedColumn {
                    descriptor: ColumnDescriptor::new("gift", "tinyint").with_full_type("tinyint(1)"),
                    hint: Some(BooleanHint::Boolean),
                },
            ],
        )
        .unwrap();

        assert_eq!(entity.entity_name, "OrderItems");
        assert_eq!(entity.module_name, "order_items");
        assert_eq!(entity.columns.len(), 4);

        let status = entity.column("status").unwrap();
        assert_eq!(status.ty, TypeDescriptor::plain(BaseKind::StringEnum));
        assert_eq!(status.enum_constraint.as_ref().unwrap().values(), ["new", "paid"]);
        assert_eq!(status.default_literal.as_deref(), Some("\"new\".to_string()"));

        let price = entity.column("price").unwrap();
        assert_eq!(price.ty, TypeDescriptor::nullable(BaseKind::Float));
        assert_eq!(price.select_expr(), "CAST(`price` AS DOUBLE) AS `price`");

        assert_eq!(entity.column("gift").unwrap().ty.base, BaseKind::Bool);
        assert_eq!(entity.primary_key.columns().len(), 1);
    }

    #[test]
    fn test_duplicate_rows_keep_first() {
        let entity = EntitySpec::build(
            "t",
            "db",
            vec![
                col(ColumnDescriptor::new("id", "int").primary()),
                col(ColumnDescriptor::new("id", "varchar").primary()),
            ],
        )
        .unwrap();
        assert_eq!(entity.columns.len(), 1);
        assert_eq!(entity.columns[0].ty.base, BaseKind::Int);
        assert_eq!(entity.primary_key.columns().len(), 1);
    }

    #[test]
    fn test_colliding_field_idents_are_suffixed() {
        let entity = EntitySpec::build(
            "t",
            "db",
            vec![
                col(ColumnDescriptor::new("userId", "int")),
                col(ColumnDescriptor::new("user_id", "int")),
            ],
        )
        .unwrap();
        assert_eq!(entity.columns[0].field, "user_id");
        assert_eq!(entity.columns[1].field, "user_id_2");
    }

    #[test]
    fn test_enum_without_values_is_malformed() {
        let err = EntitySpec::build("t", "db", vec![col(ColumnDescriptor::new("kind", "enum"))])
            .unwrap_err();
        assert!(matches!(err, Error::MalformedEnum { column, .. } if column == "kind"));
    }

    #[test]
    fn test_example_column_skips_keys_and_enums() {
        let entity = EntitySpec::build(
            "t",
            "db",
            vec![
                col(ColumnDescriptor::new("code", "varchar").primary()),
                col(ColumnDescriptor::new("kind", "enum").with_full_type("enum('a')")),
                col(ColumnDescriptor::new("title", "varchar").nullable()),
            ],
        )
        .unwrap();
        assert_eq!(entity.example_column().map(EntityColumn::name), Some("title"));
        assert_eq!(entity.non_key_columns().count(), 2);
    }

    #[test]
    fn test_select_expr_casts() {
        let entity = EntitySpec::build(
            "t",
            "db",
            vec![
                col(ColumnDescriptor::new("id", "int").with_full_type("int(10) unsigned").primary()),
                col(ColumnDescriptor::new("born", "date")),
                col(ColumnDescriptor::new("meta", "json")),
                col(ColumnDescriptor::new("name", "varchar")),
                col(ColumnDescriptor::new("score", "double")),
            ],
        )
        .unwrap();
        let exprs: Vec<String> = entity.columns.iter().map(EntityColumn::select_expr).collect();
        assert_eq!(
            exprs,
            vec![
                "CAST(`id` AS SIGNED) AS `id`",
                "CAST(`born` AS DATETIME) AS `born`",
                "CAST(`meta` AS CHAR) AS `meta`",
                "`name`",
                "`score`",
            ]
        );
    }

    #[test]
    fn test_unsigned_bigint_is_signed_i64() {
        let entity = EntitySpec::build(
            "t",
            "db",
            vec![col(ColumnDescriptor::new("big", "bigint").with_full_type("bigint(20) unsigned"))],
        )
        .unwrap();
        let big = &entity.columns[0];
        assert!(is_unsigned_bigint(&big.descriptor));
        assert_eq!(big.ty.rust_type(), "i64");
        assert_eq!(big.select_expr(), "CAST(`big` AS SIGNED) AS `big`");
    }
}
