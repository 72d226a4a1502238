//! CRUD synthesis
//!
//! Turns an [`EntitySpec`] into a [`CrudPlan`]: every SQL statement, bind
//! list, validation call and row decoder the generated module needs, already
//! rendered as Rust source fragments. Templates only lay the fragments out.
//!
//! Binding order is fixed here, from the declared column order. The struct
//! fields, the `COLUMNS` select list, the positional row decoder and the
//! insert bind list are all produced from the same iteration.

use serde::Serialize;

use crate::entity::{EntityColumn, EntitySpec};
use crate::keys::KeyCardinality;
use crate::naming::Naming;
use crate::resolve::BaseKind;

/// Render `value` as a Rust string literal
fn rust_str(value: &str) -> String {
    format!("{value:?}")
}

/// One field of the generated entity
#[derive(Debug, Clone, Serialize)]
pub struct FieldPlan {
    /// Field identifier
    pub ident: String,
    /// Column name
    pub column: String,
    /// Field type
    pub rust_type: String,
    /// Doc line for the field
    pub doc: String,
    /// Expression decoding column `index` from `row`
    pub decode: String,
    /// Part of the primary key
    pub is_key: bool,
}

/// Allowed-values constant of an enum column
#[derive(Debug, Clone, Serialize)]
pub struct EnumPlan {
    /// Constant name
    pub name: String,
    /// Column name
    pub column: String,
    /// Allowed values as Rust string literals
    pub literals: Vec<String>,
}

/// A local binding computed before the insert
#[derive(Debug, Clone, Serialize)]
pub struct LocalPlan {
    /// Binding name
    pub name: String,
    /// Initializer expression
    pub expr: String,
}

/// Insert-or-update
#[derive(Debug, Clone, Serialize)]
pub struct SavePlan {
    /// Statement as a Rust string literal
    pub sql: String,
    /// Default substitutions
    pub locals: Vec<LocalPlan>,
    /// Enum membership checks, each a fallible expression
    pub validations: Vec<String>,
    /// Bind expressions: every column, then the non-key columns again
    pub binds: Vec<String>,
    /// Generated-id capture after a successful insert
    pub id_capture: Option<IdCapturePlan>,
}

/// Capture of an auto-assigned key
#[derive(Debug, Clone, Serialize)]
pub struct IdCapturePlan {
    /// Key field identifier
    pub field: String,
    /// Expression converting `id: u64` into the field type
    pub convert: String,
}

/// Delete by full key
#[derive(Debug, Clone, Serialize)]
pub struct DeletePlan {
    /// Statement as a Rust string literal
    pub sql: String,
    /// Key field binds in declaration order
    pub binds: Vec<String>,
}

/// Read by full key
#[derive(Debug, Clone, Serialize)]
pub struct ReadByIdPlan {
    /// Parameter list, e.g. `a: i64, b: &str`
    pub params: String,
    /// Key predicate as a Rust string literal
    pub predicate: String,
    /// Argument list converting each parameter to a `Value`
    pub args: Vec<String>,
}

/// Values that seed the generated examples and test skeleton
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExampleValues {
    /// Arguments for `read_by_id`, comma separated
    pub key_args: Option<String>,
    /// `Value` list for the key columns
    pub key_values: Option<String>,
    /// Ordering expression as a Rust string literal
    pub order: Option<String>,
    /// Free-text column used to demonstrate queries
    pub column: Option<ExampleColumn>,
    /// Raw update of the example column by key, as a Rust string literal
    pub update_sql: Option<String>,
    /// Whether a key argument is a `NaiveDateTime`
    pub uses_datetime: bool,
}

/// Example text column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleColumn {
    /// Field identifier
    pub field: String,
    /// `` `col` = ? `` as a Rust string literal
    pub predicate: String,
    /// Assignment right-hand side for the field
    pub assign: String,
}

/// Everything needed to render one table's module
#[derive(Debug, Clone, Serialize)]
pub struct CrudPlan {
    /// Table name
    pub table: String,
    /// Database name
    pub database: String,
    /// Entity struct name
    pub entity: String,
    /// Module name
    pub module: String,
    /// Table name as a Rust string literal
    pub table_literal: String,
    /// Key cardinality
    pub cardinality: KeyCardinality,
    /// Fields in declaration order
    pub fields: Vec<FieldPlan>,
    /// Enum constants
    pub enums: Vec<EnumPlan>,
    /// Select list as a Rust string literal
    pub select_list: String,
    /// `SELECT <list> FROM <table>` as a Rust string literal
    pub select_sql: String,
    /// Whether `NaiveDateTime` appears in the module
    pub uses_datetime: bool,
    /// Whether `NullTime` appears in the module
    pub uses_null_time: bool,
    /// Items imported from the generated `utils` module
    pub utils_imports: Vec<String>,
    /// Absent when the table has no key
    pub save: Option<SavePlan>,
    /// Absent when the table has no key
    pub delete: Option<DeletePlan>,
    /// Absent when the table has no key
    pub read_by_id: Option<ReadByIdPlan>,
    /// Example seeds
    pub examples: ExampleValues,
}

impl CrudPlan {
    /// Synthesize the plan for an entity
    #[must_use]
    pub fn synthesize(entity: &EntitySpec) -> Self {
        let fields: Vec<FieldPlan> = entity
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| field_plan(entity, index, column))
            .collect();

        let enums: Vec<EnumPlan> = entity
            .columns
            .iter()
            .filter_map(|column| {
                column.enum_constraint.as_ref().map(|constraint| EnumPlan {
                    name: Naming::enum_const(&column.field),
                    column: column.name().to_string(),
                    literals: constraint.values().iter().map(|v| rust_str(v)).collect(),
                })
            })
            .collect();

        let select_list = entity
            .columns
            .iter()
            .map(EntityColumn::select_expr)
            .collect::<Vec<_>>()
            .join(", ");

        let uses_datetime = entity.columns.iter().any(|c| c.ty.base == BaseKind::Timestamp && !c.ty.is_nullable())
            || entity.primary_key.columns().iter().any(|k| k.ty.base == BaseKind::Timestamp);
        let uses_null_time = entity.columns.iter().any(|c| c.ty.base == BaseKind::Timestamp && c.ty.is_nullable());

        let has_key = !entity.primary_key.is_empty();
        let save = has_key.then(|| save_plan(entity));

        let mut utils_imports = Vec::new();
        if let Some(save) = &save {
            if !save.locals.is_empty() || !save.validations.is_empty() {
                utils_imports.push("self".to_string());
            }
        }
        utils_imports.push("bind_all".to_string());
        if save.as_ref().is_some_and(|s| s.id_capture.is_some()) {
            utils_imports.push("Empty".to_string());
        }
        utils_imports.extend(["ModelError".to_string(), "Value".to_string()]);

        tracing::debug!(
            table = %entity.table,
            fields = fields.len(),
            cardinality = ?entity.primary_key.cardinality(),
            "synthesized CRUD plan"
        );

        Self {
            table: entity.table.clone(),
            database: entity.database.clone(),
            entity: entity.entity_name.clone(),
            module: entity.module_name.clone(),
            table_literal: rust_str(&entity.table),
            cardinality: entity.primary_key.cardinality(),
            fields,
            enums,
            select_sql: rust_str(&format!("SELECT {select_list} FROM {}", entity.quoted_table())),
            select_list: rust_str(&select_list),
            uses_datetime,
            uses_null_time,
            utils_imports,
            save,
            delete: has_key.then(|| delete_plan(entity)),
            read_by_id: has_key.then(|| read_by_id_plan(entity)),
            examples: example_values(entity),
        }
    }
}

fn field_plan(entity: &EntitySpec, index: usize, column: &EntityColumn) -> FieldPlan {
    let descriptor = &column.descriptor;
    let mut doc = format!("`{}` {}", descriptor.name, descriptor.full_type);
    if !descriptor.nullable {
        doc.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default_value {
        doc.push_str(&format!(" DEFAULT {default}"));
    }
    if let Some(extra) = descriptor.extra.as_deref().filter(|e| !e.is_empty()) {
        doc.push(' ');
        doc.push_str(extra);
    }

    let decode = match (column.ty.base, column.ty.is_nullable()) {
        (BaseKind::Bool, false) => format!("row.try_get::<i64, _>({index})? != 0"),
        (BaseKind::Bool, true) => format!("row.try_get::<Option<i64>, _>({index})?.map(|v| v != 0)"),
        _ => format!("row.try_get({index})?"),
    };

    FieldPlan {
        ident: column.field.clone(),
        column: descriptor.name.clone(),
        rust_type: column.ty.rust_type(),
        doc: doc.replace('\n', " "),
        decode,
        is_key: entity.primary_key.contains(&descriptor.name),
    }
}

/// Whether `save` replaces an empty field with the column default
///
/// Text, integer and float fields are substituted when non-nullable. A bool
/// is never substituted: `false` would be indistinguishable from unset, so a
/// `DEFAULT 1` column could not store `false`.
fn substitutes_default(column: &EntityColumn) -> bool {
    !column.ty.is_nullable()
        && (column.ty.is_text() || matches!(column.ty.base, BaseKind::Int | BaseKind::Float))
}

fn save_plan(entity: &EntitySpec) -> SavePlan {
    let mut locals = Vec::new();
    let mut validations = Vec::new();
    let mut binds = Vec::new();
    let mut bind_by_column = Vec::new();

    for column in &entity.columns {
        let field = &column.field;
        let local = format!("{}_value", Naming::bare_ident(field));

        let substituted = match &column.default_literal {
            Some(literal) if substitutes_default(column) => {
                locals.push(LocalPlan {
                    name: local.clone(),
                    expr: format!("utils::or_default(&self.{field}, {literal})"),
                });
                true
            }
            _ => false,
        };

        if column.enum_constraint.is_some() {
            let value = match (substituted, column.ty.is_nullable()) {
                (true, _) => format!("Some({local}.as_str())"),
                (false, true) => format!("self.{field}.as_deref()"),
                (false, false) => format!("Some(self.{field}.as_str())"),
            };
            validations.push(format!(
                "utils::validate_enum({}, {value}, {})",
                rust_str(column.name()),
                Naming::enum_const(field)
            ));
        }

        let bind = if substituted {
            format!("&{local}")
        } else {
            format!("&self.{field}")
        };
        binds.push(bind.clone());
        bind_by_column.push((column.name().to_string(), bind));
    }

    let columns = entity
        .columns
        .iter()
        .map(EntityColumn::quoted)
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; entity.columns.len()].join(", ");

    let updates: Vec<String> = entity
        .non_key_columns()
        .map(|c| format!("{} = ?", c.quoted()))
        .collect();
    let update_clause = if updates.is_empty() {
        // Nothing but the key: keep the row as is on conflict.
        let key = entity
            .primary_key
            .columns()
            .first()
            .map(|k| format!("`{}`", k.column.replace('`', "``")))
            .unwrap_or_default();
        format!("{key} = {key}")
    } else {
        updates.join(", ")
    };

    for (column, bind) in &bind_by_column {
        if !entity.primary_key.contains(column) {
            binds.push(bind.clone());
        }
    }

    let sql = format!(
        "INSERT INTO {} ({columns}) VALUES ({placeholders}) ON DUPLICATE KEY UPDATE {update_clause}",
        entity.quoted_table()
    );

    let id_capture = entity.primary_key.id_capture().map(|key| IdCapturePlan {
        field: key.field.clone(),
        convert: match key.ty.base {
            BaseKind::String => "id.to_string()".to_string(),
            _ => "i64::try_from(id).unwrap_or(i64::MAX)".to_string(),
        },
    });

    SavePlan {
        sql: rust_str(&sql),
        locals,
        validations,
        binds,
        id_capture,
    }
}

fn delete_plan(entity: &EntitySpec) -> DeletePlan {
    let sql = format!(
        "DELETE FROM {} WHERE {}",
        entity.quoted_table(),
        entity.primary_key.predicate()
    );
    DeletePlan {
        sql: rust_str(&sql),
        binds: entity
            .primary_key
            .columns()
            .iter()
            .map(|k| format!("&self.{}", k.field))
            .collect(),
    }
}

fn read_by_id_plan(entity: &EntitySpec) -> ReadByIdPlan {
    let keys = entity.primary_key.columns();
    ReadByIdPlan {
        params: keys
            .iter()
            .map(|k| format!("{}: {}", k.param(), k.ty.param_rust_type()))
            .collect::<Vec<_>>()
            .join(", "),
        predicate: rust_str(&entity.primary_key.predicate()),
        args: keys
            .iter()
            .map(|k| format!("Value::from({})", k.param()))
            .collect(),
    }
}

fn example_values(entity: &EntitySpec) -> ExampleValues {
    let keys = entity.primary_key.columns();
    let has_key = !keys.is_empty();

    let key_args = has_key.then(|| {
        keys.iter()
            .map(crate::keys::KeyColumn::example_literal)
            .collect::<Vec<_>>()
            .join(", ")
    });
    let key_values = has_key.then(|| {
        keys.iter()
            .map(|k| format!("Value::from({})", k.example_literal()))
            .collect::<Vec<_>>()
            .join(", ")
    });

    let column = entity.example_column().map(|c| ExampleColumn {
        field: c.field.clone(),
        predicate: rust_str(&format!("{} = ?", c.quoted())),
        assign: if c.ty.is_nullable() {
            "Some(\"some string\".to_string())".to_string()
        } else {
            "\"some string\".to_string()".to_string()
        },
    });

    let update_sql = entity
        .example_column()
        .filter(|_| has_key)
        .map(|c| {
            rust_str(&format!(
                "UPDATE {} SET {} = ? WHERE {}",
                entity.quoted_table(),
                c.quoted(),
                entity.primary_key.predicate()
            ))
        });

    ExampleValues {
        key_args,
        key_values,
        order: entity.primary_key.default_order().map(|o| rust_str(&o)),
        column,
        update_sql,
        uses_datetime: keys.iter().any(|k| k.ty.base == BaseKind::Timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDescriptor, IntrospectedColumn};

    fn build(table: &str, columns: Vec<ColumnDescriptor>) -> EntitySpec {
        let columns = columns
            .into_iter()
            .map(|descriptor| IntrospectedColumn {
                descriptor,
                hint: None,
            })
            .collect();
        EntitySpec::build(table, "db", columns).unwrap()
    }

    #[test]
    fn test_single_int_key_plan() {
        let entity = build(
            "users",
            vec![
                ColumnDescriptor::new("id", "int").primary().with_extra("auto_increment"),
                ColumnDescriptor::new("name", "varchar").with_default("guest"),
                ColumnDescriptor::new("bio", "text").nullable(),
            ],
        );
        let plan = CrudPlan::synthesize(&entity);

        assert_eq!(plan.cardinality, KeyCardinality::Single);
        assert_eq!(plan.select_list, "\"`id`, `name`, `bio`\"");
        assert_eq!(plan.select_sql, "\"SELECT `id`, `name`, `bio` FROM `users`\"");
        assert_eq!(plan.table_literal, "\"users\"");

        let save = plan.save.unwrap();
        assert_eq!(
            save.sql,
            rust_str("INSERT INTO `users` (`id`, `name`, `bio`) VALUES (?, ?, ?) ON DUPLICATE KEY UPDATE `name` = ?, `bio` = ?")
        );
        assert_eq!(
            save.binds,
            vec!["&self.id", "&name_value", "&self.bio", "&name_value", "&self.bio"]
        );
        assert_eq!(save.locals.len(), 1);
        assert_eq!(save.locals[0].expr, "utils::or_default(&self.name, \"guest\".to_string())");
        let capture = save.id_capture.unwrap();
        assert_eq!(capture.field, "id");

        let read = plan.read_by_id.unwrap();
        assert_eq!(read.params, "id: i64");
        assert_eq!(read.args, vec!["Value::from(id)"]);

        assert_eq!(plan.examples.key_args.as_deref(), Some("12345"));
        assert_eq!(plan.examples.order.as_deref(), Some("\"`id` DESC\""));
        assert_eq!(plan.examples.column.unwrap().field, "name");
        assert_eq!(
            plan.examples.update_sql.as_deref(),
            Some("\"UPDATE `users` SET `name` = ? WHERE `id` = ?\"")
        );
    }

    #[test]
    fn test_composite_key_plan() {
        let entity = build(
            "pairs",
            vec![
                ColumnDescriptor::new("a", "int").primary(),
                ColumnDescriptor::new("b", "int").primary(),
                ColumnDescriptor::new("weight", "double"),
            ],
        );
        let plan = CrudPlan::synthesize(&entity);

        assert_eq!(plan.cardinality, KeyCardinality::Composite);
        let delete = plan.delete.unwrap();
        assert_eq!(delete.sql, rust_str("DELETE FROM `pairs` WHERE `a` = ? AND `b` = ?"));
        assert_eq!(delete.binds, vec!["&self.a", "&self.b"]);

        let save = plan.save.unwrap();
        assert!(save.id_capture.is_none());
        assert_eq!(plan.read_by_id.unwrap().params, "a: i64, b: i64");
    }

    #[test]
    fn test_string_key_takes_one_str_param() {
        let entity = build(
            "codes",
            vec![
                ColumnDescriptor::new("code", "varchar").primary(),
                ColumnDescriptor::new("label", "varchar"),
            ],
        );
        let plan = CrudPlan::synthesize(&entity);
        let read = plan.read_by_id.unwrap();
        assert_eq!(read.params, "code: &str");
        assert_eq!(read.args.len(), 1);
        assert_eq!(plan.save.unwrap().id_capture.unwrap().convert, "id.to_string()");
        assert_eq!(plan.examples.key_args.as_deref(), Some("\"12345\""));
    }

    #[test]
    fn test_keyless_table_has_no_key_operations() {
        let entity = build("log", vec![ColumnDescriptor::new("line", "text")]);
        let plan = CrudPlan::synthesize(&entity);
        assert_eq!(plan.cardinality, KeyCardinality::None);
        assert!(plan.save.is_none());
        assert!(plan.delete.is_none());
        assert!(plan.read_by_id.is_none());
        assert!(plan.examples.key_args.is_none());
        assert!(plan.examples.update_sql.is_none());
        assert_eq!(plan.utils_imports, vec!["bind_all", "ModelError", "Value"]);
    }

    #[test]
    fn test_enum_validation_calls() {
        let entity = build(
            "grades",
            vec![
                ColumnDescriptor::new("id", "int").primary(),
                ColumnDescriptor::new("grade", "enum").with_full_type("enum('A','B','C')"),
                ColumnDescriptor::new("type", "enum")
                    .with_full_type("enum('x','y')")
                    .nullable(),
            ],
        );
        let plan = CrudPlan::synthesize(&entity);

        assert_eq!(plan.enums.len(), 2);
        assert_eq!(plan.enums[0].name, "GRADE_VALUES");
        assert_eq!(plan.enums[0].literals, vec!["\"A\"", "\"B\"", "\"C\""]);
        assert_eq!(plan.enums[1].name, "TYPE_VALUES");

        let save = plan.save.unwrap();
        assert_eq!(
            save.validations,
            vec![
                "utils::validate_enum(\"grade\", Some(self.grade.as_str()), GRADE_VALUES)",
                "utils::validate_enum(\"type\", self.r#type.as_deref(), TYPE_VALUES)",
            ]
        );
        assert_eq!(
            plan.utils_imports,
            vec!["self", "bind_all", "Empty", "ModelError", "Value"]
        );
    }

    #[test]
    fn test_key_only_table_upsert_is_noop_update() {
        let entity = build("tags", vec![ColumnDescriptor::new("tag", "varchar").primary()]);
        let save = CrudPlan::synthesize(&entity).save.unwrap();
        assert!(save.sql.ends_with("ON DUPLICATE KEY UPDATE `tag` = `tag`\""));
        assert_eq!(save.binds, vec!["&self.tag"]);
    }

    #[test]
    fn test_timestamp_and_bool_fields() {
        let entity = build(
            "events",
            vec![
                ColumnDescriptor::new("id", "bigint").primary(),
                ColumnDescriptor::new("at", "datetime"),
                ColumnDescriptor::new("closed_at", "datetime").nullable(),
                ColumnDescriptor::new("done", "boolean"),
            ],
        );
        let plan = CrudPlan::synthesize(&entity);
        assert!(plan.uses_datetime);
        assert!(plan.uses_null_time);
        assert_eq!(plan.fields[2].rust_type, "NullTime");
        assert_eq!(plan.fields[3].decode, "row.try_get::<i64, _>(3)? != 0");
        assert_eq!(plan.fields[1].decode, "row.try_get(1)?");
        assert!(plan.fields[0].is_key);
        assert!(!plan.fields[1].is_key);
    }

    #[test]
    fn test_numeric_defaults_substituted_on_save() {
        let entity = build(
            "events",
            vec![
                ColumnDescriptor::new("id", "int").primary().with_extra("auto_increment"),
                ColumnDescriptor::new("attempts", "int").with_default("3"),
                ColumnDescriptor::new("ratio", "decimal").with_default("1.5"),
                ColumnDescriptor::new("limit_hint", "int").nullable().with_default("10"),
            ],
        );
        let save = CrudPlan::synthesize(&entity).save.unwrap();

        let exprs: Vec<_> = save.locals.iter().map(|l| l.expr.as_str()).collect();
        assert_eq!(
            exprs,
            vec![
                "utils::or_default(&self.attempts, 3)",
                "utils::or_default(&self.ratio, 1.5)",
            ]
        );
        assert_eq!(save.binds[1], "&attempts_value");
        assert_eq!(save.binds[2], "&ratio_value");
        assert_eq!(save.binds[3], "&self.limit_hint");
    }

    #[test]
    fn test_bool_default_not_substituted() {
        let entity = build(
            "flags",
            vec![
                ColumnDescriptor::new("id", "int").primary(),
                ColumnDescriptor::new("enabled", "boolean").with_default("1"),
            ],
        );
        let enabled = &entity.columns[1];
        assert_eq!(enabled.default_literal.as_deref(), Some("true"));

        let save = CrudPlan::synthesize(&entity).save.unwrap();
        assert!(save.locals.is_empty());
        assert_eq!(save.binds[1], "&self.enabled");
    }
}
