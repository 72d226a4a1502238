//! Template file contents

/// Entity struct and CRUD operations, regenerated on every run
pub const CRUD_RS: &str = r#"//! `{{ database }}`.`{{ table }}`: entity and CRUD operations
//!
//! Generated by schemagen and overwritten on every run. Put custom code in
//! `dao.rs` and `bo.rs`.

{% if uses_datetime %}
use chrono::NaiveDateTime;
{% endif %}
use serde::Serialize;
use sqlx::mysql::{MySqlQueryResult, MySqlRow};
use sqlx::Row;

use crate::connection::pool;
{% if uses_null_time %}
use crate::date::NullTime;
{% endif %}
use crate::utils::{ {{- utils_imports | join(", ") -}} };

/// Table name
pub const TABLE: &str = {{ table_literal }};

/// Select list, in field order
pub const COLUMNS: &str = {{ select_list }};

const SELECT_SQL: &str = {{ select_sql }};
{% for e in enums %}

/// Allowed values of `{{ e.column }}`
pub const {{ e.name }}: &[&str] = &[{{ e.literals | join(", ") }}];
{% endfor %}

/// Row of `{{ table }}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct {{ entity }} {
{% for f in fields %}
    /// {{ f.doc }}
    pub {{ f.ident }}: {{ f.rust_type }},
{% endfor %}
}

fn from_row(row: &MySqlRow) -> Result<{{ entity }}, sqlx::Error> {
    Ok({{ entity }} {
{% for f in fields %}
        {{ f.ident }}: {{ f.decode }},
{% endfor %}
    })
}
{% if save %}

impl {{ entity }} {
    /// Insert the row, or update every non-key column if the key exists
    ///
    /// Enum columns are validated before anything is written.
{% if save.id_capture %}
    /// A new row's generated key is stored back on `self`.
{% endif %}
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidEnumValue`] on a value outside an enum set, or the
    /// database error.
    pub async fn save(&mut self) -> Result<MySqlQueryResult, ModelError> {
{% for l in save.locals %}
        let {{ l.name }} = {{ l.expr }};
{% endfor %}
{% for v in save.validations %}
        {{ v }}?;
{% endfor %}
{% if save.id_capture %}
        let new_record = self.{{ save.id_capture.field }}.is_empty_value();
{% endif %}

        let result = sqlx::query({{ save.sql }})
{% for b in save.binds %}
            .bind({{ b }})
{% endfor %}
            .execute(&pool().await?)
            .await?;
{% if save.id_capture %}

        let id = result.last_insert_id();
        if new_record && id != 0 {
            self.{{ save.id_capture.field }} = {{ save.id_capture.convert }};
        }
{% endif %}
        Ok(result)
    }

    /// Delete the row matching this entity's key
    ///
    /// # Errors
    ///
    /// Returns the database error.
    pub async fn delete(&self) -> Result<MySqlQueryResult, ModelError> {
        Ok(sqlx::query({{ delete.sql }})
{% for b in delete.binds %}
            .bind({{ b }})
{% endfor %}
            .execute(&pool().await?)
            .await?)
    }
}

/// Read one row by key
///
/// # Errors
///
/// [`ModelError::NotFound`] when no row matches, or the database error.
pub async fn read_by_id({{ read_by_id.params }}) -> Result<{{ entity }}, ModelError> {
    read_one_by_query({{ read_by_id.predicate }}, &[{{ read_by_id.args | join(", ") }}]).await
}
{% endif %}

/// Read every row, ordered by `order` unless it is empty
///
/// `order` is inserted verbatim.
///
/// # Errors
///
/// Returns the database error.
pub async fn read_all(order: &str) -> Result<Vec<{{ entity }}>, ModelError> {
    let mut sql = SELECT_SQL.to_string();
    if !order.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(order);
    }
    let rows = sqlx::query(&sql).fetch_all(&pool().await?).await?;
    Ok(rows.iter().map(from_row).collect::<Result<_, _>>()?)
}

/// Read the rows matching a caller-built predicate
///
/// `query` follows `WHERE` (an empty `query` matches every row); `args` bind
/// its placeholders in order. No match yields an empty vector.
///
/// # Errors
///
/// Returns the database error.
pub async fn read_by_query(query: &str, args: &[Value]) -> Result<Vec<{{ entity }}>, ModelError> {
    let sql = select_where(query);
    let rows = bind_all(sqlx::query(&sql), args)
        .fetch_all(&pool().await?)
        .await?;
    Ok(rows.iter().map(from_row).collect::<Result<_, _>>()?)
}

/// Read the first row matching a caller-built predicate
///
/// At most one row is consumed.
///
/// # Errors
///
/// [`ModelError::NotFound`] when no row matches, or the database error.
pub async fn read_one_by_query(query: &str, args: &[Value]) -> Result<{{ entity }}, ModelError> {
    let sql = select_where(query);
    let row = bind_all(sqlx::query(&sql), args)
        .fetch_optional(&pool().await?)
        .await?
        .ok_or(ModelError::NotFound { table: TABLE })?;
    Ok(from_row(&row)?)
}

/// Run an arbitrary statement
///
/// # Errors
///
/// Returns the database error.
pub async fn exec(query: &str, args: &[Value]) -> Result<MySqlQueryResult, ModelError> {
    Ok(bind_all(sqlx::query(query), args)
        .execute(&pool().await?)
        .await?)
}

fn select_where(query: &str) -> String {
    if query.trim().is_empty() {
        SELECT_SQL.to_string()
    } else {
        format!("{SELECT_SQL} WHERE {query}")
    }
}
"#;

/// Per-table module root, created once
pub const MOD_RS: &str = r"//! `{{ table }}` model

mod bo;
mod crud;
mod dao;
#[allow(dead_code)]
mod examples;
#[cfg(test)]
mod tests;

pub use crud::*;
";

/// Custom data-access methods, created once
pub const DAO_RS: &str = r"//! Custom data-access methods for `{{ table }}`
//!
//! This file is never overwritten by schemagen.

#[allow(unused_imports)]
use super::crud::*;
";

/// Custom business-object methods, created once
pub const BO_RS: &str = r"//! Custom business-object methods for `{{ entity }}`
//!
//! This file is never overwritten by schemagen.

#[allow(unused_imports)]
use super::crud::*;
";

/// Test skeleton, created once
pub const TESTS_RS: &str = r#"//! Tests for `{{ table }}`

use super::crud::*;
{% if examples.key_args %}
use crate::utils::ModelError;
{% endif %}
{% if examples.uses_datetime %}
use chrono::NaiveDateTime;
{% endif %}
{% if enums %}

#[test]
fn enum_sets_are_not_empty() {
{% for e in enums %}
    assert!(!{{ e.name }}.is_empty());
{% endfor %}
}
{% endif %}

#[tokio::test]
#[ignore = "needs a database"]
async fn read_all_succeeds() {
    read_all("").await.unwrap();
}
{% if examples.key_args %}

#[tokio::test]
#[ignore = "needs a database"]
async fn read_by_id_distinguishes_not_found() {
    match read_by_id({{ examples.key_args }}).await {
        Ok(_) | Err(ModelError::NotFound { .. }) => {}
        Err(err) => panic!("query failed: {err}"),
    }
}
{% endif %}
"#;

/// Usage examples seeded from the example-value cache, created once
pub const EXAMPLES_RS: &str = r#"//! Usage examples for `{{ entity }}`

use super::crud::*;
use crate::utils::ModelError;
{% if examples.column %}
use crate::utils::Value;
{% endif %}
{% if examples.uses_datetime %}
use chrono::NaiveDateTime;
{% endif %}
{% if examples.key_args %}

/// Read a row, change it and save it back
pub async fn save() -> Result<(), ModelError> {
    let mut record = read_by_id({{ examples.key_args }}).await?;
{% if examples.column %}
    record.{{ examples.column.field }} = {{ examples.column.assign }};
{% endif %}
    record.save().await?;
    Ok(())
}

/// Delete a row
pub async fn delete() -> Result<(), ModelError> {
    let record = read_by_id({{ examples.key_args }}).await?;
    record.delete().await?;
    Ok(())
}

/// Read a row by key
pub async fn read_one() -> Result<(), ModelError> {
    match read_by_id({{ examples.key_args }}).await {
        Ok(record) => println!("{record:?}"),
        Err(ModelError::NotFound { .. }) => println!("no such row"),
        Err(err) => return Err(err),
    }
    Ok(())
}
{% endif %}

/// Read every row
pub async fn list() -> Result<(), ModelError> {
    for record in read_all({{ examples.order or '""' }}).await? {
        println!("{record:?}");
    }
    Ok(())
}
{% if examples.column %}

/// Read the rows matching a predicate
pub async fn query() -> Result<(), ModelError> {
    for record in read_by_query({{ examples.column.predicate }}, &[Value::from("some string")]).await? {
        println!("{record:?}");
    }
    Ok(())
}

/// Read the first row matching a predicate
pub async fn query_one() -> Result<(), ModelError> {
    let record = read_one_by_query({{ examples.column.predicate }}, &[Value::from("some string")]).await?;
    println!("{record:?}");
    Ok(())
}
{% endif %}
{% if examples.update_sql %}

/// Run a raw statement
pub async fn update() -> Result<(), ModelError> {
    exec(
        {{ examples.update_sql }},
        &[Value::from("some string"), {{ examples.key_values }}],
    )
    .await?;
    Ok(())
}
{% endif %}
"#;

/// `models/mod.rs`, regenerated from the model directories on disk
pub const MODELS_RS: &str = r"//! Generated models
//!
//! Generated by schemagen and rewritten on every run from the model
//! directories under `src/models`.

{% for module in modules %}
pub mod {{ module }};
{% endfor %}
";

/// Connection-pool accessor, regenerated on every run
pub const CONNECTION_RS: &str = r#"//! Shared MySQL connection pool
//!
//! Generated by schemagen and overwritten on every run.
//!
//! Requires `sqlx` (features `mysql`, `runtime-tokio`, `chrono`), `tokio`
//! (`sync`), `chrono` (`serde`), `serde` (`derive`) and `thiserror`.

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Connection;
use tokio::sync::Mutex;

/// Used when `DATABASE_URL` is not set
pub const DEFAULT_DATABASE_URL: &str = {{ default_url }};

static POOL: Mutex<Option<MySqlPool>> = Mutex::const_new(None);

/// Connection URL: `DATABASE_URL`, or the database the code was generated from
#[must_use]
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// The shared pool
///
/// Opened on first use. A pool whose connection no longer answers a ping is
/// closed and reopened.
///
/// # Errors
///
/// Returns the error from opening the pool.
pub async fn pool() -> Result<MySqlPool, sqlx::Error> {
    let mut guard = POOL.lock().await;

    if let Some(pool) = guard.as_ref() {
        if ping(pool).await.is_ok() {
            return Ok(pool.clone());
        }
        pool.close().await;
    }

    let pool = MySqlPoolOptions::new().connect(&database_url()).await?;
    *guard = Some(pool.clone());
    Ok(pool)
}

async fn ping(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.ping().await
}
"#;

/// Nullable timestamp wrapper, regenerated on every run
pub const DATE_RS: &str = r"//! Nullable timestamp
//!
//! Generated by schemagen and overwritten on every run.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::mysql::{MySql, MySqlTypeInfo, MySqlValueRef};
use sqlx::{Decode, Encode, Type};

/// A `DATETIME` that may be NULL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NullTime(pub Option<NaiveDateTime>);

impl NullTime {
    /// NULL
    #[must_use]
    pub const fn null() -> Self {
        Self(None)
    }

    /// A present value
    #[must_use]
    pub const fn new(time: NaiveDateTime) -> Self {
        Self(Some(time))
    }

    /// Whether the value is NULL
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// The value, if present
    #[must_use]
    pub const fn get(&self) -> Option<NaiveDateTime> {
        self.0
    }
}

impl From<NaiveDateTime> for NullTime {
    fn from(time: NaiveDateTime) -> Self {
        Self(Some(time))
    }
}

impl From<Option<NaiveDateTime>> for NullTime {
    fn from(time: Option<NaiveDateTime>) -> Self {
        Self(time)
    }
}

impl Serialize for NullTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl Type<MySql> for NullTime {
    fn type_info() -> MySqlTypeInfo {
        <NaiveDateTime as Type<MySql>>::type_info()
    }

    fn compatible(ty: &MySqlTypeInfo) -> bool {
        <NaiveDateTime as Type<MySql>>::compatible(ty)
    }
}

impl<'q> Encode<'q, MySql> for NullTime {
    fn encode_by_ref(&self, buf: &mut Vec<u8>) -> Result<IsNull, BoxDynError> {
        match &self.0 {
            Some(time) => <NaiveDateTime as Encode<'q, MySql>>::encode_by_ref(time, buf),
            None => Ok(IsNull::Yes),
        }
    }
}

impl<'r> Decode<'r, MySql> for NullTime {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        Ok(Self(<Option<NaiveDateTime> as Decode<'r, MySql>>::decode(value)?))
    }
}
";

/// Validation and argument helpers, created once
pub const UTILS_RS: &str = r#"//! Validation and query-argument helpers shared by every model
//!
//! Created by schemagen once; later runs leave this file alone.

use chrono::NaiveDateTime;
use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;

use crate::date::NullTime;

/// Error returned by generated model operations
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A value is outside an enum column's allowed set
    #[error("invalid value '{value}' for column '{column}'; allowed values are: {}", allowed.join(", "))]
    InvalidEnumValue {
        /// Offending value
        value: String,
        /// Column name
        column: &'static str,
        /// Allowed values
        allowed: &'static [&'static str],
    },

    /// A single-row read matched nothing
    #[error("no matching row in {table}")]
    NotFound {
        /// Table name
        table: &'static str,
    },

    /// Query or connection failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Positional query argument
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Text
    Text(String),
    /// Date and time
    DateTime(NaiveDateTime),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<NullTime> for Value {
    fn from(value: NullTime) -> Self {
        value.0.map_or(Self::Null, Self::DateTime)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Bind `args` to `query` in order
pub fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    args: &'q [Value],
) -> Query<'q, MySql, MySqlArguments> {
    for arg in args {
        query = match arg {
            Value::Null => query.bind(None::<String>),
            Value::Int(v) => query.bind(*v),
            Value::Float(v) => query.bind(*v),
            Value::Bool(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.as_str()),
            Value::DateTime(v) => query.bind(*v),
        };
    }
    query
}

/// Emptiness test used for default substitution and new-record detection
pub trait Empty {
    /// Whether the value is its type's zero value
    fn is_empty_value(&self) -> bool;
}

impl Empty for i64 {
    fn is_empty_value(&self) -> bool {
        *self == 0
    }
}

impl Empty for f64 {
    fn is_empty_value(&self) -> bool {
        *self == 0.0
    }
}

impl Empty for bool {
    fn is_empty_value(&self) -> bool {
        !*self
    }
}

impl Empty for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl Empty for NaiveDateTime {
    fn is_empty_value(&self) -> bool {
        *self == Self::default()
    }
}

impl Empty for NullTime {
    fn is_empty_value(&self) -> bool {
        self.0.is_none_or(|t| t.is_empty_value())
    }
}

impl<T: Empty> Empty for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.as_ref().is_none_or(Empty::is_empty_value)
    }
}

/// `value`, or `default` when `value` is empty
pub fn or_default<T: Empty + Clone>(value: &T, default: T) -> T {
    if value.is_empty_value() {
        default
    } else {
        value.clone()
    }
}

/// Check a value against an enum column's allowed set
///
/// `None` (a NULL in a nullable column) always passes.
///
/// # Errors
///
/// [`ModelError::InvalidEnumValue`] naming the value, column and allowed set.
pub fn validate_enum(
    column: &'static str,
    value: Option<&str>,
    allowed: &'static [&'static str],
) -> Result<(), ModelError> {
    match value {
        Some(v) if !allowed.contains(&v) => Err(ModelError::InvalidEnumValue {
            value: v.to_string(),
            column,
            allowed,
        }),
        _ => Ok(()),
    }
}
"#;
