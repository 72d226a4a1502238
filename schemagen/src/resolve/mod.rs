//! Type resolution: native column type → target Rust type
//!
//! Resolution is a pure function of the native type, nullability and the
//! boolean disambiguation hint produced by the introspector.
//!
//! | native type                         | base kind     | plain           | nullable         |
//! |-------------------------------------|---------------|-----------------|------------------|
//! | `int`, `bigint`, `smallint`, …      | int           | `i64`           | `Option<i64>`    |
//! | `tinyint` sampled/declared boolean  | bool          | `bool`          | `Option<bool>`   |
//! | `tinyint` otherwise                 | int           | `i64`           | `Option<i64>`    |
//! | `bool`, `boolean`, `bit(1)`         | bool          | `bool`          | `Option<bool>`   |
//! | `float`, `double`, `decimal`, …     | float         | `f64`           | `Option<f64>`    |
//! | `date`, `datetime`, `timestamp`     | timestamp     | `NaiveDateTime` | `NullTime`       |
//! | `enum(...)`                         | string-enum   | `String`        | `Option<String>` |
//! | anything else                       | string        | `String`        | `Option<String>` |
//!
//! A primary-key column never resolves to bool; it is re-classified as int.

mod defaults;

pub use defaults::{default_literal, normalize_default};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{BooleanHint, ColumnDescriptor};

/// Whether the target type admits NULL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nullability {
    /// Plain value
    Plain,
    /// NULL-aware wrapper
    Nullable,
}

/// Canonical value category of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaseKind {
    /// Signed integer
    Int,
    /// Floating point
    Float,
    /// Boolean
    Bool,
    /// Free text
    String,
    /// Text restricted to an enum set
    StringEnum,
    /// Date/time without zone
    Timestamp,
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::StringEnum => "string-enum",
            Self::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Resolved target representation of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Plain or nullable
    pub nullability: Nullability,
    /// Value category
    pub base: BaseKind,
}

impl TypeDescriptor {
    /// Plain descriptor of the given kind
    #[must_use]
    pub const fn plain(base: BaseKind) -> Self {
        Self {
            nullability: Nullability::Plain,
            base,
        }
    }

    /// Nullable descriptor of the given kind
    #[must_use]
    pub const fn nullable(base: BaseKind) -> Self {
        Self {
            nullability: Nullability::Nullable,
            base,
        }
    }

    /// Whether the type admits NULL
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullability == Nullability::Nullable
    }

    /// Whether values are text (`String` or an enum string)
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.base, BaseKind::String | BaseKind::StringEnum)
    }

    /// Rust type of the non-null value
    #[must_use]
    pub const fn base_rust_type(&self) -> &'static str {
        match self.base {
            BaseKind::Int => "i64",
            BaseKind::Float => "f64",
            BaseKind::Bool => "bool",
            BaseKind::String | BaseKind::StringEnum => "String",
            BaseKind::Timestamp => "NaiveDateTime",
        }
    }

    /// Rust type of the entity field
    ///
    /// # Examples
    ///
    /// ```
    /// use schemagen::resolve::{BaseKind, TypeDescriptor};
    ///
    /// assert_eq!(TypeDescriptor::plain(BaseKind::Int).rust_type(), "i64");
    /// assert_eq!(TypeDescriptor::nullable(BaseKind::String).rust_type(), "Option<String>");
    /// assert_eq!(TypeDescriptor::nullable(BaseKind::Timestamp).rust_type(), "NullTime");
    /// ```
    #[must_use]
    pub fn rust_type(&self) -> String {
        match (self.nullability, self.base) {
            (Nullability::Nullable, BaseKind::Timestamp) => "NullTime".to_string(),
            (Nullability::Nullable, _) => format!("Option<{}>", self.base_rust_type()),
            (Nullability::Plain, _) => self.base_rust_type().to_string(),
        }
    }

    /// Rust type used for a by-key lookup parameter
    #[must_use]
    pub const fn param_rust_type(&self) -> &'static str {
        match self.base {
            BaseKind::String | BaseKind::StringEnum => "&str",
            _ => self.base_rust_type(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nullability {
            Nullability::Plain => write!(f, "{}", self.base),
            Nullability::Nullable => write!(f, "nullable {}", self.base),
        }
    }
}

/// Native type family, before nullability is applied
fn native_base(native_type: &str, full_type: &str, hint: Option<BooleanHint>) -> BaseKind {
    let native = native_type.trim().to_ascii_lowercase();
    match native.as_str() {
        "int" | "integer" | "smallint" | "mediumint" | "bigint" | "year" => BaseKind::Int,
        "tinyint" => match hint {
            Some(BooleanHint::Boolean) => BaseKind::Bool,
            Some(BooleanHint::Integer) | None => BaseKind::Int,
        },
        "bool" | "boolean" => BaseKind::Bool,
        "bit" => {
            let width: String = full_type.chars().filter(|c| !c.is_whitespace()).collect();
            if width.eq_ignore_ascii_case("bit(1)") || width.eq_ignore_ascii_case("bit") {
                BaseKind::Bool
            } else {
                BaseKind::Int
            }
        }
        "float" | "double" | "real" | "decimal" | "numeric" => BaseKind::Float,
        "date" | "datetime" | "timestamp" => BaseKind::Timestamp,
        "enum" => BaseKind::StringEnum,
        _ => BaseKind::String,
    }
}

/// Resolve a native type to its target descriptor
///
/// # Examples
///
/// ```
/// use schemagen::resolve::{resolve_type, BaseKind, TypeDescriptor};
/// use schemagen::schema::BooleanHint;
///
/// let ty = resolve_type("tinyint", "tinyint(1)", false, Some(BooleanHint::Boolean));
/// assert_eq!(ty, TypeDescriptor::plain(BaseKind::Bool));
///
/// let ty = resolve_type("tinyint", "tinyint(4)", true, Some(BooleanHint::Integer));
/// assert_eq!(ty, TypeDescriptor::nullable(BaseKind::Int));
/// ```
#[must_use]
pub fn resolve_type(
    native_type: &str,
    full_type: &str,
    nullable: bool,
    hint: Option<BooleanHint>,
) -> TypeDescriptor {
    let base = native_base(native_type, full_type, hint);
    if nullable {
        TypeDescriptor::nullable(base)
    } else {
        TypeDescriptor::plain(base)
    }
}

/// Resolve a column, applying the primary-key rule
///
/// A key cannot be boolean-typed: a key column that would resolve to bool is
/// re-classified as int, keeping its nullability.
#[must_use]
pub fn resolve_column(column: &ColumnDescriptor, hint: Option<BooleanHint>) -> TypeDescriptor {
    let mut ty = resolve_type(&column.native_type, &column.full_type, column.nullable, hint);
    if column.is_primary() && ty.base == BaseKind::Bool {
        tracing::debug!(column = %column.name, "primary key resolved to bool; using int");
        ty.base = BaseKind::Int;
    }
    ty
}
