//! Column introspection with boolean disambiguation

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::{ColumnDescriptor, SchemaSource};
use crate::{Error, Result};

/// How single-byte integer columns are classified as boolean or integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanDetection {
    /// Read the column's distinct values; anything other than `0`/`1` means integer
    ///
    /// The resolved type depends on the data present at generation time.
    #[default]
    Sampled,
    /// Use the declared display width only: `tinyint(1)` is boolean
    Declared,
}

impl fmt::Display for BooleanDetection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sampled => write!(f, "sampled"),
            Self::Declared => write!(f, "declared"),
        }
    }
}

/// Outcome of boolean disambiguation for a `tinyint` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanHint {
    /// Every observed value was a boolean sentinel
    Boolean,
    /// Some other value was observed (or the declaration rules it out)
    Integer,
}

/// A column together with its disambiguation hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectedColumn {
    /// Column metadata
    pub descriptor: ColumnDescriptor,
    /// Present only for boolean-ambiguous columns
    pub hint: Option<BooleanHint>,
}

/// Classify the distinct values of a boolean-ambiguous column
///
/// NULLs are ignored; an empty sample is boolean. A single value outside
/// `{0, 1}` is enough to force integer classification.
///
/// # Examples
///
/// ```
/// use schemagen::schema::{classify_samples, BooleanHint};
///
/// let values = vec![Some("0".to_string()), Some("1".to_string()), None];
/// assert_eq!(classify_samples(&values), BooleanHint::Boolean);
///
/// let values = vec![Some("0".to_string()), Some("2".to_string())];
/// assert_eq!(classify_samples(&values), BooleanHint::Integer);
/// ```
#[must_use]
pub fn classify_samples(values: &[Option<String>]) -> BooleanHint {
    let all_sentinels = values
        .iter()
        .flatten()
        .all(|value| matches!(value.trim(), "0" | "1"));

    if all_sentinels {
        BooleanHint::Boolean
    } else {
        BooleanHint::Integer
    }
}

/// Classify from the declared type alone: `tinyint(1)` is boolean
fn classify_declared(full_type: &str) -> BooleanHint {
    let normalized: String = full_type
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    if normalized.starts_with("tinyint(1)") {
        BooleanHint::Boolean
    } else {
        BooleanHint::Integer
    }
}

/// Reads column metadata for a table and disambiguates boolean-like columns
pub struct Introspector<'a> {
    source: &'a dyn SchemaSource,
    detection: BooleanDetection,
}

impl<'a> Introspector<'a> {
    /// Create an introspector over the given source
    #[must_use]
    pub fn new(source: &'a dyn SchemaSource, detection: BooleanDetection) -> Self {
        Self { source, detection }
    }

    /// Read the columns of `table`
    ///
    /// Duplicate metadata rows for the same column name are collapsed to the
    /// first occurrence, keeping declaration order.
    ///
    /// # Errors
    ///
    /// - [`Error::SchemaNotFound`] if the table has no columns
    /// - [`Error::Introspection`] if the source fails
    pub fn introspect(&self, table: &str) -> Result<Vec<IntrospectedColumn>> {
        let columns = self.source.columns(table)?;
        if columns.is_empty() {
            return Err(Error::SchemaNotFound {
                table: table.to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut result = Vec::with_capacity(columns.len());

        for mut descriptor in columns {
            if !seen.insert(descriptor.name.clone()) {
                tracing::debug!(table, column = %descriptor.name, "skipping duplicate column metadata row");
                continue;
            }

            if descriptor.full_type.trim().is_empty() {
                descriptor.full_type.clone_from(&descriptor.native_type);
            }

            let hint = if descriptor.is_boolean_ambiguous() {
                Some(self.disambiguate(table, &descriptor)?)
            } else {
                None
            };

            result.push(IntrospectedColumn { descriptor, hint });
        }

        Ok(result)
    }

    fn disambiguate(&self, table: &str, column: &ColumnDescriptor) -> Result<BooleanHint> {
        let hint = match self.detection {
            BooleanDetection::Sampled => {
                let values = self.source.distinct_values(table, &column.name)?;
                classify_samples(&values)
            }
            BooleanDetection::Declared => classify_declared(&column.full_type),
        };

        tracing::debug!(
            table,
            column = %column.name,
            detection = %self.detection,
            ?hint,
            "disambiguated tinyint column"
        );

        Ok(hint)
    }
}
