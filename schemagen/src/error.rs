//! Error types and error handling

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the generator
pub type Result<T> = std::result::Result<T, Error>;

/// Generator error type
///
/// Every variant except [`Error::InvalidEnumValue`] is a generation-time
/// failure that aborts the run. `InvalidEnumValue` mirrors the error raised by
/// the generated save path and is produced by [`crate::enums::EnumConstraint::validate`].
#[derive(Debug, Error)]
pub enum Error {
    /// The schema source returned no columns for the requested table
    #[error("no columns found for table '{table}'")]
    SchemaNotFound {
        /// Requested table name
        table: String,
    },

    /// The schema source was unreachable or a metadata query failed
    #[error("introspection failed: {0}")]
    Introspection(String),

    /// Directory creation or file write failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being created or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Template rendering failed
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// An `enum(...)` column type could not be parsed
    #[error("malformed enum type for column '{column}': {column_type}")]
    MalformedEnum {
        /// Column name
        column: String,
        /// Raw column type string
        column_type: String,
    },

    /// A value is not a member of the column's enum set
    #[error("invalid value '{value}' for column '{column}'; allowed values are: {}", allowed.join(", "))]
    InvalidEnumValue {
        /// Offending value
        value: String,
        /// Column name
        column: String,
        /// Allowed values in declaration order
        allowed: Vec<String>,
    },
}

impl Error {
    /// Build an [`Error::Io`] for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Introspection(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_enum_message_lists_allowed_values() {
        let err = Error::InvalidEnumValue {
            value: "D".to_string(),
            column: "grade".to_string(),
            allowed: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("'D'"));
        assert!(message.contains("grade"));
        assert!(message.contains("A, B, C"));
    }

    #[test]
    fn test_schema_not_found_names_table() {
        let err = Error::SchemaNotFound {
            table: "ghost".to_string(),
        };
        assert_eq!(err.to_string(), "no columns found for table 'ghost'");
    }
}
