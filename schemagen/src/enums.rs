//! Enum constraint extraction
//!
//! Parses MySQL `enum('a','b',...)` column types into the ordered set of
//! allowed values. The parser walks the quoted literals instead of trimming
//! delimiter characters, so values may contain commas, parentheses, spaces
//! and doubled quotes (`''`).

use serde::Serialize;

use crate::{Error, Result};

/// Allowed values of an enum column, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumConstraint {
    values: Vec<String>,
}

impl EnumConstraint {
    /// Create a constraint from explicit values
    #[must_use]
    pub const fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Parse a column type string
    ///
    /// Returns `Ok(None)` when the type is not an enum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEnum`] when the type starts with `enum(` but
    /// its literal list is not well formed or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemagen::enums::EnumConstraint;
    ///
    /// let constraint = EnumConstraint::parse("grade", "enum('A','B','C')").unwrap().unwrap();
    /// assert_eq!(constraint.values(), ["A", "B", "C"]);
    ///
    /// assert!(EnumConstraint::parse("name", "varchar(10)").unwrap().is_none());
    /// ```
    pub fn parse(column: &str, column_type: &str) -> Result<Option<Self>> {
        let trimmed = column_type.trim();
        let Some(prefix) = trimmed.get(..5) else {
            return Ok(None);
        };
        if !prefix.eq_ignore_ascii_case("enum(") {
            return Ok(None);
        }

        let malformed = || Error::MalformedEnum {
            column: column.to_string(),
            column_type: column_type.to_string(),
        };

        let body = trimmed[5..].strip_suffix(')').ok_or_else(malformed)?;
        let values = parse_literals(body).ok_or_else(malformed)?;
        if values.is_empty() {
            return Err(malformed());
        }

        Ok(Some(Self { values }))
    }

    /// Allowed values in declaration order
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Whether `value` is allowed
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|allowed| allowed == value)
    }

    /// Check `value` against the allowed set
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEnumValue`] naming the value, the column and
    /// the allowed set when `value` is not a member.
    pub fn validate(&self, column: &str, value: &str) -> Result<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(Error::InvalidEnumValue {
                value: value.to_string(),
                column: column.to_string(),
                allowed: self.values.clone(),
            })
        }
    }
}

/// Parse `'a','b''c', 'd'` into its literals
///
/// Returns `None` on any structural error.
fn parse_literals(body: &str) -> Option<Vec<String>> {
    let mut values = Vec::new();
    let mut chars = body.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        if chars.peek().is_none() {
            // Trailing comma or empty body.
            return if values.is_empty() { Some(values) } else { None };
        }
        if chars.next()? != '\'' {
            return None;
        }

        let mut value = String::new();
        loop {
            match chars.next()? {
                '\'' if chars.peek() == Some(&'\'') => {
                    chars.next();
                    value.push('\'');
                }
                '\'' => break,
                c => value.push(c),
            }
        }
        values.push(value);

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => return Some(values),
            Some(',') => {}
            Some(_) => return None,
        }
    }
}
