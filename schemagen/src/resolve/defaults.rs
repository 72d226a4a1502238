//! Column default normalisation and literal rendering

use super::{BaseKind, TypeDescriptor};

/// Normalise a raw column default
///
/// `NULL` (any case) means no default, and so does `0` on a nullable column,
/// which would otherwise force a misleading zero onto an optional field.
/// MariaDB reports string defaults wrapped in single quotes; those are
/// unwrapped.
///
/// # Examples
///
/// ```
/// use schemagen::resolve::normalize_default;
///
/// assert_eq!(normalize_default(Some("NULL"), false), None);
/// assert_eq!(normalize_default(Some("0"), true), None);
/// assert_eq!(normalize_default(Some("0"), false), Some("0".to_string()));
/// assert_eq!(normalize_default(Some("'draft'"), false), Some("draft".to_string()));
/// ```
#[must_use]
pub fn normalize_default(raw: Option<&str>, nullable: bool) -> Option<String> {
    let raw = raw?;
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case("null") {
        return None;
    }
    if nullable && trimmed == "0" {
        return None;
    }

    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .map_or_else(|| raw.to_string(), |inner| inner.replace("''", "'"));

    Some(unquoted)
}

/// Render a normalised default as a Rust expression of the column's type
///
/// Only plain columns receive defaults; a nullable column binds NULL when
/// unset. Returns `None` when the value cannot be expressed as a literal of
/// the resolved type (e.g. `CURRENT_TIMESTAMP`).
///
/// # Examples
///
/// ```
/// use schemagen::resolve::{default_literal, BaseKind, TypeDescriptor};
///
/// let ty = TypeDescriptor::plain(BaseKind::Int);
/// assert_eq!(default_literal(&ty, "42").as_deref(), Some("42"));
///
/// let ty = TypeDescriptor::plain(BaseKind::String);
/// assert_eq!(default_literal(&ty, "hi").as_deref(), Some("\"hi\".to_string()"));
///
/// let ty = TypeDescriptor::plain(BaseKind::Timestamp);
/// assert_eq!(default_literal(&ty, "CURRENT_TIMESTAMP"), None);
/// ```
#[must_use]
pub fn default_literal(ty: &TypeDescriptor, value: &str) -> Option<String> {
    if ty.is_nullable() {
        return None;
    }

    let trimmed = value.trim();
    match ty.base {
        BaseKind::Int => trimmed.parse::<i64>().ok().map(|n| n.to_string()),
        BaseKind::Float => trimmed
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| format!("{f:?}")),
        BaseKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "1" | "true" | "b'1'" => Some("true".to_string()),
            "0" | "false" | "b'0'" => Some("false".to_string()),
            _ => None,
        },
        BaseKind::String | BaseKind::StringEnum => Some(format!("{value:?}.to_string()")),
        BaseKind::Timestamp => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_is_no_default() {
        assert_eq!(normalize_default(Some("null"), false), None);
        assert_eq!(normalize_default(Some("Null"), true), None);
        assert_eq!(normalize_default(None, false), None);
    }

    #[test]
    fn test_zero_dropped_only_when_nullable() {
        assert_eq!(normalize_default(Some("0"), true), None);
        assert_eq!(normalize_default(Some("0"), false).as_deref(), Some("0"));
        assert_eq!(normalize_default(Some("0.00"), true).as_deref(), Some("0.00"));
    }

    #[test]
    fn test_mariadb_quoted_defaults() {
        assert_eq!(normalize_default(Some("'it''s'"), false).as_deref(), Some("it's"));
        assert_eq!(normalize_default(Some("''"), false).as_deref(), Some(""));
    }

    #[test]
    fn test_literals() {
        let float = TypeDescriptor::plain(BaseKind::Float);
        assert_eq!(default_literal(&float, "1.50").as_deref(), Some("1.5"));
        assert_eq!(default_literal(&float, "3").as_deref(), Some("3.0"));
        assert_eq!(default_literal(&float, "abc"), None);

        let boolean = TypeDescriptor::plain(BaseKind::Bool);
        assert_eq!(default_literal(&boolean, "1").as_deref(), Some("true"));
        assert_eq!(default_literal(&boolean, "b'0'").as_deref(), Some("false"));
        assert_eq!(default_literal(&boolean, "2"), None);

        let int = TypeDescriptor::plain(BaseKind::Int);
        assert_eq!(default_literal(&int, " -7 ").as_deref(), Some("-7"));
        assert_eq!(default_literal(&int, "x"), None);

        let text = TypeDescriptor::plain(BaseKind::StringEnum);
        assert_eq!(
            default_literal(&text, "say \"hi\"").as_deref(),
            Some(r#""say \"hi\"".to_string()"#)
        );
    }

    #[test]
    fn test_nullable_columns_get_no_literal() {
        let ty = TypeDescriptor::nullable(BaseKind::Int);
        assert_eq!(default_literal(&ty, "5"), None);
    }
}
