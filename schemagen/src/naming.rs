//! Naming helpers for code generation
//!
//! Converts table and column names into Rust identifiers: `PascalCase`
//! entity names, `snake_case` modules and fields, with keyword escaping.

use inflector::Inflector;

/// Rust keywords that can be used as raw identifiers (`r#type`)
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers
const RESERVED_PATH_KEYWORDS: &[&str] = &["crate", "self", "super", "Self"];

/// Type names already in scope in a generated `crud.rs`
///
/// An entity named after one of these would clash with the import or shadow
/// the prelude type the generated code relies on.
const RESERVED_ENTITY_NAMES: &[&str] = &[
    "Box", "Clone", "Debug", "Default", "Empty", "Err", "ModelError", "MySqlQueryResult",
    "MySqlRow", "NaiveDateTime", "None", "NullTime", "Ok", "Option", "PartialEq", "Result",
    "Row", "Serialize", "Some", "String", "Value", "Vec",
];

/// Naming helpers for generated code
pub struct Naming;

impl Naming {
    /// Convert to `snake_case`
    ///
    /// # Examples
    ///
    /// ```
    /// # use schemagen::naming::Naming;
    /// assert_eq!(Naming::to_snake_case("UserProfile"), "user_profile");
    /// assert_eq!(Naming::to_snake_case("createdAt"), "created_at");
    /// ```
    #[must_use]
    pub fn to_snake_case(input: &str) -> String {
        input.to_snake_case()
    }

    /// Convert to `PascalCase`
    ///
    /// # Examples
    ///
    /// ```
    /// # use schemagen::naming::Naming;
    /// assert_eq!(Naming::to_pascal_case("user_profiles"), "UserProfiles");
    /// assert_eq!(Naming::to_pascal_case("home"), "Home");
    /// ```
    #[must_use]
    pub fn to_pascal_case(input: &str) -> String {
        input.to_pascal_case()
    }

    /// Whether `ident` is a Rust keyword
    #[must_use]
    pub fn is_keyword(ident: &str) -> bool {
        RAW_KEYWORDS.contains(&ident) || RESERVED_PATH_KEYWORDS.contains(&ident)
    }

    /// Reduce arbitrary text to a `snake_case` identifier body
    ///
    /// Non-alphanumeric characters become underscores, a leading digit gets
    /// an underscore prefix and empty input becomes `field`.
    fn sanitize_snake(input: &str) -> String {
        let snake = Self::to_snake_case(input);
        let mut ident: String = snake
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();

        if ident.trim_matches('_').is_empty() {
            ident = "field".to_string();
        }
        if ident.starts_with(|c: char| c.is_ascii_digit()) {
            ident.insert(0, '_');
        }
        ident
    }

    /// Field identifier for a column
    ///
    /// Keywords are escaped as raw identifiers; path keywords that cannot be
    /// raw get a trailing underscore.
    ///
    /// # Examples
    ///
    /// ```
    /// # use schemagen::naming::Naming;
    /// assert_eq!(Naming::field_ident("firstName"), "first_name");
    /// assert_eq!(Naming::field_ident("type"), "r#type");
    /// assert_eq!(Naming::field_ident("self"), "self_");
    /// assert_eq!(Naming::field_ident("2fa"), "_2fa");
    /// ```
    #[must_use]
    pub fn field_ident(column: &str) -> String {
        let ident = Self::sanitize_snake(column);
        if RESERVED_PATH_KEYWORDS.contains(&ident.as_str()) {
            format!("{ident}_")
        } else if RAW_KEYWORDS.contains(&ident.as_str()) {
            format!("r#{ident}")
        } else {
            ident
        }
    }

    /// Identifier with any raw prefix removed, for building derived names
    ///
    /// # Examples
    ///
    /// ```
    /// # use schemagen::naming::Naming;
    /// assert_eq!(Naming::bare_ident("r#type"), "type");
    /// assert_eq!(Naming::bare_ident("name"), "name");
    /// ```
    #[must_use]
    pub fn bare_ident(ident: &str) -> &str {
        ident.strip_prefix("r#").unwrap_or(ident)
    }

    /// Entity struct name for a table
    ///
    /// Names that clash with a type the generated module imports get a
    /// `Record` suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use schemagen::naming::Naming;
    /// assert_eq!(Naming::entity_name("order_items"), "OrderItems");
    /// assert_eq!(Naming::entity_name("2019_sales"), "T2019Sales");
    /// assert_eq!(Naming::entity_name("value"), "ValueRecord");
    /// ```
    #[must_use]
    pub fn entity_name(table: &str) -> String {
        let pascal: String = Self::to_pascal_case(table)
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();

        if pascal.is_empty() {
            "Entity".to_string()
        } else if pascal.starts_with(|c: char| c.is_ascii_digit()) || pascal == "Self" {
            format!("T{pascal}")
        } else if RESERVED_ENTITY_NAMES.contains(&pascal.as_str()) {
            format!("{pascal}Record")
        } else {
            pascal
        }
    }

    /// Module (and directory) name for a table
    ///
    /// # Examples
    ///
    /// ```
    /// # use schemagen::naming::Naming;
    /// assert_eq!(Naming::module_name("OrderItems"), "order_items");
    /// assert_eq!(Naming::module_name("type"), "type_");
    /// ```
    #[must_use]
    pub fn module_name(table: &str) -> String {
        let ident = Self::sanitize_snake(table);
        if Self::is_keyword(&ident) {
            format!("{ident}_")
        } else {
            ident
        }
    }

    /// Name of the constant holding a column's allowed enum values
    ///
    /// # Examples
    ///
    /// ```
    /// # use schemagen::naming::Naming;
    /// assert_eq!(Naming::enum_const("r#type"), "TYPE_VALUES");
    /// ```
    #[must_use]
    pub fn enum_const(field_ident: &str) -> String {
        format!("{}_VALUES", Self::bare_ident(field_ident).to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_idents() {
        assert_eq!(Naming::field_ident("id"), "id");
        assert_eq!(Naming::field_ident("userID"), "user_id");
        assert_eq!(Naming::field_ident("e-mail"), "e_mail");
        assert_eq!(Naming::field_ident("match"), "r#match");
        assert_eq!(Naming::field_ident("crate"), "crate_");
        assert_eq!(Naming::field_ident("---"), "field");
    }

    #[test]
    fn test_entity_names() {
        assert_eq!(Naming::entity_name("home"), "Home");
        assert_eq!(Naming::entity_name("realtor_listing"), "RealtorListing");
        assert_eq!(Naming::entity_name("___"), "Entity");
    }

    #[test]
    fn test_entity_names_avoid_generated_imports() {
        for (table, entity) in [
            ("value", "ValueRecord"),
            ("row", "RowRecord"),
            ("model_error", "ModelErrorRecord"),
            ("empty", "EmptyRecord"),
            ("serialize", "SerializeRecord"),
            ("null_time", "NullTimeRecord"),
            ("result", "ResultRecord"),
            ("my_sql_row", "MySqlRowRecord"),
        ] {
            assert_eq!(Naming::entity_name(table), entity, "{table}");
        }
        assert_eq!(Naming::entity_name("values"), "Values");
        assert_eq!(Naming::entity_name("rows"), "Rows");
    }

    #[test]
    fn test_module_names() {
        assert_eq!(Naming::module_name("Realtor"), "realtor");
        assert_eq!(Naming::module_name("mod"), "mod_");
    }

    #[test]
    fn test_keywords() {
        assert!(Naming::is_keyword("type"));
        assert!(Naming::is_keyword("self"));
        assert!(!Naming::is_keyword("name"));
    }

    #[test]
    fn test_enum_const() {
        assert_eq!(Naming::enum_const("status"), "STATUS_VALUES");
        assert_eq!(Naming::enum_const("_2fa_mode"), "_2FA_MODE_VALUES");
        assert_eq!(Naming::enum_const("self_"), "SELF__VALUES");
    }
}
