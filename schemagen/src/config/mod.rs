//! Configuration management
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Command-line flags (applied by the CLI after loading)
//! 2. Environment variables (`SCHEMAGEN_` prefix, `__` for nesting)
//! 3. `./schemagen.toml`
//! 4. Hardcoded defaults (fallback)
//!
//! Environment variable format: `SCHEMAGEN_SECTION__FIELD_NAME`, for example
//! `SCHEMAGEN_DATABASE__HOST=db.internal` or
//! `SCHEMAGEN_TYPES__BOOLEAN_DETECTION=declared`.
//!
//! # Example Configuration
//!
//! ```toml
//! # schemagen.toml
//! [database]
//! host = "localhost"
//! port = 3306
//! user = "root"
//! name = "shop"
//!
//! [output]
//! dir = "."
//! format = true
//!
//! [types]
//! boolean_detection = "sampled"
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::schema::BooleanDetection;
use crate::{Error, Result};

/// Schema source connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// User name
    pub user: String,
    /// Password, if the server requires one
    pub password: Option<String>,
    /// Database (schema) to inspect
    pub name: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: None,
            name: String::new(),
        }
    }
}

impl DatabaseSettings {
    /// Connection URL without the password
    ///
    /// Baked into the generated connection module as the fallback used when
    /// `DATABASE_URL` is unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemagen::config::DatabaseSettings;
    ///
    /// let settings = DatabaseSettings {
    ///     name: "shop".to_string(),
    ///     password: Some("secret".to_string()),
    ///     ..DatabaseSettings::default()
    /// };
    /// assert_eq!(settings.url_without_password(), "mysql://root@localhost:3306/shop");
    /// ```
    #[must_use]
    pub fn url_without_password(&self) -> String {
        format!(
            "mysql://{}@{}:{}/{}",
            self.user, self.host, self.port, self.name
        )
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Root of the generated package
    pub dir: PathBuf,
    /// Run `rustfmt` on written files
    pub format: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            format: true,
        }
    }
}

/// Type resolution settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeSettings {
    /// How `tinyint` columns are classified
    pub boolean_detection: BooleanDetection,
}

/// Complete generator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Schema source
    pub database: DatabaseSettings,
    /// Output
    pub output: OutputSettings,
    /// Type resolution
    pub types: TypeSettings,
}

impl GeneratorConfig {
    /// Default configuration file name, looked up in the working directory
    pub const FILE_NAME: &'static str = "schemagen.toml";

    /// Environment variable prefix
    pub const ENV_PREFIX: &'static str = "SCHEMAGEN_";

    /// Load from `./schemagen.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a source holds a value of the wrong type.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::FILE_NAME)
    }

    /// Load from a specific file (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a source holds a value of the wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let defaults =
            toml::to_string(&Self::default()).map_err(|e| Error::Config(e.to_string()))?;

        Figment::new()
            .merge(Toml::string(&defaults))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__").lowercase(true))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Check that the fields generation cannot run without are present
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first empty required field.
    pub fn validate(&self) -> Result<()> {
        if self.database.name.trim().is_empty() {
            return Err(Error::Config(
                "database name is required (--database or [database] name)".to_string(),
            ));
        }
        if self.database.host.trim().is_empty() {
            return Err(Error::Config(
                "database host is required (--host or [database] host)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.user, "root");
        assert!(config.database.password.is_none());
        assert_eq!(config.output.dir, PathBuf::from("."));
        assert!(config.output.format);
        assert_eq!(config.types.boolean_detection, BooleanDetection::Sampled);
    }

    #[test]
    fn test_validate_requires_database_and_host() {
        let mut config = GeneratorConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("database name"));

        config.database.name = "shop".to_string();
        config.database.host = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("database host"));

        config.database.host = "db".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_layers_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                GeneratorConfig::FILE_NAME,
                r#"
                [database]
                name = "shop"
                port = 3307

                [types]
                boolean_detection = "declared"
                "#,
            )?;
            jail.set_env("SCHEMAGEN_DATABASE__HOST", "db.internal");
            jail.set_env("SCHEMAGEN_OUTPUT__FORMAT", "false");

            let config = GeneratorConfig::load().expect("config loads");
            assert_eq!(config.database.name, "shop");
            assert_eq!(config.database.port, 3307);
            assert_eq!(config.database.host, "db.internal");
            assert_eq!(config.database.user, "root");
            assert!(!config.output.format);
            assert_eq!(config.types.boolean_detection, BooleanDetection::Declared);
            Ok(())
        });
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        Jail::expect_with(|_| {
            let config = GeneratorConfig::load_from("missing.toml").expect("config loads");
            assert_eq!(config, GeneratorConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_bad_value_is_config_error() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.toml", "[database]\nport = \"not a port\"\n")?;
            let err = GeneratorConfig::load_from("bad.toml").unwrap_err();
            assert!(matches!(err, Error::Config(_)));
            Ok(())
        });
    }
}
