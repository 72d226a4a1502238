//! Live MySQL schema source backed by `information_schema`
//!
//! The generator is synchronous, so the source owns a current-thread tokio
//! runtime and blocks on each query. A single pooled connection is opened
//! once and reused for every table of the run.

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tokio::runtime::Runtime;

use super::{ColumnDescriptor, KeyRole, SchemaSource};
use crate::config::DatabaseSettings;
use crate::{Error, Result};

const COLUMNS_QUERY: &str = "SELECT CAST(COLUMN_NAME AS CHAR), CAST(IS_NULLABLE AS CHAR), \
     CAST(COLUMN_KEY AS CHAR), CAST(DATA_TYPE AS CHAR), CAST(COLUMN_TYPE AS CHAR), \
     CAST(COLUMN_DEFAULT AS CHAR), CAST(EXTRA AS CHAR) \
     FROM information_schema.COLUMNS \
     WHERE TABLE_NAME = ? AND TABLE_SCHEMA = ? \
     ORDER BY ORDINAL_POSITION";

const TABLES_QUERY: &str = "SELECT DISTINCT CAST(TABLE_NAME AS CHAR) \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = ? \
     ORDER BY 1";

type ColumnRow = (
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
);

/// Schema source reading MySQL's `information_schema`
pub struct MySqlSchemaSource {
    runtime: Runtime,
    pool: MySqlPool,
    database: String,
}

impl MySqlSchemaSource {
    /// Open the connection used for the whole run
    ///
    /// # Errors
    ///
    /// Returns [`Error::Introspection`] if the runtime cannot be built or the
    /// server is unreachable.
    pub fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Introspection(format!("failed to start runtime: {e}")))?;

        let mut options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .database(&settings.name);
        if let Some(password) = settings.password.as_deref() {
            options = options.password(password);
        }

        tracing::info!(
            host = %settings.host,
            port = settings.port,
            database = %settings.name,
            "connecting to schema source"
        );

        let pool = runtime.block_on(
            MySqlPoolOptions::new()
                .max_connections(1)
                .connect_with(options),
        )?;

        Ok(Self {
            runtime,
            pool,
            database: settings.name.clone(),
        })
    }
}

/// Quote an identifier with backticks, doubling embedded backticks
fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

impl SchemaSource for MySqlSchemaSource {
    fn database(&self) -> &str {
        &self.database
    }

    fn columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let rows: Vec<ColumnRow> = self.runtime.block_on(
            sqlx::query_as(COLUMNS_QUERY)
                .bind(table)
                .bind(&self.database)
                .fetch_all(&self.pool),
        )?;

        Ok(rows
            .into_iter()
            .map(
                |(name, is_nullable, key, native_type, full_type, default_value, extra)| {
                    ColumnDescriptor {
                        name,
                        nullable: is_nullable.eq_ignore_ascii_case("YES"),
                        key_role: KeyRole::from_column_key(&key),
                        native_type,
                        full_type,
                        default_value,
                        extra: extra.filter(|e| !e.is_empty()),
                    }
                },
            )
            .collect())
    }

    fn distinct_values(&self, table: &str, column: &str) -> Result<Vec<Option<String>>> {
        let query = format!(
            "SELECT DISTINCT CAST({} AS CHAR) FROM {}.{}",
            quote_ident(column),
            quote_ident(&self.database),
            quote_ident(table)
        );

        let rows: Vec<(Option<String>,)> = self
            .runtime
            .block_on(sqlx::query_as(&query).fetch_all(&self.pool))?;

        Ok(rows.into_iter().map(|(value,)| value).collect())
    }

    fn tables(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = self.runtime.block_on(
            sqlx::query_as(TABLES_QUERY)
                .bind(&self.database)
                .fetch_all(&self.pool),
        )?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("status"), "`status`");
        assert_eq!(quote_ident("odd`name"), "`odd``name`");
    }
}
