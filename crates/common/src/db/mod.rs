//! Database layer for the GEOROC API
//!
//! Provides:
//! - Connection pool management
//! - The single generic read primitive (JSON aggregation envelope)
//! - Query builder and SQL template registry

pub mod builder;
pub mod templates;

pub use builder::QueryBuilder;
pub use templates::QueryTemplate;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use crate::{SECRET_DB_PASSWORD, SECRET_DB_USER};
use serde::de::DeserializeOwned;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

/// A bindable SQL parameter value
///
/// Client-supplied values always travel through these binds, never through
/// string interpolation.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    IntArray(Vec<i64>),
    Float(f64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Vec<i64>> for SqlValue {
    fn from(v: Vec<i64>) -> Self {
        SqlValue::IntArray(v)
    }
}

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    /// Create a new database pool from configuration; credentials come
    /// from the secret map
    pub async fn new(
        config: &DatabaseConfig,
        secrets: &HashMap<String, String>,
    ) -> Result<Self> {
        let user = secrets.get(SECRET_DB_USER).ok_or_else(|| AppError::Secret {
            message: format!("secret file is missing {}", SECRET_DB_USER),
        })?;
        let password = secrets
            .get(SECRET_DB_PASSWORD)
            .ok_or_else(|| AppError::Secret {
                message: format!("secret file is missing {}", SECRET_DB_PASSWORD),
            })?;

        info!(host = %config.host, database = %config.database, "Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.connection_url(user, password))
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect: {}", e),
            })?;

        info!("Database connection established");

        Ok(Self { pool })
    }

    /// Execute a SELECT through the JSON aggregation envelope and decode the
    /// single result row into a record sequence
    ///
    /// Any one-to-many joins in `sql` collapse into one denormalized JSON
    /// array row, so no client-side row stitching is needed. An empty result
    /// set decodes to an empty vec, not an error.
    pub async fn query_rows<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<T>> {
        let wrapped = wrap_json_envelope(sql);

        let mut query = sqlx::query_scalar::<_, Option<serde_json::Value>>(&wrapped);
        for param in params {
            query = match param {
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::IntArray(v) => query.bind(v.clone()),
                SqlValue::Float(v) => query.bind(*v),
                SqlValue::Text(v) => query.bind(v.clone()),
            };
        }

        let row: Option<serde_json::Value> = query.fetch_one(&self.pool).await?;

        match row {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    /// Check connectivity; returns the server version string
    pub async fn ping(&self) -> Result<String> {
        #[derive(serde::Deserialize)]
        struct VersionRow {
            version: String,
        }

        let rows: Vec<VersionRow> = self.query_rows("SELECT version()", &[]).await?;
        rows.into_iter()
            .next()
            .map(|r| r.version)
            .ok_or_else(|| AppError::DatabaseConnection {
                message: "version query returned no rows".to_string(),
            })
    }
}

/// Wrap a SELECT so it returns exactly one row holding a JSON array of the
/// original rows
fn wrap_json_envelope(sql: &str) -> String {
    format!(
        "WITH orig_sql AS ({}) SELECT jsonb_agg(row_to_json(orig_sql.*)) FROM orig_sql",
        sql.trim().trim_end_matches(';')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_wraps_select() {
        let wrapped = wrap_json_envelope("SELECT 1 AS one");
        assert_eq!(
            wrapped,
            "WITH orig_sql AS (SELECT 1 AS one) SELECT jsonb_agg(row_to_json(orig_sql.*)) FROM orig_sql"
        );
    }

    #[test]
    fn test_envelope_strips_trailing_semicolon() {
        let wrapped = wrap_json_envelope("SELECT version();\n");
        assert!(wrapped.starts_with("WITH orig_sql AS (SELECT version())"));
    }

    #[test]
    fn test_sql_value_conversions() {
        assert_eq!(SqlValue::from(7i64), SqlValue::Int(7));
        assert_eq!(SqlValue::from("x"), SqlValue::Text("x".to_string()));
        assert_eq!(SqlValue::from(vec![1i64, 2]), SqlValue::IntArray(vec![1, 2]));
    }
}
