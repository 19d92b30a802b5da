//! PostgreSQL client implementation
//!
//! This module provides a pooled client for reading export data from
//! PostgreSQL.

use crate::config::schema::DatabaseConnectionConfig;
use crate::config::redact_connection_string;
use crate::domain::{RekapError, Result};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

/// Pooled PostgreSQL client for Rekap
pub struct PostgresClient {
    /// Connection pool
    pool: Pool,

    /// Statement timeout applied to every query
    statement_timeout_seconds: u64,

    /// Connection string with credentials removed
    safe_url: String,
}

impl PostgresClient {
    /// Create a new PostgreSQL client
    ///
    /// Connections are opened lazily; use [`Self::test_connection`] to
    /// check reachability.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the TLS
    /// connector or pool cannot be built.
    pub fn new(config: &DatabaseConnectionConfig) -> Result<Self> {
        let url = config.connection_string.expose_secret();

        let mut pg_config: tokio_postgres::Config = url.parse().map_err(|e| {
            RekapError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
        })?;
        pg_config.ssl_mode(parse_ssl_mode(&config.ssl_mode)?);

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = if config.ssl_mode == "disable" {
            Manager::from_config(pg_config, NoTls, manager_config)
        } else {
            let connector = native_tls::TlsConnector::builder().build().map_err(|e| {
                RekapError::Configuration(format!("Failed to build TLS connector: {}", e))
            })?;
            Manager::from_config(pg_config, MakeTlsConnector::new(connector), manager_config)
        };

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                RekapError::Database(format!("Failed to create connection pool: {}", e))
            })?;

        Ok(Self {
            pool,
            statement_timeout_seconds: config.statement_timeout_seconds,
            safe_url: redact_connection_string(url.as_ref()),
        })
    }

    /// Test the connection to PostgreSQL
    ///
    /// Attempts to get a connection from the pool and execute a simple query.
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| RekapError::Database(format!("Connection test failed: {}", e)))?;

        tracing::info!(database = %self.safe_url, "PostgreSQL connection test successful");
        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            RekapError::Database(format!("Failed to get connection from pool: {}", e))
        })
    }

    /// Execute a query and return rows
    ///
    /// # Errors
    ///
    /// Returns [`RekapError::Database`] when no connection is available and
    /// [`RekapError::SourceFetch`] when the query itself fails.
    pub async fn query(&self, query: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.statement_timeout_seconds * 1000
        );
        client
            .execute(timeout_query.as_str(), &[])
            .await
            .map_err(|e| RekapError::Database(format!("Failed to set statement timeout: {}", e)))?;

        client
            .query(query, params)
            .await
            .map_err(|e| RekapError::SourceFetch(format!("Query failed: {}", e)))
    }

    /// Connection string without credentials
    pub fn connection_string_safe(&self) -> &str {
        &self.safe_url
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

fn parse_ssl_mode(mode: &str) -> Result<SslMode> {
    match mode {
        "disable" => Ok(SslMode::Disable),
        "prefer" => Ok(SslMode::Prefer),
        "require" => Ok(SslMode::Require),
        other => Err(RekapError::Configuration(format!(
            "Unsupported ssl_mode '{}'",
            other
        ))),
    }
}
