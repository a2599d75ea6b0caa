//! PostgreSQL client implementation
//!
//! Pooled connections to the CMS database, with the TLS mode taken from
//! configuration.

use crate::config::redact_connection_string;
use crate::config::schema::PostgreSQLConfig;
use crate::domain::{Result, TermportError};
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

/// PostgreSQL client for termport
pub struct PostgreSQLClient {
    pool: Pool,
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// No connection is opened until the first query.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed, the TLS
    /// connector cannot be built, or the pool cannot be created.
    pub async fn new(config: PostgreSQLConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_str()
            .parse::<tokio_postgres::Config>()
            .map_err(|e| {
                TermportError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
            })?;

        pg_config.ssl_mode(ssl_mode(&config.ssl_mode));
        pg_config.connect_timeout(Duration::from_secs(config.connection_timeout_seconds));

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = if config.ssl_mode == "disable" {
            Manager::from_config(pg_config, NoTls, manager_config)
        } else {
            Manager::from_config(pg_config, tls_connector(&config.ssl_mode)?, manager_config)
        };

        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .create_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .recycle_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                TermportError::Database(format!("Failed to create connection pool: {}", e))
            })?;

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| TermportError::Database(format!("Connection test failed: {}", e)))?;

        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Get a connection from the pool with the statement timeout applied
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<Object> {
        let client = self.pool.get().await.map_err(|e| {
            TermportError::Database(format!("Failed to get connection from pool: {}", e))
        })?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client.batch_execute(&timeout_query).await.map_err(|e| {
            TermportError::Database(format!("Failed to set statement timeout: {}", e))
        })?;

        Ok(client)
    }

    /// Execute a query and return rows
    pub async fn query(&self, query: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;

        client
            .query(query, params)
            .await
            .map_err(|e| TermportError::Database(format!("Query failed: {}", e)))
    }

    /// Get the connection string with credentials redacted
    pub fn connection_string_safe(&self) -> String {
        redact_connection_string(self.config.connection_string.expose_secret())
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

fn ssl_mode(mode: &str) -> SslMode {
    match mode {
        "disable" => SslMode::Disable,
        "require" | "verify-ca" | "verify-full" => SslMode::Require,
        _ => SslMode::Prefer,
    }
}

fn tls_connector(mode: &str) -> Result<MakeTlsConnector> {
    let mut builder = TlsConnector::builder();
    match mode {
        "verify-full" => {}
        "verify-ca" => {
            builder.danger_accept_invalid_hostnames(true);
        }
        // allow, prefer and require encrypt without verifying the server
        _ => {
            builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
    }

    let connector = builder
        .build()
        .map_err(|e| TermportError::Configuration(format!("Failed to build TLS connector: {e}")))?;

    Ok(MakeTlsConnector::new(connector))
}
