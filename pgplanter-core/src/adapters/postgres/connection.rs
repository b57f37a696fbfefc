//! PostgreSQL connection setup and validation.
//!
//! # Security Features
//! - Validates connection string format and parameters
//! - Opens read-only sessions with a statement timeout
//! - Never includes the password in error messages

use super::{ConnectionConfig, PostgresCatalog};
use crate::{Result, error::PlanterError};
use sqlx::PgPool;
use std::time::Duration;
use url::Url;

/// Longest accepted `connect_timeout` / `statement_timeout` query parameter.
const MAX_TIMEOUT: Duration = Duration::from_secs(300);

impl PostgresCatalog {
    /// Creates a catalog over a lazily connected pool.
    ///
    /// # Errors
    /// Returns error if the connection string is malformed or uses another
    /// scheme than `postgres://`/`postgresql://`.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let config = Self::parse_connection_config(connection_string)?;
        let pool = Self::create_connection_pool(connection_string, &config)?;
        Ok(Self { pool, config })
    }

    /// Closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Parses connection string to extract configuration parameters.
    ///
    /// Recognized query parameters: `connect_timeout` (seconds) and
    /// `statement_timeout` (milliseconds), each capped at five minutes;
    /// out-of-range values are ignored.
    ///
    /// # Errors
    /// Returns error if connection string is malformed
    pub fn parse_connection_config(connection_string: &str) -> Result<ConnectionConfig> {
        Self::validate_connection_string(connection_string)?;

        let url = Url::parse(connection_string).map_err(|e| {
            PlanterError::configuration(format!(
                "Invalid PostgreSQL connection string format: {}",
                e
            ))
        })?;

        let mut config = ConnectionConfig::new(url.host_str().unwrap_or("localhost"));

        let database = url.path().trim_start_matches('/');
        if !database.is_empty() {
            config = config.with_database(database);
        }

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "connect_timeout" => {
                    if let Ok(secs) = value.parse::<u64>()
                        && secs > 0
                        && Duration::from_secs(secs) <= MAX_TIMEOUT
                    {
                        config.connect_timeout = Duration::from_secs(secs);
                    }
                }
                "statement_timeout" => {
                    if let Ok(millis) = value.parse::<u64>()
                        && millis > 0
                        && Duration::from_millis(millis) <= MAX_TIMEOUT
                    {
                        config.query_timeout = Duration::from_millis(millis);
                    }
                }
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Creates the pool; the first connection is opened on first use.
    ///
    /// Every new connection runs [`ConnectionConfig::session_statements`].
    pub(crate) fn create_connection_pool(
        connection_string: &str,
        config: &ConnectionConfig,
    ) -> Result<PgPool> {
        use sqlx::Executor;

        let statements = config.session_statements();

        sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .after_connect(move |conn, _meta| {
                let statements = statements.clone();
                Box::pin(async move {
                    for statement in &statements {
                        conn.execute(statement.as_str()).await?;
                    }
                    Ok(())
                })
            })
            .connect_lazy(connection_string)
            .map_err(|e| {
                PlanterError::connection_failed(
                    format!(
                        "Failed to create PostgreSQL connection pool to {}",
                        crate::adapters::redact_database_url(connection_string)
                    ),
                    e,
                )
            })
    }

    /// Validates connection string format.
    ///
    /// # Errors
    /// Returns error if the string is not a URL, uses another scheme, or has no
    /// host.
    pub fn validate_connection_string(connection_string: &str) -> Result<()> {
        let url = Url::parse(connection_string).map_err(|e| {
            PlanterError::configuration(format!(
                "Invalid PostgreSQL connection string format: {}",
                e
            ))
        })?;

        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(PlanterError::configuration(
                "Connection string must use postgres:// or postgresql:// scheme",
            ));
        }

        if url.host_str().is_none() {
            return Err(PlanterError::configuration(
                "Connection string must specify a host",
            ));
        }

        Ok(())
    }
}
