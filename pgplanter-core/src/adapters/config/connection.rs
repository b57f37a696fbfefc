//! Session settings for the catalog connection.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the catalog pool connects and what each session is set up with.
///
/// Only `host` and `database` identify the target, for log and error
/// messages; the pool itself connects with the URL it was given. Credentials
/// are never copied in here.
///
/// # Example
/// ```rust
/// use pgplanter_core::adapters::ConnectionConfig;
/// use std::time::Duration;
///
/// let config = ConnectionConfig::new("db.internal").with_database("shop");
/// assert_eq!(config.to_string(), "db.internal/shop");
/// assert_eq!(config.query_timeout, Duration::from_secs(30));
/// assert!(config.session_statements().contains(&"SET default_transaction_read_only = on".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub database: Option<String>,
    /// How long to wait for a pooled connection
    pub connect_timeout: Duration,
    /// `statement_timeout` set on every session
    pub query_timeout: Duration,
    pub max_connections: u32,
    /// Sessions default to read-only transactions
    pub read_only: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            database: None,
            connect_timeout: Duration::from_secs(30),
            query_timeout: Duration::from_secs(30),
            // Queries run one after another; a second connection would sit idle.
            max_connections: 1,
            read_only: true,
        }
    }
}

/// `host/database`, or just `host` when the URL names no database.
impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.database {
            Some(database) => write!(f, "{}/{}", self.host, database),
            None => f.write_str(&self.host),
        }
    }
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Statements run on every new pooled connection, in order.
    pub fn session_statements(&self) -> Vec<String> {
        let mut statements = vec![
            format!("SET statement_timeout = {}", self.query_timeout.as_millis()),
            format!(
                "SET application_name = 'pgplanter-{}'",
                env!("CARGO_PKG_VERSION")
            ),
        ];
        if self.read_only {
            statements.push("SET default_transaction_read_only = on".to_string());
        }
        statements
    }

    /// Rejects settings the pool cannot work with.
    ///
    /// # Errors
    /// Returns a configuration error for an empty host, a pool of zero
    /// connections or a zero timeout.
    pub fn validate(&self) -> crate::Result<()> {
        let problem = if self.host.is_empty() {
            Some("host cannot be empty")
        } else if self.max_connections == 0 {
            Some("max_connections must be greater than 0")
        } else if self.connect_timeout.is_zero() {
            Some("connect_timeout must be greater than 0")
        } else if self.query_timeout.is_zero() {
            Some("query_timeout must be greater than 0")
        } else {
            None
        };

        match problem {
            Some(message) => Err(crate::error::PlanterError::configuration(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_read_only_connection_by_default() {
        let config = ConnectionConfig::default();
        assert_eq!(config.max_connections, 1);
        assert!(config.read_only);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unusable_settings_rejected() {
        let broken = [
            ConnectionConfig::new(""),
            ConnectionConfig {
                max_connections: 0,
                ..Default::default()
            },
            ConnectionConfig {
                connect_timeout: Duration::ZERO,
                ..Default::default()
            },
            ConnectionConfig {
                query_timeout: Duration::ZERO,
                ..Default::default()
            },
        ];
        for config in broken {
            assert!(config.validate().is_err(), "accepted {:?}", config);
        }
    }

    #[test]
    fn test_session_statements() {
        let config = ConnectionConfig {
            query_timeout: Duration::from_millis(1500),
            ..Default::default()
        };
        let statements = config.session_statements();
        assert_eq!(statements[0], "SET statement_timeout = 1500");
        assert!(statements[1].starts_with("SET application_name = 'pgplanter-"));
        assert_eq!(statements[2], "SET default_transaction_read_only = on");

        let writable = ConnectionConfig {
            read_only: false,
            ..Default::default()
        };
        assert_eq!(writable.session_statements().len(), 2);
    }

    #[test]
    fn test_display_names_target() {
        assert_eq!(ConnectionConfig::new("db.internal").to_string(), "db.internal");
        assert_eq!(
            ConnectionConfig::new("db.internal")
                .with_database("shop")
                .to_string(),
            "db.internal/shop"
        );
    }
}
