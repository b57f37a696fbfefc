//! PostgreSQL catalog adapter.
//!
//! # Module Structure
//! - `connection`: connection string parsing and pool setup
//! - `queries`: the three catalog queries
//! - `schema_collection`: running the queries and decoding rows
//! - `type_mapping`: type and default-expression normalization
//!
//! # Security Guarantees
//! - All operations are read-only (SELECT only, read-only sessions)
//! - Connection strings are sanitized in error messages
//! - Statement timeouts bound every query

mod connection;
mod queries;
mod schema_collection;
mod type_mapping;


use super::{CatalogSource, ConnectionConfig, TableEntry};
use crate::{
    Result,
    error::PlanterError,
    models::{Column, ForeignKey},
};
use async_trait::async_trait;
use sqlx::PgPool;

pub use type_mapping::{normalize_data_type, normalize_default_value};

/// PostgreSQL implementation of [`CatalogSource`] over `pg_catalog`.
pub struct PostgresCatalog {
    pub pool: PgPool,
    pub config: ConnectionConfig,
}

impl std::fmt::Debug for PostgresCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresCatalog")
            .field("config", &self.config)
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

#[async_trait]
impl CatalogSource for PostgresCatalog {
    async fn test_connection(&self) -> Result<()> {
        let probe: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PlanterError::connection_failed(self.config.to_string(), e))?;

        if probe != 1 {
            return Err(PlanterError::configuration(
                "Basic connectivity test failed: unexpected result",
            ));
        }

        tracing::debug!("Connected to {}", self.config);
        Ok(())
    }

    async fn tables(&self, schema: &str) -> Result<Vec<TableEntry>> {
        schema_collection::collect_tables(&self.pool, schema).await
    }

    async fn columns(&self, schema: &str, table: &str) -> Result<Vec<Column>> {
        schema_collection::collect_columns(&self.pool, schema, table).await
    }

    async fn foreign_keys(&self, schema: &str, table: &str) -> Result<Vec<ForeignKey>> {
        schema_collection::collect_foreign_keys(&self.pool, schema, table).await
    }
}
