//! Catalog access.
//!
//! [`CatalogSource`] is the seam between the database and the rest of the
//! pipeline: it answers the three catalog questions a run asks (tables of a
//! schema, columns of a table, foreign keys of a table). The schema reader
//! builds models from it without knowing which connection is behind it.
//!
//! # Module Structure
//! - `config`: `ConnectionConfig`
//! - `helpers`: row decoding with error context
//! - `postgres`: the PostgreSQL catalog implementation

use crate::{
    Result,
    models::{Column, ForeignKey},
};
use async_trait::async_trait;

pub mod config;
pub mod helpers;
pub mod postgres;

pub use config::ConnectionConfig;

/// A table as listed by the catalog, before its columns are loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub name: String,
    pub comment: Option<String>,
}

/// Read-only access to a database catalog.
///
/// All operations are single parameterized queries. Implementations return
/// columns in ordinal order and foreign keys ordered by constraint name, and
/// normalize dialect-specific type and default strings.
///
/// # Object Safety
/// This trait is object-safe, allowing for dynamic dispatch through
/// `Box<dyn CatalogSource>`.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Verifies that the database answers queries.
    ///
    /// # Errors
    /// Returns a connection error if the database cannot be reached.
    async fn test_connection(&self) -> Result<()>;

    /// Regular tables of `schema`, ordered by name.
    async fn tables(&self, schema: &str) -> Result<Vec<TableEntry>>;

    /// Columns of `schema.table` in ordinal order.
    async fn columns(&self, schema: &str, table: &str) -> Result<Vec<Column>>;

    /// Foreign keys declared on `schema.table`, deduplicated and ordered by
    /// constraint name.
    async fn foreign_keys(&self, schema: &str, table: &str) -> Result<Vec<ForeignKey>>;
}

/// Creates the catalog source for a connection string.
///
/// The pool connects lazily, so this succeeds for any well-formed URL; use
/// [`CatalogSource::test_connection`] to surface connection failures.
///
/// # Errors
/// Returns a configuration error if the URL is malformed or not a
/// `postgres://`/`postgresql://` URL.
pub async fn create_catalog(connection_string: &str) -> Result<Box<dyn CatalogSource>> {
    let catalog = postgres::PostgresCatalog::new(connection_string).await?;
    Ok(Box::new(catalog))
}

/// Safely redacts credentials from database connection URLs.
///
/// Delegates to [`crate::error::redact_database_url`].
#[inline]
pub fn redact_database_url(url: &str) -> String {
    crate::error::redact_database_url(url)
}
