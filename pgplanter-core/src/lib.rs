//! Core library for pgplanter.
//!
//! Reads tables, columns and foreign keys from a PostgreSQL catalog and
//! renders them as PlantUML entity-relationship diagrams and
//! reStructuredText table documentation.
//!
//! # Security Guarantees
//! - All database operations are read-only
//! - Connection strings are redacted before they reach logs or errors
//! - Catalog queries take schema and table names as bind parameters only
//!
//! # Architecture
//! A run flows through four stages, leaf-first:
//! - [`reader`]: builds [`Table`] models through a [`CatalogSource`]
//! - [`filter`]: narrows tables and prunes dangling foreign keys
//! - [`render`]: pure formatting of entities, details, relations and docs
//! - [`output`]: single diagram or a directory tree of diagrams
//!
//! [`pipeline::run`] drives them in order for one [`RunConfig`].

pub mod adapters;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod reader;
pub mod render;

// Re-export commonly used types
pub use adapters::{CatalogSource, ConnectionConfig, TableEntry, create_catalog};
pub use config::{OutputTarget, RunConfig, SkipFlags, TableFilter};
pub use error::{PlanterError, Result};
pub use logging::init_logging;
pub use models::{Column, ForeignKey, Table};
pub use output::TreeWriter;
pub use pipeline::{RunSummary, run};
pub use reader::{PartialLoad, SchemaReader};
