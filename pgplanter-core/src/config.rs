//! Run configuration.
//!
//! The binary builds one [`RunConfig`] from its arguments and every stage
//! reads it by reference; nothing in a run changes it afterwards.
//!
//! # Example
//! ```rust
//! use pgplanter_core::config::{OutputTarget, RunConfig, SkipFlags, TableFilter};
//!
//! let config = RunConfig::new(vec!["public".to_string()])
//!     .with_filter(TableFilter::new().with_exclude_suffix("_history"))
//!     .with_skip(SkipFlags::parse("f"))
//!     .with_output(OutputTarget::Stdout);
//!
//! assert!(config.validate().is_ok());
//! assert!(config.skip.skip_foreign_keys());
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Marker in the skip directive that disables foreign-key loading.
pub const SKIP_FOREIGN_KEYS: char = 'f';

/// Schema loaded when none is given.
pub const DEFAULT_SCHEMA: &str = "public";

/// Optional loading steps disabled by the terse skip directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipFlags {
    foreign_keys: bool,
}

impl SkipFlags {
    /// Parses the skip directive. Unrecognized characters are ignored.
    pub fn parse(flags: &str) -> Self {
        Self {
            foreign_keys: flags.contains(SKIP_FOREIGN_KEYS),
        }
    }

    pub fn skip_foreign_keys(&self) -> bool {
        self.foreign_keys
    }
}

/// Name-based narrowing applied to every loaded schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    /// Keep only these tables (ignored when empty)
    pub include: Vec<String>,
    /// Drop these tables (ignored when empty)
    pub exclude: Vec<String>,
    /// Drop tables whose name ends with this (ignored when empty)
    pub exclude_suffix: Option<String>,
}

impl TableFilter {
    /// Creates a filter that keeps everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the include list.
    pub fn with_include(mut self, names: Vec<String>) -> Self {
        self.include = names;
        self
    }

    /// Builder method to set the exclude list.
    pub fn with_exclude(mut self, names: Vec<String>) -> Self {
        self.exclude = names;
        self
    }

    /// Builder method to set the excluded suffix.
    pub fn with_exclude_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exclude_suffix = Some(suffix.into());
        self
    }

    /// True when no stage would drop anything.
    pub fn is_pass_through(&self) -> bool {
        self.include.is_empty()
            && self.exclude.is_empty()
            && self.exclude_suffix.as_deref().is_none_or(str::is_empty)
    }
}

/// Where rendered output goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputTarget {
    /// Single combined diagram on standard output
    #[default]
    Stdout,
    /// Single combined diagram written to a file
    File(PathBuf),
    /// One file per schema and table under `root`
    Directory {
        root: PathBuf,
        /// Package label and part of the top-level file name
        database_label: String,
    },
}

impl OutputTarget {
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }
}

/// Everything a run needs besides the database connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Schemas in output order
    pub schemas: Vec<String>,
    pub filter: TableFilter,
    pub skip: SkipFlags,
    pub output: OutputTarget,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(vec![DEFAULT_SCHEMA.to_string()])
    }
}

impl RunConfig {
    /// Creates a config for `schemas` writing a single diagram to stdout.
    pub fn new(schemas: Vec<String>) -> Self {
        Self {
            schemas,
            filter: TableFilter::default(),
            skip: SkipFlags::default(),
            output: OutputTarget::default(),
        }
    }

    /// Builder method to set the table filter.
    pub fn with_filter(mut self, filter: TableFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Builder method to set the skip flags.
    pub fn with_skip(mut self, skip: SkipFlags) -> Self {
        self.skip = skip;
        self
    }

    /// Builder method to set the output target.
    pub fn with_output(mut self, output: OutputTarget) -> Self {
        self.output = output;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if no schema is given, a schema name is empty, or a
    /// directory target has an empty database label.
    pub fn validate(&self) -> crate::Result<()> {
        if self.schemas.is_empty() {
            return Err(crate::error::PlanterError::configuration(
                "at least one schema is required",
            ));
        }

        if self.schemas.iter().any(String::is_empty) {
            return Err(crate::error::PlanterError::configuration(
                "schema names cannot be empty",
            ));
        }

        if let OutputTarget::Directory { database_label, .. } = &self.output
            && database_label.is_empty()
        {
            return Err(crate::error::PlanterError::configuration(
                "database label cannot be empty in directory mode",
            ));
        }

        Ok(())
    }
}
