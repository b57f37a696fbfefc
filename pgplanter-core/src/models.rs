//! Core data models for catalog metadata.
//!
//! A run builds these once from the catalog, narrows them with the filter and
//! then only reads them while rendering.

use serde::{Deserialize, Serialize};

/// Database column information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// 1-based position in the table; defines display order
    pub ordinal_position: u32,
    pub name: String,
    pub comment: Option<String>,
    /// Upper-cased catalog type, e.g. `INTEGER` or `TIMESTAMPTZ`
    pub data_type: String,
    pub not_null: bool,
    pub is_primary_key: bool,
    pub is_unique: bool,
    /// Default expression with parentheses and timestamptz casts removed
    pub default_value: Option<String>,
}

/// Foreign key constraint owned by a table.
///
/// The owning table is the table whose `foreign_keys` holds this value;
/// `source_table` repeats its name so a relation can be rendered on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub constraint_name: String,
    pub source_table: String,
    pub target_table: String,
    /// Schema the constraint was declared in
    pub constraint_schema: String,
    /// Schema the catalog reports for the referenced side
    pub target_schema: String,
}

impl ForeignKey {
    /// True when the constraint's schema differs from the referenced side's.
    pub fn is_cross_schema(&self) -> bool {
        self.constraint_schema != self.target_schema
    }
}

/// Database table information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub comment: Option<String>,
    /// Catalog order, never re-sorted
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Creates an empty table in `schema`.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            comment: None,
            columns: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// True iff at least two columns belong to the primary key.
    pub fn has_composite_primary_key(&self) -> bool {
        self.columns.iter().filter(|c| c.is_primary_key).nth(1).is_some()
    }

    /// Primary-key columns in ordinal order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }

    /// Columns outside the primary key in ordinal order.
    pub fn non_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.is_primary_key)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// `schema.name`, used in progress messages and error context.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// Finds a table by exact name.
pub fn find_table<'a>(tables: &'a [Table], name: &str) -> Option<&'a Table> {
    tables.iter().find(|t| t.name == name)
}

/// Truncates a catalog comment at its first tab character.
///
/// Comments imported from spreadsheets carry trailing tab-separated cells; only
/// the text before the first tab is kept.
pub fn strip_comment_suffix(comment: &str) -> &str {
    comment.split_once('\t').map_or(comment, |(head, _)| head)
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
