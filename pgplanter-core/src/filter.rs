//! Table and relation filtering.
//!
//! Each stage drops tables by name and, in the tables it keeps, drops the
//! foreign keys pointing at a name the same rule would drop. Tables are never
//! removed for having no relations left.

use crate::config::TableFilter;
use crate::models::Table;

/// Keeps tables whose membership in `names` equals `keep_members`.
///
/// With `keep_members = true` this is the include filter, with `false` the
/// exclude filter. Foreign keys of kept tables follow the same rule on their
/// target name. Matching is exact and case-sensitive.
pub fn filter_tables(keep_members: bool, tables: Vec<Table>, names: &[String]) -> Vec<Table> {
    let is_member = |name: &str| names.iter().any(|n| n == name);
    retain_by(tables, |name| is_member(name) == keep_members)
}

/// Drops tables, and foreign keys targeting tables, whose name ends with `suffix`.
pub fn filter_table_suffix(tables: Vec<Table>, suffix: &str) -> Vec<Table> {
    retain_by(tables, |name| !name.ends_with(suffix))
}

fn retain_by(tables: Vec<Table>, keep: impl Fn(&str) -> bool) -> Vec<Table> {
    tables
        .into_iter()
        .filter(|table| keep(&table.name))
        .map(|mut table| {
            table.foreign_keys.retain(|fk| keep(&fk.target_table));
            table
        })
        .collect()
}

impl TableFilter {
    /// Runs include, exclude and suffix stages in that order.
    ///
    /// Empty lists and an empty suffix skip their stage.
    pub fn apply(&self, tables: Vec<Table>) -> Vec<Table> {
        let mut tables = tables;
        if !self.include.is_empty() {
            tables = filter_tables(true, tables, &self.include);
        }
        if !self.exclude.is_empty() {
            tables = filter_tables(false, tables, &self.exclude);
        }
        if let Some(suffix) = self.exclude_suffix.as_deref()
            && !suffix.is_empty()
        {
            tables = filter_table_suffix(tables, suffix);
        }

        for table in &tables {
            tracing::debug!(
                "Keeping table '{}' with {} foreign keys",
                table.qualified_name(),
                table.foreign_keys.len()
            );
            for fk in &table.foreign_keys {
                tracing::trace!("    {}", fk.constraint_name);
            }
        }

        tables
    }
}
