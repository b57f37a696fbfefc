//! Text rendering of catalog models.
//!
//! One function per output shape. Each takes a model by reference and returns
//! the finished text; nothing is escaped, so names and comments reach the
//! output exactly as the catalog reported them.
//!
//! # Module Structure
//! - `plantuml`: entity blocks, detail tables, relation lines, include fragments
//! - `rst`: reStructuredText documentation sections

pub mod plantuml;
pub mod rst;

pub use plantuml::{
    ERD_STYLE, LEGEND, render_detail_table, render_entries, render_entry, render_relation,
    render_relations,
};
pub use rst::{MISSING_COMMENT, render_doc_section};

use crate::{Result, error::PlanterError};

/// Runs a formatting closure into a fresh buffer, naming `entity` on failure.
pub(crate) fn render_with<F>(entity: impl FnOnce() -> String, body: F) -> Result<String>
where
    F: FnOnce(&mut String) -> std::fmt::Result,
{
    let mut out = String::new();
    body(&mut out).map_err(|e| PlanterError::render_failed(entity(), e))?;
    Ok(out)
}
