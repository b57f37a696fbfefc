//! PlantUML rendering.

use std::fmt::Write;

use super::render_with;
use crate::Result;
use crate::models::{ForeignKey, Table};

/// Shared style definitions, written once as `erd.iuml` in directory mode.
pub const ERD_STYLE: &str = "!define ERD_INCL
!define table(x) class x << (T,#FFAAAA) >>
!define pk(x) <u>x</u>
hide methods
hide stereotypes
";

/// Shared legend, written once as `legend.iuml` in directory mode.
pub const LEGEND: &str = "!define LEGEND_INCL
legend right
    <b>NN</b> - NOT NULL
    <b>UN</b> - UNIQUE
    <b>field=value</b> - DEFAULT value
    <b><u>field</u></b> - Primary Key
endlegend
";

/// Renders a table as an `entity` block: key columns, a `--` separator, then
/// the remaining columns.
///
/// ```rust
/// use pgplanter_core::models::{Column, Table};
/// use pgplanter_core::render::render_entry;
///
/// let mut table = Table::new("public", "tags");
/// table.columns.push(Column {
///     ordinal_position: 1,
///     name: "id".to_string(),
///     comment: None,
///     data_type: "INTEGER".to_string(),
///     not_null: true,
///     is_primary_key: true,
///     is_unique: false,
///     default_value: None,
/// });
///
/// let entry = render_entry(&table).unwrap();
/// assert_eq!(entry, "\nentity \"tags\" {\n  + id [PK]\n  --\n}\n");
/// ```
pub fn render_entry(table: &Table) -> Result<String> {
    render_with(
        || format!("entity {}", table.name),
        |out| {
            write!(out, "\nentity \"{}\" {{", table.name)?;
            if let Some(comment) = &table.comment {
                write!(out, "\n  {}\n  ..", comment)?;
            }
            for column in table.primary_key_columns() {
                write!(out, "\n  + {} [PK]", column.name)?;
                if let Some(comment) = &column.comment {
                    write!(out, " : {}", comment)?;
                }
            }
            out.push_str("\n  --");
            for column in table.non_key_columns() {
                write!(out, "\n  {}", column.name)?;
                if let Some(comment) = &column.comment {
                    write!(out, " : {}", comment)?;
                }
            }
            out.push_str("\n}\n");
            Ok(())
        },
    )
}

/// Renders the entity blocks of all tables, in order.
pub fn render_entries(tables: &[Table]) -> Result<String> {
    tables
        .iter()
        .map(render_entry)
        .collect::<Result<Vec<_>>>()
        .map(|entries| entries.concat())
}

/// Renders a table as a standalone diagram with types, defaults and markers.
///
/// Primary-key columns come first, then the rest, each in ordinal order.
///
/// The fragment includes `../erd.iuml` unless the including document already
/// did, so it renders both on its own and inside a schema package.
pub fn render_detail_table(table: &Table) -> Result<String> {
    render_with(
        || format!("table {}", table.qualified_name()),
        |out| {
            out.push_str("@startuml\n!ifndef ERD_INCL\n!include ../erd.iuml\n!endif\n");
            write!(out, "table({}) {{", table.name)?;
            for column in table.primary_key_columns() {
                write!(out, "\n  pk({}): {}", column.name, column.data_type)?;
                if column.not_null {
                    out.push_str(" NN");
                }
            }
            for column in table.non_key_columns() {
                write!(out, "\n  {}", column.name)?;
                if let Some(default) = &column.default_value {
                    write!(out, " = {}", default)?;
                }
                write!(out, ": {}", column.data_type)?;
                if column.not_null {
                    out.push_str(" NN");
                }
                if column.is_unique {
                    out.push_str(" UN");
                }
            }
            out.push_str("\n}\n@enduml");
            Ok(())
        },
    )
}

/// Renders one "many source rows reference one target row" line.
pub fn render_relation(fk: &ForeignKey) -> Result<String> {
    render_with(
        || format!("constraint {}", fk.constraint_name),
        |out| {
            write!(
                out,
                "\n{} \"0..N\" -- \"1\" {}\n",
                fk.source_table, fk.target_table
            )
        },
    )
}

/// Renders the relation lines of every foreign key of every table.
pub fn render_relations(tables: &[Table]) -> Result<String> {
    let mut out = String::new();
    for fk in tables.iter().flat_map(|t| &t.foreign_keys) {
        out.push_str(&render_relation(fk)?);
    }
    Ok(out)
}
