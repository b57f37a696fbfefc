//! reStructuredText documentation sections.

use std::fmt::Write;

use super::render_with;
use crate::Result;
use crate::models::Table;

/// Placeholder written wherever a table or column has no comment.
pub const MISSING_COMMENT: &str = "TODO_ADD_COMMENT";

/// Renders a table's documentation section: anchor, heading, comment and a
/// csv-table with one row per column.
pub fn render_doc_section(table: &Table) -> Result<String> {
    render_with(
        || format!("documentation for {}", table.qualified_name()),
        |out| {
            write!(
                out,
                "\n.. _tab-sql-{}_{}:\n\n{}\n^^^^^^^\n\n{}\n\n",
                table.schema,
                table.name,
                table.name,
                table.comment.as_deref().unwrap_or(MISSING_COMMENT)
            )?;
            out.push_str(".. tabularcolumns:: |p{3cm}|p{3cm}|p{8cm}|\n\n");
            write!(
                out,
                ".. csv-table:: {}\n   :header: column,type,description\n",
                table.name
            )?;
            for column in &table.columns {
                write!(
                    out,
                    "\n   \"{}\", \"{}\", \"{}\"",
                    column.name,
                    column.data_type,
                    column.comment.as_deref().unwrap_or(MISSING_COMMENT)
                )?;
            }
            out.push('\n');
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    fn column(ordinal: u32, name: &str, data_type: &str, comment: Option<&str>) -> Column {
        Column {
            ordinal_position: ordinal,
            name: name.to_string(),
            comment: comment.map(str::to_string),
            data_type: data_type.to_string(),
            not_null: false,
            is_primary_key: ordinal == 1,
            is_unique: false,
            default_value: None,
        }
    }

    #[test]
    fn test_doc_section_layout() {
        let mut table = Table::new("public", "users");
        table.comment = Some("registered accounts".to_string());
        table.columns = vec![
            column(1, "id", "INTEGER", None),
            column(2, "email", "TEXT", Some("login address")),
        ];

        let section = render_doc_section(&table).unwrap();
        assert_eq!(
            section,
            "
.. _tab-sql-public_users:

users
^^^^^^^

registered accounts

.. tabularcolumns:: |p{3cm}|p{3cm}|p{8cm}|

.. csv-table:: users
   :header: column,type,description

   \"id\", \"INTEGER\", \"TODO_ADD_COMMENT\"
   \"email\", \"TEXT\", \"login address\"
"
        );
    }

    #[test]
    fn test_missing_table_comment_placeholder() {
        let table = Table::new("audit", "events");
        let section = render_doc_section(&table).unwrap();

        assert!(section.starts_with("\n.. _tab-sql-audit_events:\n"));
        assert!(section.contains("\n\nTODO_ADD_COMMENT\n\n"));
        assert!(section.ends_with(":header: column,type,description\n\n"));
    }
}
