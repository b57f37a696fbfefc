//! Output assembly.
//!
//! Single-file mode writes one diagram with every table's entity block and
//! every relation. Directory mode writes this layout:
//!
//! ```text
//! <root>/
//!   erd.iuml                    style definitions
//!   legend.iuml                 legend
//!   sql-db-<label>-er.puml      includes every schema, cross-schema relations
//!   description.rst             one section per schema, one per table
//!   <schema>/
//!     _schema.puml              includes every table, same-schema relations
//!     <table>.puml              detail diagram
//! ```

use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::models::Table;
use crate::render::{
    ERD_STYLE, LEGEND, render_detail_table, render_doc_section, render_entries, render_relation,
    render_relations,
};
use crate::{Result, error::PlanterError};

/// File name of the shared style fragment.
pub const ERD_FILE: &str = "erd.iuml";
/// File name of the shared legend fragment.
pub const LEGEND_FILE: &str = "legend.iuml";
/// File name of each schema's aggregate diagram.
pub const SCHEMA_FILE: &str = "_schema.puml";
/// File name of the combined documentation.
pub const DOCUMENTATION_FILE: &str = "description.rst";

/// Top-level diagram file name for a database label.
pub fn top_level_file_name(database_label: &str) -> String {
    format!("sql-db-{}-er.puml", database_label)
}

/// Renders the single combined diagram.
pub fn render_single_diagram(tables: &[Table]) -> Result<String> {
    let mut src = String::from("@startuml\n");
    src.push_str(&render_entries(tables)?);
    src.push_str(&render_relations(tables)?);
    src.push_str("@enduml\n");
    Ok(src)
}

/// Writes the single combined diagram to `path`, or to stdout when `None`.
///
/// # Errors
/// Returns an I/O error naming the destination.
pub async fn write_single_diagram(tables: &[Table], path: Option<&Path>) -> Result<()> {
    let src = render_single_diagram(tables)?;
    match path {
        Some(path) => write_file(path, &src).await,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(src.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| PlanterError::io("Failed to write diagram to stdout", e))
        }
    }
}

/// A schema's aggregate diagram and the relations it leaves to the top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPackage {
    /// Contents of `<schema>/_schema.puml`
    pub diagram: String,
    /// Relation lines whose constraint crosses into another schema
    pub cross_schema_relations: String,
}

/// Renders a schema's `_schema.puml` and splits off its cross-schema relations.
pub fn render_schema_package(schema: &str, tables: &[Table]) -> Result<SchemaPackage> {
    let mut diagram = String::from("@startuml\nskinparam monochrome true\n");
    diagram.push_str(&format!(
        "!ifndef ERD_INCL\n!include ../{}\n!endif\n",
        ERD_FILE
    ));
    diagram.push_str(&format!("package {} <<Frame>> {{\n", schema));
    for table in tables {
        diagram.push_str(&format!("!include {}.puml\n", table.name));
    }

    let mut local_relations = String::from("\n");
    let mut cross_schema_relations = String::new();
    for fk in tables.iter().flat_map(|t| &t.foreign_keys) {
        let line = render_relation(fk)?;
        if fk.is_cross_schema() {
            cross_schema_relations.push_str(&line);
        } else {
            local_relations.push_str(&line);
        }
    }
    diagram.push_str(&local_relations);

    diagram.push_str("}\n");
    diagram.push_str(&format!(
        "!ifndef LEGEND_INCL\n!include ../{}\n!endif\n",
        LEGEND_FILE
    ));
    diagram.push_str("@enduml\n");

    Ok(SchemaPackage {
        diagram,
        cross_schema_relations,
    })
}

/// Renders a schema's part of `description.rst`.
pub fn render_schema_documentation(schema: &str, tables: &[Table]) -> Result<String> {
    let mut doc = format!("{}\n----\n", schema.to_uppercase());
    for table in tables {
        doc.push_str(&render_doc_section(table)?);
    }
    doc.push_str("\n\n");
    Ok(doc)
}

/// Writes the directory tree one schema at a time.
///
/// [`TreeWriter::create`] writes the two include fragments, each
/// [`TreeWriter::add_schema`] writes that schema's directory, and
/// [`TreeWriter::finish`] writes the top-level diagram and documentation.
#[derive(Debug)]
pub struct TreeWriter {
    root: PathBuf,
    database_label: String,
    schema_includes: String,
    cross_schema_relations: String,
    documentation: String,
}

impl TreeWriter {
    /// Creates `root` if needed and writes `erd.iuml` and `legend.iuml`.
    ///
    /// # Errors
    /// Returns an I/O error naming the directory or file that failed.
    pub async fn create(root: impl Into<PathBuf>, database_label: impl Into<String>) -> Result<Self> {
        let root = root.into();
        create_dir(&root).await?;
        write_file(&root.join(ERD_FILE), ERD_STYLE).await?;
        write_file(&root.join(LEGEND_FILE), LEGEND).await?;

        Ok(Self {
            root,
            database_label: database_label.into(),
            schema_includes: String::new(),
            cross_schema_relations: String::from("\n"),
            documentation: String::from("\n"),
        })
    }

    /// Writes `<schema>/<table>.puml` per table and `<schema>/_schema.puml`.
    ///
    /// An existing schema directory is reused; files in it are overwritten.
    ///
    /// # Errors
    /// Returns a render error naming the table, or an I/O error naming the path.
    pub async fn add_schema(&mut self, schema: &str, tables: &[Table]) -> Result<()> {
        tracing::info!("Writing schema: {}", schema);
        let schema_dir = self.root.join(schema);
        create_dir(&schema_dir).await?;

        for table in tables {
            let detail = render_detail_table(table)?;
            write_file(&schema_dir.join(format!("{}.puml", table.name)), &detail).await?;
        }

        let package = render_schema_package(schema, tables)?;
        write_file(&schema_dir.join(SCHEMA_FILE), &package.diagram).await?;

        self.schema_includes
            .push_str(&format!("!include {}/{}\n", schema, SCHEMA_FILE));
        self.cross_schema_relations
            .push_str(&package.cross_schema_relations);
        self.documentation
            .push_str(&render_schema_documentation(schema, tables)?);
        Ok(())
    }

    /// Writes the top-level diagram and `description.rst`.
    ///
    /// Returns the path of the top-level diagram.
    ///
    /// # Errors
    /// Returns an I/O error naming the file that failed.
    pub async fn finish(self) -> Result<PathBuf> {
        let mut main = String::from("@startuml\nskinparam monochrome true\n");
        main.push_str(&format!("!ifndef ERD_INCL\n!include {}\n!endif\n", ERD_FILE));
        main.push_str(&format!(
            "package {} <<Database>> {{\n",
            self.database_label
        ));
        main.push_str(&self.schema_includes);
        main.push_str(&self.cross_schema_relations);
        main.push_str("}\n");
        main.push_str(&format!(
            "!ifndef LEGEND_INCL\n!include {}\n!endif\n",
            LEGEND_FILE
        ));
        main.push_str("@enduml\n");

        let main_path = self.root.join(top_level_file_name(&self.database_label));
        write_file(&main_path, &main).await?;
        write_file(&self.root.join(DOCUMENTATION_FILE), &self.documentation).await?;
        Ok(main_path)
    }
}

async fn create_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| PlanterError::io(format!("Failed to create directory {}", path.display()), e))
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    tracing::debug!("Writing {}", path.display());
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| PlanterError::io(format!("Failed to write to {}", path.display()), e))
}
