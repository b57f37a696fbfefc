//! One run: load, filter, render, write.

use crate::adapters::CatalogSource;
use crate::config::{OutputTarget, RunConfig};
use crate::output::{TreeWriter, write_single_diagram};
use crate::reader::SchemaReader;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Tables written after filtering, across all schemas
    pub tables: usize,
    /// Foreign keys rendered as relations
    pub relations: usize,
}

/// Runs the whole pipeline for `config` against `catalog`.
///
/// Schemas are processed in configured order and every query and write is
/// awaited before the next one starts.
///
/// # Errors
/// Returns the first configuration, collection, render or I/O error.
pub async fn run(catalog: &dyn CatalogSource, config: &RunConfig) -> crate::Result<RunSummary> {
    config.validate()?;
    let reader = SchemaReader::new(catalog, config.skip);
    tracing::debug!(
        "Output: {}",
        if config.output.is_directory() {
            "directory tree"
        } else {
            "single diagram"
        }
    );
    let filter = (!config.filter.is_pass_through()).then_some(&config.filter);
    let keep = |tables: Vec<crate::models::Table>| match filter {
        Some(filter) => filter.apply(tables),
        None => tables,
    };
    let mut summary = RunSummary {
        tables: 0,
        relations: 0,
    };

    match &config.output {
        OutputTarget::Directory {
            root,
            database_label,
        } => {
            let mut writer = TreeWriter::create(root, database_label.as_str()).await?;
            for schema in &config.schemas {
                tracing::info!("Extracting schema: {}", schema);
                let tables = keep(reader.load_schema(schema).await?);
                summary.count(&tables);
                writer.add_schema(schema, &tables).await?;
            }
            let main = writer.finish().await?;
            tracing::info!("Wrote {}", main.display());
        }
        single => {
            let tables = keep(reader.load_schemas(&config.schemas).await?);
            summary.count(&tables);
            let path = match single {
                OutputTarget::File(path) => Some(path.as_path()),
                _ => None,
            };
            write_single_diagram(&tables, path).await?;
        }
    }

    tracing::info!(
        "Rendered {} tables and {} relations",
        summary.tables,
        summary.relations
    );
    Ok(summary)
}

impl RunSummary {
    fn count(&mut self, tables: &[crate::models::Table]) {
        self.tables = self.tables.saturating_add(tables.len());
        self.relations = self
            .relations
            .saturating_add(tables.iter().map(|t| t.foreign_keys.len()).sum());
    }
}
