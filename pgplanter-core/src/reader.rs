//! Schema loading.
//!
//! [`SchemaReader`] turns catalog answers into [`Table`] models: tables in name
//! order, their columns in ordinal order and, unless skipped, their foreign
//! keys. The first failing query ends the load.

use crate::adapters::CatalogSource;
use crate::config::SkipFlags;
use crate::error::PlanterError;
use crate::models::{Table, strip_comment_suffix};

/// Tables loaded before a multi-schema load failed, kept with the error.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct PartialLoad {
    /// Tables from the schemas that loaded completely
    pub tables: Vec<Table>,
    #[source]
    pub error: PlanterError,
}

impl From<PartialLoad> for PlanterError {
    fn from(partial: PartialLoad) -> Self {
        partial.error
    }
}

/// Loads tables through a [`CatalogSource`].
pub struct SchemaReader<'a> {
    catalog: &'a dyn CatalogSource,
    skip: SkipFlags,
}

impl<'a> SchemaReader<'a> {
    pub fn new(catalog: &'a dyn CatalogSource, skip: SkipFlags) -> Self {
        Self { catalog, skip }
    }

    /// Loads every regular table of `schema` with its columns and foreign keys.
    ///
    /// # Errors
    /// Returns the first query or decoding error, with the table it concerned.
    pub async fn load_schema(&self, schema: &str) -> crate::Result<Vec<Table>> {
        tracing::info!("Loading schema: {}", schema);

        let entries = self.catalog.tables(schema).await?;
        let mut tables = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut table = Table::new(schema, entry.name);
            table.comment = entry.comment.as_deref().map(strip_comment_suffix).map(str::to_string);

            tracing::info!("Loading table: {}", table.qualified_name());
            table.columns = self
                .catalog
                .columns(schema, &table.name)
                .await
                .map_err(|e| with_table_context(e, "columns", &table))?;
            for column in &mut table.columns {
                if let Some(comment) = column.comment.as_mut() {
                    let kept = strip_comment_suffix(comment).len();
                    comment.truncate(kept);
                }
            }
            tables.push(table);
        }

        if self.skip.skip_foreign_keys() {
            tracing::debug!("Skipping foreign keys of schema '{}'", schema);
        } else {
            for table in &mut tables {
                table.foreign_keys = self
                    .catalog
                    .foreign_keys(schema, &table.name)
                    .await
                    .map_err(|e| with_table_context(e, "foreign keys", table))?;
            }
        }

        Ok(tables)
    }

    /// Loads `schemas` in order and concatenates their tables.
    ///
    /// # Errors
    /// On failure the tables of the schemas loaded so far are returned with the
    /// error in a [`PartialLoad`].
    pub async fn load_schemas(&self, schemas: &[String]) -> Result<Vec<Table>, PartialLoad> {
        let mut tables = Vec::new();
        for schema in schemas {
            match self.load_schema(schema).await {
                Ok(loaded) => tables.extend(loaded),
                Err(error) => return Err(PartialLoad { tables, error }),
            }
        }
        Ok(tables)
    }
}

fn with_table_context(error: PlanterError, what: &str, table: &Table) -> PlanterError {
    match error {
        PlanterError::Collection { context, source } => PlanterError::Collection {
            context: format!(
                "{} (while loading {} of {})",
                context,
                what,
                table.qualified_name()
            ),
            source,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TableEntry;
    use crate::models::{Column, ForeignKey};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory catalog keyed by schema.
    #[derive(Default)]
    struct FakeCatalog {
        tables: HashMap<String, Vec<TableEntry>>,
        columns: HashMap<(String, String), Vec<Column>>,
        foreign_keys: HashMap<(String, String), Vec<ForeignKey>>,
        broken_schema: Option<String>,
        foreign_key_calls: Mutex<usize>,
    }

    fn broken(what: &str) -> PlanterError {
        PlanterError::collection_failed(
            format!("Failed to load {}", what),
            std::io::Error::other("relation does not exist"),
        )
    }

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        async fn test_connection(&self) -> crate::Result<()> {
            Ok(())
        }

        async fn tables(&self, schema: &str) -> crate::Result<Vec<TableEntry>> {
            if self.broken_schema.as_deref() == Some(schema) {
                return Err(broken("tables"));
            }
            Ok(self.tables.get(schema).cloned().unwrap_or_default())
        }

        async fn columns(&self, schema: &str, table: &str) -> crate::Result<Vec<Column>> {
            Ok(self
                .columns
                .get(&(schema.to_string(), table.to_string()))
                .cloned()
                .unwrap_or_default())
        }

        async fn foreign_keys(&self, schema: &str, table: &str) -> crate::Result<Vec<ForeignKey>> {
            *self.foreign_key_calls.lock().unwrap() += 1;
            self.foreign_keys
                .get(&(schema.to_string(), table.to_string()))
                .cloned()
                .ok_or_else(|| broken("foreign keys"))
        }
    }

    fn column(ordinal: u32, name: &str, comment: Option<&str>) -> Column {
        Column {
            ordinal_position: ordinal,
            name: name.to_string(),
            comment: comment.map(str::to_string),
            data_type: "TEXT".to_string(),
            not_null: false,
            is_primary_key: ordinal == 1,
            is_unique: false,
            default_value: None,
        }
    }

    fn shop() -> FakeCatalog {
        let mut catalog = FakeCatalog::default();
        catalog.tables.insert(
            "public".to_string(),
            vec![
                TableEntry {
                    name: "customers".to_string(),
                    comment: Some("buyers\timported from sheet".to_string()),
                },
                TableEntry {
                    name: "orders".to_string(),
                    comment: None,
                },
            ],
        );
        catalog.tables.insert(
            "audit".to_string(),
            vec![TableEntry {
                name: "events".to_string(),
                comment: None,
            }],
        );
        catalog.columns.insert(
            ("public".to_string(), "customers".to_string()),
            vec![
                column(1, "id", None),
                column(2, "name", Some("display name\tB7")),
            ],
        );
        catalog.columns.insert(
            ("public".to_string(), "orders".to_string()),
            vec![column(1, "id", None), column(2, "customer_id", None)],
        );
        for (schema, table) in [("public", "customers"), ("audit", "events")] {
            catalog
                .foreign_keys
                .insert((schema.to_string(), table.to_string()), Vec::new());
        }
        catalog.foreign_keys.insert(
            ("public".to_string(), "orders".to_string()),
            vec![ForeignKey {
                constraint_name: "orders_customer_id_fkey".to_string(),
                source_table: "orders".to_string(),
                target_table: "customers".to_string(),
                constraint_schema: "public".to_string(),
                target_schema: "public".to_string(),
            }],
        );
        catalog
    }

    #[tokio::test]
    async fn test_load_schema_builds_tables() {
        let catalog = shop();
        let reader = SchemaReader::new(&catalog, SkipFlags::default());

        let tables = reader.load_schema("public").await.unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].schema, "public");
        assert_eq!(tables[0].name, "customers");
        assert_eq!(tables[1].columns[1].name, "customer_id");
        assert_eq!(tables[1].foreign_keys.len(), 1);
        assert_eq!(tables[1].foreign_keys[0].target_table, "customers");
    }

    #[tokio::test]
    async fn test_comments_truncated_at_tab() {
        let catalog = shop();
        let reader = SchemaReader::new(&catalog, SkipFlags::default());

        let tables = reader.load_schema("public").await.unwrap();
        assert_eq!(tables[0].comment.as_deref(), Some("buyers"));
        assert_eq!(tables[0].columns[1].comment.as_deref(), Some("display name"));
    }

    #[tokio::test]
    async fn test_skip_flag_disables_foreign_keys() {
        let catalog = shop();
        let reader = SchemaReader::new(&catalog, SkipFlags::parse("f"));

        let tables = reader.load_schema("public").await.unwrap();
        assert!(tables.iter().all(|t| t.foreign_keys.is_empty()));
        assert_eq!(*catalog.foreign_key_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_foreign_key_failure_names_table() {
        let mut catalog = shop();
        catalog
            .foreign_keys
            .remove(&("public".to_string(), "orders".to_string()));
        let reader = SchemaReader::new(&catalog, SkipFlags::default());

        let error = reader.load_schema("public").await.unwrap_err();
        assert!(error.to_string().contains("foreign keys of public.orders"));
    }

    #[tokio::test]
    async fn test_load_schemas_concatenates_in_order() {
        let catalog = shop();
        let reader = SchemaReader::new(&catalog, SkipFlags::default());

        let schemas = vec!["audit".to_string(), "public".to_string()];
        let tables = reader.load_schemas(&schemas).await.unwrap();
        let names: Vec<_> = tables.iter().map(Table::qualified_name).collect();
        assert_eq!(names, ["audit.events", "public.customers", "public.orders"]);
    }

    #[tokio::test]
    async fn test_load_schemas_returns_partial_tables_on_failure() {
        let mut catalog = shop();
        catalog.broken_schema = Some("audit".to_string());
        let reader = SchemaReader::new(&catalog, SkipFlags::default());

        let schemas = vec!["public".to_string(), "audit".to_string()];
        let partial = reader.load_schemas(&schemas).await.unwrap_err();
        assert_eq!(partial.tables.len(), 2);
        assert!(matches!(partial.error, PlanterError::Collection { .. }));

        let error: PlanterError = partial.into();
        assert!(error.to_string().contains("Failed to load tables"));
    }
}
