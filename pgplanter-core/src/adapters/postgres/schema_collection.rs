//! Catalog query execution and row decoding.

use super::queries::{COLUMNS_SQL, FOREIGN_KEYS_SQL, TABLES_SQL};
use super::type_mapping::{normalize_data_type, normalize_default_value};
use crate::Result;
use crate::adapters::TableEntry;
use crate::adapters::helpers::RowExt;
use crate::error::PlanterError;
use crate::models::{Column, ForeignKey};
use sqlx::PgPool;

/// Lists the regular tables of `schema`.
pub(crate) async fn collect_tables(pool: &PgPool, schema: &str) -> Result<Vec<TableEntry>> {
    let rows = sqlx::query(TABLES_SQL)
        .bind(schema)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            PlanterError::collection_failed(
                format!("Failed to load tables of schema '{}'", schema),
                e,
            )
        })?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in &rows {
        tables.push(TableEntry {
            name: row.get_field("table_name", None)?,
            comment: row.get_field("description", None)?,
        });
    }

    tracing::debug!("Schema '{}' has {} tables", schema, tables.len());
    Ok(tables)
}

/// Loads the columns of `schema.table` in ordinal order.
pub(crate) async fn collect_columns(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<Column>> {
    let rows = sqlx::query(COLUMNS_SQL)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            PlanterError::collection_failed(
                format!("Failed to load columns of '{}.{}'", schema, table),
                e,
            )
        })?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let ordinal: i32 = row.get_field("field_ordinal", Some(table))?;
        let data_type: String = row.get_field("data_type", Some(table))?;
        let default_value: Option<String> = row.get_field("default_value", Some(table))?;

        columns.push(Column {
            // attnum > 0 is part of the query's filter
            ordinal_position: u32::try_from(ordinal).unwrap_or_default(),
            name: row.get_field("column_name", Some(table))?,
            comment: row.get_field("description", Some(table))?,
            data_type: normalize_data_type(&data_type),
            not_null: row.get_field("not_null", Some(table))?,
            is_primary_key: row.get_field("is_primary_key", Some(table))?,
            is_unique: row.get_field("is_unique", Some(table))?,
            default_value: default_value.as_deref().map(normalize_default_value),
        });
    }

    Ok(columns)
}

/// Loads the foreign keys declared on `schema.table`.
pub(crate) async fn collect_foreign_keys(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<ForeignKey>> {
    let rows = sqlx::query(FOREIGN_KEYS_SQL)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            PlanterError::collection_failed(
                format!("Failed to load foreign keys of '{}.{}'", schema, table),
                e,
            )
        })?;

    let mut foreign_keys = Vec::with_capacity(rows.len());
    for row in &rows {
        foreign_keys.push(ForeignKey {
            constraint_name: row.get_field("constraint_name", Some(table))?,
            source_table: table.to_string(),
            target_table: row.get_field("target_table", Some(table))?,
            constraint_schema: row.get_field("constraint_schema", Some(table))?,
            target_schema: row.get_field("target_schema", Some(table))?,
        });
    }

    Ok(foreign_keys)
}
