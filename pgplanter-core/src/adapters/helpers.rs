//! Row decoding helpers for catalog queries.

use crate::{Result, error::PlanterError};
use sqlx::{Row, postgres::PgRow};

/// Extension trait for extracting typed values from catalog rows
/// with consistent error handling.
///
/// # Example
/// ```rust,ignore
/// use pgplanter_core::adapters::helpers::RowExt;
///
/// let name: String = row.get_field("column_name", Some("users"))?;
/// let comment: Option<String> = row.get_field("description", Some("users"))?;
/// ```
pub trait RowExt {
    /// Extracts a typed field from the row, naming the field and table on
    /// failure.
    fn get_field<'r, T>(&'r self, field_name: &str, table_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>;
}

impl RowExt for PgRow {
    fn get_field<'r, T>(&'r self, field_name: &str, table_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    {
        self.try_get(field_name)
            .map_err(|e| PlanterError::parse_field(field_name, table_context, e))
    }
}
