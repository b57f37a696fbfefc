//! PostgreSQL type and default-expression normalization.
//!
//! `format_type` and `pg_get_expr` output is shortened for diagrams: types are
//! upper-cased with `TIMESTAMP WITH TIME ZONE` spelled `TIMESTAMPTZ`, and
//! defaults lose their parentheses and redundant timestamptz casts.

const TIMESTAMPTZ_LONG: &str = "TIMESTAMP WITH TIME ZONE";
const TIMESTAMPTZ_CAST: &str = "::timestamp with time zone";

/// Normalizes a `format_type()` result for display.
///
/// ```rust
/// use pgplanter_core::adapters::postgres::normalize_data_type;
///
/// assert_eq!(normalize_data_type("timestamp with time zone"), "TIMESTAMPTZ");
/// assert_eq!(normalize_data_type("character varying(64)"), "CHARACTER VARYING(64)");
/// ```
pub fn normalize_data_type(formatted: &str) -> String {
    formatted.to_uppercase().replace(TIMESTAMPTZ_LONG, "TIMESTAMPTZ")
}

/// Normalizes a `pg_get_expr()` column default for display.
///
/// Every `(` and `)` is removed, then the `::timestamp with time zone` cast.
///
/// ```rust
/// use pgplanter_core::adapters::postgres::normalize_default_value;
///
/// assert_eq!(normalize_default_value("now()"), "now");
/// assert_eq!(
///     normalize_default_value("'2020-01-01 00:00:00+00'::timestamp with time zone"),
///     "'2020-01-01 00:00:00+00'"
/// );
/// ```
pub fn normalize_default_value(expression: &str) -> String {
    expression
        .chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .collect::<String>()
        .replace(TIMESTAMPTZ_CAST, "")
}
