//! Catalog queries.
//!
//! Schema and table names are always bind parameters (`$1`, `$2`).

/// Regular, non-partition tables of schema `$1`, ordered by name.
pub(crate) const TABLES_SQL: &str = r#"
    SELECT
        c.relname::text AS table_name,
        pd.description AS description
    FROM pg_class c
    JOIN pg_namespace n ON n.oid = c.relnamespace
    LEFT JOIN pg_description pd ON pd.objoid = c.oid AND pd.objsubid = 0
    WHERE n.nspname = $1
    AND c.relkind = 'r'
    AND NOT c.relispartition
    ORDER BY c.relname
"#;

/// Columns of table `$2` in schema `$1`, in ordinal order.
///
/// Key and uniqueness flags come from `EXISTS` probes so that a column in
/// several unique constraints still yields a single row.
pub(crate) const COLUMNS_SQL: &str = r#"
    SELECT
        a.attnum::integer AS field_ordinal,
        a.attname::text AS column_name,
        pd.description AS description,
        format_type(a.atttypid, a.atttypmod) AS data_type,
        a.attnotnull AS not_null,
        EXISTS (
            SELECT 1 FROM pg_constraint ct
            WHERE ct.conrelid = c.oid
            AND ct.contype = 'p'
            AND a.attnum = ANY(ct.conkey)
        ) AS is_primary_key,
        EXISTS (
            SELECT 1 FROM pg_constraint ct
            WHERE ct.conrelid = c.oid
            AND ct.contype = 'u'
            AND a.attnum = ANY(ct.conkey)
        ) AS is_unique,
        pg_get_expr(ad.adbin, ad.adrelid) AS default_value
    FROM pg_attribute a
    JOIN pg_class c ON c.oid = a.attrelid
    JOIN pg_namespace n ON n.oid = c.relnamespace
    LEFT JOIN pg_attrdef ad ON ad.adrelid = c.oid AND ad.adnum = a.attnum
    LEFT JOIN pg_description pd ON pd.objoid = a.attrelid AND pd.objsubid = a.attnum
    WHERE NOT a.attisdropped
    AND n.nspname = $1
    AND c.relname = $2
    AND a.attnum > 0
    ORDER BY a.attnum
"#;

/// Foreign keys declared on table `$2` in schema `$1`, ordered by name.
pub(crate) const FOREIGN_KEYS_SQL: &str = r#"
    SELECT DISTINCT
        tcl.relname::text AS target_table,
        con.conname::text AS constraint_name,
        ns.nspname::text AS constraint_schema,
        tns.nspname::text AS target_schema
    FROM pg_constraint con
    JOIN pg_class cl ON cl.oid = con.conrelid
    JOIN pg_namespace ns ON ns.oid = cl.relnamespace
    JOIN pg_class tcl ON tcl.oid = con.confrelid
    JOIN pg_namespace tns ON tns.oid = tcl.relnamespace
    WHERE ns.nspname = $1
    AND cl.relname = $2
    AND con.contype = 'f'
    ORDER BY constraint_name
"#;
