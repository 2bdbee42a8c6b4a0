//! SQL constants and naming conventions for pgarchive.
//!
//! This module contains the SQL statement templates, fixed schema names, and
//! naming-convention constants used throughout the archival pipeline.
//!
//! ## What
//!
//! - Default landing and archive schema names
//! - The archive table name prefix and the synthetic timestamp column
//! - SQL statement templates for catalog lookup and the archival copy
//!
//! ## How
//!
//! These constants are used internally by the inspector and archiver modules
//! to generate statements with proper schema and table names.

/// Default schema holding freshly ingested landing tables
pub const LANDING_SCHEMA: &str = "landing";
/// Default schema accumulating archived copies
pub const ARCHIVE_SCHEMA: &str = "archive";
/// Prefix for archive table names: source table `orders` archives into `archive_orders`
pub const ARCHIVE_TABLE_PREFIX: &str = "archive_";
/// Synthetic column appended to every archived row, holding the archival timestamp
pub const ARCHIVED_AT_COLUMN: &str = "archived_at";

/// Ordered column lookup against the catalog. Schema and table are bound
/// parameters, never interpolated.
pub const SELECT_TABLE_COLUMNS: &str = r#"
    SELECT column_name
    FROM information_schema.columns
    WHERE table_schema = $1
    AND table_name = $2
    ORDER BY ordinal_position;
"#;

/// Copy-with-timestamp template. Identifiers and column lists are filled in
/// by the archiver after quoting; see [`crate::archiver`].
pub const ARCHIVE_INSERT: &str = r#"
    INSERT INTO {archive_schema}.{archive_table} ({insert_columns})
    SELECT {select_columns}, CURRENT_TIMESTAMP FROM {source_schema}.{source_table};
"#;
