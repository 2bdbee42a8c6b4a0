//! Transactional copy engine for pgarchive.
//!
//! This module defines the [`Archiver`] struct, which synthesizes and executes
//! the copy-with-timestamp operation for one table.
//!
//! ## What
//!
//! - [`Archiver`] asks the [`SchemaInspector`] for the source column list,
//!   builds an `INSERT INTO ... SELECT ..., CURRENT_TIMESTAMP` statement, and
//!   executes it inside one transaction.
//! - The destination column list is the source list plus the synthetic
//!   `archived_at` column, in that order; every row copied in one call shares
//!   one archival timestamp.
//!
//! ## How
//!
//! Create an [`Archiver`] over a connection pool and call
//! [`Archiver::archive`] with a [`TableSpec`]. Either all rows present in the
//! source at query time are copied, or none are. Repeated calls append fresh
//! full copies; the engine performs no existence check against previously
//! archived rows.

use crate::constants::{ARCHIVED_AT_COLUMN, ARCHIVE_INSERT};
use crate::error::{ArchiveError, Result};
use crate::inspector::SchemaInspector;
use crate::types::TableSpec;
use sqlx::PgPool;

/// Quote an identifier for safe embedding in statement text.
///
/// Wraps the identifier in double quotes and doubles any embedded quote,
/// per PostgreSQL quoting rules. Quoted identifiers are matched verbatim,
/// which is exactly what we want for catalog-reported column names.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Synthesize the copy statement for `spec` from its source column list.
///
/// The insert column list is the source columns plus `archived_at`; the
/// select list is the source columns plus `CURRENT_TIMESTAMP` (appended by
/// the template). All identifiers are quoted.
pub(crate) fn build_archive_sql(spec: &TableSpec, columns: &[String]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    let insert_columns = format!(
        "{}, {}",
        quoted.join(", "),
        quote_ident(ARCHIVED_AT_COLUMN)
    );
    let select_columns = quoted.join(", ");

    // The source name is folded to lower case like the catalog lookup,
    // so quoting cannot accidentally make it case sensitive.
    ARCHIVE_INSERT
        .replace("{archive_schema}", &quote_ident(&spec.archive_schema))
        .replace("{archive_table}", &quote_ident(&spec.archive_table))
        .replace("{insert_columns}", &insert_columns)
        .replace("{select_columns}", &select_columns)
        .replace("{source_schema}", &quote_ident(&spec.source_schema))
        .replace("{source_table}", &quote_ident(&spec.source_table.to_lowercase()))
}

/// Copy engine moving one landing table into its archive table.
#[derive(Debug, Clone)]
pub struct Archiver {
    /// Connection pool for PostgreSQL
    pub pool: PgPool,
    inspector: SchemaInspector,
}

impl Archiver {
    /// Create a new Archiver over the given pool.
    pub fn new(pool: PgPool) -> Self {
        let inspector = SchemaInspector::new(pool.clone());
        Self { pool, inspector }
    }

    /// The catalog inspector backing this archiver.
    pub fn inspector(&self) -> &SchemaInspector {
        &self.inspector
    }

    /// Resolve the copy statement for `spec` without executing it.
    ///
    /// Fails with [`ArchiveError::SchemaLookup`] if the source table has no
    /// visible columns; a copy with zero columns is degenerate SQL and is
    /// never synthesized.
    pub async fn statement_for(&self, spec: &TableSpec) -> Result<String> {
        let columns = self
            .inspector
            .columns_of(&spec.source_schema, &spec.source_table)
            .await?;
        if columns.is_empty() {
            return Err(ArchiveError::SchemaLookup {
                schema: spec.source_schema.clone(),
                table: spec.source_table.clone(),
            });
        }
        Ok(build_archive_sql(spec, &columns))
    }

    /// Copy all current rows of the source table into the archive table,
    /// tagged with the archival timestamp, as one atomic transaction.
    ///
    /// On any execution error the transaction is rolled back in full and the
    /// failure is surfaced with the underlying store message. The timestamp
    /// is the transaction's `CURRENT_TIMESTAMP`, so every row copied by one
    /// call carries the same value.
    ///
    /// # Arguments
    /// * `spec` - Source and destination resolved by the caller
    pub async fn archive(&self, spec: &TableSpec) -> Result<()> {
        let sql = self.statement_for(spec).await?;
        tracing::debug!("Executing archive statement: {}", sql);

        let mut tx = self.pool.begin().await?;
        sqlx::query(&sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| ArchiveError::Execution {
                table: spec.source_table.clone(),
                message: e.to_string(),
            })?;
        tx.commit().await?;
        Ok(())
    }
}
