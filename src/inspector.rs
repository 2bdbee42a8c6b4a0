//! Catalog inspection for pgarchive.
//!
//! This module defines the [`SchemaInspector`] struct, which resolves the
//! ordered column list of a table from `information_schema.columns`.
//!
//! ## What
//!
//! - [`SchemaInspector`] answers "which columns does this table have, in
//!   ordinal order" with one read-only catalog query.
//!
//! ## How
//!
//! Create a [`SchemaInspector`] over a connection pool and call
//! [`SchemaInspector::columns_of`]. A missing or inaccessible table yields an
//! empty list; callers decide whether that is an error.

use crate::constants::SELECT_TABLE_COLUMNS;
use crate::error::Result;
use sqlx::PgPool;

/// Read-only view of the database catalog.
#[derive(Debug, Clone)]
pub struct SchemaInspector {
    /// Connection pool for PostgreSQL
    pub pool: PgPool,
}

impl SchemaInspector {
    /// Create a new SchemaInspector over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the ordered column names of `schema.table`.
    ///
    /// The table name is lower-cased before lookup since the catalog stores
    /// unquoted identifiers folded to lower case. Both identifiers are passed
    /// as bound parameters. The returned order follows `ordinal_position` and
    /// is stable, so it can be reused positionally to compose column lists.
    ///
    /// # Arguments
    /// * `schema` - Schema holding the table
    /// * `table` - Table name, case-insensitive
    ///
    /// # Returns
    /// Ordered column names; empty if the table does not exist or is not
    /// visible to the current role.
    pub async fn columns_of(&self, schema: &str, table: &str) -> Result<Vec<String>> {
        let table = table.to_lowercase();
        let columns = sqlx::query_scalar::<_, String>(SELECT_TABLE_COLUMNS)
            .bind(schema)
            .bind(&table)
            .fetch_all(&self.pool)
            .await?;
        Ok(columns)
    }
}
