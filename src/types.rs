//! Core types for pgarchive: table specs, per-table outcomes, and run summaries.
//!
//! This module defines the main data structures used for archival runs.
//!
//! ## What
//!
//! - [`TableSpec`] resolves one source table to its archive destination.
//! - [`TableOutcome`] records success or failure-with-reason for one table.
//! - [`RunSummary`] aggregates outcomes for one archival run.
//!
//! ## How
//!
//! Table specs are built from configuration by the batch runner, passed to the
//! archiver one at a time, and their outcomes collected into a [`RunSummary`].

use crate::constants::{ARCHIVE_SCHEMA, ARCHIVE_TABLE_PREFIX, LANDING_SCHEMA};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// One source-to-destination archival mapping.
///
/// The archive table name is always derived from the source table name:
/// `archive_` prefix plus the lower-cased source name. Schemas are fixed for
/// the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct TableSpec {
    /// Schema holding the source table
    pub source_schema: String,
    /// Name of the source table
    pub source_table: String,
    /// Schema holding the archive table
    pub archive_schema: String,
    /// Name of the archive table (derived, `archive_<lower(source)>`)
    pub archive_table: String,
}

impl TableSpec {
    /// Create a spec for a source table under explicit schemas.
    ///
    /// # Arguments
    /// * `source_schema` - Schema holding the source table
    /// * `source_table` - Name of the source table
    /// * `archive_schema` - Schema holding the archive table
    pub fn new(source_schema: &str, source_table: &str, archive_schema: &str) -> Self {
        let archive_table = format!(
            "{}{}",
            ARCHIVE_TABLE_PREFIX,
            source_table.to_lowercase()
        );
        Self {
            source_schema: source_schema.to_string(),
            source_table: source_table.to_string(),
            archive_schema: archive_schema.to_string(),
            archive_table,
        }
    }

    /// Create a spec using the default `landing` and `archive` schemas.
    pub fn for_landing_table(source_table: &str) -> Self {
        Self::new(LANDING_SCHEMA, source_table, ARCHIVE_SCHEMA)
    }
}

impl fmt::Display for TableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.source_schema, self.source_table, self.archive_schema, self.archive_table
        )
    }
}

/// Terminal state of one table within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeStatus {
    /// The transactional copy committed
    Succeeded,
    /// The copy failed and was rolled back; see the outcome's reason
    Failed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Succeeded => write!(f, "succeeded"),
            OutcomeStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Per-table outcome of an archival run.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct TableOutcome {
    /// Name of the source table
    pub source_table: String,
    /// Name of the archive table
    pub archive_table: String,
    /// Whether the copy committed or rolled back
    pub status: OutcomeStatus,
    /// Underlying error message for failures, empty on success
    pub reason: String,
}

impl TableOutcome {
    /// Record a committed copy for `spec`.
    pub fn succeeded(spec: &TableSpec) -> Self {
        Self {
            source_table: spec.source_table.clone(),
            archive_table: spec.archive_table.clone(),
            status: OutcomeStatus::Succeeded,
            reason: String::new(),
        }
    }

    /// Record a rolled-back copy for `spec` with its failure reason.
    pub fn failed(spec: &TableSpec, reason: String) -> Self {
        Self {
            source_table: spec.source_table.clone(),
            archive_table: spec.archive_table.clone(),
            status: OutcomeStatus::Failed,
            reason,
        }
    }
}

/// Summary of one archival run over the configured table list.
///
/// Ephemeral, one per process invocation. Nothing about the run is persisted
/// in the database.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Wall-clock time the batch started
    pub started_at: DateTime<Utc>,
    /// Per-table outcomes, in configuration order
    pub outcomes: Vec<TableOutcome>,
}

impl RunSummary {
    /// Build a summary from collected outcomes.
    pub fn new(started_at: DateTime<Utc>, outcomes: Vec<TableOutcome>) -> Self {
        Self {
            started_at,
            outcomes,
        }
    }

    /// Number of tables whose copy committed.
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Succeeded)
            .count()
    }

    /// Number of tables whose copy failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Iterate over the failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &TableOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Failed)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} archived, {} failed out of {} tables",
            self.succeeded(),
            self.failed(),
            self.outcomes.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_table_name_is_derived() {
        let spec = TableSpec::for_landing_table("Orders");
        assert_eq!(spec.source_schema, "landing");
        assert_eq!(spec.source_table, "Orders");
        assert_eq!(spec.archive_schema, "archive");
        assert_eq!(spec.archive_table, "archive_orders");
    }

    #[test]
    fn test_spec_display() {
        let spec = TableSpec::for_landing_table("customers");
        assert_eq!(
            spec.to_string(),
            "landing.customers -> archive.archive_customers"
        );
    }

    #[test]
    fn test_explicit_schemas() {
        let spec = TableSpec::new("staging", "EVENTS", "history");
        assert_eq!(spec.source_schema, "staging");
        assert_eq!(spec.archive_schema, "history");
        assert_eq!(spec.archive_table, "archive_events");
    }

    #[test]
    fn test_summary_counts() {
        let ok = TableSpec::for_landing_table("orders");
        let bad = TableSpec::for_landing_table("does_not_exist");
        let summary = RunSummary::new(
            Utc::now(),
            vec![
                TableOutcome::succeeded(&ok),
                TableOutcome::failed(&bad, "no columns".to_string()),
            ],
        );
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failures().count(), 1);
        assert_eq!(
            summary.failures().next().unwrap().source_table,
            "does_not_exist"
        );
        assert_eq!(summary.to_string(), "1 archived, 1 failed out of 2 tables");
    }
}
