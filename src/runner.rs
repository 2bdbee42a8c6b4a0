//! Batch orchestration for pgarchive.
//!
//! This module defines the [`BatchRunner`] struct, which walks the configured
//! table list in order, invokes the [`Archiver`] once per table, and isolates
//! failures so one bad table never blocks the rest.
//!
//! ## What
//!
//! - [`BatchRunner::run_all`] processes specs sequentially and collects a
//!   [`RunSummary`] of per-table outcomes.
//!
//! ## How
//!
//! Build the plan from [`crate::config::Config::table_specs`] and hand it to
//! the runner. A per-table failure is logged with the table name and
//! the underlying message, recorded in the summary, and the loop moves on.
//! There is no cross-table atomicity and no retry within a run.

use crate::archiver::Archiver;
use crate::types::{RunSummary, TableOutcome, TableSpec};
use chrono::Utc;
use sqlx::PgPool;

/// Sequential driver for one archival run.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    archiver: Archiver,
}

impl BatchRunner {
    /// Create a new BatchRunner over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            archiver: Archiver::new(pool),
        }
    }

    /// The archiver used for each table.
    pub fn archiver(&self) -> &Archiver {
        &self.archiver
    }

    /// Archive every spec in order and report per-table outcomes.
    ///
    /// Each table is attempted exactly once. Failures are terminal for that
    /// table for this run and never abort the batch.
    ///
    /// # Arguments
    /// * `specs` - Ordered archival plan, typically configuration order
    pub async fn run_all(&self, specs: &[TableSpec]) -> RunSummary {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(specs.len());

        for spec in specs {
            match self.archiver.archive(spec).await {
                Ok(()) => {
                    tracing::info!("Archived {}", spec.source_table);
                    outcomes.push(TableOutcome::succeeded(spec));
                }
                Err(e) => {
                    tracing::error!("Failed to archive {}: {}", spec.source_table, e);
                    outcomes.push(TableOutcome::failed(spec, e.to_string()));
                }
            }
        }

        RunSummary::new(started_at, outcomes)
    }
}
