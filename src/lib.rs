/**
 # pgarchive

Archives PostgreSQL landing tables into timestamped archive tables, with a
CLI for running batches and a type-safe async library API.

## Features

- **Schema-safe**: column lists come from the catalog, ordered by ordinal
  position, and every identifier is validated and quoted
- **Transactional**: each table copies all-or-nothing, with one shared
  `archived_at` timestamp per run
- **Fault-isolated**: one failing table never blocks the rest of the batch
- **CLI Tools**: run, inspect, and plan archival batches from the command line
*/

pub mod archiver;
pub mod config;
pub mod error;
pub mod inspector;
pub mod runner;
pub mod types;

mod constants;

pub use crate::archiver::Archiver;
pub use crate::error::{ArchiveError, Result};
pub use crate::inspector::SchemaInspector;
pub use crate::runner::BatchRunner;
pub use crate::types::{RunSummary, TableOutcome, TableSpec};
