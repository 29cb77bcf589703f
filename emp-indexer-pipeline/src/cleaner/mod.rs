//! Cleaner task.
//!
//! Reads the raw snapshot, applies the cleaning transform, and persists
//! the clean snapshot.

pub mod transform;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::context::RunContext;
use crate::errors::PipelineError;
use crate::staging;
use crate::task::PipelineTask;

pub use transform::{clean, HIRE_DATE_COLUMN, MISSING_SENTINEL};

/// Task id of the cleaner.
pub const CLEAN_TASK_ID: &str = "clean";

/// Cleaner that turns the raw snapshot into the clean snapshot.
///
/// An absent raw snapshot is a `MissingInput` failure; a present but
/// row-less one is `EmptyInput`. Both abort the run before the loader
/// executes.
pub struct SnapshotCleaner;

impl SnapshotCleaner {
    /// Create a new cleaner.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SnapshotCleaner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineTask for SnapshotCleaner {
    fn id(&self) -> &str {
        CLEAN_TASK_ID
    }

    #[instrument(skip(self, ctx), fields(run_id = %ctx.run_id))]
    async fn execute(&self, ctx: &RunContext) -> Result<u64, PipelineError> {
        let raw = staging::read_snapshot(&ctx.raw_snapshot)?;
        if raw.is_empty() {
            return Err(PipelineError::empty_input(&ctx.raw_snapshot));
        }

        let cleaned = transform::clean(&raw)?;
        staging::write_snapshot(&ctx.clean_snapshot, &cleaned)?;

        info!(
            raw_rows = raw.row_count(),
            clean_rows = cleaned.row_count(),
            path = %ctx.clean_snapshot.display(),
            "Cleaned snapshot"
        );
        Ok(cleaned.row_count() as u64)
    }
}
