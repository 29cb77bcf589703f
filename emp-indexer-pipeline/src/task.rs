//! Pipeline task contract.

use async_trait::async_trait;

use crate::context::RunContext;
use crate::errors::PipelineError;

/// A single step of the pipeline.
///
/// Tasks are idempotent and re-runnable: a retry re-executes the whole
/// task from scratch, and the only side effect of a successful run is
/// overwriting the task's own output artifact.
#[async_trait]
pub trait PipelineTask: Send + Sync {
    /// Symbolic identifier used in logs, reports, and retry accounting.
    fn id(&self) -> &str;

    /// Execute the task against the run's artifact handles.
    ///
    /// Returns the number of records the task produced or submitted.
    async fn execute(&self, ctx: &RunContext) -> Result<u64, PipelineError>;
}
