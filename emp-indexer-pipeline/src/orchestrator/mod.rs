//! Orchestrator module for the ETL pipeline.
//!
//! Runs the task sequence in order with a per-task retry budget.

use tracing::{error, info, instrument, warn};

use crate::context::RunContext;
use crate::errors::PipelineError;
use crate::task::PipelineTask;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Retries granted to each task beyond its first attempt.
    ///
    /// A retry re-runs the whole task from scratch; tasks are idempotent
    /// so a half-finished attempt is simply overwritten.
    pub task_retries: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { task_retries: 1 }
    }
}

/// Outcome of one completed task.
#[derive(Debug, Clone)]
pub struct TaskReport {
    /// Symbolic task identifier.
    pub task_id: String,
    /// Records the task produced or submitted.
    pub records: u64,
}

/// Orchestrator that runs the pipeline tasks in order.
///
/// The orchestrator:
/// - Executes tasks strictly sequentially, never concurrently
/// - Applies the per-task retry budget
/// - Aborts the run on the first task that exhausts its budget, so
///   downstream tasks never observe a failed predecessor's output
pub struct Pipeline {
    ctx: RunContext,
    tasks: Vec<Box<dyn PipelineTask>>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline over the given context and ordered tasks.
    pub fn new(ctx: RunContext, tasks: Vec<Box<dyn PipelineTask>>) -> Self {
        Self {
            ctx,
            tasks,
            config: PipelineConfig::default(),
        }
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(
        ctx: RunContext,
        tasks: Vec<Box<dyn PipelineTask>>,
        config: PipelineConfig,
    ) -> Self {
        Self { ctx, tasks, config }
    }

    /// The run's artifact handles.
    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Run every task in order.
    ///
    /// Returns one report per completed task, or the error of the first
    /// task that exhausted its retry budget.
    #[instrument(skip(self), fields(run_id = %self.ctx.run_id))]
    pub async fn run(&self) -> Result<Vec<TaskReport>, PipelineError> {
        info!(tasks = self.tasks.len(), "Starting pipeline run");

        let mut reports = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            let records = self.run_task(task.as_ref()).await?;
            reports.push(TaskReport {
                task_id: task.id().to_string(),
                records,
            });
        }

        info!("Pipeline run complete");
        Ok(reports)
    }

    /// Run one task, retrying within its budget.
    async fn run_task(&self, task: &dyn PipelineTask) -> Result<u64, PipelineError> {
        let mut attempt = 0;
        loop {
            match task.execute(&self.ctx).await {
                Ok(records) => {
                    if attempt > 0 {
                        info!(task_id = task.id(), attempt, "Task succeeded after retry");
                    }
                    return Ok(records);
                }
                Err(e) if attempt < self.config.task_retries => {
                    attempt += 1;
                    warn!(
                        task_id = task.id(),
                        attempt,
                        error = %e,
                        "Task failed, retrying from scratch"
                    );
                }
                Err(e) => {
                    error!(task_id = task.id(), error = %e, "Task failed, aborting run");
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Task that fails a fixed number of times before succeeding.
    struct FlakyTask {
        id: &'static str,
        failures: usize,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PipelineTask for FlakyTask {
        fn id(&self) -> &str {
            self.id
        }

        async fn execute(&self, _ctx: &RunContext) -> Result<u64, PipelineError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(PipelineError::connection("transient"))
            } else {
                Ok(1)
            }
        }
    }

    fn context() -> RunContext {
        RunContext::fixed("raw.csv".into(), "clean.csv".into())
    }

    #[tokio::test]
    async fn test_single_failure_recovers_within_budget() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new(
            context(),
            vec![Box::new(FlakyTask {
                id: "flaky",
                failures: 1,
                calls: calls.clone(),
            })],
        );

        let reports = pipeline.run().await.unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].task_id, "flaky");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausted_budget_aborts_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let downstream_calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::with_config(
            context(),
            vec![
                Box::new(FlakyTask {
                    id: "always-failing",
                    failures: usize::MAX,
                    calls: calls.clone(),
                }),
                Box::new(FlakyTask {
                    id: "downstream",
                    failures: 0,
                    calls: downstream_calls.clone(),
                }),
            ],
            PipelineConfig { task_retries: 1 },
        );

        let err = pipeline.run().await.unwrap_err();

        assert!(matches!(err, PipelineError::Connection(_)));
        // First attempt plus one retry, and the downstream task never ran.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(downstream_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_retry_budget_fails_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::with_config(
            context(),
            vec![Box::new(FlakyTask {
                id: "flaky",
                failures: 1,
                calls: calls.clone(),
            })],
            PipelineConfig { task_retries: 0 },
        );

        assert!(pipeline.run().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
