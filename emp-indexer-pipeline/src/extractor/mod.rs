//! Extractor task.
//!
//! Pulls the full source table and persists it as the raw snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::context::RunContext;
use crate::errors::PipelineError;
use crate::staging;
use crate::task::PipelineTask;
use emp_indexer_repository::SourceRepository;

/// Task id of the extractor.
pub const EXTRACT_TASK_ID: &str = "extract";

/// Extractor that materializes the source table into the raw snapshot.
///
/// The result set is fully materialized in memory before the file write
/// begins, so a connection or query failure leaves no partial snapshot
/// behind.
pub struct SnapshotExtractor {
    source: Arc<dyn SourceRepository>,
}

impl SnapshotExtractor {
    /// Create a new extractor over the given source repository.
    pub fn new(source: Arc<dyn SourceRepository>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl PipelineTask for SnapshotExtractor {
    fn id(&self) -> &str {
        EXTRACT_TASK_ID
    }

    #[instrument(skip(self, ctx), fields(run_id = %ctx.run_id))]
    async fn execute(&self, ctx: &RunContext) -> Result<u64, PipelineError> {
        let snapshot = self.source.fetch_all().await?;
        let rows = snapshot.row_count() as u64;

        staging::write_snapshot(&ctx.raw_snapshot, &snapshot)?;

        info!(
            rows,
            path = %ctx.raw_snapshot.display(),
            "Extracted source snapshot"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emp_indexer_repository::SourceError;
    use emp_indexer_shared::{CellValue, Snapshot};

    struct MockSource {
        snapshot: Option<Snapshot>,
    }

    #[async_trait]
    impl SourceRepository for MockSource {
        async fn fetch_all(&self) -> Result<Snapshot, SourceError> {
            self.snapshot
                .clone()
                .ok_or_else(|| SourceError::connection("refused"))
        }
    }

    #[tokio::test]
    async fn test_extract_writes_raw_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = RunContext::fixed(
            dir.path().join("raw.csv"),
            dir.path().join("clean.csv"),
        );
        let snapshot = Snapshot::new(
            vec!["id".to_string()],
            vec![vec![CellValue::Int(1)], vec![CellValue::Int(2)]],
        );
        let extractor = SnapshotExtractor::new(Arc::new(MockSource {
            snapshot: Some(snapshot.clone()),
        }));

        let rows = extractor.execute(&ctx).await.unwrap();

        assert_eq!(rows, 2);
        assert_eq!(staging::read_snapshot(&ctx.raw_snapshot).unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_connection_failure_leaves_no_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = RunContext::fixed(
            dir.path().join("raw.csv"),
            dir.path().join("clean.csv"),
        );
        let extractor = SnapshotExtractor::new(Arc::new(MockSource { snapshot: None }));

        let err = extractor.execute(&ctx).await.unwrap_err();

        assert!(matches!(err, PipelineError::Connection(_)));
        assert!(!ctx.raw_snapshot.exists());
    }
}
