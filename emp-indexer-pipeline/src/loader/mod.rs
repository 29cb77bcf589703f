//! Loader task.
//!
//! Bulk-indexes the clean snapshot into the search engine.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::context::RunContext;
use crate::errors::PipelineError;
use crate::staging;
use crate::task::PipelineTask;
use emp_indexer_repository::SearchEngineClient;
use emp_indexer_shared::{CellValue, IndexDocument};

/// Task id of the loader.
pub const LOAD_TASK_ID: &str = "load";

/// Configuration for the document loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents submitted per bulk request.
    pub batch_size: usize,
    /// Whether a failed bulk submission aborts the task.
    ///
    /// When disabled the failure is logged and the remaining batches
    /// still submit.
    pub fail_on_submission_error: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            fail_on_submission_error: true,
        }
    }
}

/// Loader that submits clean records to the search engine.
///
/// The liveness probe runs before the clean snapshot is read, so an
/// unreachable engine fails the task without touching staging.
pub struct DocumentLoader {
    client: Arc<dyn SearchEngineClient>,
    config: LoaderConfig,
}

impl DocumentLoader {
    /// Create a new loader with the default configuration.
    pub fn new(client: Arc<dyn SearchEngineClient>) -> Self {
        Self {
            client,
            config: LoaderConfig::default(),
        }
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(client: Arc<dyn SearchEngineClient>, config: LoaderConfig) -> Self {
        Self { client, config }
    }
}

/// Build an index document from one record, dropping null fields.
///
/// Pure by design so the shape of submitted documents is testable apart
/// from the bulk-submission side effect.
pub fn document_from_record(columns: &[String], row: &[CellValue]) -> IndexDocument {
    let mut document = IndexDocument::new();
    for (column, value) in columns.iter().zip(row) {
        let json = value.to_json();
        if json.is_null() {
            continue;
        }
        document.insert(column.clone(), json);
    }
    document
}

#[async_trait]
impl PipelineTask for DocumentLoader {
    fn id(&self) -> &str {
        LOAD_TASK_ID
    }

    #[instrument(skip(self, ctx), fields(run_id = %ctx.run_id))]
    async fn execute(&self, ctx: &RunContext) -> Result<u64, PipelineError> {
        let healthy = self
            .client
            .health_check()
            .await
            .map_err(|e| PipelineError::connection(e.to_string()))?;
        if !healthy {
            return Err(PipelineError::connection(
                "search engine health probe failed",
            ));
        }

        let snapshot = staging::read_snapshot(&ctx.clean_snapshot)?;

        let mut indexed: u64 = 0;
        for chunk in snapshot.rows.chunks(self.config.batch_size.max(1)) {
            let documents: Vec<IndexDocument> = chunk
                .iter()
                .map(|row| document_from_record(&snapshot.columns, row))
                .collect();

            match self.client.bulk_index(&documents).await {
                Ok(()) => indexed += documents.len() as u64,
                Err(e) if self.config.fail_on_submission_error => return Err(e.into()),
                Err(e) => {
                    warn!(
                        error = %e,
                        count = documents.len(),
                        "Bulk submission failed; continuing with remaining batches"
                    );
                }
            }
        }

        info!(indexed, "Indexed documents into search engine");
        Ok(indexed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emp_indexer_repository::SearchError;
    use emp_indexer_shared::Snapshot;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock search client for testing.
    struct MockSearchClient {
        healthy: bool,
        fail_bulk: bool,
        indexed_count: AtomicUsize,
        batch_sizes: Mutex<Vec<usize>>,
    }

    impl MockSearchClient {
        fn new() -> Self {
            Self {
                healthy: true,
                fail_bulk: false,
                indexed_count: AtomicUsize::new(0),
                batch_sizes: Mutex::new(Vec::new()),
            }
        }

        fn unhealthy() -> Self {
            Self {
                healthy: false,
                ..Self::new()
            }
        }

        fn failing() -> Self {
            Self {
                fail_bulk: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl SearchEngineClient for MockSearchClient {
        async fn health_check(&self) -> Result<bool, SearchError> {
            Ok(self.healthy)
        }

        async fn bulk_index(&self, documents: &[IndexDocument]) -> Result<(), SearchError> {
            if self.fail_bulk {
                return Err(SearchError::bulk_index("simulated failure"));
            }
            self.batch_sizes.lock().unwrap().push(documents.len());
            self.indexed_count.fetch_add(documents.len(), Ordering::SeqCst);
            Ok(())
        }
    }

    fn context(dir: &tempfile::TempDir) -> RunContext {
        RunContext::fixed(dir.path().join("raw.csv"), dir.path().join("clean.csv"))
    }

    fn snapshot_with_rows(count: i64) -> Snapshot {
        Snapshot::new(
            vec!["id".to_string()],
            (0..count).map(|i| vec![CellValue::Int(i)]).collect(),
        )
    }

    #[test]
    fn test_document_from_record_drops_nulls() {
        let columns = vec!["id".to_string(), "name".to_string(), "note".to_string()];
        let row = vec![
            CellValue::Int(7),
            CellValue::Text("Alice".to_string()),
            CellValue::Null,
        ];

        let document = document_from_record(&columns, &row);

        assert_eq!(document.len(), 2);
        assert_eq!(document["id"], json!(7));
        assert_eq!(document["name"], json!("Alice"));
        assert!(!document.contains_key("note"));
    }

    #[tokio::test]
    async fn test_unreachable_engine_fails_before_reading_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        // No clean snapshot on disk: a health failure must surface as a
        // connection error, not a missing-input error.
        let loader = DocumentLoader::new(Arc::new(MockSearchClient::unhealthy()));

        let err = loader.execute(&ctx).await.unwrap_err();

        assert!(matches!(err, PipelineError::Connection(_)));
    }

    #[tokio::test]
    async fn test_batches_are_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        staging::write_snapshot(&ctx.clean_snapshot, &snapshot_with_rows(1200)).unwrap();

        let client = Arc::new(MockSearchClient::new());
        let loader = DocumentLoader::with_config(
            client.clone(),
            LoaderConfig {
                batch_size: 500,
                fail_on_submission_error: true,
            },
        );

        let indexed = loader.execute(&ctx).await.unwrap();

        assert_eq!(indexed, 1200);
        assert_eq!(*client.batch_sizes.lock().unwrap(), vec![500, 500, 200]);
    }

    #[tokio::test]
    async fn test_submission_failure_is_fatal_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        staging::write_snapshot(&ctx.clean_snapshot, &snapshot_with_rows(3)).unwrap();

        let loader = DocumentLoader::new(Arc::new(MockSearchClient::failing()));

        let err = loader.execute(&ctx).await.unwrap_err();

        assert!(matches!(err, PipelineError::Submission(_)));
    }

    #[tokio::test]
    async fn test_submission_failure_can_degrade_to_warning() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        staging::write_snapshot(&ctx.clean_snapshot, &snapshot_with_rows(3)).unwrap();

        let loader = DocumentLoader::with_config(
            Arc::new(MockSearchClient::failing()),
            LoaderConfig {
                batch_size: 500,
                fail_on_submission_error: false,
            },
        );

        let indexed = loader.execute(&ctx).await.unwrap();

        assert_eq!(indexed, 0);
    }
}
