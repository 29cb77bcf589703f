//! Dependency initialization and wiring for the indexer.

use std::fs;
use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::IndexingError;
use emp_indexer_pipeline::{
    cleaner::SnapshotCleaner,
    extractor::SnapshotExtractor,
    loader::{DocumentLoader, LoaderConfig},
    Pipeline, PipelineConfig, PipelineTask,
};
use emp_indexer_repository::{IndexConfig, OpenSearchClient, PostgresSource, SourceConfig};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured pipeline ready to run.
    pub pipeline: Pipeline,
}

impl Dependencies {
    /// Initialize all dependencies from the given settings.
    ///
    /// Construction wires clients and tasks without touching the network;
    /// the loader probes the search engine at task start, so an
    /// unreachable engine fails the load task rather than startup.
    pub fn new(settings: &Settings) -> Result<Self, IndexingError> {
        info!(
            source_table = %settings.database.table,
            search_url = %settings.search.url,
            search_index = %settings.search.index,
            staging_dir = %settings.staging.dir.display(),
            "Initializing dependencies"
        );

        fs::create_dir_all(&settings.staging.dir)?;

        let source = PostgresSource::new(SourceConfig {
            url: settings.database.connection_url(),
            table: settings.database.table.clone(),
        });

        let search_client = OpenSearchClient::new(
            &settings.search.url,
            IndexConfig::new(settings.search.index.clone()),
        )
        .map_err(|e| IndexingError::config(format!("Failed to create search client: {}", e)))?;

        let ctx = settings.staging.run_context();

        let tasks: Vec<Box<dyn PipelineTask>> = vec![
            Box::new(SnapshotExtractor::new(Arc::new(source))),
            Box::new(SnapshotCleaner::new()),
            Box::new(DocumentLoader::with_config(
                Arc::new(search_client),
                LoaderConfig {
                    batch_size: settings.search.batch_size,
                    fail_on_submission_error: settings.search.fail_on_submission_error,
                },
            )),
        ];

        let pipeline = Pipeline::with_config(
            ctx,
            tasks,
            PipelineConfig {
                task_retries: settings.schedule.task_retries,
            },
        );

        Ok(Self { pipeline })
    }
}
