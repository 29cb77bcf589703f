//! Error types for the ETL pipeline.
//!
//! Every variant is fatal to the current task; the orchestrator decides
//! whether a retry budget remains before aborting the run.

use std::path::Path;

use thiserror::Error;

use emp_indexer_repository::{SearchError, SourceError};

/// Errors that can occur while running the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An expected staging file is absent.
    #[error("Missing input: staging file {0} does not exist")]
    MissingInput(String),

    /// A staging file is present but holds no data rows.
    #[error("Empty input: staging file {0} has no rows")]
    EmptyInput(String),

    /// A database or search engine connection or health probe failed.
    #[error("Connection failure: {0}")]
    Connection(String),

    /// A value could not be converted to its expected type.
    #[error("Parse failure: {0}")]
    Parse(String),

    /// A bulk indexing request failed.
    #[error("Submission failure: {0}")]
    Submission(String),

    /// Error from the source repository other than a connection failure.
    #[error("Source error: {0}")]
    Source(String),

    /// Error from the search engine other than connection or bulk failure.
    #[error("Search error: {0}")]
    Search(String),

    /// Staging file I/O error.
    #[error("Staging I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Staging file codec error.
    #[error("Staging codec error: {0}")]
    Csv(#[from] csv::Error),
}

impl PipelineError {
    /// Create a missing-input error for a staging path.
    pub fn missing_input(path: &Path) -> Self {
        Self::MissingInput(path.display().to_string())
    }

    /// Create an empty-input error for a staging path.
    pub fn empty_input(path: &Path) -> Self {
        Self::EmptyInput(path.display().to_string())
    }

    /// Create a connection failure.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a parse failure.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a submission failure.
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }
}

impl From<SourceError> for PipelineError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::ConnectionError(msg) => Self::Connection(msg),
            other => Self::Source(other.to_string()),
        }
    }
}

impl From<SearchError> for PipelineError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::ConnectionError(msg) => Self::Connection(msg),
            SearchError::BulkIndexError(msg) => Self::Submission(msg),
            other => Self::Search(other.to_string()),
        }
    }
}
