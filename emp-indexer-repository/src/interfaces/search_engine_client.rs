//! Search engine client trait definition.
//!
//! This module defines the abstract interface for search engine
//! operations, allowing for different backend implementations
//! (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use crate::errors::SearchError;
use emp_indexer_shared::IndexDocument;

/// Abstract interface for search engine operations.
///
/// The target index is part of the client's configuration; callers only
/// provide documents.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Lightweight liveness probe.
    ///
    /// Returns `Ok(true)` when the engine answered the probe, `Ok(false)`
    /// when it answered with a non-success status, and an error when it
    /// could not be reached at all.
    async fn health_check(&self) -> Result<bool, SearchError>;

    /// Submit a batch of documents in a single bulk request.
    ///
    /// The batch must already be bounded to the configured per-request
    /// size; this call does not split it further. A response reporting
    /// per-item failures is an error.
    async fn bulk_index(&self, documents: &[IndexDocument]) -> Result<(), SearchError>;
}
