//! Source repository trait definition.
//!
//! This module defines the abstract interface for extracting rows from the
//! relational source, allowing for different backends and for mock
//! implementations in tests.

use async_trait::async_trait;

use crate::errors::SourceError;
use emp_indexer_shared::Snapshot;

/// Abstract interface for the relational source database.
///
/// Implementations open a dedicated connection per call and release it
/// unconditionally before returning, success or not.
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Fetch the full source table as an in-memory snapshot.
    ///
    /// The column schema is discovered at runtime from the query result.
    /// A connection or query failure is fatal; no partial result is
    /// returned.
    async fn fetch_all(&self) -> Result<Snapshot, SourceError>;
}
