//! # Emp Indexer Shared
//!
//! Shared types and data structures for the employee-performance ETL
//! indexer. The source schema is discovered at runtime, so records are
//! modelled as runtime-typed cell values rather than fixed structs.

pub mod record;
pub mod snapshot;

pub use record::CellValue;
pub use snapshot::Snapshot;

/// A document ready for bulk submission to the search index.
///
/// Field names come from the cleaned snapshot's columns; null fields are
/// dropped before the document is built.
pub type IndexDocument = serde_json::Map<String, serde_json::Value>;
