//! Error types for the repository layer.

mod search_error;
mod source_error;

pub use search_error::SearchError;
pub use source_error::SourceError;
