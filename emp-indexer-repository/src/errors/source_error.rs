//! Source database error types.

use thiserror::Error;

/// Errors that can occur while extracting from the source database.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to establish a connection to the source database.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Query execution failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// A result column could not be decoded into a cell value.
    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl SourceError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }
}
