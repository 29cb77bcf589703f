//! # Emp Indexer Repository
//!
//! This crate provides traits and implementations for the pipeline's two
//! external collaborators: the relational source database and the search
//! engine. It includes definitions for errors, interfaces, and concrete
//! implementations for PostgreSQL and OpenSearch.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;

pub use errors::{SearchError, SourceError};
pub use interfaces::{SearchEngineClient, SourceRepository};
pub use opensearch::{IndexConfig, OpenSearchClient};
pub use postgres::{PostgresSource, SourceConfig};
