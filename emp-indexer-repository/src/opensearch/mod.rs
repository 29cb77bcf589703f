//! OpenSearch implementation of the search engine client.

mod client;
mod index_config;

pub use client::OpenSearchClient;
pub use index_config::IndexConfig;
