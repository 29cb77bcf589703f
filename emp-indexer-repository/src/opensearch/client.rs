//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of
//! `SearchEngineClient` using the OpenSearch Rust client. The bulk and
//! ping APIs are wire-compatible with Elasticsearch's, so either engine
//! works as the backend.

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    BulkParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::index_config::IndexConfig;
use emp_indexer_shared::IndexDocument;

/// OpenSearch client implementation.
///
/// Submits documents to a fixed target index using the bulk API, with a
/// ping-based liveness probe.
pub struct OpenSearchClient {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchClient {
    /// Create a new client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The search engine URL (e.g., "http://localhost:9200")
    /// * `index_config` - The target index configuration
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If connection setup fails
    pub fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            "Created search engine client"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Build the action/source line pairs for a bulk request.
    ///
    /// Documents carry no explicit id; the engine assigns one per indexed
    /// document.
    fn bulk_lines(documents: &[IndexDocument]) -> Vec<Value> {
        let mut lines = Vec::with_capacity(documents.len() * 2);
        for doc in documents {
            lines.push(json!({ "index": {} }));
            lines.push(Value::Object(doc.clone()));
        }
        lines
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        Ok(response.status_code().is_success())
    }

    async fn bulk_index(&self, documents: &[IndexDocument]) -> Result<(), SearchError> {
        if documents.is_empty() {
            return Ok(());
        }

        let body: Vec<JsonBody<Value>> = Self::bulk_lines(documents)
            .into_iter()
            .map(Into::into)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index_config.name))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        // The bulk endpoint answers 200 even when individual items failed;
        // the per-item status lives in the response body.
        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        if body["errors"].as_bool().unwrap_or(false) {
            let failed = body["items"]
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter(|item| item["index"]["error"].is_object())
                        .count()
                })
                .unwrap_or(0);
            error!(failed = failed, "Bulk response reported item failures");
            return Err(SearchError::bulk_index(format!(
                "{} documents failed to index",
                failed
            )));
        }

        debug!(count = documents.len(), "Bulk indexed documents");
        Ok(())
    }
}
