//! Target index configuration.

/// Configuration for the index documents are submitted to.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Name of the target index.
    pub name: String,
}

impl IndexConfig {
    /// Create a config for the given index name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
