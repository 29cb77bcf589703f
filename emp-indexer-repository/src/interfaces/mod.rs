//! Abstract interfaces for the pipeline's external collaborators.

mod search_engine_client;
mod source_repository;

pub use search_engine_client::SearchEngineClient;
pub use source_repository::SourceRepository;
