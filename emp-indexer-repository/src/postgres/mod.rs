//! PostgreSQL implementation of the source repository.

mod client;

pub use client::{PostgresSource, SourceConfig};
