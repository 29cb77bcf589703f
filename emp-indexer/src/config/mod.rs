//! Configuration for the indexer.
//!
//! Settings are read once from the environment at startup and stay
//! immutable for the run's lifetime. Defaults assume the docker-compose
//! deployment (`postgres` and `elasticsearch` service hosts).

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{
    DatabaseSettings, ScheduleSettings, SearchSettings, Settings, StagingSettings,
};
