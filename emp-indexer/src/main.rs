//! Entry point for the employee-performance ETL indexer.
//!
//! Executes exactly one pipeline run; the external scheduler owns
//! recurrence and surfaces failures through the process exit status.

use tracing::info;
use tracing_subscriber::EnvFilter;

use emp_indexer::{Dependencies, IndexingError, Settings};

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;
    info!(
        cron = %settings.schedule.cron,
        timezone = %settings.schedule.timezone,
        catchup = settings.schedule.catchup,
        "Pipeline schedule (applied by the external scheduler)"
    );

    let deps = Dependencies::new(&settings)?;
    let reports = deps.pipeline.run().await?;

    for report in &reports {
        info!(
            task_id = %report.task_id,
            records = report.records,
            "Task completed"
        );
    }

    Ok(())
}
