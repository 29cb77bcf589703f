//! Staging-file codec.
//!
//! Snapshots travel between tasks as comma-delimited UTF-8 files with a
//! header row. Values are typed on read with the same inference the
//! writer inverts, so a snapshot survives the round trip unchanged.

use std::path::Path;

use tracing::debug;

use crate::errors::PipelineError;
use emp_indexer_shared::{CellValue, Snapshot};

/// Write a snapshot to a staging file, overwriting any prior one.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), PipelineError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&snapshot.columns)?;
    for row in &snapshot.rows {
        writer.write_record(row.iter().map(CellValue::to_csv_field))?;
    }
    writer.flush()?;

    debug!(
        path = %path.display(),
        rows = snapshot.row_count(),
        "Wrote staging snapshot"
    );
    Ok(())
}

/// Read a snapshot from a staging file.
///
/// An absent file is a `MissingInput` error; emptiness is the caller's
/// concern since only the cleaner treats it as fatal.
pub fn read_snapshot(path: &Path) -> Result<Snapshot, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::missing_input(path));
    }

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(CellValue::from_csv_field).collect());
    }

    debug!(
        path = %path.display(),
        rows = rows.len(),
        "Read staging snapshot"
    );
    Ok(Snapshot::new(columns, rows))
}
