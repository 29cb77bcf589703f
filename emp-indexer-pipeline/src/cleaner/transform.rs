//! Pure cleaning transform.
//!
//! Everything in this module operates on in-memory snapshots only; the
//! task in the parent module wraps it with staging reads and writes. The
//! steps run in a fixed order: dedup, null fill, column-name
//! normalization, hire-date rewriting.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::PipelineError;
use emp_indexer_shared::{CellValue, Snapshot};

/// Sentinel stored in place of a missing non-numeric value.
pub const MISSING_SENTINEL: &str = "Unknown";

/// Column rewritten to calendar-date form when present (post-normalization).
pub const HIRE_DATE_COLUMN: &str = "hire_date";

/// Clean a raw snapshot.
///
/// Deduplicates by full-row equality (first occurrence wins), fills nulls
/// per column (median for numeric columns, [`MISSING_SENTINEL`] for the
/// rest), trims and lower-cases column names, and rewrites any
/// `hire_date` column to `YYYY-MM-DD`. An unparseable hire date is fatal.
pub fn clean(snapshot: &Snapshot) -> Result<Snapshot, PipelineError> {
    let mut rows = dedup_rows(&snapshot.rows);
    fill_missing(snapshot.column_count(), &mut rows);
    let columns = normalize_columns(&snapshot.columns);
    normalize_hire_dates(&columns, &mut rows)?;
    Ok(Snapshot::new(columns, rows))
}

/// Drop rows that fully equal an earlier row.
fn dedup_rows(rows: &[Vec<CellValue>]) -> Vec<Vec<CellValue>> {
    let mut seen: HashSet<&[CellValue]> = HashSet::with_capacity(rows.len());
    let mut unique = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(row.as_slice()) {
            unique.push(row.clone());
        }
    }
    unique
}

/// Replace nulls column by column.
fn fill_missing(column_count: usize, rows: &mut [Vec<CellValue>]) {
    for column in 0..column_count {
        if let Some(fill) = column_fill_value(column, rows) {
            for row in rows.iter_mut() {
                if row[column].is_null() {
                    row[column] = fill.clone();
                }
            }
        }
    }
}

/// Fill value for one column, or `None` when the column has no nulls.
///
/// A column is numeric when it has at least one non-null value and every
/// non-null value is numeric; its fill is the median over the non-null
/// values. Every other column, including an all-null one, fills with the
/// sentinel.
fn column_fill_value(column: usize, rows: &[Vec<CellValue>]) -> Option<CellValue> {
    if !rows.iter().any(|row| row[column].is_null()) {
        return None;
    }

    let non_null: Vec<&CellValue> = rows
        .iter()
        .map(|row| &row[column])
        .filter(|value| !value.is_null())
        .collect();

    if non_null.is_empty() || !non_null.iter().all(|value| value.is_numeric()) {
        return Some(CellValue::Text(MISSING_SENTINEL.to_string()));
    }

    let mut values: Vec<f64> = non_null.iter().filter_map(|value| value.as_f64()).collect();
    let median = median(&mut values);

    // An all-integer column keeps its integer shape when the median lands
    // on a whole number (even counts can still produce a .5 median).
    let all_int = non_null
        .iter()
        .all(|value| matches!(value, CellValue::Int(_)));
    if all_int && median.fract() == 0.0 {
        Some(CellValue::Int(median as i64))
    } else {
        Some(CellValue::Float(median))
    }
}

/// Median of the values; even counts average the two middle values.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Trim and lower-case column names.
fn normalize_columns(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|column| column.trim().to_lowercase())
        .collect()
}

/// Rewrite every `hire_date` value to `YYYY-MM-DD`.
fn normalize_hire_dates(
    columns: &[String],
    rows: &mut [Vec<CellValue>],
) -> Result<(), PipelineError> {
    let Some(column) = columns.iter().position(|name| name == HIRE_DATE_COLUMN) else {
        return Ok(());
    };

    for row in rows.iter_mut() {
        let text = match &row[column] {
            CellValue::Text(text) => text,
            other => {
                return Err(PipelineError::parse(format!(
                    "hire_date value {:?} is not a calendar date",
                    other
                )))
            }
        };
        let date = parse_calendar_date(text).ok_or_else(|| {
            PipelineError::parse(format!("hire_date value {:?} is not a calendar date", text))
        })?;
        row[column] = CellValue::Text(date.format("%Y-%m-%d").to_string());
    }
    Ok(())
}

/// Parse a date from the accepted input forms.
fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date());
        }
    }
    None
}
