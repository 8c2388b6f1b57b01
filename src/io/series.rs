//! Read/write series JSON files.
//!
//! Series JSON is the "portable" representation of one search: metadata, the
//! derived change fields, and every point. `qc plot` reloads it to re-render
//! without touching the network.

use std::fs::File;
use std::path::Path;

use crate::domain::QuoteSeries;
use crate::error::AppError;

/// Write a series JSON file.
pub fn write_series_json(path: &Path, series: &QuoteSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create series JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, series)
        .map_err(|e| AppError::new(2, format!("Failed to write series JSON: {e}")))?;

    Ok(())
}

/// Read a series JSON file.
pub fn read_series_json(path: &Path) -> Result<QuoteSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open series JSON '{}': {e}", path.display())))?;
    let series: QuoteSeries =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid series JSON: {e}")))?;
    Ok(series)
}
