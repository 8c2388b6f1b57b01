//! Export series points to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::QuoteSeries;
use crate::error::AppError;

pub const CSV_HEADER: &str = "timestamp_ms,datetime,open,high,low,close,volume,adj_close";

/// Write one CSV row per point (exchange-local RFC 3339 datetime).
pub fn write_points_csv(path: &Path, series: &QuoteSeries) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_points(&mut file, series)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV: {e}")))
}

/// Same as `write_points_csv`, into any writer.
pub fn write_points<W: Write>(out: &mut W, series: &QuoteSeries) -> std::io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;

    for p in &series.points {
        let datetime = series
            .local_time(p)
            .map(|at| at.to_rfc3339())
            .unwrap_or_default();
        writeln!(
            out,
            "{},{},{},{},{},{:.4},{},{}",
            p.timestamp_ms,
            datetime,
            opt4(p.open),
            opt4(p.high),
            opt4(p.low),
            p.close,
            p.volume.map(|v| v.to_string()).unwrap_or_default(),
            opt4(p.adj_close),
        )?;
    }

    Ok(())
}

fn opt4(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.4}")).unwrap_or_default()
}
