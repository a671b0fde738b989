// ── CSV export ──
//
// Serializes the loaded vehicle list to CSV. Every field is quoted and
// embedded quotes are doubled. Timestamps are written exactly as the
// API reported them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::model::VehicleEntry;

/// Header line of every export.
pub const CSV_HEADER: &str = "Vehicle No,Visitor No,Phone,Purpose,In Time,Out Time,Status";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export")]
    Empty,

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn push_field(line: &mut String, value: &str) {
    line.push('"');
    line.push_str(&value.replace('"', "\"\""));
    line.push('"');
}

/// Render `entries` as CSV text in input order.
pub fn export_csv(entries: &[Arc<VehicleEntry>]) -> Result<String, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut out = String::with_capacity(CSV_HEADER.len() + entries.len() * 96);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for entry in entries {
        let status = entry.status().to_string();
        let fields = [
            entry.vehicle_no.as_str(),
            entry.visitor_name.as_deref().unwrap_or_default(),
            entry.phone.as_deref().unwrap_or_default(),
            entry.purpose.as_deref().unwrap_or_default(),
            entry.in_time.as_str(),
            entry.out_time.as_deref().unwrap_or_default(),
            status.as_str(),
        ];
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            push_field(&mut out, field);
        }
        out.push('\n');
    }

    Ok(out)
}

/// `vehicle_logs_YYYY-MM-DD.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("vehicle_logs_{}.csv", date.format("%Y-%m-%d"))
}

/// Write the export for `date` into `dir`, returning the file path.
///
/// Nothing is written when `entries` is empty.
pub fn write_export(
    dir: &Path,
    entries: &[Arc<VehicleEntry>],
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let csv = export_csv(entries)?;
    let path = dir.join(export_file_name(date));
    std::fs::write(&path, csv).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), rows = entries.len(), "exported vehicle log");
    Ok(path)
}
