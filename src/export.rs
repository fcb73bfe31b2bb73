use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone};
use thiserror::Error;

use crate::calendar::Event;

pub const EXPORT_FILE_NAME: &str = "google_calendar_events.csv";
pub const CSV_HEADER: &str = "Event Name,Date,Time,Description";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write CSV file: {0}")]
    WriteError(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportFormat {
    pub date_format: String,
    pub time_format: String,
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            time_format: "%H:%M:%S".to_string(),
        }
    }
}

pub fn csv_document(events: &[Event], format: &ExportFormat) -> String {
    csv_document_in(events, &Local, format)
}

/// Renders the header plus one row per event. Rows are joined with a
/// single newline and the document carries no trailing newline, so an
/// empty list yields exactly the header row.
pub fn csv_document_in<Tz: TimeZone>(events: &[Event], tz: &Tz, format: &ExportFormat) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut rows = vec![CSV_HEADER.to_string()];

    for event in events {
        let start = event.effective_start().with_timezone(tz);
        let fields = [
            quote_field(event.display_title()),
            quote_field(&start.format(&format.date_format).to_string()),
            quote_field(&start.format(&format.time_format).to_string()),
            quote_field(event.description.as_deref().unwrap_or("")),
        ];
        rows.push(fields.join(","));
    }

    rows.join("\n")
}

/// Standard CSV escaping: fields containing a comma, quote, or newline
/// are wrapped in quotes with embedded quotes doubled.
fn quote_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn write_csv(
    events: &[Event],
    directory: &Path,
    format: &ExportFormat,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(directory)?;
    let path = directory.join(EXPORT_FILE_NAME);
    fs::write(&path, csv_document(events, format))?;
    tracing::info!("Exported {} events to {}", events.len(), path.display());
    Ok(path)
}
