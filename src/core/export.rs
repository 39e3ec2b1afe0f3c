// EMR Log Analyser - core/export.rs
//
// CSV and JSON export of record sets.
// Core layer: writes to any Write implementor; the caller opens the file.

use crate::core::model::{AccessLogRecord, AppLogRecord};
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Output format chosen from the export path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// `.csv` or `.json` (case-insensitive); anything else is rejected.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Records that can be written as CSV rows.
///
/// The header is fixed per record type so an empty set still produces a
/// header row. Columns follow the struct's field order.
pub trait Exportable: Serialize {
    const CSV_HEADER: &'static [&'static str];
}

impl Exportable for AccessLogRecord {
    const CSV_HEADER: &'static [&'static str] = &[
        "line_number",
        "client_address",
        "ident",
        "user",
        "timestamp",
        "method",
        "path",
        "protocol",
        "status",
        "size",
        "referrer",
        "user_agent",
    ];
}

impl Exportable for AppLogRecord {
    const CSV_HEADER: &'static [&'static str] = &[
        "line_number",
        "dialect",
        "timestamp",
        "level",
        "thread",
        "class",
        "message",
    ];
}

/// Export records as CSV. The header row is always written.
pub fn export_csv<R, W>(records: &[R], writer: W, export_path: &Path) -> Result<usize, ExportError>
where
    R: Exportable,
    W: Write,
{
    let csv_error = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(R::CSV_HEADER).map_err(csv_error)?;
    for record in records {
        csv_writer.serialize(record).map_err(csv_error)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(records.len())
}

/// Export records as a pretty-printed JSON array.
pub fn export_json<R, W>(records: &[R], writer: W, export_path: &Path) -> Result<usize, ExportError>
where
    R: Serialize,
    W: Write,
{
    serde_json::to_writer_pretty(writer, records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}

/// Export in the given format.
pub fn export_records<R, W>(
    records: &[R],
    format: ExportFormat,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError>
where
    R: Exportable,
    W: Write,
{
    match format {
        ExportFormat::Csv => export_csv(records, writer, export_path),
        ExportFormat::Json => export_json(records, writer, export_path),
    }
}
