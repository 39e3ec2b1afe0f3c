// EMR Log Analyser - app/ingest.rs
//
// File ingestion: opens a log file and streams it through the core parser
// for the selected family. The file handle lives inside the BufReader and
// is released on every return path.

use crate::core::model::{AccessLogRecord, AppLogRecord, LogFamily, Records};
use crate::core::parser::{self, ParseResult};
use crate::util::error::{AnalyserError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| AnalyserError::Io {
        path: path.to_path_buf(),
        operation: "open log file",
        source: e,
    })?;
    Ok(BufReader::new(file))
}

/// Ingest an access log. Any malformed line fails the whole file.
pub fn ingest_access(path: &Path) -> Result<ParseResult<AccessLogRecord>> {
    tracing::info!(file = %path.display(), "Using Apache access log parser");
    let result = parser::parse_access_stream(open(path)?, path)?;
    tracing::info!(
        file = %path.display(),
        records = result.records.len(),
        "Apache log ingested"
    );
    Ok(result)
}

/// Ingest an application-server log, skipping lines no dialect accepts.
/// An empty result is reported as a warning, never an error.
pub fn ingest_app(path: &Path) -> Result<ParseResult<AppLogRecord>> {
    tracing::info!(file = %path.display(), "Using Tomcat log parser for Catalina logs");
    let result = parser::parse_app_stream(open(path)?, path)?;

    if result.records.is_empty() {
        tracing::warn!(
            file = %path.display(),
            lines = result.lines_processed,
            "No valid log entries found"
        );
    } else {
        tracing::info!(
            file = %path.display(),
            records = result.records.len(),
            skipped = result.skipped,
            "Catalina log ingested"
        );
    }
    Ok(result)
}

/// Ingest `path` with the grammar set of `family`.
pub fn ingest(path: &Path, family: LogFamily) -> Result<Records> {
    match family {
        LogFamily::Apache => ingest_access(path).map(|r| Records::Access(r.records)),
        LogFamily::Catalina => ingest_app(path).map(|r| Records::App(r.records)),
    }
}
