// EMR Log Analyser - app/analyse.rs
//
// One analysis run: validate the selection, ingest the file, apply the
// filter chain, optionally aggregate statistics and export the result.
//
// Selection problems (unknown family, filter for the wrong family, export
// path without a known extension) are reported before the log file is
// opened.

use crate::app::ingest;
use crate::core::export::{self, ExportFormat, Exportable};
use crate::core::filter::{FilterCriteria, Filterable};
use crate::core::model::{LogFamily, RecordSet, Records};
use crate::core::parser::ParseResult;
use crate::core::stats::{self, Statistics};
use crate::util::error::{ExportError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Everything the CLI layer hands over for one run.
#[derive(Debug, Clone)]
pub struct AnalyseRequest {
    pub log_file: PathBuf,
    pub family: LogFamily,
    pub filters: FilterCriteria,
    pub stats: bool,
    pub output: Option<PathBuf>,
}

impl AnalyseRequest {
    /// Build a request from raw CLI values.
    ///
    /// `family` is the `--type` string; it and the filters are validated here.
    pub fn new(
        log_file: PathBuf,
        family: &str,
        filters: FilterCriteria,
        stats: bool,
        output: Option<PathBuf>,
    ) -> Result<Self> {
        let family: LogFamily = family.parse()?;
        filters.validate(family)?;
        Ok(Self {
            log_file,
            family,
            filters,
            stats,
            output,
        })
    }
}

/// Result of a completed run, ready for the presentation layer.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub family: LogFamily,
    /// Records after filtering.
    pub records: Records,
    /// Present when statistics were requested for an app log.
    pub statistics: Option<Statistics>,
    /// Statistics were requested for a family that has none.
    pub statistics_unavailable: bool,
    /// Lines dropped as unrecognised during ingestion.
    pub skipped: u64,
    pub lines_processed: u64,
    /// Export path and number of records written.
    pub exported: Option<(PathBuf, usize)>,
}

impl AnalysisOutcome {
    /// Zero records after parsing and filtering. Informational, not an error.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn export_to<R: Exportable>(records: &[R], path: &Path, format: ExportFormat) -> Result<usize> {
    let file = File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    let count = export::export_records(records, format, &mut writer, path)?;
    writer.flush().map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), records = count, ?format, "Results exported");
    Ok(count)
}

/// Filter, then export if requested.
fn finish<R>(
    request: &AnalyseRequest,
    export_format: Option<ExportFormat>,
    parsed: ParseResult<R>,
) -> Result<(RecordSet<R>, Option<(PathBuf, usize)>)>
where
    R: Filterable + Exportable,
{
    let records = request.filters.apply(parsed.records)?;

    let exported = match (&request.output, export_format) {
        (Some(path), Some(format)) => Some((path.clone(), export_to(&records, path, format)?)),
        _ => None,
    };
    Ok((records, exported))
}

/// Run one analysis.
pub fn run(request: &AnalyseRequest) -> Result<AnalysisOutcome> {
    request.filters.validate(request.family)?;
    let export_format = request
        .output
        .as_deref()
        .map(ExportFormat::from_path)
        .transpose()?;

    tracing::info!(
        log_file = %request.log_file.display(),
        output = ?request.output,
        analysis_type = %request.family,
        filters = request.filters.predicates().len(),
        stats = request.stats,
        "Analysis configuration"
    );

    let outcome = match request.family {
        LogFamily::Apache => {
            let parsed = ingest::ingest_access(&request.log_file)?;
            let (skipped, lines_processed) = (parsed.skipped, parsed.lines_processed);
            let (records, exported) = finish(request, export_format, parsed)?;

            if request.stats {
                tracing::warn!("Statistics are not available for Apache access logs");
            }

            AnalysisOutcome {
                family: LogFamily::Apache,
                records: Records::Access(records),
                statistics: None,
                statistics_unavailable: request.stats,
                skipped,
                lines_processed,
                exported,
            }
        }
        LogFamily::Catalina => {
            let parsed = ingest::ingest_app(&request.log_file)?;
            let (skipped, lines_processed) = (parsed.skipped, parsed.lines_processed);
            let (records, exported) = finish(request, export_format, parsed)?;

            let statistics = if request.stats {
                tracing::info!("Generating Catalina statistics");
                Some(stats::aggregate(&records))
            } else {
                None
            };

            AnalysisOutcome {
                family: LogFamily::Catalina,
                records: Records::App(records),
                statistics,
                statistics_unavailable: false,
                skipped,
                lines_processed,
                exported,
            }
        }
    };

    tracing::info!(
        entries = outcome.records.len(),
        skipped = outcome.skipped,
        lines = outcome.lines_processed,
        "Analysis complete"
    );
    Ok(outcome)
}
