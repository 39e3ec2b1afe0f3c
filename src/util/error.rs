// EMR Log Analyser - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use crate::core::filter::FilterField;
use crate::core::model::LogFamily;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all analyser operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum AnalyserError {
    /// Unsupported log family or filter field requested.
    Selection(SelectionError),

    /// Log file parsing failed.
    Parse(ParseError),

    /// Export operation failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for AnalyserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selection(e) => write!(f, "Invalid selection: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for AnalyserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Selection(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection errors
// ---------------------------------------------------------------------------

/// The caller asked for something the analyser does not support.
/// Always raised before any file is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Log family name is not `apache` or `catalina`.
    UnknownFamily { value: String },

    /// Filter field name is not one of the known fields.
    UnknownField { value: String },

    /// Filter field exists but belongs to the other log family.
    FieldNotSupported {
        field: FilterField,
        family: LogFamily,
    },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFamily { value } => write!(
                f,
                "unknown log type '{value}'. Please use 'apache' or 'catalina'"
            ),
            Self::UnknownField { value } => write!(f, "unknown filter field '{value}'"),
            Self::FieldNotSupported { field, family } => write!(
                f,
                "filter '{field}' is not supported for {family} logs"
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

impl From<SelectionError> for AnalyserError {
    fn from(e: SelectionError) -> Self {
        Self::Selection(e)
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors related to log file parsing.
#[derive(Debug)]
pub enum ParseError {
    /// A line did not match its family's grammar. Only raised for
    /// families where a single bad line invalidates the whole file.
    MalformedLine {
        file: PathBuf,
        line_number: u64,
        line: String,
    },

    /// I/O error while reading a log file.
    Io { file: PathBuf, source: io::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine {
                file,
                line_number,
                line,
            } => write!(
                f,
                "'{}' line {line_number}: log line does not match expected format: {line}",
                file.display()
            ),
            Self::Io { file, source } => {
                write!(f, "'{}': error reading log file: {source}", file.display())
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for AnalyserError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Output path has no recognised extension.
    UnknownFormat { path: PathBuf },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::UnknownFormat { path } => write!(
                f,
                "Cannot export to '{}': expected a .csv or .json extension",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::UnknownFormat { .. } => None,
        }
    }
}

impl From<ExportError> for AnalyserError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
///
/// Never fatal: `platform::config` returns them as warnings next to a
/// usable config.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for analyser results.
pub type Result<T> = std::result::Result<T, AnalyserError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_malformed_line_names_offending_content() {
        let err = ParseError::MalformedLine {
            file: PathBuf::from("access.log"),
            line_number: 3,
            line: "garbage here".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("line 3"));
        assert!(text.contains("garbage here"));
    }

    #[test]
    fn test_io_error_keeps_source_chain() {
        let err: AnalyserError = ParseError::Io {
            file: PathBuf::from("x.log"),
            source: io::Error::new(io::ErrorKind::Other, "disk gone"),
        }
        .into();
        let parse = err.source().expect("top-level error should have a source");
        let io = parse.source().expect("parse error should wrap the io error");
        assert_eq!(io.to_string(), "disk gone");
    }

    #[test]
    fn test_field_not_supported_message() {
        let err = SelectionError::FieldNotSupported {
            field: FilterField::Level,
            family: LogFamily::Apache,
        };
        assert_eq!(
            err.to_string(),
            "filter 'level' is not supported for apache logs"
        );
    }
}
