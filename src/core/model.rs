// EMR Log Analyser - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::error::SelectionError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Log family
// =============================================================================

/// Which grammar set applies to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogFamily {
    /// Web-server access log in combined log format.
    Apache,
    /// Java application-server console log (two dialects).
    Catalina,
}

impl LogFamily {
    /// Name used on the command line and in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFamily::Apache => "apache",
            LogFamily::Catalina => "catalina",
        }
    }

    /// Title-cased label for report lines ("Processed 3 Apache log entries").
    pub fn label(&self) -> &'static str {
        match self {
            LogFamily::Apache => "Apache",
            LogFamily::Catalina => "Catalina",
        }
    }
}

impl fmt::Display for LogFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFamily {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apache" => Ok(LogFamily::Apache),
            "catalina" => Ok(LogFamily::Catalina),
            other => Err(SelectionError::UnknownFamily {
                value: other.to_string(),
            }),
        }
    }
}

/// Which of the two application-server grammars produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppDialect {
    /// `LEVEL - class |timestamp| message` (log4j layout).
    Structured,
    /// `DD-Mon-YYYY HH:MM:SS.mmm LEVEL [thread] class message` (catalina.out).
    Native,
}

// =============================================================================
// Records
// =============================================================================

/// One line of a web-server access log.
///
/// All fields are kept as the raw text the line carried; in particular the
/// status code is a string so its exact formatting survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessLogRecord {
    /// 1-based line number in the source file.
    pub line_number: u64,
    pub client_address: String,
    pub ident: String,
    pub user: String,
    /// Bracketed timestamp text, without the brackets.
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub protocol: String,
    pub status: String,
    pub size: String,
    pub referrer: String,
    pub user_agent: String,
}

impl AccessLogRecord {
    /// Rebuild a combined-format line from the extracted fields.
    pub fn to_combined_line(&self) -> String {
        format!(
            "{} {} {} [{}] \"{} {} {}\" {} {} \"{}\" \"{}\"",
            self.client_address,
            self.ident,
            self.user,
            self.timestamp,
            self.method,
            self.path,
            self.protocol,
            self.status,
            self.size,
            self.referrer,
            self.user_agent,
        )
    }
}

/// One line of an application-server console log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppLogRecord {
    /// 1-based line number in the source file.
    pub line_number: u64,
    pub dialect: AppDialect,
    /// Opaque timestamp text; the two dialects use different layouts and
    /// neither is converted to a date type.
    pub timestamp: String,
    pub level: String,
    /// Thread name. Only the native dialect carries one.
    pub thread: Option<String>,
    pub class: String,
    pub message: String,
}

impl AppLogRecord {
    /// Thread name, or the empty string when the dialect has none.
    pub fn thread_name(&self) -> &str {
        self.thread.as_deref().unwrap_or("")
    }
}

/// A record of either family, as returned by the family-dispatching parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    Access(AccessLogRecord),
    App(AppLogRecord),
}

impl LogRecord {
    pub fn family(&self) -> LogFamily {
        match self {
            LogRecord::Access(_) => LogFamily::Apache,
            LogRecord::App(_) => LogFamily::Catalina,
        }
    }
}

/// Ordered records of one type, in file line order.
pub type RecordSet<R> = Vec<R>;

/// Records of whichever family a file was ingested as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Records {
    Access(RecordSet<AccessLogRecord>),
    App(RecordSet<AppLogRecord>),
}

impl Records {
    pub fn family(&self) -> LogFamily {
        match self {
            Records::Access(_) => LogFamily::Apache,
            Records::App(_) => LogFamily::Catalina,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Records::Access(r) => r.len(),
            Records::App(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_str() {
        assert_eq!("apache".parse::<LogFamily>(), Ok(LogFamily::Apache));
        assert_eq!("catalina".parse::<LogFamily>(), Ok(LogFamily::Catalina));
        assert_eq!(
            "nginx".parse::<LogFamily>(),
            Err(SelectionError::UnknownFamily {
                value: "nginx".to_string()
            })
        );
    }

    #[test]
    fn test_family_is_case_sensitive() {
        assert!("Apache".parse::<LogFamily>().is_err());
    }

    #[test]
    fn test_thread_name_defaults_to_empty() {
        let record = AppLogRecord {
            line_number: 1,
            dialect: AppDialect::Structured,
            timestamp: "2024-01-01T10:00:00,000".to_string(),
            level: "INFO".to_string(),
            thread: None,
            class: "Foo".to_string(),
            message: "hi".to_string(),
        };
        assert_eq!(record.thread_name(), "");
    }
}
