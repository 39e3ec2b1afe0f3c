// EMR Log Analyser - core/parser.rs
//
// Line classification and field extraction for both log families, plus the
// streaming whole-file passes built on top of it.
// Core layer: accepts BufRead implementors, never touches the filesystem.
//
// Failure policy differs per family:
//   - apache: one fixed grammar; the first non-matching line aborts the
//     whole file with ParseError::MalformedLine.
//   - catalina: two dialects tried in order; non-matching lines (stack
//     traces, JVM banners) are counted, logged at debug, and dropped.

use crate::core::model::{
    AccessLogRecord, AppDialect, AppLogRecord, LogFamily, LogRecord, RecordSet,
};
use crate::util::constants;
use crate::util::error::ParseError;
use regex::{Captures, Regex};
use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::sync::OnceLock;

/// A line did not match any grammar of the requested family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoMatch;

impl fmt::Display for NoMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("line does not match any known log format")
    }
}

/// Outcome of parsing one whole file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult<R> {
    /// Successfully parsed records, in file order.
    pub records: RecordSet<R>,
    /// Non-blank lines that matched no grammar and were dropped.
    pub skipped: u64,
    /// Total lines read, blank lines included.
    pub lines_processed: u64,
}

// =============================================================================
// Patterns
// =============================================================================
//
// Field separators are the ASCII class `[\t\n\f\r ]` rather than `\s`, which
// is Unicode-aware in `regex`. A no-break space is field content, not a
// separator.

/// Compile a built-in pattern. The patterns are fixed literals covered by the
/// unit tests below, so a failure here is a programming error.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in log pattern must compile")
}

/// Combined access-log grammar. Anchored at the start only; trailing text
/// after the user agent is tolerated.
fn access_pattern() -> &'static Regex {
    static ACCESS: OnceLock<Regex> = OnceLock::new();
    ACCESS.get_or_init(|| {
        compile(
            r#"^(?P<client>[^\t\n\f\r ]+) (?P<ident>[^\t\n\f\r ]+) (?P<user>[^\t\n\f\r ]+) \[(?P<timestamp>[^\]]+)\] "(?P<method>[^\t\n\f\r ]+) (?P<path>[^\t\n\f\r ]+) (?P<protocol>[^"]+)" (?P<status>[0-9]{3}) (?P<size>[^\t\n\f\r ]+) "(?P<referrer>[^"]*)" "(?P<agent>[^"]*)""#,
        )
    })
}

/// One application-server dialect: the grammar plus the tag it stamps on
/// records. Both patterns share group names; only the native one has
/// `thread`.
struct DialectMatcher {
    dialect: AppDialect,
    re: Regex,
}

/// App-log dialects in priority order. The first that matches wins.
fn app_dialects() -> &'static [DialectMatcher] {
    static DIALECTS: OnceLock<Vec<DialectMatcher>> = OnceLock::new();
    DIALECTS.get_or_init(|| {
        vec![
            // ERROR - com.example.Foo(12) |2024-01-01T10:00:00,000| connection refused
            DialectMatcher {
                dialect: AppDialect::Structured,
                re: compile(
                    r"^(?P<level>[A-Z]+)[\t\n\f\r ]*-[\t\n\f\r ]*(?P<class>[A-Za-z0-9_.<>$]+(?:\([0-9]+\))?)[\t\n\f\r ]*\|(?P<timestamp>[0-9T:,\-]+)\|[\t\n\f\r ]*(?P<message>.*)$",
                ),
            },
            // 01-Jan-2024 10:00:00.123 WARN [http-nio-8080] com.example.Bar Something happened
            DialectMatcher {
                dialect: AppDialect::Native,
                re: compile(
                    r"^(?P<timestamp>[0-9]{2}-[A-Za-z]{3}-[0-9]{4} [0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3})[\t\n\f\r ]+(?P<level>[A-Z]+)[\t\n\f\r ]+\[(?P<thread>[^\]]+)\][\t\n\f\r ]+(?P<class>[^\t\n\f\r ]+)[\t\n\f\r ]+(?P<message>.*)$",
                ),
            },
        ]
    })
}

fn group(caps: &Captures<'_>, name: &str) -> String {
    caps.name(name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

// =============================================================================
// Single-line parsing
// =============================================================================

/// Parse one access-log line. Surrounding whitespace is ignored.
pub fn parse_access_line(line: &str, line_number: u64) -> Result<AccessLogRecord, NoMatch> {
    let caps = access_pattern().captures(line.trim()).ok_or(NoMatch)?;

    Ok(AccessLogRecord {
        line_number,
        client_address: group(&caps, "client"),
        ident: group(&caps, "ident"),
        user: group(&caps, "user"),
        timestamp: group(&caps, "timestamp"),
        method: group(&caps, "method"),
        path: group(&caps, "path"),
        protocol: group(&caps, "protocol"),
        status: group(&caps, "status"),
        size: group(&caps, "size"),
        referrer: group(&caps, "referrer"),
        user_agent: group(&caps, "agent"),
    })
}

/// Parse one application-server line.
///
/// Returns `Ok(None)` for a line that is blank after trimming: it is neither
/// a record nor a failure.
pub fn parse_app_line(line: &str, line_number: u64) -> Result<Option<AppLogRecord>, NoMatch> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    for matcher in app_dialects() {
        if let Some(caps) = matcher.re.captures(line) {
            return Ok(Some(AppLogRecord {
                line_number,
                dialect: matcher.dialect,
                timestamp: group(&caps, "timestamp"),
                level: group(&caps, "level"),
                thread: caps.name("thread").map(|m| m.as_str().to_string()),
                class: group(&caps, "class"),
                message: group(&caps, "message"),
            }));
        }
    }

    Err(NoMatch)
}

/// Parse one line with the grammar set of `family`.
///
/// `Ok(None)` is only produced for blank app-log lines; a blank access-log
/// line does not match the combined grammar.
pub fn parse_line(
    line: &str,
    family: LogFamily,
    line_number: u64,
) -> Result<Option<LogRecord>, NoMatch> {
    match family {
        LogFamily::Apache => {
            parse_access_line(line, line_number).map(|r| Some(LogRecord::Access(r)))
        }
        LogFamily::Catalina => parse_app_line(line, line_number).map(|r| r.map(LogRecord::App)),
    }
}

// =============================================================================
// Whole-file parsing
// =============================================================================

/// Shorten a line for diagnostic output.
fn preview(line: &str) -> &str {
    match line.char_indices().nth(constants::DEBUG_MAX_LINE_PREVIEW) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

/// Feed every line of `reader` to `visit` with its 1-based line number.
///
/// Line terminators (`\n` or `\r\n`) are stripped and invalid UTF-8 is
/// replaced rather than rejected. Returns the number of lines read.
fn for_each_line<R, F>(mut reader: R, file: &Path, mut visit: F) -> Result<u64, ParseError>
where
    R: BufRead,
    F: FnMut(u64, &str) -> Result<(), ParseError>,
{
    let mut buf = Vec::new();
    let mut line_number: u64 = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| ParseError::Io {
                file: file.to_path_buf(),
                source: e,
            })?;
        if read == 0 {
            break;
        }
        line_number += 1;

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        let line = String::from_utf8_lossy(&buf);
        visit(line_number, &line)?;
    }

    Ok(line_number)
}

/// Parse a whole access log. The first malformed line aborts the pass.
pub fn parse_access_stream<R: BufRead>(
    reader: R,
    file: &Path,
) -> Result<ParseResult<AccessLogRecord>, ParseError> {
    let mut records = Vec::new();

    let lines_processed = for_each_line(reader, file, |line_number, line| {
        match parse_access_line(line, line_number) {
            Ok(record) => {
                records.push(record);
                Ok(())
            }
            Err(NoMatch) => Err(ParseError::MalformedLine {
                file: file.to_path_buf(),
                line_number,
                line: line.trim().to_string(),
            }),
        }
    })?;

    tracing::debug!(
        file = %file.display(),
        records = records.len(),
        lines = lines_processed,
        "Access log parsed"
    );

    Ok(ParseResult {
        records,
        skipped: 0,
        lines_processed,
    })
}

/// Parse a whole application-server log, dropping lines no dialect accepts.
pub fn parse_app_stream<R: BufRead>(
    reader: R,
    file: &Path,
) -> Result<ParseResult<AppLogRecord>, ParseError> {
    let mut records = Vec::new();
    let mut skipped: u64 = 0;

    let lines_processed = for_each_line(reader, file, |line_number, line| {
        match parse_app_line(line, line_number) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(NoMatch) => {
                skipped += 1;
                tracing::debug!(
                    file = %file.display(),
                    line_number,
                    line = preview(line.trim()),
                    "Skipping unrecognised line"
                );
            }
        }
        Ok(())
    })?;

    tracing::debug!(
        file = %file.display(),
        records = records.len(),
        skipped,
        lines = lines_processed,
        "Application log parsed"
    );

    Ok(ParseResult {
        records,
        skipped,
        lines_processed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};
    use std::path::PathBuf;

    const ACCESS_LINE: &str = r#"192.168.1.10 - frank [10/Oct/2024:13:55:36 +0000] "GET /openmrs/index.htm HTTP/1.1" 200 2326 "http://example.com/start" "Mozilla/5.0 (X11; Linux x86_64)""#;

    #[test]
    fn test_access_line_extracts_all_fields() {
        let r = parse_access_line(ACCESS_LINE, 7).unwrap();
        assert_eq!(r.line_number, 7);
        assert_eq!(r.client_address, "192.168.1.10");
        assert_eq!(r.ident, "-");
        assert_eq!(r.user, "frank");
        assert_eq!(r.timestamp, "10/Oct/2024:13:55:36 +0000");
        assert_eq!(r.method, "GET");
        assert_eq!(r.path, "/openmrs/index.htm");
        assert_eq!(r.protocol, "HTTP/1.1");
        assert_eq!(r.status, "200");
        assert_eq!(r.size, "2326");
        assert_eq!(r.referrer, "http://example.com/start");
        assert_eq!(r.user_agent, "Mozilla/5.0 (X11; Linux x86_64)");
    }

    #[test]
    fn test_access_line_rebuilds_equivalent_line() {
        let r = parse_access_line(ACCESS_LINE, 1).unwrap();
        assert_eq!(r.to_combined_line(), ACCESS_LINE);
        assert_eq!(parse_access_line(&r.to_combined_line(), 1).unwrap(), r);
    }

    #[test]
    fn test_access_line_allows_empty_quoted_fields_and_dash_size() {
        let line = r#"10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] "POST /ws/rest HTTP/1.0" 304 - "" """#;
        let r = parse_access_line(line, 1).unwrap();
        assert_eq!(r.size, "-");
        assert_eq!(r.referrer, "");
        assert_eq!(r.user_agent, "");
    }

    #[test]
    fn test_access_line_tolerates_surrounding_whitespace_and_trailing_text() {
        let line = format!("   {ACCESS_LINE} 0.023  ");
        let r = parse_access_line(&line, 1).unwrap();
        assert_eq!(r.user_agent, "Mozilla/5.0 (X11; Linux x86_64)");
    }

    #[test]
    fn test_access_line_keeps_non_ascii_space_inside_fields() {
        let line = "10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] \"GET /a\u{a0}b HTTP/1.1\" 200 5 \"-\" \"-\"";
        let r = parse_access_line(line, 1).unwrap();
        assert_eq!(r.path, "/a\u{a0}b");
        assert_eq!(r.method, "GET");
        assert_eq!(r.size, "5");
    }

    #[test]
    fn test_access_line_rejects_bad_status() {
        let line = r#"10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] "GET / HTTP/1.1" 20 12 "-" "-""#;
        assert_eq!(parse_access_line(line, 1), Err(NoMatch));
    }

    #[test]
    fn test_access_line_rejects_blank_and_noise() {
        assert_eq!(parse_access_line("", 1), Err(NoMatch));
        assert_eq!(parse_access_line("   ", 1), Err(NoMatch));
        assert_eq!(parse_access_line("not an access log", 1), Err(NoMatch));
    }

    #[test]
    fn test_structured_dialect() {
        let r = parse_app_line(
            "ERROR - com.example.Foo(12) |2024-01-01T10:00:00,000| connection refused",
            1,
        )
        .unwrap()
        .unwrap();
        assert_eq!(r.dialect, AppDialect::Structured);
        assert_eq!(r.level, "ERROR");
        assert_eq!(r.class, "com.example.Foo(12)");
        assert_eq!(r.timestamp, "2024-01-01T10:00:00,000");
        assert_eq!(r.message, "connection refused");
        assert_eq!(r.thread, None);
    }

    #[test]
    fn test_structured_dialect_class_characters() {
        let r = parse_app_line(
            "INFO - Outer$Inner.<init>_x9 |2024-01-01T10:00:00,000|started",
            1,
        )
        .unwrap()
        .unwrap();
        assert_eq!(r.class, "Outer$Inner.<init>_x9");
        assert_eq!(r.message, "started");
    }

    #[test]
    fn test_native_dialect() {
        let r = parse_app_line(
            "01-Jan-2024 10:00:00.123 WARN [http-nio-8080] com.example.Bar Something happened",
            1,
        )
        .unwrap()
        .unwrap();
        assert_eq!(r.dialect, AppDialect::Native);
        assert_eq!(r.timestamp, "01-Jan-2024 10:00:00.123");
        assert_eq!(r.level, "WARN");
        assert_eq!(r.thread.as_deref(), Some("http-nio-8080"));
        assert_eq!(r.class, "com.example.Bar");
        assert_eq!(r.message, "Something happened");
    }

    #[test]
    fn test_native_dialect_thread_with_spaces() {
        let r = parse_app_line(
            "15-Mar-2024 08:01:02.003 INFO [main thread] org.apache.catalina.startup.Catalina.start Server startup in [1234] milliseconds",
            1,
        )
        .unwrap()
        .unwrap();
        assert_eq!(r.thread.as_deref(), Some("main thread"));
        assert_eq!(r.class, "org.apache.catalina.startup.Catalina.start");
        assert_eq!(r.message, "Server startup in [1234] milliseconds");
    }

    #[test]
    fn test_native_dialect_rejects_non_ascii_separator() {
        assert_eq!(
            parse_app_line(
                "01-Jan-2024 10:00:00.123\u{a0}WARN [main] com.example.Bar Something happened",
                1,
            ),
            Err(NoMatch)
        );
    }

    #[test]
    fn test_blank_app_line_is_neither_record_nor_failure() {
        assert_eq!(parse_app_line("", 1), Ok(None));
        assert_eq!(parse_app_line(" \t  ", 1), Ok(None));
    }

    #[test]
    fn test_app_noise_is_no_match() {
        assert_eq!(
            parse_app_line("\tat com.example.Foo.bar(Foo.java:42)", 1),
            Err(NoMatch)
        );
        assert_eq!(
            parse_app_line("java.lang.NullPointerException", 1),
            Err(NoMatch)
        );
    }

    #[test]
    fn test_parse_line_dispatches_by_family() {
        let access = parse_line(ACCESS_LINE, LogFamily::Apache, 1).unwrap().unwrap();
        assert_eq!(access.family(), LogFamily::Apache);

        let app = parse_line(
            "INFO - Foo |2024-01-01T10:00:00,000| hi",
            LogFamily::Catalina,
            1,
        )
        .unwrap()
        .unwrap();
        assert_eq!(app.family(), LogFamily::Catalina);

        // Same text, wrong family.
        assert_eq!(parse_line(ACCESS_LINE, LogFamily::Catalina, 1), Err(NoMatch));
        assert_eq!(parse_line("", LogFamily::Catalina, 1), Ok(None));
    }

    #[test]
    fn test_app_stream_skips_noise_and_keeps_order() {
        let content = "\
INFO - A |2024-01-01T10:00:00,000| one
Exception in thread main
01-Jan-2024 10:00:01.000 WARN [t1] B two

\tat x.y.Z(Z.java:1)
ERROR - C |2024-01-01T10:00:02,000| three
";
        let result = parse_app_stream(Cursor::new(content), &PathBuf::from("c.log")).unwrap();
        let classes: Vec<_> = result.records.iter().map(|r| r.class.as_str()).collect();
        assert_eq!(classes, vec!["A", "B", "C"]);
        assert_eq!(result.records[1].line_number, 3);
        assert_eq!(result.skipped, 2);
        assert_eq!(result.lines_processed, 6);
    }

    #[test]
    fn test_access_stream_aborts_on_first_malformed_line() {
        let content = format!("{ACCESS_LINE}\nthis is broken\n{ACCESS_LINE}\n");
        let err = parse_access_stream(Cursor::new(content), &PathBuf::from("a.log")).unwrap_err();
        match err {
            ParseError::MalformedLine {
                line_number, line, ..
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "this is broken");
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_access_stream_handles_crlf() {
        let content = format!("{ACCESS_LINE}\r\n{ACCESS_LINE}\r\n");
        let result = parse_access_stream(Cursor::new(content), &PathBuf::from("a.log")).unwrap();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[1].user_agent, "Mozilla/5.0 (X11; Linux x86_64)");
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let mut bytes = b"INFO - Foo |2024-01-01T10:00:00,000| caf".to_vec();
        bytes.push(0xFF);
        bytes.push(b'\n');
        let result = parse_app_stream(Cursor::new(bytes), &PathBuf::from("c.log")).unwrap();
        assert_eq!(result.records.len(), 1);
        assert!(result.records[0].message.starts_with("caf"));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device error"))
        }
    }

    #[test]
    fn test_read_fault_aborts_app_stream() {
        let reader = io::BufReader::new(FailingReader);
        let err = parse_app_stream(reader, &PathBuf::from("c.log")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }

    #[test]
    fn test_preview_truncates_long_lines() {
        let long = "x".repeat(constants::DEBUG_MAX_LINE_PREVIEW + 50);
        assert_eq!(preview(&long).len(), constants::DEBUG_MAX_LINE_PREVIEW);
        assert_eq!(preview("short"), "short");
    }
}
