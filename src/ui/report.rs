// EMR Log Analyser - ui/report.rs
//
// Renders an analysis outcome: count line, record table for app logs,
// statistics summary, and export/notice lines. Writes to any Write so the
// output can be captured in tests.

use crate::app::analyse::AnalysisOutcome;
use crate::core::model::{AppLogRecord, Records};
use crate::ui::summary;
use crate::ui::theme::Palette;
use crate::util::constants;
use std::borrow::Cow;
use std::io::{self, Write};

/// Presentation settings taken from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub message_width: usize,
    pub stats_threshold: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            message_width: constants::DEFAULT_MESSAGE_WIDTH,
            stats_threshold: constants::DEFAULT_STATS_THRESHOLD,
        }
    }
}

/// Shorten `message` to at most `width` characters, ending in the ellipsis
/// marker when anything was cut.
pub fn truncate_message(message: &str, width: usize) -> Cow<'_, str> {
    if message.chars().count() <= width {
        return Cow::Borrowed(message);
    }
    let keep = width.saturating_sub(constants::ELLIPSIS.len());
    let mut out: String = message.chars().take(keep).collect();
    out.push_str(constants::ELLIPSIS);
    Cow::Owned(out)
}

/// LEVEL / CLASS / MESSAGE table.
pub fn render_app_table<W: Write>(
    out: &mut W,
    records: &[AppLogRecord],
    palette: &Palette,
    options: &DisplayOptions,
) -> io::Result<()> {
    let header = format!(
        "{:<lw$} {:<cw$} {}",
        "LEVEL",
        "CLASS",
        "MESSAGE",
        lw = constants::LEVEL_COLUMN_WIDTH,
        cw = constants::CLASS_COLUMN_WIDTH,
    );
    writeln!(out, "{}", palette.heading(&header))?;

    for record in records {
        let level = format!(
            "{:<width$}",
            record.level,
            width = constants::LEVEL_COLUMN_WIDTH
        );
        writeln!(
            out,
            "{} {:<cw$} {}",
            palette.level(&level),
            record.class,
            truncate_message(&record.message, options.message_width),
            cw = constants::CLASS_COLUMN_WIDTH,
        )?;
    }
    Ok(())
}

/// Write the full report for one analysis run.
pub fn render_outcome<W: Write>(
    out: &mut W,
    outcome: &AnalysisOutcome,
    palette: &Palette,
    options: &DisplayOptions,
) -> io::Result<()> {
    if let Records::App(records) = &outcome.records {
        if !records.is_empty() {
            render_app_table(out, records, palette, options)?;
        }
    }

    writeln!(
        out,
        "Processed {} {} log entries.",
        outcome.records.len(),
        outcome.family.label()
    )?;

    if outcome.is_empty() {
        writeln!(out, "{}", palette.warning("No log entries found."))?;
    }

    if let Some(stats) = &outcome.statistics {
        summary::render(out, stats, palette, options.stats_threshold)?;
    }

    if outcome.statistics_unavailable {
        writeln!(
            out,
            "{}",
            palette.muted(&format!(
                "Statistics are not available for {} logs.",
                outcome.family.label()
            ))
        )?;
    }

    if let Some((path, count)) = &outcome.exported {
        writeln!(
            out,
            "{}",
            palette.success(&format!("Exported {count} entries to {}", path.display()))
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{AppDialect, LogFamily};
    use crate::core::stats;

    fn record(level: &str, class: &str, message: &str) -> AppLogRecord {
        AppLogRecord {
            line_number: 1,
            dialect: AppDialect::Structured,
            timestamp: "2024-01-01T10:00:00,000".to_string(),
            level: level.to_string(),
            thread: None,
            class: class.to_string(),
            message: message.to_string(),
        }
    }

    fn outcome(records: Records) -> AnalysisOutcome {
        AnalysisOutcome {
            family: records.family(),
            records,
            statistics: None,
            statistics_unavailable: false,
            skipped: 0,
            lines_processed: 0,
            exported: None,
        }
    }

    fn render_plain(outcome: &AnalysisOutcome) -> String {
        let mut buf = Vec::new();
        render_outcome(
            &mut buf,
            outcome,
            &Palette::plain(),
            &DisplayOptions::default(),
        )
        .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_truncate_short_message_untouched() {
        assert_eq!(truncate_message("short", 10), "short");
        assert_eq!(truncate_message("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_truncate_long_message_with_ellipsis() {
        let cut = truncate_message("abcdefghijklmnop", 10);
        assert_eq!(cut, "abcdefg...");
        assert_eq!(cut.chars().count(), 10);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let cut = truncate_message("ééééééééééé", 8);
        assert_eq!(cut, "ééééé...");
    }

    #[test]
    fn test_app_report_has_table_and_count() {
        let long = "x".repeat(200);
        let text = render_plain(&outcome(Records::App(vec![
            record("ERROR", "com.example.Foo", "boom"),
            record("INFO", "com.example.Bar", &long),
        ])));
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("LEVEL"));
        assert!(header.contains("CLASS"));
        assert!(header.ends_with("MESSAGE"));
        assert!(text.contains("com.example.Foo"));
        assert!(text.contains(&format!("{}...", "x".repeat(77))));
        assert!(!text.contains(&long));
        assert!(text.contains("Processed 2 Catalina log entries."));
    }

    #[test]
    fn test_access_report_is_count_only() {
        let text = render_plain(&outcome(Records::Access(Vec::new())));
        assert!(text.contains("Processed 0 Apache log entries."));
        assert!(text.contains("No log entries found."));
        assert!(!text.contains("LEVEL"));
    }

    #[test]
    fn test_report_includes_statistics_and_notices() {
        let records = vec![record("ERROR", "Foo", "a")];
        let mut with_stats = outcome(Records::App(records.clone()));
        with_stats.statistics = Some(stats::aggregate(&records));
        with_stats.exported = Some(("out.csv".into(), 1));
        let text = render_plain(&with_stats);
        assert!(text.contains("Catalina Log Summary"));
        assert!(text.contains("Exported 1 entries to out.csv"));

        let mut unavailable = outcome(Records::Access(Vec::new()));
        unavailable.statistics_unavailable = true;
        assert_eq!(unavailable.family, LogFamily::Apache);
        assert!(render_plain(&unavailable).contains("Statistics are not available for Apache logs."));
    }
}
