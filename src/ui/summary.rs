// EMR Log Analyser - ui/summary.rs
//
// Textual statistics summary. Levels are always listed in full; class and
// thread buckets only above the display threshold, so long-tail values do
// not flood the terminal.

use crate::core::stats::{top_buckets, Statistics};
use crate::ui::theme::Palette;
use crate::util::constants;
use std::io::{self, Write};

/// Write the summary block for `stats`.
pub fn render<W: Write>(
    out: &mut W,
    stats: &Statistics,
    palette: &Palette,
    threshold: usize,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", palette.heading("===== Catalina Log Summary ====="))?;
    writeln!(out, "Total Entries: {}", stats.total_entries)?;

    writeln!(out)?;
    writeln!(out, "{}", palette.heading("By Level:"))?;
    for (level, count) in top_buckets(&stats.by_level, 0) {
        let cell = format!("{:<width$}", level, width = constants::LEVEL_COLUMN_WIDTH);
        writeln!(out, "  {} {count}", palette.level(&cell))?;
    }

    writeln!(out)?;
    writeln!(out, "{}", palette.heading("Top Classes:"))?;
    for (class, count) in top_buckets(&stats.by_class, threshold) {
        writeln!(
            out,
            "  {:<width$} {count}",
            class,
            width = constants::CLASS_COLUMN_WIDTH
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", palette.heading("Top Threads:"))?;
    for (thread, count) in top_buckets(&stats.by_thread, threshold) {
        writeln!(
            out,
            "  {:<width$} {count}",
            thread,
            width = constants::THREAD_COLUMN_WIDTH
        )?;
    }

    writeln!(out, "{}", palette.heading("================================="))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stats::FrequencyTable;

    fn table(pairs: &[(&str, usize)]) -> FrequencyTable {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_summary_respects_threshold() {
        let stats = Statistics {
            total_entries: 20,
            by_level: table(&[("ERROR", 1), ("INFO", 19)]),
            by_class: table(&[("com.busy.Service", 15), ("com.rare.Thing", 5)]),
            by_thread: table(&[("main", 6), ("worker", 14)]),
        };
        let mut buf = Vec::new();
        render(&mut buf, &stats, &Palette::plain(), 5).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Total Entries: 20"));
        // All levels, even a single occurrence.
        assert!(text.contains("  ERROR    1"));
        assert!(text.contains("  INFO     19"));
        assert!(text.contains("com.busy.Service"));
        assert!(!text.contains("com.rare.Thing"));
        assert!(text.contains("main"));
        // Most frequent first.
        assert!(text.find("worker").unwrap() < text.find("main").unwrap());
    }
}
