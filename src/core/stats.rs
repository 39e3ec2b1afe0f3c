// EMR Log Analyser - core/stats.rs
//
// Frequency statistics over application-server record sets.
// Core layer: pure logic, one pass over the records.
//
// Access logs have no aggregation; only the app-log dimensions below exist.

use crate::core::model::AppLogRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Categorical value -> number of records carrying it. Keys are unordered.
pub type FrequencyTable = HashMap<String, usize>;

/// Counts produced by [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_entries: usize,
    pub by_level: FrequencyTable,
    pub by_class: FrequencyTable,
    pub by_thread: FrequencyTable,
}

/// Count records per level, class, and thread.
///
/// Every record adds exactly one to each table. Keys are used verbatim;
/// an absent thread is counted under the empty string.
pub fn aggregate(records: &[AppLogRecord]) -> Statistics {
    let mut stats = Statistics {
        total_entries: records.len(),
        ..Statistics::default()
    };

    for record in records {
        *stats.by_level.entry(record.level.clone()).or_insert(0) += 1;
        *stats.by_class.entry(record.class.clone()).or_insert(0) += 1;
        *stats
            .by_thread
            .entry(record.thread_name().to_string())
            .or_insert(0) += 1;
    }

    tracing::debug!(
        total = stats.total_entries,
        levels = stats.by_level.len(),
        classes = stats.by_class.len(),
        threads = stats.by_thread.len(),
        "Statistics aggregated"
    );

    stats
}

/// Buckets with a count strictly above `threshold`, most frequent first and
/// ties broken by key, so printed output is stable.
pub fn top_buckets(table: &FrequencyTable, threshold: usize) -> Vec<(&str, usize)> {
    let mut buckets: Vec<(&str, usize)> = table
        .iter()
        .filter(|(_, count)| **count > threshold)
        .map(|(key, &count)| (key.as_str(), count))
        .collect();
    buckets.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    buckets
}
