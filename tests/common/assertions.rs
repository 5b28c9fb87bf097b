//! Domain-specific assertions for logsift harnesses.
//!
//! These add context-rich failure messages that name which property of a
//! query result was violated and at which position.

use logsift::{Filter, LogRecord};

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Assert that records are sorted most recent first.
#[track_caller]
pub fn assert_newest_first(records: &[LogRecord]) {
    for (i, pair) in records.windows(2).enumerate() {
        if pair[0].time < pair[1].time {
            panic!(
                "assert_newest_first failed at index {i}:\n  [{i}] {}\n  [{}] {}",
                pair[0].time,
                i + 1,
                pair[1].time
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Assert that every record satisfies `filter`.
#[track_caller]
pub fn assert_all_match(records: &[LogRecord], filter: &Filter) {
    if let Some((i, record)) = records
        .iter()
        .enumerate()
        .find(|(_, record)| !filter.matches(record))
    {
        panic!("assert_all_match failed at index {i}:\n  filter: {filter:?}\n  record: {record}");
    }
}

/// The `request_id` of each record, in order.
pub fn ids(records: &[LogRecord]) -> Vec<&str> {
    records.iter().map(|r| r.request_id.as_str()).collect()
}
