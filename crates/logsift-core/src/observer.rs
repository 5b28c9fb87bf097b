//! Observer interface for ingestion events.
//!
//! The reader and cache never log directly. They report to an
//! [`IngestObserver`] handed in by whoever builds them; the binary wires one
//! that forwards to `tracing`, tests wire one that records.

use crate::error::{Error, LineError};
use std::path::Path;

/// Receives warnings and errors raised while ingesting log files.
///
/// Every method has a no-op default so implementors only override what they
/// care about.
pub trait IngestObserver: Send + Sync {
    /// A line was skipped. `line` is 1-based.
    fn malformed_line(&self, _path: &Path, _line: usize, _error: &LineError) {}

    /// A file was read successfully but `count` of its lines were skipped.
    fn malformed_summary(&self, _path: &Path, _count: usize) {}

    /// A file could not be read; the query that needed it fails.
    fn file_rejected(&self, _path: &Path, _error: &Error) {}

    /// The cache had no entry for the file's current modification time.
    fn cache_miss(&self, _path: &Path) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl IngestObserver for NullObserver {}
