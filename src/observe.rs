//! [`IngestObserver`] that forwards ingestion events to `tracing`.

use logsift_core::{Error, IngestObserver, LineError};
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl IngestObserver for TracingObserver {
    fn malformed_line(&self, path: &Path, line: usize, error: &LineError) {
        tracing::warn!(path = %path.display(), line, %error, "skipping unparseable line");
    }

    fn malformed_summary(&self, path: &Path, count: usize) {
        tracing::warn!(path = %path.display(), count, "file had unparseable lines");
    }

    fn file_rejected(&self, path: &Path, error: &Error) {
        tracing::error!(path = %path.display(), %error, "failed to read log file");
    }

    fn cache_miss(&self, path: &Path) {
        tracing::debug!(path = %path.display(), "parsing log file");
    }
}
