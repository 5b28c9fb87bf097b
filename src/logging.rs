//! Process log sink.
//!
//! Events go to `<dir>/logsift.<YYYY-MM-DD-HH>.log` through a non-blocking
//! writer. The appender opens the next file on the first write after each hour
//! boundary. The sink lives as long as the returned [`LogSink`]; dropping it
//! flushes buffered lines and closes the file.

use anyhow::{anyhow, Context};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

pub const FILE_PREFIX: &str = "logsift";

/// Keeps the background writer alive. Hold it for the life of the process.
#[must_use = "dropping the sink stops log output"]
pub struct LogSink {
    _guard: WorkerGuard,
}

/// Install the global subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init(dir: &Path) -> anyhow::Result<LogSink> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::HOURLY)
        .filename_prefix(FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("opening log file in {}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|err| anyhow!("installing log subscriber: {err}"))?;

    Ok(LogSink { _guard: guard })
}
