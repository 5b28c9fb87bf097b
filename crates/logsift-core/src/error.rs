//! Error taxonomy shared by the parser, reader, cache, and query engine.
//!
//! [`LineError`] is recoverable: the reader counts it and moves on.
//! [`Error`] is fatal to a file, and therefore to the whole query.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single line produced no record.
#[derive(Debug, Error)]
pub enum LineError {
    /// Neither the primary grammar nor the fallback split recognised the line.
    #[error("line matches neither the access-log grammar nor the fallback split")]
    Malformed,
    /// The line matched, but its bracketed time field is not a valid timestamp.
    #[error("invalid timestamp {raw:?}: {source}")]
    Timestamp {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A failure that aborts reading a file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot list log directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot stat log file {}: {source}", path.display())]
    FileStat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt compressed stream in {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read error in {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "too many malformed lines in {}: {malformed} failures by line {line}",
        path.display()
    )]
    TooManyMalformedLines {
        path: PathBuf,
        line: usize,
        malformed: usize,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
