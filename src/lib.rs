//! logsift: query service over rotated web-server access logs.
//!
//! The ingestion engine lives in the workspace crates and is re-exported
//! here so integration tests and the binary can reach everything through one
//! path. This crate adds the outer surfaces: the HTTP endpoint, the
//! `tracing`-backed observer, and the process log sink.
//!
//! # Architecture
//!
//! ```text
//! api ──► QueryEngine ──► RecordCache ──► FileReader ──► parse_line
//!              │
//!              └──► Catalog
//! ```
//!
//! Queries run synchronously on tokio's blocking pool; the cache is the only
//! state shared between requests.

pub mod api;
pub mod logging;
pub mod observe;

pub use logsift_core::{
    config, parse_line, Error, Filter, IngestObserver, LineError, LogRecord, NullObserver,
    Timestamp,
};
pub use logsift_files::{
    Catalog, FileReader, FileRecords, QueryEngine, QueryResult, RecordCache, RecordSet,
    RecordSource, MALFORMED_LINE_LIMIT,
};
