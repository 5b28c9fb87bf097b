//! logsift-core: access-log records, the line parser, and shared plumbing.
//!
//! This crate owns everything that does not touch the filesystem layout of a
//! log directory: the typed [`LogRecord`], the [`Filter`] applied by queries,
//! the two-stage line parser, the error taxonomy, the [`IngestObserver`]
//! interface through which ingestion reports problems, and configuration.
//!
//! # Architecture
//!
//! ```text
//! Query ──► Cache ──► Reader ──► Parser
//!   │
//!   └──► Catalog
//! ```
//!
//! The catalog, reader, cache, and query engine live in `logsift-files`.

pub mod config;
pub mod error;
pub mod filter;
pub mod observer;
pub mod parser;
pub mod types;

pub use error::{Error, LineError};
pub use filter::Filter;
pub use observer::{IngestObserver, NullObserver};
pub use parser::parse_line;
pub use types::{LogRecord, Timestamp};
