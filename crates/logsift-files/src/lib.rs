//! logsift-files: log files on disk, turned into queryable records.
//!
//! [`Catalog`] finds the live access log and its gzip archives,
//! [`FileReader`] streams a file through the line parser, [`RecordCache`]
//! keeps each file's parsed records keyed by path and modification time, and
//! [`QueryEngine`] merges, filters, sorts, and pages them.

pub mod cache;
pub mod catalog;
pub mod query;
pub mod reader;

pub use cache::{CacheKey, RecordCache, RecordSet};
pub use catalog::Catalog;
pub use query::{QueryEngine, QueryResult};
pub use reader::{FileReader, FileRecords, RecordSource, MALFORMED_LINE_LIMIT};
