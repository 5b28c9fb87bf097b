//! Cache store: parsed records per file snapshot.
//!
//! Entries are keyed by `(path, modification time)`. A file that is rewritten
//! or rotated gets a new key on its next lookup, so nothing is ever evicted
//! explicitly: the entry under the old key is simply never asked for again.
//!
//! # Growth
//!
//! The map is unbounded. Superseded snapshots of a file stay resident until
//! the process exits. This is acceptable for a catalog of one live file plus
//! a fixed set of archives, where a file changes at most a few times an hour.
//!
//! # Concurrency
//!
//! Lookups share a read lock. A miss drops it, parses the file with no lock
//! held, then takes the write lock only for the map insert. Misses on
//! different files therefore parse in parallel. Concurrent misses on the
//! *same* key are not deduplicated: each caller parses the file and the last
//! insert wins. Both results are identical, so the only cost is repeated work.

use crate::reader::{FileReader, RecordSource};
use logsift_core::{Error, IngestObserver, LogRecord};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

/// An immutable, shareable view of one file's records.
pub type RecordSet = Arc<[LogRecord]>;

/// Identity of one file snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub modified: SystemTime,
}

pub struct RecordCache<S = FileReader> {
    source: S,
    observer: Arc<dyn IngestObserver>,
    entries: RwLock<HashMap<CacheKey, RecordSet>>,
}

impl<S: RecordSource> RecordCache<S> {
    pub fn new(source: S, observer: Arc<dyn IngestObserver>) -> Self {
        Self {
            source,
            observer,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Records for the file's current snapshot, parsing it on a miss.
    pub fn get(&self, path: &Path) -> Result<RecordSet, Error> {
        let modified = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|source| Error::FileStat {
                path: path.to_path_buf(),
                source,
            })?;
        let key = CacheKey {
            path: path.to_path_buf(),
            modified,
        };

        let cached = self.read().get(&key).cloned();
        if let Some(records) = cached {
            return Ok(records);
        }

        self.observer.cache_miss(path);
        let records: RecordSet = self.source.load(path)?.records.into();
        self.write().insert(key, Arc::clone(&records));
        Ok(records)
    }

    /// Number of cached snapshots, superseded ones included.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, RecordSet>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, RecordSet>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
