//! Query engine: merge every catalog file, filter, sort newest first, page.

use crate::cache::RecordCache;
use crate::catalog::Catalog;
use crate::reader::{FileReader, RecordSource};
use logsift_core::config::Config;
use logsift_core::{Error, Filter, IngestObserver, LogRecord};
use std::sync::Arc;

/// One page of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Records matching the filter before pagination.
    pub matched: usize,
    /// The requested page, most recent first.
    pub records: Vec<LogRecord>,
}

pub struct QueryEngine<S = FileReader> {
    catalog: Catalog,
    cache: RecordCache<S>,
}

impl QueryEngine<FileReader> {
    /// Engine over the directory and live file name in `config`.
    pub fn from_config(config: &Config, observer: Arc<dyn IngestObserver>) -> Self {
        let reader = FileReader::new(Arc::clone(&observer));
        Self::new(
            Catalog::new(&config.log_path, config.log_name.as_str()),
            RecordCache::new(reader, observer),
        )
    }
}

impl<S: RecordSource> QueryEngine<S> {
    pub fn new(catalog: Catalog, cache: RecordCache<S>) -> Self {
        Self { catalog, cache }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cache(&self) -> &RecordCache<S> {
        &self.cache
    }

    /// Run `filter` over every file in the catalog.
    ///
    /// Any file that cannot be listed, stat'ed, or read fails the whole
    /// query; there are no partial results. The sort is stable, so records
    /// with equal timestamps keep catalog order, then line order.
    pub fn query(&self, filter: &Filter) -> Result<QueryResult, Error> {
        let sets = self
            .catalog
            .list()?
            .iter()
            .map(|path| self.cache.get(path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut matched: Vec<&LogRecord> = sets
            .iter()
            .flat_map(|set| set.iter())
            .filter(|record| filter.matches(record))
            .collect();
        matched.sort_by(|a, b| b.time.cmp(&a.time));

        let records = matched[filter.window(matched.len())]
            .iter()
            .map(|record| (*record).clone())
            .collect();

        Ok(QueryResult {
            matched: matched.len(),
            records,
        })
    }
}
