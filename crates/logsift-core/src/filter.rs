//! Query filter: the predicate and pagination window applied to merged records.

use crate::types::{LogRecord, Timestamp};
use std::num::NonZeroUsize;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: NonZeroUsize = match NonZeroUsize::new(200) {
    Some(n) => n,
    None => unreachable!(),
};

/// Which records a query returns, and which page of them.
///
/// Every constraint is optional; an all-`None` filter matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Substring of the client IP.
    pub ip: Option<String>,
    /// Exact response status. Values above `u16::MAX` are kept so they match
    /// nothing instead of being dropped as "any status".
    pub status: Option<u32>,
    /// Substring of the request path.
    pub path: Option<String>,
    /// Records strictly before this instant are excluded.
    pub from: Option<Timestamp>,
    /// Records strictly after this instant are excluded.
    pub to: Option<Timestamp>,
    /// Page size. `None` returns every matching record.
    pub limit: Option<NonZeroUsize>,
    pub offset: usize,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            ip: None,
            status: None,
            path: None,
            from: None,
            to: None,
            limit: Some(DEFAULT_LIMIT),
            offset: 0,
        }
    }
}

impl Filter {
    /// A filter with no predicate and no pagination.
    pub fn all() -> Self {
        Self {
            limit: None,
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(ip) = self.ip.as_deref() {
            if !record.client_ip.contains(ip) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if u32::from(record.status) != status {
                return false;
            }
        }
        if let Some(path) = self.path.as_deref() {
            if !record.path.contains(path) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.time < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.time > to {
                return false;
            }
        }
        true
    }

    /// Clamp the pagination window to a result of `len` records.
    ///
    /// An offset at or past the end yields an empty range.
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit.get()).min(len),
            None => len,
        };
        start..end
    }
}
