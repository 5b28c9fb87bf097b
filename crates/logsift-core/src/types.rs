//! Core types for logsift-core.
//!
//! [`LogRecord`] is the typed form of one access-log line. It is immutable
//! once the parser builds it; the cache hands out shared references only.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;

/// A point in time with the UTC offset it was logged with.
pub type Timestamp = DateTime<FixedOffset>;

/// Layout of the bracketed time field, e.g. `10/Oct/2023:13:55:36 +0800`.
pub const TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One parsed access-log line.
///
/// The four upstream fields are `None` when the line carries the `-`
/// placeholder (or a value that does not parse). Zero is a real upstream
/// timing, so absence is never folded into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub time: Timestamp,
    pub client_ip: String,
    pub client_port: u16,
    /// Forwarded-for / virtual host column.
    pub host: String,
    pub server_port: u16,
    /// HTTP method, or the whole raw request line for a degraded record.
    pub method: String,
    pub path: String,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: u64,
    pub request_bytes: u64,
    /// Request duration in seconds.
    pub request_time: f64,
    pub upstream_connect_time: Option<f64>,
    pub upstream_response_time: Option<f64>,
    pub upstream_status: Option<u16>,
    pub upstream_addr: Option<String>,
    pub referer: String,
    pub user_agent: String,
    pub tls_protocol: String,
    pub tls_cipher: String,
    pub request_id: String,
}

impl LogRecord {
    /// `true` when the request line could not be split into method, path,
    /// and version, and was kept whole in `method`.
    pub fn is_degraded(&self) -> bool {
        self.path.is_empty() && self.http_version.is_empty()
    }
}

/// Renders the record back into the access-log line shape it was parsed from.
impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} - {}:{} [{}] \"",
            self.client_ip,
            self.client_port,
            self.host,
            self.server_port,
            self.time.format(TIME_FORMAT)
        )?;
        if self.is_degraded() {
            f.write_str(&self.method)?;
        } else {
            write!(f, "{} {} {}", self.method, self.path, self.http_version)?;
        }
        write!(
            f,
            "\" {} {} {} rt={} uct={} urt={} ust={} ua={} \"{}\" \"{}\" {} {} rid={}",
            self.status,
            self.body_bytes,
            self.request_bytes,
            self.request_time,
            Placeholder(&self.upstream_connect_time),
            Placeholder(&self.upstream_response_time),
            Placeholder(&self.upstream_status),
            Placeholder(&self.upstream_addr),
            self.referer,
            self.user_agent,
            self.tls_protocol,
            self.tls_cipher,
            self.request_id
        )
    }
}

struct Placeholder<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Placeholder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("-"),
        }
    }
}
