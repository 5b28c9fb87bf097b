//! Test builders: ergonomic constructors for `LogRecord` and access-log lines.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::DateTime;
use logsift::{LogRecord, Timestamp};

// ---------------------------------------------------------------------------
// LogRecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`LogRecord`] test fixtures.
///
/// Every field starts from a plausible well-formed request; override only what
/// the test is about. Render with `to_string()` to get the matching log line.
///
/// # Example
///
/// ```rust
/// let line = LogRecordBuilder::new()
///     .at("2024-03-05T08:00:00+00:00")
///     .client("10.0.0.7", 40000)
///     .request("POST", "/login", "HTTP/2.0")
///     .status(401)
///     .build()
///     .to_string();
/// ```
pub struct LogRecordBuilder {
    record: LogRecord,
}

impl LogRecordBuilder {
    pub fn new() -> Self {
        Self {
            record: LogRecord {
                time: ts("2023-10-10T13:55:36+08:00"),
                client_ip: "203.0.113.9".to_string(),
                client_port: 51234,
                host: "shop.example.com".to_string(),
                server_port: 443,
                method: "GET".to_string(),
                path: "/".to_string(),
                http_version: "HTTP/1.1".to_string(),
                status: 200,
                body_bytes: 512,
                request_bytes: 128,
                request_time: 0.004,
                upstream_connect_time: Some(0.001),
                upstream_response_time: Some(0.003),
                upstream_status: Some(200),
                upstream_addr: Some("10.0.0.4:8080".to_string()),
                referer: "-".to_string(),
                user_agent: "curl/8.4.0".to_string(),
                tls_protocol: "TLSv1.3".to_string(),
                tls_cipher: "TLS_AES_128_GCM_SHA256".to_string(),
                request_id: "0123456789abcdef".to_string(),
            },
        }
    }

    /// Set the time from an RFC 3339 string. The offset is kept.
    pub fn at(mut self, rfc3339: &str) -> Self {
        self.record.time = ts(rfc3339);
        self
    }

    pub fn client(mut self, ip: &str, port: u16) -> Self {
        self.record.client_ip = ip.to_string();
        self.record.client_port = port;
        self
    }

    pub fn request(mut self, method: &str, path: &str, version: &str) -> Self {
        self.record.method = method.to_string();
        self.record.path = path.to_string();
        self.record.http_version = version.to_string();
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.record.path = path.to_string();
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.record.status = status;
        self
    }

    /// Clear every upstream field, as for a request nginx answered itself.
    pub fn no_upstream(mut self) -> Self {
        self.record.upstream_connect_time = None;
        self.record.upstream_response_time = None;
        self.record.upstream_status = None;
        self.record.upstream_addr = None;
        self
    }

    pub fn request_id(mut self, id: &str) -> Self {
        self.record.request_id = id.to_string();
        self
    }

    pub fn build(self) -> LogRecord {
        self.record
    }
}

impl Default for LogRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Shorthands
// ---------------------------------------------------------------------------

/// Parse an RFC 3339 timestamp, panicking on bad test input.
pub fn ts(rfc3339: &str) -> Timestamp {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap_or_else(|err| panic!("bad test timestamp {rfc3339:?}: {err}"))
}

/// A default record at `rfc3339`, tagged with `id` so it can be found again.
pub fn record_at(rfc3339: &str, id: &str) -> LogRecord {
    LogRecordBuilder::new().at(rfc3339).request_id(id).build()
}

/// The log line for [`record_at`].
pub fn line_at(rfc3339: &str, id: &str) -> String {
    record_at(rfc3339, id).to_string()
}
