//! Line parser: turns one access-log line into a [`LogRecord`].
//!
//! Parsing runs in two stages:
//!
//! 1. [`grammar`]: a strict scanner for the full access-log layout
//!    `ip:port - host:port [time] "request" status body req rt= uct= urt= ust= ua= "referer" "agent" proto cipher rid=`.
//! 2. [`fallback`]: a best-effort split into bracketed, quoted, and bare
//!    tokens, tried only when the grammar does not match at all.
//!
//! A line that matches the grammar but carries an invalid timestamp is
//! rejected outright; the fallback is not consulted.

mod fallback;
mod grammar;

use crate::error::LineError;
use crate::types::{LogRecord, Timestamp, TIME_FORMAT};
use chrono::DateTime;

/// Token the log format writes for an absent upstream value.
pub const PLACEHOLDER: &str = "-";

/// Parse one line (without its trailing newline).
pub fn parse_line(line: &str) -> Result<LogRecord, LineError> {
    match grammar::parse(line)? {
        Some(record) => Ok(record),
        None => fallback::parse(line),
    }
}

fn parse_time(raw: &str) -> Result<Timestamp, LineError> {
    DateTime::parse_from_str(raw, TIME_FORMAT).map_err(|source| LineError::Timestamp {
        raw: raw.to_string(),
        source,
    })
}

/// Split `METHOD PATH VERSION`. Anything that does not yield exactly three
/// space-separated parts is kept whole as the method.
fn split_request(raw: &str) -> (String, String, String) {
    let mut parts = raw.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(path), Some(version)) => {
            (method.to_string(), path.to_string(), version.to_string())
        }
        _ => (raw.to_string(), String::new(), String::new()),
    }
}

fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

fn seconds(raw: &str) -> Option<f64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    raw.parse().ok()
}

fn upstream_seconds(raw: &str) -> Option<f64> {
    if raw == PLACEHOLDER {
        return None;
    }
    seconds(raw)
}

fn upstream_status(raw: &str) -> Option<u16> {
    if !is_digits(raw) {
        return None;
    }
    raw.parse().ok()
}

fn upstream_addr(raw: &str) -> Option<String> {
    (raw != PLACEHOLDER && !raw.is_empty()).then(|| raw.to_string())
}
