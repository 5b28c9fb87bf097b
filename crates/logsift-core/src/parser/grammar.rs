//! Strict scanner for the access-log line layout.
//!
//! Separators are exact: single spaces, the literal ` - ` after the client,
//! brackets around the time, quotes around request, referer, and user agent,
//! and the `rt=` … `rid=` key prefixes. Trailing text after the request id is
//! ignored.

use super::{
    is_digits, parse_time, seconds, split_request, upstream_addr, upstream_seconds,
    upstream_status,
};
use crate::error::LineError;
use crate::types::LogRecord;

/// `Ok(None)` means the line does not have the expected shape.
pub(super) fn parse(line: &str) -> Result<Option<LogRecord>, LineError> {
    let Some(head) = match_head(line) else {
        return Ok(None);
    };

    // The request line is quoted but may itself contain quotes: take the
    // shortest request after which the remainder still matches.
    let Some((request, tail)) = head
        .rest
        .match_indices('"')
        .find_map(|(end, _)| match_tail(&head.rest[end..]).map(|tail| (&head.rest[..end], tail)))
    else {
        return Ok(None);
    };

    let time = parse_time(head.time)?;
    let (method, path, http_version) = split_request(request);

    Ok(Some(LogRecord {
        time,
        client_ip: head.client_ip.to_string(),
        client_port: head.client_port,
        host: head.host.to_string(),
        server_port: head.server_port,
        method,
        path,
        http_version,
        status: tail.status,
        body_bytes: tail.body_bytes,
        request_bytes: tail.request_bytes,
        request_time: tail.request_time,
        upstream_connect_time: upstream_seconds(tail.upstream_connect),
        upstream_response_time: upstream_seconds(tail.upstream_response),
        upstream_status: upstream_status(tail.upstream_status),
        upstream_addr: upstream_addr(tail.upstream_addr),
        referer: tail.referer.to_string(),
        user_agent: tail.user_agent.to_string(),
        tls_protocol: tail.tls_protocol.to_string(),
        tls_cipher: tail.tls_cipher.to_string(),
        request_id: tail.request_id.to_string(),
    }))
}

struct Head<'a> {
    client_ip: &'a str,
    client_port: u16,
    host: &'a str,
    server_port: u16,
    time: &'a str,
    /// Everything after the opening quote of the request line.
    rest: &'a str,
}

fn match_head(line: &str) -> Option<Head<'_>> {
    let mut cur = Cursor::new(line);
    let (client_ip, client_port) = endpoint(cur.token()?)?;
    cur.eat(" - ")?;
    let (host, server_port) = endpoint(cur.token()?)?;
    cur.eat(" [")?;
    let time = cur.until(']')?;
    if time.is_empty() {
        return None;
    }
    cur.eat("] \"")?;
    Some(Head {
        client_ip,
        client_port,
        host,
        server_port,
        time,
        rest: cur.rest,
    })
}

struct Tail<'a> {
    status: u16,
    body_bytes: u64,
    request_bytes: u64,
    request_time: f64,
    upstream_connect: &'a str,
    upstream_response: &'a str,
    upstream_status: &'a str,
    upstream_addr: &'a str,
    referer: &'a str,
    user_agent: &'a str,
    tls_protocol: &'a str,
    tls_cipher: &'a str,
    request_id: &'a str,
}

/// Matches from the closing quote of the request line to the request id.
fn match_tail(input: &str) -> Option<Tail<'_>> {
    let mut cur = Cursor::new(input);
    cur.eat("\" ")?;
    let status = cur.digits()?.parse().ok()?;
    cur.eat(" ")?;
    let body_bytes = cur.digits()?.parse().ok()?;
    cur.eat(" ")?;
    let request_bytes = cur.digits()?.parse().ok()?;
    cur.eat(" rt=")?;
    let request_time = seconds(cur.take_while(|c| c.is_ascii_digit() || c == '.')?)?;
    cur.eat(" uct=")?;
    let upstream_connect = cur.take_while(|c| c.is_ascii_digit() || c == '.' || c == '-')?;
    cur.eat(" urt=")?;
    let upstream_response = cur.take_while(|c| c.is_ascii_digit() || c == '.' || c == '-')?;
    cur.eat(" ust=")?;
    let upstream_status = cur.take_while(|c| c.is_ascii_digit() || c == '-')?;
    cur.eat(" ua=")?;
    let upstream_addr = cur.take_while(|c| c != ' ')?;
    cur.eat(" \"")?;
    let referer = cur.until('"')?;
    cur.eat("\" \"")?;
    let user_agent = cur.until('"')?;
    cur.eat("\" ")?;
    let tls_protocol = cur.token()?;
    cur.eat(" ")?;
    let tls_cipher = cur.token()?;
    cur.eat(" rid=")?;
    let request_id = cur.token()?;
    Some(Tail {
        status,
        body_bytes,
        request_bytes,
        request_time,
        upstream_connect,
        upstream_response,
        upstream_status,
        upstream_addr,
        referer,
        user_agent,
        tls_protocol,
        tls_cipher,
        request_id,
    })
}

/// Split `addr:port` at the last colon, so bare IPv6 addresses keep theirs.
fn endpoint(token: &str) -> Option<(&str, u16)> {
    let (addr, port) = token.rsplit_once(':')?;
    if addr.is_empty() || !is_digits(port) {
        return None;
    }
    Some((addr, port.parse().ok()?))
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn eat(&mut self, literal: &str) -> Option<()> {
        self.rest = self.rest.strip_prefix(literal)?;
        Some(())
    }

    /// Longest non-empty prefix whose chars all satisfy `pred`.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> Option<&'a str> {
        let end = self
            .rest
            .find(|c: char| !pred(c))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (taken, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(taken)
    }

    /// A run of non-whitespace characters.
    fn token(&mut self) -> Option<&'a str> {
        self.take_while(|c| !c.is_ascii_whitespace())
    }

    fn digits(&mut self) -> Option<&'a str> {
        self.take_while(|c| c.is_ascii_digit())
    }

    /// Everything up to, not including, `delim`. Fails if `delim` never occurs.
    fn until(&mut self, delim: char) -> Option<&'a str> {
        let end = self.rest.find(delim)?;
        let (taken, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(taken)
    }
}
