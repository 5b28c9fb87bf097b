//! Best-effort field split for lines the strict grammar rejects.
//!
//! The line is cut into `[bracketed]`, `"quoted"`, and bare tokens. Fields
//! are then picked up by role rather than by exact position: the first bare
//! token is the client, the first bracketed token the time, the first quoted
//! token after it the request, then up to three numbers, then `key=value`
//! pairs in any order, two quoted strings, and two bare TLS tokens.
//!
//! Client, time, request, and status are required. Missing byte counts and
//! request time read as zero; missing upstream fields are absent.

use super::{
    is_digits, parse_time, seconds, split_request, upstream_addr, upstream_seconds,
    upstream_status,
};
use crate::error::LineError;
use crate::types::LogRecord;
use regex::Regex;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[[^\]]*\]|"[^"]*"|\S+"#).expect("fallback token pattern must compile")
});

const KEYS: &[&str] = &["rt", "uct", "urt", "ust", "ua", "rid"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Bracketed(&'a str),
    Quoted(&'a str),
    Bare(&'a str),
}

impl<'a> Token<'a> {
    fn classify(raw: &'a str) -> Self {
        if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            Token::Bracketed(inner)
        } else if let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
            Token::Quoted(inner)
        } else {
            Token::Bare(raw)
        }
    }
}

pub(super) fn parse(line: &str) -> Result<LogRecord, LineError> {
    let tokens: Vec<Token<'_>> = TOKEN
        .find_iter(line)
        .map(|m| Token::classify(m.as_str()))
        .collect();

    let Some(Token::Bare(client)) = tokens.first().copied() else {
        return Err(LineError::Malformed);
    };
    let (client_ip, client_port) = endpoint(client);
    if client_ip.is_empty() {
        return Err(LineError::Malformed);
    }

    let (time_at, raw_time) = tokens
        .iter()
        .enumerate()
        .find_map(|(i, t)| match t {
            Token::Bracketed(inner) => Some((i, *inner)),
            _ => None,
        })
        .ok_or(LineError::Malformed)?;

    // The host column sits between client and time, possibly after a `-`.
    let (host, server_port) = tokens[1..time_at]
        .iter()
        .rev()
        .find_map(|t| match t {
            Token::Bare(raw) if *raw != "-" => Some(endpoint(raw)),
            _ => None,
        })
        .unwrap_or(("", 0));

    let (request_at, request) = tokens[time_at + 1..]
        .iter()
        .enumerate()
        .find_map(|(i, t)| match t {
            Token::Quoted(inner) => Some((time_at + 1 + i, *inner)),
            _ => None,
        })
        .ok_or(LineError::Malformed)?;

    let mut rest = &tokens[request_at + 1..];
    let mut numbers = Vec::with_capacity(3);
    while numbers.len() < 3 {
        match rest.first() {
            Some(Token::Bare(raw)) if is_digits(raw) => {
                numbers.push(*raw);
                rest = &rest[1..];
            }
            _ => break,
        }
    }
    let status = numbers
        .first()
        .and_then(|raw| raw.parse::<u16>().ok())
        .ok_or(LineError::Malformed)?;
    let body_bytes = numbers.get(1).and_then(|raw| raw.parse().ok()).unwrap_or(0);
    let request_bytes = numbers.get(2).and_then(|raw| raw.parse().ok()).unwrap_or(0);

    let mut pairs: Vec<(&str, String)> = Vec::new();
    let mut quoted = Vec::new();
    let mut bare = Vec::new();
    for token in rest {
        match *token {
            Token::Quoted(inner) => quoted.push(inner),
            Token::Bare(raw) => match raw.split_once('=') {
                Some((key, value)) if KEYS.contains(&key) => pairs.push((key, value.to_string())),
                // Multi-upstream values are comma separated: `urt=0.010, 0.020`.
                _ => match pairs.last_mut() {
                    Some((_, value)) if value.ends_with(',') => {
                        value.push(' ');
                        value.push_str(raw);
                    }
                    _ => bare.push(raw),
                },
            },
            Token::Bracketed(_) => {}
        }
    }
    let pair = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    };

    let time = parse_time(raw_time)?;
    let (method, path, http_version) = split_request(request);

    Ok(LogRecord {
        time,
        client_ip: client_ip.to_string(),
        client_port,
        host: host.to_string(),
        server_port,
        method,
        path,
        http_version,
        status,
        body_bytes,
        request_bytes,
        request_time: pair("rt").and_then(seconds).unwrap_or(0.0),
        upstream_connect_time: pair("uct").and_then(upstream_seconds),
        upstream_response_time: pair("urt").and_then(upstream_seconds),
        upstream_status: pair("ust").and_then(upstream_status),
        upstream_addr: pair("ua").and_then(upstream_addr),
        referer: quoted.first().copied().unwrap_or_default().to_string(),
        user_agent: quoted.get(1).copied().unwrap_or_default().to_string(),
        tls_protocol: bare.first().copied().unwrap_or_default().to_string(),
        tls_cipher: bare.get(1).copied().unwrap_or_default().to_string(),
        request_id: pair("rid").unwrap_or_default().to_string(),
    })
}

/// `addr:port` with a lenient port: a missing or non-numeric port reads as 0.
fn endpoint(raw: &str) -> (&str, u16) {
    match raw.rsplit_once(':') {
        Some((addr, port)) if is_digits(port) => (addr, port.parse().unwrap_or(0)),
        _ => (raw, 0),
    }
}
