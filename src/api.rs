//! HTTP query endpoint: `GET /api/logs`.
//!
//! Query parameters are parsed leniently: a value that does not parse, or is
//! out of range, is ignored and the default applies.
//!
//! | parameter | default | meaning |
//! |-----------|---------|---------|
//! | `ip` | none | substring of the client IP |
//! | `status` | `0` (any) | exact status |
//! | `path` | none | substring of the request path |
//! | `from`, `to` | none | inclusive RFC 3339 bounds |
//! | `limit` | `200` | page size, must be positive |
//! | `offset` | `0` | page start |
//!
//! Every response allows any origin, since the dashboard is served from a
//! different host than the API.

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderName, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::DateTime;
use logsift_core::{filter::DEFAULT_LIMIT, Error, Filter, LogRecord, Timestamp};
use logsift_files::QueryEngine;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinError;
use tower_http::cors::{Any, CorsLayer};

pub fn router(engine: Arc<QueryEngine>) -> Router {
    Router::new()
        .route("/api/logs", get(logs))
        .layer(cors())
        .layer(middleware::from_fn(log_request))
        .with_state(engine)
}

/// Any origin. Credentials cannot be combined with a wildcard origin.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::POST,
            Method::OPTIONS,
            Method::GET,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            header::CACHE_CONTROL,
            HeaderName::from_static("x-requested-with"),
        ])
}

/// Raw query string values, before lenient conversion into a [`Filter`].
#[derive(Debug, Default, Deserialize)]
pub struct LogParams {
    pub ip: Option<String>,
    pub status: Option<String>,
    pub path: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl LogParams {
    pub fn into_filter(self) -> Filter {
        Filter {
            ip: self.ip.filter(|ip| !ip.is_empty()),
            status: self.status.as_deref().and_then(status),
            path: self.path.filter(|path| !path.is_empty()),
            from: self.from.as_deref().and_then(rfc3339),
            to: self.to.as_deref().and_then(rfc3339),
            limit: Some(
                self.limit
                    .and_then(|s| s.parse::<usize>().ok())
                    .and_then(NonZeroUsize::new)
                    .unwrap_or(DEFAULT_LIMIT),
            ),
            offset: self
                .offset
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(0),
        }
    }
}

/// A positive status constrains the query even when no record could carry
/// it; zero, negatives, and non-numbers mean any status.
fn status(raw: &str) -> Option<u32> {
    let status = raw.parse::<i64>().ok().filter(|status| *status > 0)?;
    Some(u32::try_from(status).unwrap_or(u32::MAX))
}

fn rfc3339(raw: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(raw).ok()
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    /// Records on this page.
    pub total: usize,
    /// Records matching the filter across all pages.
    pub matched: usize,
    pub logs: Vec<LogRecord>,
}

async fn logs(
    State(engine): State<Arc<QueryEngine>>,
    Query(params): Query<LogParams>,
) -> Result<Json<LogsResponse>, ApiError> {
    let filter = params.into_filter();
    let result = tokio::task::spawn_blocking(move || engine.query(&filter)).await??;
    Ok(Json(LogsResponse {
        total: result.records.len(),
        matched: result.matched,
        logs: result.records,
    }))
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] Error),
    #[error("query task failed: {0}")]
    Task(#[from] JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to fetch logs: {self}"),
        )
            .into_response()
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
