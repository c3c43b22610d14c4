//! Upstream stream → `delta`/`done` SSE translation.

pub mod decoder;
pub mod delta;
pub mod lines;
pub mod translator;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

pub use translator::translate;

/// Wrap an upstream streaming response into the relay's SSE response.
pub fn sse_response(upstream: reqwest::Response) -> Response {
    let body = Body::from_stream(translate(upstream.bytes_stream()));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache, no-transform")
        .header(header::CONNECTION, "keep-alive")
        .body(body)
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
