use std::time::Instant;

use axum::body::Body;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};

/// Request logging. Health checks are skipped; for streamed responses the
/// duration covers time to first byte, not the whole stream.
pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    if req.uri().path() == "/health" {
        return next.run(req).await;
    }

    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis();
    let streaming = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/event-stream"));

    match status {
        500.. => error!(method, path, status, duration_ms, streaming, "request"),
        400..=499 => warn!(method, path, status, duration_ms, streaming, "request"),
        _ => info!(method, path, status, duration_ms, streaming, "request"),
    }

    response
}
