use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error, warn};

use crate::backend::Backend;
use crate::protocol::HealthResponse;
use crate::server::error::RelayError;
use crate::server::payload::ChatPayload;
use crate::server::proxy::build_upstream_url;
use crate::stream::sse_response;

/// Shared application state.
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub http_client: reqwest::Client,
}

/// Health check handler.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend: Some(state.backend.name().to_string()),
    })
}

/// Chat endpoint — forwards to the backend and normalizes streaming output.
///
/// Every failure before the response is committed is converted here, the
/// only place a [`RelayError`] becomes a response.
pub async fn chat(State(state): State<Arc<AppState>>, req: Request) -> Response {
    match relay_chat(&state, req).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn relay_chat(state: &AppState, req: Request) -> Result<Response, RelayError> {
    if *req.method() != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    // Request bodies are not size-capped; the upstream enforces its own limits.
    let body = to_bytes(req.into_body(), usize::MAX)
        .await
        .map_err(RelayError::ReadBody)?;
    let payload = ChatPayload::parse(&body)?;
    let stream = payload.stream;

    let backend = &state.backend;
    let upstream_url = build_upstream_url(backend.base_url(), backend.chat_completions_path())
        .map_err(|e| {
            error!(
                backend = backend.name(),
                base_url = backend.base_url(),
                error = %e,
                "failed to build upstream URL"
            );
            RelayError::Internal(e)
        })?;

    let mut upstream_req = state
        .http_client
        .post(&upstream_url)
        .json(&payload.into_upstream_body())
        .build()
        .map_err(RelayError::Dispatch)?;

    backend.authorize_request(upstream_req.headers_mut());

    let resp = state
        .http_client
        .execute(upstream_req)
        .await
        .map_err(|e| {
            error!(
                backend = backend.name(),
                url = upstream_url,
                error = %e,
                "upstream request failed"
            );
            RelayError::Dispatch(e)
        })?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        warn!(
            backend = backend.name(),
            status = status.as_u16(),
            "upstream returned error status"
        );
        return Err(RelayError::Upstream { status, body });
    }

    if !stream {
        let data: serde_json::Value = resp.json().await.map_err(|e| {
            error!(backend = backend.name(), error = %e, "failed to decode upstream response");
            RelayError::InvalidUpstreamJson(e)
        })?;
        return Ok((StatusCode::OK, Json(data)).into_response());
    }

    debug!(backend = backend.name(), "relaying upstream stream");
    Ok(sse_response(resp))
}
