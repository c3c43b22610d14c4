use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::protocol::ErrorResponse;

/// Failures surfaced by the chat relay handler.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Upstream answered with a non-success status; relayed as-is.
    #[error("upstream failed ({status})")]
    Upstream { status: StatusCode, body: String },

    #[error("failed to read request body: {0}")]
    ReadBody(axum::Error),

    #[error("invalid request body: {0}")]
    InvalidBody(serde_json::Error),

    #[error("invalid upstream response: {0}")]
    InvalidUpstreamJson(reqwest::Error),

    #[error("upstream request failed: {0}")]
    Dispatch(reqwest::Error),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(ErrorResponse {
                    error: "method not allowed".to_string(),
                    detail: None,
                }),
            )
                .into_response(),
            RelayError::Upstream { status, body } => {
                let body = if body.is_empty() {
                    format!("upstream failed ({})", status.as_u16())
                } else {
                    body
                };
                (
                    status,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    body,
                )
                    .into_response()
            }
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "server error".to_string(),
                    detail: Some(other.to_string()),
                }),
            )
                .into_response(),
        }
    }
}
