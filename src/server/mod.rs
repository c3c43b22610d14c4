pub mod error;
pub mod handlers;
pub mod logging;
pub mod payload;
pub mod proxy;

use std::sync::Arc;

use axum::middleware as axum_middleware;
use axum::routing::{any, get};
use axum::Router;

use crate::backend::Backend;

use self::handlers::AppState;

/// Build the axum router. The chat route accepts every method so the
/// handler can answer non-POST requests with a JSON 405.
pub fn build_router(backend: Arc<dyn Backend>, http_client: reqwest::Client) -> Router {
    let state = Arc::new(AppState {
        backend,
        http_client,
    });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/chat", any(handlers::chat))
        .layer(axum_middleware::from_fn(logging::logging_middleware))
        .with_state(state)
}
