pub mod venice;

pub use venice::{Venice, VeniceConfig};

/// Backend trait for upstream chat-completion APIs.
pub trait Backend: Send + Sync {
    /// Human-readable name for this backend.
    fn name(&self) -> &str;

    /// Base URL for API requests.
    fn base_url(&self) -> &str;

    /// Add authentication to an outgoing request.
    fn authorize_request(&self, headers: &mut http::HeaderMap);

    /// Path of the chat-completions endpoint, relative to the base URL.
    fn chat_completions_path(&self) -> &str;
}
