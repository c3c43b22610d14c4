use http::header::{HeaderValue, AUTHORIZATION};
use tracing::error;

use super::Backend;

pub const DEFAULT_BASE_URL: &str = "https://api.venice.ai/api";

/// Venice backend configuration.
pub struct VeniceConfig {
    pub base_url: Option<String>,
    pub api_key: String,
}

/// Venice backend: OpenAI-compatible chat completions behind a bearer key.
pub struct Venice {
    base_url: String,
    api_key: String,
}

impl Venice {
    pub fn new(config: VeniceConfig) -> Self {
        Self {
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            api_key: config.api_key,
        }
    }
}

impl Backend for Venice {
    fn name(&self) -> &str {
        "venice"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize_request(&self, headers: &mut http::HeaderMap) {
        match HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Err(e) => {
                error!(backend = self.name(), error = %e, "api key is not a valid header value");
            }
        }
    }

    fn chat_completions_path(&self) -> &str {
        "/v1/chat/completions"
    }
}
