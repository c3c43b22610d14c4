use clap::Parser;

/// Venice relay — chat-completions proxy with normalized SSE streaming.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Config {
    /// Listen address (e.g. ":3000" or "0.0.0.0:3000")
    #[arg(long, default_value = ":3000", env = "ADDR")]
    pub addr: String,

    /// Log format: "text" or "json"
    #[arg(long, default_value = "text", env = "LOG_FORMAT")]
    pub log_format: String,

    /// Venice API base URL
    #[arg(
        long,
        default_value = "https://api.venice.ai/api",
        env = "VENICE_BASE_URL"
    )]
    pub venice_base_url: String,

    /// Venice API key, sent verbatim as the upstream bearer token
    #[arg(long, env = "VENICE_API_KEY", hide_env_values = true)]
    pub venice_api_key: Option<String>,
}

/// Convert Go-style ":3000" to "0.0.0.0:3000".
pub fn normalize_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    }
}
