use url::Url;

/// Join an endpoint path onto the backend base URL, keeping any path prefix
/// the base carries (e.g. `https://api.venice.ai/api`).
pub fn build_upstream_url(base_url: &str, path: &str) -> Result<String, String> {
    let mut parsed = Url::parse(base_url).map_err(|e| e.to_string())?;

    let prefix = parsed.path().trim_end_matches('/');
    let endpoint = path.trim_start_matches('/');

    let full_path = match (prefix.is_empty(), endpoint.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{endpoint}"),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}/{endpoint}"),
    };

    parsed.set_path(&full_path);
    parsed.set_query(None);

    Ok(parsed.to_string())
}
