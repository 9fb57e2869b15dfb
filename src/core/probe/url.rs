//! URL Utilities for Instance Probes
//!
//! - Base URL normalization (trailing slashes)
//! - Probe URL construction
//! - Origin extraction for cross-origin header matching

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    #[error("Invalid URL format: {0}")]
    ParseError(#[from] url::ParseError),
    #[error("Missing host in URL")]
    MissingHost,
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

/// Normalize base URL by trimming whitespace and trailing slashes
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Build probe URL: normalize(base_url) + path
///
/// # Examples
/// - `https://yt.example/` + `/streams/x` → `https://yt.example/streams/x`
pub fn build_probe_url(base_url: &str, path: &str) -> String {
    let normalized = normalize_base_url(base_url);
    if path.starts_with('/') {
        format!("{}{}", normalized, path)
    } else {
        format!("{}/{}", normalized, path)
    }
}

/// Extract `scheme://host[:port]` from an instance URL
///
/// The port is only kept when it is not the scheme default.
///
/// # Examples
/// - `https://yt.example/sub` → `https://yt.example`
/// - `http://localhost:3000` → `http://localhost:3000`
pub fn instance_origin(base_url: &str) -> Result<String, UrlError> {
    let url = Url::parse(base_url.trim())?;

    let host = url.host_str().ok_or(UrlError::MissingHost)?;

    let mut origin = format!("{}://{}", url.scheme(), host);
    // Url::port() is None for scheme defaults
    if let Some(port) = url.port() {
        origin.push_str(&format!(":{}", port));
    }
    Ok(origin)
}

/// Validate that an instance URL is an absolute http(s) URL with a host
pub fn validate_instance_url(base_url: &str) -> Result<(), UrlError> {
    let url = Url::parse(base_url.trim())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    }
    url.host_str().ok_or(UrlError::MissingHost)?;
    Ok(())
}
