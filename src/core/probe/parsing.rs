//! Probe Response Inspection
//!
//! Loosely-typed payload checks shared by both API dialects, cross-origin
//! header matching, and anti-bot challenge detection.

use crate::core::probe::url::{instance_origin, normalize_base_url};
use serde_json::Value;
use std::collections::HashMap;

pub const CORS_HEADER: &str = "access-control-allow-origin";

/// Parse a response body into a loosely-typed JSON document
///
/// # Returns
/// * `Some(Value)` - Body is valid JSON
/// * `None` - Body is empty, whitespace-only, or not JSON
pub fn parse_body(body: &[u8]) -> Option<Value> {
    if body.is_empty() || body.iter().all(|&b| b.is_ascii_whitespace()) {
        return None;
    }
    serde_json::from_slice(body).ok()
}

/// Whether a video lookup payload carries a `title` field
///
/// Invidious `/api/v1/videos/{id}` and Piped `/streams/{id}` both answer with
/// an object holding `title`. Arrays, scalars and `null` never match.
pub fn has_title_field(document: &Value) -> bool {
    document
        .as_object()
        .and_then(|obj| obj.get("title"))
        .is_some()
}

/// Case-insensitive header lookup
pub fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Whether the instance answers cross-origin requests
///
/// Matches when `access-control-allow-origin` is `*`, or names the instance
/// itself (exact URL, origin, or a value containing either). Trailing slashes
/// and case are ignored.
pub fn cors_allows(headers: &HashMap<String, String>, instance_url: &str) -> bool {
    let value = match find_header(headers, CORS_HEADER) {
        Some(value) => value.trim(),
        None => return false,
    };

    if value == "*" {
        return true;
    }
    if value.is_empty() {
        return false;
    }

    let value = normalize_base_url(value).to_ascii_lowercase();
    let instance = normalize_base_url(instance_url).to_ascii_lowercase();
    if !instance.is_empty() && (value == instance || value.contains(&instance)) {
        return true;
    }

    match instance_origin(instance_url) {
        Ok(origin) => {
            let origin = origin.to_ascii_lowercase();
            value == origin || value.contains(&origin)
        }
        Err(_) => false,
    }
}

/// Detect Cloudflare challenge responses served in place of the API payload
///
/// 1. Headers: cf-mitigated: challenge, cf-ray, server: cloudflare, CF set-cookies
/// 2. Body markers: "Just a moment", /cdn-cgi/challenge-platform, ...
///
/// Only consulted for responses that already failed payload validation, so a
/// healthy API behind Cloudflare is never affected.
pub fn detect_cloudflare_challenge(headers: &HashMap<String, String>, body: &[u8]) -> bool {
    let has_cf_headers = headers.iter().any(|(key, value)| {
        let key_lower = key.to_lowercase();
        let value_lower = value.to_lowercase();
        match key_lower.as_str() {
            "cf-mitigated" => value_lower.contains("challenge"),
            "cf-ray" => true,
            "server" => value_lower.contains("cloudflare"),
            "set-cookie" => {
                value_lower.contains("cf_clearance")
                    || value_lower.contains("__cf_bm")
                    || value_lower.contains("cf_chl_jschl_tk")
            }
            _ => false,
        }
    });

    if has_cf_headers {
        return true;
    }

    if let Ok(body_str) = std::str::from_utf8(body) {
        let body_lower = body_str.to_lowercase();
        let challenge_markers = [
            "just a moment",
            "enable javascript and cookies to continue",
            "checking your browser",
            "cf-browser-verification",
            "cf-challenge-form",
            "/cdn-cgi/challenge-platform",
            "ddos protection by cloudflare",
        ];

        return challenge_markers
            .iter()
            .any(|marker| body_lower.contains(marker));
    }

    false
}
