/*!
Tests for payload inspection, CORS matching and challenge detection.
*/

use instance_ranker::core::probe::parsing::{
    cors_allows, detect_cloudflare_challenge, has_title_field, parse_body,
};
use serde_json::json;
use std::collections::HashMap;

fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_parse_body() {
    assert_eq!(parse_body(br#"{"title": "x"}"#), Some(json!({"title": "x"})));
    assert_eq!(parse_body(b""), None);
    assert_eq!(parse_body(b"  \n "), None);
    assert_eq!(parse_body(b"<html>blocked</html>"), None);
}

#[test]
fn test_title_field_detection() {
    assert!(has_title_field(&json!({"title": "Never Gonna Give You Up"})));
    // Presence is enough, whatever the value
    assert!(has_title_field(&json!({"title": null})));
    assert!(!has_title_field(&json!({"error": "Video unavailable"})));
    assert!(!has_title_field(&json!([{"title": "nested in array"}])));
    assert!(!has_title_field(&json!("title")));
    assert!(!has_title_field(&json!(null)));
}

#[test]
fn test_cors_wildcard() {
    let h = headers(&[("access-control-allow-origin", "*")]);
    assert!(cors_allows(&h, "https://yt.example"));
}

#[test]
fn test_cors_header_name_case_insensitive() {
    let h = headers(&[("Access-Control-Allow-Origin", " * ")]);
    assert!(cors_allows(&h, "https://yt.example"));
}

#[test]
fn test_cors_matches_own_url() {
    let h = headers(&[("access-control-allow-origin", "https://YT.example/")]);
    assert!(cors_allows(&h, "https://yt.example"));

    let h = headers(&[("access-control-allow-origin", "https://yt.example")]);
    assert!(cors_allows(&h, "https://yt.example/invidious"));
}

#[test]
fn test_cors_rejects_other_origins() {
    let h = headers(&[("access-control-allow-origin", "https://frontend.other")]);
    assert!(!cors_allows(&h, "https://yt.example"));

    let h = headers(&[("access-control-allow-origin", "")]);
    assert!(!cors_allows(&h, "https://yt.example"));

    assert!(!cors_allows(&HashMap::new(), "https://yt.example"));
}

#[test]
fn test_detect_cloudflare_challenge_by_header() {
    let h = headers(&[("cf-mitigated", "challenge")]);
    assert!(detect_cloudflare_challenge(&h, b""));

    let h = headers(&[("server", "cloudflare")]);
    assert!(detect_cloudflare_challenge(&h, b""));
}

#[test]
fn test_detect_cloudflare_challenge_by_body() {
    let body = b"<html><title>Just a moment...</title></html>";
    assert!(detect_cloudflare_challenge(&HashMap::new(), body));

    let body = b"<script src=\"/cdn-cgi/challenge-platform/h/b\"></script>";
    assert!(detect_cloudflare_challenge(&HashMap::new(), body));
}

#[test]
fn test_plain_error_page_is_not_a_challenge() {
    let h = headers(&[("server", "nginx")]);
    assert!(!detect_cloudflare_challenge(&h, b"<html>502 Bad Gateway</html>"));
}
