use crate::common::{invidious_url, MockProbeClient, VIDEO_BODY};
use instance_ranker::core::probe::strategy::{bare_strategy, browser_strategy};
use instance_ranker::core::probe::types::TransportError;
use instance_ranker::core::probe::InstanceProber;
use serde_json::json;

const BASE: &str = "https://yt.example";
const PATH: &str = "/api/v1/videos/dQw4w9WgXcQ";

#[tokio::test]
async fn test_probe_success_parses_body() {
    let client = MockProbeClient::new();
    client.respond(
        &invidious_url(BASE),
        200,
        VIDEO_BODY,
        420,
        &[("Access-Control-Allow-Origin", "*")],
    );
    let prober = InstanceProber::new(Box::new(client.clone()));

    let attempt = prober.probe(BASE, PATH, &browser_strategy(), 10_000).await;

    assert!(attempt.completed());
    assert_eq!(attempt.status_code, Some(200));
    assert_eq!(attempt.strategy, "browser");
    assert_eq!(attempt.elapsed_ms, 420.0);
    assert_eq!(
        attempt.parsed_body.as_ref().and_then(|b| b.get("videoId")),
        Some(&json!("dQw4w9WgXcQ"))
    );
    let headers = attempt.response_headers.unwrap();
    assert_eq!(headers.get("access-control-allow-origin").map(String::as_str), Some("*"));
}

#[tokio::test]
async fn test_probe_sends_strategy_headers_and_timeout() {
    let client = MockProbeClient::new();
    client.respond(&invidious_url(BASE), 200, VIDEO_BODY, 100, &[]);
    client.respond(&invidious_url(BASE), 200, VIDEO_BODY, 100, &[]);
    let prober = InstanceProber::new(Box::new(client.clone()));

    prober.probe("https://yt.example/", PATH, &browser_strategy(), 12_000).await;
    prober.probe(BASE, PATH, &bare_strategy(), 12_000).await;

    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, invidious_url(BASE));
    assert!(calls[0].1.contains_key("User-Agent"));
    assert_eq!(calls[0].2, 12_000);
    assert!(calls[1].1.is_empty());
}

#[tokio::test]
async fn test_probe_non_200_keeps_elapsed_but_skips_parsing() {
    let client = MockProbeClient::new();
    client.respond(&invidious_url(BASE), 503, VIDEO_BODY, 950, &[]);
    let prober = InstanceProber::new(Box::new(client));

    let attempt = prober.probe(BASE, PATH, &bare_strategy(), 10_000).await;

    assert!(attempt.completed());
    assert_eq!(attempt.status_code, Some(503));
    assert!(attempt.parsed_body.is_none());
    assert_eq!(attempt.elapsed_ms, 950.0);
}

#[tokio::test]
async fn test_probe_unparseable_200() {
    let client = MockProbeClient::new();
    client.respond(&invidious_url(BASE), 200, "<html>nope</html>", 100, &[]);
    let prober = InstanceProber::new(Box::new(client));

    let attempt = prober.probe(BASE, PATH, &bare_strategy(), 10_000).await;

    assert_eq!(attempt.status_code, Some(200));
    assert!(attempt.parsed_body.is_none());
    assert!(attempt.failure.is_none());
}

#[tokio::test]
async fn test_probe_transport_failure_is_absorbed() {
    let client = MockProbeClient::new();
    client.fail(&invidious_url(BASE), TransportError::Timeout(10_000));
    let prober = InstanceProber::new(Box::new(client));

    let attempt = prober.probe(BASE, PATH, &browser_strategy(), 10_000).await;

    assert!(!attempt.completed());
    assert_eq!(attempt.failure, Some(TransportError::Timeout(10_000)));
    assert!(attempt.status_code.is_none());
    assert!(attempt.parsed_body.is_none());
    assert!(attempt.response_headers.is_none());
}
