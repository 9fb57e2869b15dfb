/*!
Tests for the isahc-backed client against throwaway local HTTP servers:
hard timeout, redirect following, status pass-through and error separation.
*/

use instance_ranker::core::probe::types::{HeaderSet, TransportError};
use instance_ranker::core::probe::{IsahcProbeClient, ProbeClient};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

/// Request path of the first request line
fn read_request_path(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string()
}

/// Serve `connections` requests, answering each with `respond(path)`
fn serve<F>(connections: usize, respond: F) -> String
where
    F: Fn(&str) -> String + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    thread::spawn(move || {
        for stream in listener.incoming().take(connections) {
            let mut stream = match stream {
                Ok(stream) => stream,
                Err(_) => break,
            };
            let path = read_request_path(&mut stream);
            let _ = stream.write_all(respond(&path).as_bytes());
            let _ = stream.flush();
        }
    });
    base
}

fn response(status_line: &str, extra_headers: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        extra_headers,
        body.len(),
        body
    )
}

#[tokio::test]
async fn test_stalled_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/v1/videos/x", listener.local_addr().unwrap());
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request_path(&mut stream);
            // Never answer
            thread::sleep(Duration::from_secs(3));
        }
    });

    let client = IsahcProbeClient::new().unwrap();
    let started = Instant::now();
    let result = client.get(url, &HeaderSet::new(), 300).await;
    let elapsed = started.elapsed();

    assert_eq!(result.unwrap_err(), TransportError::Timeout(300));
    assert!(elapsed >= Duration::from_millis(250), "returned after {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(2000), "returned after {:?}", elapsed);
}

#[tokio::test]
async fn test_redirect_is_followed() {
    let base = serve(2, |path| {
        if path == "/old" {
            response("301 Moved Permanently", "Location: /new\r\n", "")
        } else {
            response(
                "200 OK",
                "Content-Type: application/json\r\nAccess-Control-Allow-Origin: *\r\n",
                r#"{"title":"x"}"#,
            )
        }
    });

    let client = IsahcProbeClient::new().unwrap();
    let response = client
        .get(format!("{}/old", base), &HeaderSet::new(), 5_000)
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.headers.get("access-control-allow-origin").map(String::as_str),
        Some("*")
    );
    assert_eq!(response.body, br#"{"title":"x"}"#.to_vec());
    assert!(response.duration < Duration::from_millis(5_000));
}

#[tokio::test]
async fn test_error_status_is_passed_through() {
    let base = serve(1, |_| response("503 Service Unavailable", "", "maintenance"));

    let client = IsahcProbeClient::new().unwrap();
    let response = client
        .get(format!("{}/streams/x", base), &HeaderSet::new(), 5_000)
        .await
        .unwrap();

    assert_eq!(response.status_code, 503);
    assert_eq!(response.body, b"maintenance".to_vec());
}

#[tokio::test]
async fn test_refused_connection_is_not_a_timeout() {
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    // Listener dropped: nothing accepts on this port any more

    let client = IsahcProbeClient::new().unwrap();
    let result = client
        .get(format!("http://{}/", addr), &HeaderSet::new(), 5_000)
        .await;

    assert!(
        matches!(result, Err(TransportError::Connection(_))),
        "got {:?}",
        result
    );
}
