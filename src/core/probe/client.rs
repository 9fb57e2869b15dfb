//! Probe Client Implementations
//!
//! HTTP client abstraction for instance probes: GET method, caller-supplied
//! headers, redirects followed, certificate validation disabled, full
//! response body returned for payload inspection.

use crate::core::probe::types::{HeaderSet, ProbeResponse, RankerError, TransportError};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use isahc::config::{Configurable, RedirectPolicy, SslOption};
use isahc::{AsyncReadResponseExt, HttpClient, Request};

/// Maximum redirect hops followed per probe
pub const MAX_REDIRECTS: u32 = 10;

/// Dedicated HTTP client for instance probes
#[async_trait::async_trait]
pub trait ProbeClient: Send + Sync {
    /// Execute one GET request
    ///
    /// # Returns
    /// * `Ok(ProbeResponse)` - Any HTTP response, whatever the status
    /// * `Err(TransportError)` - Timeout, DNS, connect or TLS failure
    ///
    /// # Implementation Requirements
    /// * Must follow redirects
    /// * Must not validate TLS certificates
    /// * Must abandon the request once `timeout_ms` elapses
    /// * Duration covers dispatch to end of body read
    async fn get(
        &self,
        url: String,
        headers: &HeaderSet,
        timeout_ms: u32,
    ) -> Result<ProbeResponse, TransportError>;
}

/// Production probe client implementation using isahc
pub struct IsahcProbeClient {
    client: HttpClient,
}

#[async_trait::async_trait]
impl ProbeClient for IsahcProbeClient {
    async fn get(
        &self,
        url: String,
        headers: &HeaderSet,
        timeout_ms: u32,
    ) -> Result<ProbeResponse, TransportError> {
        let timeout = Duration::from_millis(timeout_ms as u64);
        let start = Instant::now();

        let mut builder = Request::get(&url).timeout(timeout);
        for (key, value) in headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let request = builder
            .body(Vec::new())
            .map_err(|e| TransportError::Connection(format!("Request creation failed: {}", e)))?;

        // isahc's timeout covers the transfer; the outer guard also drops a
        // stalled body read and its connection.
        let exchange = async {
            let mut response = self.client.send_async(request).await.map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(timeout_ms)
                } else {
                    TransportError::Connection(e.to_string())
                }
            })?;

            let status_code = response.status().as_u16();

            let mut response_headers = HashMap::new();
            for (key, value) in response.headers() {
                if let Ok(value_str) = value.to_str() {
                    response_headers.insert(key.as_str().to_lowercase(), value_str.to_string());
                }
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::Connection(format!("Failed to read body: {}", e)))?;

            Ok::<_, TransportError>((status_code, response_headers, body))
        };

        let (status_code, headers, body) = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout(timeout_ms))??;

        Ok(ProbeResponse {
            status_code,
            body,
            duration: start.elapsed(),
            headers,
        })
    }
}

impl IsahcProbeClient {
    pub fn new() -> Result<Self, RankerError> {
        let client = HttpClient::builder()
            .redirect_policy(RedirectPolicy::Limit(MAX_REDIRECTS))
            // Self-hosted instances frequently run expired or self-signed certs
            .ssl_options(
                SslOption::DANGER_ACCEPT_INVALID_CERTS
                    | SslOption::DANGER_ACCEPT_INVALID_HOSTS
                    | SslOption::DANGER_ACCEPT_REVOKED_CERTS,
            )
            .build()
            .map_err(|e| RankerError::HttpError(format!("Failed to create probe client: {}", e)))?;
        Ok(Self { client })
    }
}
