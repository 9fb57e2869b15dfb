//! Single probe attempt execution.

use crate::core::probe::client::ProbeClient;
use crate::core::probe::parsing::parse_body;
use crate::core::probe::types::{ProbeAttempt, ProbeStrategy};
use crate::core::probe::url::build_probe_url;
use std::time::Instant;

/// Default hard timeout per attempt
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

/// Executes one GET per call and folds every outcome into a `ProbeAttempt`
pub struct InstanceProber {
    client: Box<dyn ProbeClient>,
}

impl InstanceProber {
    pub fn new(client: Box<dyn ProbeClient>) -> Self {
        Self { client }
    }

    /// Probe `base_url + path` with one strategy's headers
    ///
    /// Never fails: transport errors land in `ProbeAttempt::failure`. The body
    /// is only parsed for HTTP 200; an unparseable body leaves
    /// `parsed_body = None`.
    pub async fn probe(
        &self,
        base_url: &str,
        path: &str,
        strategy: &ProbeStrategy,
        timeout_ms: u32,
    ) -> ProbeAttempt {
        let url = build_probe_url(base_url, path);
        let start = Instant::now();

        match self.client.get(url, &strategy.headers, timeout_ms).await {
            Ok(response) => {
                let parsed_body = if response.status_code == 200 {
                    parse_body(&response.body)
                } else {
                    None
                };

                ProbeAttempt {
                    strategy: strategy.name.clone(),
                    headers_used: strategy.headers.clone(),
                    status_code: Some(response.status_code),
                    parsed_body,
                    raw_body: response.body,
                    response_headers: Some(response.headers),
                    elapsed_ms: response.duration.as_secs_f64() * 1000.0,
                    failure: None,
                }
            }
            Err(err) => ProbeAttempt {
                strategy: strategy.name.clone(),
                headers_used: strategy.headers.clone(),
                status_code: None,
                parsed_body: None,
                raw_body: Vec::new(),
                response_headers: None,
                elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
                failure: Some(err),
            },
        }
    }
}
