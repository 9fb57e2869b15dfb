//! Probe Strategy Selection
//!
//! Decides which request variants are tried against an instance and in what
//! order, and which API path is requested for each dialect.

use crate::core::probe::types::{HeaderSet, InstanceType, ProbeStrategy};

/// Long-lived public video used as the probe subject
pub const CANONICAL_VIDEO_ID: &str = "dQw4w9WgXcQ";

pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Browser-like header set. Some instances reject clients that look automated.
pub fn browser_strategy() -> ProbeStrategy {
    let mut headers = HeaderSet::new();
    headers.insert("User-Agent".to_string(), BROWSER_USER_AGENT.to_string());
    headers.insert(
        "Accept".to_string(),
        "application/json,text/html;q=0.9,*/*;q=0.8".to_string(),
    );
    headers.insert("Accept-Language".to_string(), "en-US,en;q=0.9".to_string());
    ProbeStrategy {
        name: "browser".to_string(),
        headers,
    }
}

/// Empty header set. Some instances only accept bare requests.
pub fn bare_strategy() -> ProbeStrategy {
    ProbeStrategy {
        name: "bare".to_string(),
        headers: HeaderSet::new(),
    }
}

pub fn default_strategies() -> Vec<ProbeStrategy> {
    vec![browser_strategy(), bare_strategy()]
}

#[derive(Debug, Clone)]
pub struct ProbeStrategySelector {
    strategies: Vec<ProbeStrategy>,
    video_id: String,
}

impl Default for ProbeStrategySelector {
    fn default() -> Self {
        Self::new(default_strategies(), CANONICAL_VIDEO_ID)
    }
}

impl ProbeStrategySelector {
    /// An empty list falls back to the default browser/bare pair
    pub fn new(strategies: Vec<ProbeStrategy>, video_id: &str) -> Self {
        let strategies = if strategies.is_empty() {
            default_strategies()
        } else {
            strategies
        };
        Self {
            strategies,
            video_id: video_id.to_string(),
        }
    }

    /// Ordered request variants for a dialect. Both dialects currently share
    /// one list.
    pub fn strategies_for(&self, _instance_type: InstanceType) -> &[ProbeStrategy] {
        &self.strategies
    }

    /// API path returning a `title`-bearing video object
    ///
    /// # Examples
    /// - Invidious → `/api/v1/videos/dQw4w9WgXcQ`
    /// - Piped → `/streams/dQw4w9WgXcQ`
    pub fn probe_path_for(&self, instance_type: InstanceType) -> String {
        match instance_type {
            InstanceType::Invidious => format!("/api/v1/videos/{}", self.video_id),
            InstanceType::Piped => format!("/streams/{}", self.video_id),
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }
}
