// Core types for instance probing and ranking
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Request header name -> value, ordered for deterministic logging
pub type HeaderSet = BTreeMap<String, String>;

/// API dialect exposed by an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    #[default]
    Invidious,
    Piped,
}

impl std::fmt::Display for InstanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceType::Invidious => write!(f, "invidious"),
            InstanceType::Piped => write!(f, "piped"),
        }
    }
}

/// One instance to probe. `url` never carries a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Target {
    pub url: String,
    #[serde(rename = "type", default)]
    pub instance_type: InstanceType,
}

impl Target {
    pub fn new(url: &str, instance_type: InstanceType) -> Self {
        Self {
            url: url.trim().trim_end_matches('/').to_string(),
            instance_type,
        }
    }
}

/// A named request variant tried during probing
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProbeStrategy {
    pub name: String,
    #[serde(default)]
    pub headers: HeaderSet,
}

/// Raw response returned by a `ProbeClient`
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
    /// Dispatch to end of body read
    pub duration: std::time::Duration,
    /// Lowercased header names
    pub headers: HashMap<String, String>,
}

/// Transport-level failure reported by a `ProbeClient`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("timed out after {0}ms")]
    Timeout(u32),
    #[error("{0}")]
    Connection(String),
}

/// Record of a single HTTP try. Lives only while one target is evaluated.
#[derive(Debug, Clone)]
pub struct ProbeAttempt {
    pub strategy: String,
    pub headers_used: HeaderSet,
    pub status_code: Option<u16>,
    pub parsed_body: Option<serde_json::Value>,
    pub raw_body: Vec<u8>,
    pub response_headers: Option<HashMap<String, String>>,
    /// Void when `failure` is set
    pub elapsed_ms: f64,
    pub failure: Option<TransportError>,
}

impl ProbeAttempt {
    /// Whether a response (any status) was received
    pub fn completed(&self) -> bool {
        self.failure.is_none() && self.status_code.is_some()
    }
}

/// Why an attempt did not qualify as a working API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeFailure {
    #[error("transport failure: {0}")]
    Transport(TransportError),
    #[error("unexpected HTTP status {0}")]
    Protocol(u16),
    #[error("payload rejected: {0}")]
    Payload(PayloadIssue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadIssue {
    Unparseable,
    MissingTitle,
    CloudflareChallenge,
}

impl std::fmt::Display for PayloadIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadIssue::Unparseable => write!(f, "body is not valid JSON"),
            PayloadIssue::MissingTitle => write!(f, "no title field"),
            PayloadIssue::CloudflareChallenge => write!(f, "cloudflare challenge page"),
        }
    }
}

/// Health metric triple accumulated for one target
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HealthMetrics {
    pub api_ok: bool,
    pub cors_ok: bool,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreResult {
    pub score: u32,
    pub metrics: HealthMetrics,
}

/// Outcome of one attempt as seen by reporting
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptSummary {
    pub strategy: String,
    pub elapsed_ms: f64,
    pub failure: Option<ProbeFailure>,
}

/// Full evaluation of one target
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub target: Target,
    pub result: ScoreResult,
    pub attempts: Vec<AttemptSummary>,
}

impl Evaluation {
    /// Name of the strategy that produced the score, if any
    pub fn winning_strategy(&self) -> Option<&str> {
        if !self.result.metrics.api_ok {
            return None;
        }
        self.attempts
            .iter()
            .find(|a| a.failure.is_none())
            .map(|a| a.strategy.as_str())
    }
}

/// Final output unit, serialized in snapshot format
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InstanceRecord {
    pub url: String,
    #[serde(rename = "type")]
    pub instance_type: InstanceType,
    pub score: u32,
    #[serde(rename = "latency")]
    pub latency_display: String,
    #[serde(rename = "cors")]
    pub cors_ok: bool,
    #[serde(rename = "last_updated")]
    pub observed_at: String,
}

/// Ranked records from one run, highest score first
pub type FleetSnapshot = Vec<InstanceRecord>;

/// Run-level errors
#[derive(Debug, thiserror::Error)]
pub enum RankerError {
    #[error("Home directory not found")]
    HomeDirNotFound,
    #[error("Target list not found: {0}")]
    TargetsNotFound(PathBuf),
    #[error("Target list read error: {0}")]
    TargetsReadError(String),
    #[error("Target list parse error: {0}")]
    TargetsParseError(String),
    #[error("Config read error: {0}")]
    ConfigReadError(String),
    #[error("Config parse error: {0}")]
    ConfigParseError(String),
    #[error("Invalid config: {0}")]
    ConfigInvalid(String),
    #[error("Snapshot write error: {0}")]
    SnapshotError(String),
    #[error("HTTP error: {0}")]
    HttpError(String),
}

/// Timestamp format used in snapshot records
pub const OBSERVED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local time formatted for `last_updated`
pub fn get_observed_timestamp() -> String {
    chrono::Local::now().format(OBSERVED_AT_FORMAT).to_string()
}

/// Human-readable latency, fractional milliseconds truncated
pub fn format_latency(latency_ms: f64) -> String {
    format!("{}ms", latency_ms.max(0.0) as u64)
}
