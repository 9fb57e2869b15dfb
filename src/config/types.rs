use crate::core::probe::scoring::ScoringPolicy;
use crate::core::probe::types::ProbeStrategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub probe: ProbeConfig,
    pub scoring: ScoringPolicy,
    pub paths: PathsConfig,
    /// Tried in order for every instance
    pub strategies: Vec<ProbeStrategy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Hard timeout per attempt
    pub timeout_ms: u32,
    /// Video looked up on every instance
    pub video_id: String,
    /// Targets probed at once; 1 means strictly sequential
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub targets: PathBuf,
    pub output: PathBuf,
}
