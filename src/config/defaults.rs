use super::types::{Config, PathsConfig, ProbeConfig};
use crate::core::probe::fleet::DEFAULT_MAX_CONCURRENCY;
use crate::core::probe::prober::DEFAULT_TIMEOUT_MS;
use crate::core::probe::scoring::ScoringPolicy;
use crate::core::probe::strategy::{default_strategies, CANONICAL_VIDEO_ID};
use std::path::PathBuf;

pub const DEFAULT_TARGETS_PATH: &str = "instances.json";
pub const DEFAULT_OUTPUT_PATH: &str = "healthy_instances.json";

impl Default for Config {
    fn default() -> Self {
        Config {
            probe: ProbeConfig::default(),
            scoring: ScoringPolicy::default(),
            paths: PathsConfig::default(),
            strategies: default_strategies(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            video_id: CANONICAL_VIDEO_ID.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            targets: PathBuf::from(DEFAULT_TARGETS_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}
