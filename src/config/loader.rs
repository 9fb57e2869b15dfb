use super::types::Config;
use crate::core::probe::types::RankerError;
use crate::core::probe::ProbeStrategySelector;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const TIMEOUT_ENV_VAR: &str = "INSTANCE_RANKER_TIMEOUT_MS";
/// Upper bound for any configured or overridden probe timeout
pub const MAX_TIMEOUT_MS: u32 = 60_000;

impl Config {
    /// `~/.instance-ranker/config.toml`
    pub fn default_path() -> Result<PathBuf, RankerError> {
        let home = dirs::home_dir().ok_or(RankerError::HomeDirNotFound)?;
        Ok(home.join(".instance-ranker").join("config.toml"))
    }

    /// Load from the default location; a missing file yields defaults
    pub fn load() -> Result<Self, RankerError> {
        let path = Self::default_path()?;
        if !path.exists() {
            return Ok(Config::default().with_env_overrides());
        }
        Self::load_from(&path)
    }

    /// Load, apply environment overrides and validate
    pub fn load_from(path: &Path) -> Result<Self, RankerError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RankerError::ConfigReadError(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml(&content)?.with_env_overrides();
        config.check()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, RankerError> {
        toml::from_str(content).map_err(|e| RankerError::ConfigParseError(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, RankerError> {
        toml::to_string_pretty(self).map_err(|e| RankerError::ConfigParseError(e.to_string()))
    }

    /// Write the default configuration file, never overwriting an existing one
    pub fn init() -> Result<PathBuf, RankerError> {
        let path = Self::default_path()?;
        Self::init_at(&path)?;
        Ok(path)
    }

    pub fn init_at(path: &Path) -> Result<(), RankerError> {
        if path.exists() {
            return Err(RankerError::ConfigInvalid(format!(
                "{} already exists",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RankerError::ConfigReadError(e.to_string()))?;
        }
        std::fs::write(path, Config::default().to_toml()?)
            .map_err(|e| RankerError::ConfigReadError(e.to_string()))?;
        Ok(())
    }

    pub fn print(&self) -> Result<(), RankerError> {
        println!("{}", self.to_toml()?);
        Ok(())
    }

    /// Validate the configuration
    pub fn check(&self) -> Result<(), RankerError> {
        let invalid = |msg: String| -> Result<(), RankerError> { Err(RankerError::ConfigInvalid(msg)) };

        if self.probe.timeout_ms == 0 || self.probe.timeout_ms > MAX_TIMEOUT_MS {
            return invalid(format!(
                "probe.timeout_ms must be within 1..={}",
                MAX_TIMEOUT_MS
            ));
        }
        if self.probe.max_concurrency == 0 {
            return invalid("probe.max_concurrency must be at least 1".to_string());
        }
        let video_id = self.probe.video_id.trim();
        if video_id.is_empty()
            || !video_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return invalid(format!("probe.video_id '{}' is not a video id", video_id));
        }

        if self.strategies.len() < 2 {
            return invalid("at least two strategies are required".to_string());
        }
        let mut names = HashSet::new();
        for strategy in &self.strategies {
            if strategy.name.trim().is_empty() {
                return invalid("strategy names must not be empty".to_string());
            }
            if !names.insert(strategy.name.as_str()) {
                return invalid(format!("duplicate strategy '{}'", strategy.name));
            }
        }

        self.scoring
            .validate()
            .map_err(|e| RankerError::ConfigInvalid(format!("scoring: {}", e)))?;

        Ok(())
    }

    /// Apply `INSTANCE_RANKER_TIMEOUT_MS`, capped at `MAX_TIMEOUT_MS`
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var(TIMEOUT_ENV_VAR) {
            if let Ok(timeout_ms) = value.trim().parse::<u32>() {
                if timeout_ms > 0 {
                    self.probe.timeout_ms = timeout_ms.min(MAX_TIMEOUT_MS);
                }
            }
        }
        self
    }

    pub fn strategy_selector(&self) -> ProbeStrategySelector {
        ProbeStrategySelector::new(self.strategies.clone(), self.probe.video_id.trim())
    }
}
