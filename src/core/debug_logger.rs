use std::collections::HashMap;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use fs2::FileExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEBUG_ENV_VAR: &str = "INSTANCE_RANKER_DEBUG";
pub const LOG_PATH_ENV_VAR: &str = "INSTANCE_RANKER_LOG_PATH";

const LOG_ROTATION_SIZE_MB: u64 = 8;
const MAX_ARCHIVES: usize = 5;
const ROTATION_CHECK_INTERVAL: u32 = 200;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,                           // ISO-8601 with timezone
    pub level: String,                               // ERROR, PROBE
    pub component: String,
    pub event: String,
    pub message: String,                             // redacted
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
}

struct RotatingLogger {
    log_path: PathBuf,
    write_count: AtomicU32,
}

impl RotatingLogger {
    fn new(log_path: PathBuf) -> Self {
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        Self {
            log_path,
            write_count: AtomicU32::new(0),
        }
    }

    fn write_with_rotation(&self, json_line: &str) -> Result<(), std::io::Error> {
        if self.write_count.fetch_add(1, Ordering::Relaxed) % ROTATION_CHECK_INTERVAL == 0 {
            let _ = self.rotate_if_needed(); // Rotation errors never stop logging
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        writeln!(file, "{}", json_line)?;
        Ok(())
    }

    fn rotate_if_needed(&self) -> Result<(), std::io::Error> {
        if !self.needs_rotation()? {
            return Ok(());
        }

        // Concurrent runs share the log file
        let lock_path = self.log_path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {
                if self.needs_rotation()? {
                    self.perform_rotation()?;
                }
                let _ = std::fs::remove_file(&lock_path);
                Ok(())
            }
            Err(_) => Ok(()), // Another process is rotating
        }
    }

    fn needs_rotation(&self) -> Result<bool, std::io::Error> {
        if !self.log_path.exists() {
            return Ok(false);
        }

        let metadata = std::fs::metadata(&self.log_path)?;
        Ok(metadata.len() >= LOG_ROTATION_SIZE_MB * 1024 * 1024)
    }

    fn log_dir_and_stem(&self) -> Result<(&Path, String), std::io::Error> {
        let invalid = || std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid log path");
        let dir = self.log_path.parent().ok_or_else(invalid)?;
        let stem = self
            .log_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(invalid)?
            .to_string();
        Ok((dir, stem))
    }

    fn perform_rotation(&self) -> Result<(), std::io::Error> {
        let (log_dir, base_name) = self.log_dir_and_stem()?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let archive_path = log_dir.join(format!("{}.{}.gz", base_name, timestamp));

        // Move aside, compress, then drop the uncompressed copy
        let temp_path = self.log_path.with_extension("rotating");
        std::fs::rename(&self.log_path, &temp_path)?;

        let source_file = File::open(&temp_path)?;
        let target_file = File::create(&archive_path)?;
        let mut encoder = GzEncoder::new(target_file, Compression::default());
        std::io::copy(&mut BufReader::new(source_file), &mut encoder)?;
        encoder.finish()?;

        std::fs::remove_file(&temp_path)?;

        let _ = self.cleanup_old_archives();

        Ok(())
    }

    fn cleanup_old_archives(&self) -> Result<(), std::io::Error> {
        let (log_dir, base_name) = self.log_dir_and_stem()?;
        let prefix = format!("{}.", base_name);

        let mut archives = Vec::new();
        for entry in std::fs::read_dir(log_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();

            if name.starts_with(&prefix) && name.ends_with(".gz") {
                archives.push((entry.path(), entry.metadata()?.modified()?));
            }
        }

        archives.sort_by_key(|(_, modified)| *modified);
        if archives.len() > MAX_ARCHIVES {
            let to_remove = archives.len() - MAX_ARCHIVES;
            for (path, _) in archives.iter().take(to_remove) {
                let _ = std::fs::remove_file(path);
            }
        }

        Ok(())
    }
}

/// Opt-in JSON Lines debug log for probe runs
pub struct EnhancedDebugLogger {
    enabled: bool,
    rotating_logger: Option<Arc<Mutex<RotatingLogger>>>,
    session_id: String,
    redaction_patterns: Vec<(Regex, &'static str)>,
}

impl Default for EnhancedDebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl EnhancedDebugLogger {
    pub fn new() -> Self {
        let enabled = Self::parse_debug_enabled();
        let log_path = if enabled { Some(Self::get_log_path()) } else { None };
        Self::build(enabled, log_path)
    }

    /// Always-enabled logger writing to an explicit file
    pub fn with_log_path(log_path: PathBuf) -> Self {
        Self::build(true, Some(log_path))
    }

    fn build(enabled: bool, log_path: Option<PathBuf>) -> Self {
        let session_id = Uuid::new_v4().to_string()[..8].to_string();
        let rotating_logger = log_path.map(|path| Arc::new(Mutex::new(RotatingLogger::new(path))));

        Self {
            enabled,
            rotating_logger,
            session_id,
            redaction_patterns: Self::compile_redaction_patterns(),
        }
    }

    /// Supports: true/false, 1/0, yes/no, on/off (case insensitive)
    fn parse_debug_enabled() -> bool {
        env::var(DEBUG_ENV_VAR)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }

    pub fn get_log_path() -> PathBuf {
        if let Ok(path) = env::var(LOG_PATH_ENV_VAR) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        let mut log_path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        log_path.push(".instance-ranker");
        log_path.push("instance-ranker-debug.log");
        log_path
    }

    /// (pattern, replacement) pairs, compiled once per logger
    fn compile_redaction_patterns() -> Vec<(Regex, &'static str)> {
        let patterns = [
            (r"(?i)(https?://)[^/\s:@]+:[^/\s@]+@", "${1}[REDACTED]@"),
            (r"(?i)bearer[:\s]+[^\s\n]+", "[REDACTED]"),
            (r"(?i)authorization[:\s]+[^\s\n]+", "[REDACTED]"),
            (r"(?i)(token|api[_-]?key|secret|password)=[^&\s]+", "${1}=[REDACTED]"),
        ];

        patterns
            .iter()
            .filter_map(|(pattern, replacement)| {
                Regex::new(pattern).ok().map(|regex| (regex, *replacement))
            })
            .collect()
    }

    /// Strip credentials embedded in URLs, headers and query strings
    pub fn redact_sensitive_data(&self, text: &str) -> String {
        let mut redacted = text.to_string();
        for (regex, replacement) in &self.redaction_patterns {
            redacted = regex.replace_all(&redacted, *replacement).to_string();
        }
        redacted
    }

    fn log_sync(
        &self,
        level: &str,
        component: &str,
        event: &str,
        message: &str,
        correlation_id: Option<String>,
        fields: HashMap<String, serde_json::Value>,
    ) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level: level.to_string(),
            component: component.to_string(),
            event: event.to_string(),
            message: self.redact_sensitive_data(message),
            correlation_id: correlation_id.or_else(|| Some(self.session_id.clone())),
            fields,
        };

        if let Some(logger) = &self.rotating_logger {
            if let Ok(logger) = logger.lock() {
                if let Ok(json_line) = serde_json::to_string(&entry) {
                    let _ = logger.write_with_rotation(&json_line); // Don't crash on logging errors
                }
            }
        }
    }

    pub fn error(&self, component: &str, event: &str, message: &str) {
        self.log_sync("ERROR", component, event, message, None, HashMap::new());
    }

    // Typed probe events

    pub fn probe_attempt_start(
        &self,
        url: &str,
        strategy: &str,
        timeout_ms: u64,
        correlation_id: String,
    ) {
        let mut fields = HashMap::new();
        fields.insert("strategy".to_string(), serde_json::Value::String(strategy.to_string()));
        fields.insert("timeout_ms".to_string(), serde_json::Value::Number(timeout_ms.into()));

        self.log_sync(
            "PROBE",
            "InstanceEvaluator",
            "probe_attempt_start",
            &format!("Probing {} with {} strategy", url, strategy),
            Some(correlation_id),
            fields,
        );
    }

    pub fn probe_attempt_end(
        &self,
        strategy: &str,
        http_status: Option<u16>,
        elapsed_ms: u64,
        failure: Option<&str>,
        correlation_id: String,
    ) {
        let mut fields = HashMap::new();
        fields.insert("strategy".to_string(), serde_json::Value::String(strategy.to_string()));
        fields.insert("elapsed_ms".to_string(), serde_json::Value::Number(elapsed_ms.into()));
        if let Some(code) = http_status {
            fields.insert("http_status".to_string(), serde_json::Value::Number(code.into()));
        }
        if let Some(reason) = failure {
            fields.insert(
                "failure".to_string(),
                serde_json::Value::String(self.redact_sensitive_data(reason)),
            );
        }

        let outcome = failure.unwrap_or("ok");
        self.log_sync(
            "PROBE",
            "InstanceEvaluator",
            "probe_attempt_end",
            &format!("Attempt {} finished: {} ({}ms)", strategy, outcome, elapsed_ms),
            Some(correlation_id),
            fields,
        );
    }

    pub fn instance_scored(
        &self,
        url: &str,
        score: u32,
        api_ok: bool,
        cors_ok: bool,
        latency_ms: u64,
        correlation_id: String,
    ) {
        let mut fields = HashMap::new();
        fields.insert("score".to_string(), serde_json::Value::Number(score.into()));
        fields.insert("api_ok".to_string(), serde_json::Value::Bool(api_ok));
        fields.insert("cors_ok".to_string(), serde_json::Value::Bool(cors_ok));
        fields.insert("latency_ms".to_string(), serde_json::Value::Number(latency_ms.into()));

        self.log_sync(
            "PROBE",
            "InstanceEvaluator",
            "instance_scored",
            &format!("{} scored {}", url, score),
            Some(correlation_id),
            fields,
        );
    }

    pub fn run_summary(&self, total: usize, healthy: usize, duration_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("targets".to_string(), serde_json::Value::Number(total.into()));
        fields.insert("healthy".to_string(), serde_json::Value::Number(healthy.into()));
        fields.insert("duration_ms".to_string(), serde_json::Value::Number(duration_ms.into()));

        self.log_sync(
            "PROBE",
            "FleetRunner",
            "run_summary",
            &format!("Run finished: {}/{} healthy ({}ms)", healthy, total, duration_ms),
            None,
            fields,
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_session_id(&self) -> &str {
        &self.session_id
    }
}

// Factory function
pub fn get_debug_logger() -> EnhancedDebugLogger {
    EnhancedDebugLogger::new()
}
