//! Instance Scoring
//!
//! Additive score from the single attempt that first proves the API works:
//! - API validity: HTTP 200 with a `title`-bearing payload (+50)
//! - Cross-origin access: permissive `access-control-allow-origin` (+20)
//! - Latency tiers: fast (+30), moderate (+15), slow (+0)

use crate::core::probe::parsing::{cors_allows, detect_cloudflare_challenge, has_title_field};
use crate::core::probe::types::{
    HealthMetrics, PayloadIssue, ProbeAttempt, ProbeFailure, ScoreResult,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scoring weights and latency thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub api_score: u32,
    pub cors_bonus: u32,
    /// Latency strictly below this earns `fast_bonus`
    pub fast_threshold_ms: f64,
    pub fast_bonus: u32,
    /// Latency strictly below this (and not fast) earns `moderate_bonus`
    pub moderate_threshold_ms: f64,
    pub moderate_bonus: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            api_score: 50,
            cors_bonus: 20,
            fast_threshold_ms: 800.0,
            fast_bonus: 30,
            moderate_threshold_ms: 2000.0,
            moderate_bonus: 15,
        }
    }
}

impl ScoringPolicy {
    /// Reject policies whose latency bonus would not be monotonic
    pub fn validate(&self) -> Result<(), String> {
        if !(self.fast_threshold_ms.is_finite() && self.moderate_threshold_ms.is_finite()) {
            return Err("latency thresholds must be finite".to_string());
        }
        if self.fast_threshold_ms <= 0.0 {
            return Err("fast_threshold_ms must be positive".to_string());
        }
        if self.fast_threshold_ms >= self.moderate_threshold_ms {
            return Err(format!(
                "fast_threshold_ms ({}) must be below moderate_threshold_ms ({})",
                self.fast_threshold_ms, self.moderate_threshold_ms
            ));
        }
        if self.fast_bonus < self.moderate_bonus {
            return Err(format!(
                "fast_bonus ({}) must not be lower than moderate_bonus ({})",
                self.fast_bonus, self.moderate_bonus
            ));
        }
        Ok(())
    }

    /// Latency tier bonus. Faster never scores less than slower.
    pub fn latency_bonus(&self, latency_ms: f64) -> u32 {
        if latency_ms < self.fast_threshold_ms {
            self.fast_bonus
        } else if latency_ms < self.moderate_threshold_ms {
            self.moderate_bonus
        } else {
            0
        }
    }

    /// Highest score a single instance can reach
    pub fn max_score(&self) -> u32 {
        self.api_score + self.cors_bonus + self.fast_bonus.max(self.moderate_bonus)
    }
}

/// Score one attempt
///
/// # Returns
/// * `Ok(ScoreResult)` - Attempt proved a working API; metrics have `api_ok = true`
/// * `Err(ProbeFailure)` - Why the attempt does not count
pub fn score_attempt(
    attempt: &ProbeAttempt,
    instance_url: &str,
    policy: &ScoringPolicy,
) -> Result<ScoreResult, ProbeFailure> {
    if let Some(err) = &attempt.failure {
        return Err(ProbeFailure::Transport(err.clone()));
    }

    let status = attempt.status_code.unwrap_or(0);
    if status != 200 {
        return Err(ProbeFailure::Protocol(status));
    }

    let empty = HashMap::new();
    let headers = attempt.response_headers.as_ref().unwrap_or(&empty);

    match &attempt.parsed_body {
        Some(document) if has_title_field(document) => {}
        parsed => {
            let issue = if detect_cloudflare_challenge(headers, &attempt.raw_body) {
                PayloadIssue::CloudflareChallenge
            } else if parsed.is_none() {
                PayloadIssue::Unparseable
            } else {
                PayloadIssue::MissingTitle
            };
            return Err(ProbeFailure::Payload(issue));
        }
    }

    let mut score = policy.api_score;

    let cors_ok = cors_allows(headers, instance_url);
    if cors_ok {
        score += policy.cors_bonus;
    }

    score += policy.latency_bonus(attempt.elapsed_ms);

    Ok(ScoreResult {
        score,
        metrics: HealthMetrics {
            api_ok: true,
            cors_ok,
            latency_ms: attempt.elapsed_ms,
        },
    })
}
