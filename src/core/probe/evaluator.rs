//! Per-instance evaluation: ordered strategy fallback with early exit on the
//! first attempt that proves a working API.

use crate::core::debug_logger::{get_debug_logger, EnhancedDebugLogger};
use crate::core::probe::prober::{InstanceProber, DEFAULT_TIMEOUT_MS};
use crate::core::probe::scoring::{score_attempt, ScoringPolicy};
use crate::core::probe::strategy::ProbeStrategySelector;
use crate::core::probe::types::{
    AttemptSummary, Evaluation, HealthMetrics, ScoreResult, Target,
};

pub struct InstanceEvaluator {
    prober: InstanceProber,
    selector: ProbeStrategySelector,
    policy: ScoringPolicy,
    timeout_ms: u32,
    logger: EnhancedDebugLogger,
}

impl InstanceEvaluator {
    pub fn new(prober: InstanceProber) -> Self {
        Self {
            prober,
            selector: ProbeStrategySelector::default(),
            policy: ScoringPolicy::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            logger: get_debug_logger(),
        }
    }

    pub fn with_selector(mut self, selector: ProbeStrategySelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_logger(mut self, logger: EnhancedDebugLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn logger(&self) -> &EnhancedDebugLogger {
        &self.logger
    }

    /// Evaluate one target
    ///
    /// Strategies are tried strictly in order; the first attempt that scores
    /// ends the loop and alone determines the result. When none qualify the
    /// score is 0 and `latency_ms` is the elapsed time of the last attempt that
    /// received any response (0 if none did), not of the last attempt made: a
    /// trailing transport failure leaves it unchanged. Attempt failures never
    /// escape.
    pub async fn evaluate(&self, target: &Target) -> Evaluation {
        let path = self.selector.probe_path_for(target.instance_type);
        let correlation_id = format!("instance_{}", uuid::Uuid::new_v4());

        let mut attempts = Vec::new();
        let mut last_completed_ms = 0.0;

        for strategy in self.selector.strategies_for(target.instance_type) {
            self.logger.probe_attempt_start(
                &target.url,
                &strategy.name,
                self.timeout_ms as u64,
                correlation_id.clone(),
            );

            let attempt = self
                .prober
                .probe(&target.url, &path, strategy, self.timeout_ms)
                .await;
            if attempt.completed() {
                last_completed_ms = attempt.elapsed_ms;
            }

            let scored = score_attempt(&attempt, &target.url, &self.policy);
            let failure_text = scored.as_ref().err().map(|f| f.to_string());
            self.logger.probe_attempt_end(
                &attempt.strategy,
                attempt.status_code,
                attempt.elapsed_ms as u64,
                failure_text.as_deref(),
                correlation_id.clone(),
            );

            match scored {
                Ok(result) => {
                    attempts.push(AttemptSummary {
                        strategy: attempt.strategy,
                        elapsed_ms: attempt.elapsed_ms,
                        failure: None,
                    });
                    self.log_result(target, &result, correlation_id);
                    return Evaluation {
                        target: target.clone(),
                        result,
                        attempts,
                    };
                }
                Err(failure) => attempts.push(AttemptSummary {
                    strategy: attempt.strategy,
                    elapsed_ms: attempt.elapsed_ms,
                    failure: Some(failure),
                }),
            }
        }

        let result = ScoreResult {
            score: 0,
            metrics: HealthMetrics {
                api_ok: false,
                cors_ok: false,
                latency_ms: last_completed_ms,
            },
        };
        self.log_result(target, &result, correlation_id);

        Evaluation {
            target: target.clone(),
            result,
            attempts,
        }
    }

    fn log_result(&self, target: &Target, result: &ScoreResult, correlation_id: String) {
        self.logger.instance_scored(
            &target.url,
            result.score,
            result.metrics.api_ok,
            result.metrics.cors_ok,
            result.metrics.latency_ms as u64,
            correlation_id,
        );
    }
}
