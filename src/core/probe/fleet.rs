/*!
Fleet-wide probe run producing the ranked snapshot.

## Core Responsibilities

- **Fan-out**: Evaluate targets through a bounded worker pool; each target's
  strategies still run strictly in order
- **Filtering**: Only targets whose API answered become records
- **Ranking**: Stable sort by score, highest first; ties keep input order
- **Observability**: Progress callback per finished target, run summary in the
  debug log

The runner never persists anything. Writing the snapshot belongs to
`core::io::snapshot`.
*/

use crate::core::debug_logger::EnhancedDebugLogger;
use crate::core::probe::evaluator::InstanceEvaluator;
use crate::core::probe::types::{
    format_latency, get_observed_timestamp, Evaluation, FleetSnapshot, InstanceRecord, Target,
};
use futures::stream::{self, StreamExt};
use std::time::Instant;

/// Default number of targets probed at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Clock abstraction for dependency injection and testing
pub trait ClockTrait: Send + Sync {
    fn now(&self) -> Instant;
    /// Observation timestamp in snapshot format (`YYYY-MM-DD HH:MM:SS`)
    fn observed_timestamp(&self) -> String;
}

/// Production clock implementation using system time
#[derive(Default)]
pub struct SystemClock;

impl ClockTrait for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn observed_timestamp(&self) -> String {
        get_observed_timestamp()
    }
}

pub struct FleetRunner {
    evaluator: InstanceEvaluator,
    clock: Box<dyn ClockTrait>,
    max_concurrency: usize,
}

impl FleetRunner {
    pub fn new(evaluator: InstanceEvaluator) -> Self {
        Self {
            evaluator,
            clock: Box::new(SystemClock),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Configure FleetRunner with custom clock (for testing)
    pub fn with_clock(mut self, clock: Box<dyn ClockTrait>) -> Self {
        self.clock = clock;
        self
    }

    /// 1 reproduces a strictly sequential run
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Debug logger shared with the evaluator
    pub fn logger(&self) -> &EnhancedDebugLogger {
        self.evaluator.logger()
    }

    /// Probe every target and return the ranked snapshot
    pub async fn run(&self, targets: &[Target]) -> FleetSnapshot {
        self.run_with_progress(targets, |_| {}).await
    }

    /// Like `run`, calling `on_evaluated` for each target in input order
    pub async fn run_with_progress<F>(&self, targets: &[Target], mut on_evaluated: F) -> FleetSnapshot
    where
        F: FnMut(&Evaluation),
    {
        let started = self.clock.now();

        // `buffered` yields in input order whatever the completion order
        let mut evaluations = stream::iter(targets)
            .map(|target| self.evaluator.evaluate(target))
            .buffered(self.max_concurrency);

        let mut snapshot = FleetSnapshot::new();
        while let Some(evaluation) = evaluations.next().await {
            on_evaluated(&evaluation);
            if let Some(record) = self.build_record(&evaluation) {
                snapshot.push(record);
            }
        }

        rank_snapshot(&mut snapshot);

        self.logger().run_summary(
            targets.len(),
            snapshot.len(),
            started.elapsed().as_millis() as u64,
        );

        snapshot
    }

    /// Records exist only for targets whose API answered, whatever the score
    fn build_record(&self, evaluation: &Evaluation) -> Option<InstanceRecord> {
        let metrics = &evaluation.result.metrics;
        if !metrics.api_ok {
            return None;
        }

        Some(InstanceRecord {
            url: evaluation.target.url.clone(),
            instance_type: evaluation.target.instance_type,
            score: evaluation.result.score,
            latency_display: format_latency(metrics.latency_ms),
            cors_ok: metrics.cors_ok,
            observed_at: self.clock.observed_timestamp(),
        })
    }
}

/// Stable sort by score descending
pub fn rank_snapshot(snapshot: &mut FleetSnapshot) {
    snapshot.sort_by(|a, b| b.score.cmp(&a.score));
}
