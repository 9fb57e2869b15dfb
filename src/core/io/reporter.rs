//! Console progress output for a probe run.

use crate::core::probe::types::{format_latency, Evaluation, FleetSnapshot};

/// Number of top-ranked instances listed in the summary
const SUMMARY_TOP_N: usize = 10;

pub struct ConsoleReporter {
    quiet: bool,
    total: usize,
    seen: usize,
}

impl ConsoleReporter {
    pub fn new(total: usize, quiet: bool) -> Self {
        Self {
            quiet,
            total,
            seen: 0,
        }
    }

    pub fn run_started(&self, concurrency: usize, timeout_ms: u32) {
        if self.quiet {
            return;
        }
        println!(
            "Probing {} instances (concurrency {}, timeout {}ms)",
            self.total, concurrency, timeout_ms
        );
    }

    /// One line per target, e.g. `[3/40] ✓ https://yt.example  score 100 (browser, 412ms, cors)`
    pub fn target_evaluated(&mut self, evaluation: &Evaluation) {
        self.seen += 1;
        if self.quiet {
            return;
        }
        println!("[{}/{}] {}", self.seen, self.total, Self::describe(evaluation));
    }

    pub fn describe(evaluation: &Evaluation) -> String {
        let result = &evaluation.result;
        if result.metrics.api_ok {
            let strategy = evaluation.winning_strategy().unwrap_or("-");
            let cors = if result.metrics.cors_ok { ", cors" } else { "" };
            format!(
                "✓ {}  score {} ({}, {}{})",
                evaluation.target.url,
                result.score,
                strategy,
                format_latency(result.metrics.latency_ms),
                cors
            )
        } else {
            let reasons: Vec<String> = evaluation
                .attempts
                .iter()
                .map(|attempt| match &attempt.failure {
                    Some(failure) => format!("{}: {}", attempt.strategy, failure),
                    None => attempt.strategy.clone(),
                })
                .collect();
            let reasons = if reasons.is_empty() {
                "no strategies attempted".to_string()
            } else {
                reasons.join("; ")
            };
            format!("✗ {}  excluded ({})", evaluation.target.url, reasons)
        }
    }

    pub fn run_finished(&self, snapshot: &FleetSnapshot, output: &std::path::Path) {
        if self.quiet {
            return;
        }
        println!(
            "{}/{} instances healthy, snapshot written to {}",
            snapshot.len(),
            self.total,
            output.display()
        );
        for (rank, record) in snapshot.iter().take(SUMMARY_TOP_N).enumerate() {
            println!(
                "{:>3}. {:<3} {:<9} {:>7} cors={:<5} {}",
                rank + 1,
                record.score,
                record.instance_type.to_string(),
                record.latency_display,
                record.cors_ok,
                record.url
            );
        }
    }
}
