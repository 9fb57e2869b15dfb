//! Instance Probing and Scoring
//!
//! - Ordered request strategies with early exit on first success
//! - Single-attempt HTTP probing with transport failures absorbed
//! - Additive scoring from API validity, CORS and latency tier
//! - Bounded fan-out over the target list with stable ranking

pub mod client;
pub mod evaluator;
pub mod fleet;
pub mod parsing;
pub mod prober;
pub mod scoring;
pub mod strategy;
pub mod types;
pub mod url;

// Re-export public API
pub use client::{IsahcProbeClient, ProbeClient};
pub use evaluator::InstanceEvaluator;
pub use fleet::{rank_snapshot, ClockTrait, FleetRunner, SystemClock};
pub use prober::InstanceProber;
pub use scoring::{score_attempt, ScoringPolicy};
pub use strategy::ProbeStrategySelector;
pub use types::*;
