//! Gate counters

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::decision::{Effect, Outcome, OutcomeReason};

/// Point-in-time copy of the gate counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateMetrics {
    /// Total number of authorization checks
    pub total_requests: u64,

    /// Number of allowed outcomes
    pub allowed_decisions: u64,

    /// Number of denied outcomes
    pub denied_decisions: u64,

    /// Denials caused by unresolvable or malformed identifiers
    pub resolution_failures: u64,

    /// Denials caused by an unauthenticated caller
    pub unauthenticated: u64,

    /// Average latency in microseconds
    pub avg_latency_us: f64,
}

impl GateMetrics {
    /// Calculate allow rate
    pub fn allow_rate(&self) -> f64 {
        let total = self.allowed_decisions + self.denied_decisions;
        if total == 0 {
            0.0
        } else {
            self.allowed_decisions as f64 / total as f64
        }
    }
}

/// Lock-free collector updated on every outcome
#[derive(Debug, Default)]
pub struct MetricsCollector {
    total_requests: AtomicU64,
    allowed: AtomicU64,
    denied: AtomicU64,
    resolution_failures: AtomicU64,
    unauthenticated: AtomicU64,
    latency_nanos: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished check
    pub fn record(&self, outcome: &Outcome, latency: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.latency_nanos
            .fetch_add(latency.as_nanos().min(u64::MAX as u128) as u64, Ordering::Relaxed);

        match outcome.effect {
            Effect::Allow => {
                self.allowed.fetch_add(1, Ordering::Relaxed);
            }
            Effect::Deny => {
                self.denied.fetch_add(1, Ordering::Relaxed);
            }
        }

        match outcome.reason {
            OutcomeReason::MalformedPolicyIdentifier | OutcomeReason::PolicyResolutionFailed => {
                self.resolution_failures.fetch_add(1, Ordering::Relaxed);
            }
            OutcomeReason::NotAuthenticated => {
                self.unauthenticated.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    /// Snapshot the counters
    pub fn get_metrics(&self) -> GateMetrics {
        let total = self.total_requests.load(Ordering::Relaxed);
        let nanos = self.latency_nanos.load(Ordering::Relaxed);

        GateMetrics {
            total_requests: total,
            allowed_decisions: self.allowed.load(Ordering::Relaxed),
            denied_decisions: self.denied.load(Ordering::Relaxed),
            resolution_failures: self.resolution_failures.load(Ordering::Relaxed),
            unauthenticated: self.unauthenticated.load(Ordering::Relaxed),
            avg_latency_us: if total == 0 {
                0.0
            } else {
                nanos as f64 / total as f64 / 1_000.0
            },
        }
    }
}
