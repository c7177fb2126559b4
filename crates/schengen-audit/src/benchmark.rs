//! # Latency Benchmark
//!
//! Times one recomputation per prefix, the same work a UI performs on every
//! edit, and compares the average with the configured budget.

use std::hint::black_box;
use std::time::Instant;

use schengen_core::Trip;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;

use crate::config::AuditConfig;
use crate::cumulative::{sort_chronologically, CrossValidator};
use crate::error::{AuditError, AuditResult};

/// Time spent on one prefix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PrefixTiming {
    pub row_index: usize,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub samples: Vec<PrefixTiming>,
    pub average_ms: f64,
    pub max_ms: f64,
    pub budget_ms: u64,
}

impl BenchmarkReport {
    pub fn is_within_budget(&self) -> bool {
        self.average_ms <= self.budget_ms as f64
    }

    /// Turns an over-budget average into an error.
    pub fn enforce(&self) -> AuditResult<()> {
        if self.is_within_budget() {
            Ok(())
        } else {
            Err(AuditError::LatencyBudgetExceeded {
                average_ms: self.average_ms,
                budget_ms: self.budget_ms,
            })
        }
    }
}

impl CrossValidator {
    /// Times the calculator on every prefix of `trips`.
    pub fn benchmark_performance(&self, trips: &[Trip]) -> AuditResult<BenchmarkReport> {
        let sorted = sort_chronologically(trips);
        let mut samples = Vec::with_capacity(sorted.len());

        for (row_index, last) in sorted.iter().enumerate() {
            let started = Instant::now();
            let result = self
                .calculator()
                .try_calculate_exact_compliance(&sorted[..=row_index], last.end_date)?;
            black_box(&result);
            samples.push(PrefixTiming {
                row_index,
                elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
            });
        }

        let max_ms = samples.iter().map(|s| s.elapsed_ms).fold(0.0, f64::max);
        let average_ms = if samples.is_empty() {
            0.0
        } else {
            samples.iter().map(|s| s.elapsed_ms).sum::<f64>() / samples.len() as f64
        };
        let budget_ms = self.config().budget_for(sorted.len());

        let report = BenchmarkReport {
            samples,
            average_ms,
            max_ms,
            budget_ms,
        };

        let trip_count = sorted.len();
        if report.is_within_budget() {
            info!(trip_count, average_ms, max_ms, budget_ms, "Benchmark complete");
        } else {
            warn!(trip_count, average_ms, max_ms, budget_ms, "Benchmark over budget");
        }
        Ok(report)
    }
}

/// Benchmarks `trips` with the given audit configuration.
pub fn benchmark_performance(
    trips: &[Trip],
    config: &AuditConfig,
) -> AuditResult<BenchmarkReport> {
    CrossValidator::new(config.clone()).benchmark_performance(trips)
}

// =============================================================================
// Unit Tests
// =============================================================================
