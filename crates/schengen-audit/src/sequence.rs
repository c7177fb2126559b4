//! # Sequence Check
//!
//! Days only leave the window by rolling out of it. If the reference date
//! moves by `k` days, the in-window total can fall by at most `k`. A larger
//! drop between two nearby prefixes means some code path lost trips.
//!
//! ```text
//! prev ref            curr ref
//!    │◄──── k days ───►│
//!    ▼                  ▼
//! ───┼──────────────────┼────►   allowed drop ≤ k
//! ```

use chrono::NaiveDate;
use schengen_core::Trip;
use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::config::AuditConfig;
use crate::cumulative::{CrossValidator, CumulativeCheck};
use crate::error::AuditResult;

/// A prefix whose total dropped more than the window could have moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SequenceAnomaly {
    pub row_index: usize,
    #[ts(as = "String")]
    pub previous_reference: NaiveDate,
    #[ts(as = "String")]
    pub reference_date: NaiveDate,
    pub previous_total: u32,
    pub current_total: u32,
    /// Signed distance between the two reference dates.
    pub days_between: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SequenceReport {
    pub checks: Vec<CumulativeCheck>,
    pub anomalies: Vec<SequenceAnomaly>,
}

impl SequenceReport {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

impl CrossValidator {
    /// Recomputes every prefix and flags unexplained drops in the total.
    pub fn validate_sequence(&self, trips: &[Trip]) -> AuditResult<SequenceReport> {
        let checks = self.validate_all_prefixes(trips, &[])?;
        let anomalies = detect_anomalies(&checks, self.config().rolling_gap_days);
        Ok(SequenceReport { checks, anomalies })
    }
}

/// Flags consecutive checks whose total fell by more than the distance
/// between their reference dates, when that distance is under `gap_days`.
pub fn detect_anomalies(checks: &[CumulativeCheck], gap_days: i64) -> Vec<SequenceAnomaly> {
    checks
        .windows(2)
        .filter_map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            let previous_total = prev.expected.total_days_used;
            let current_total = curr.expected.total_days_used;
            let days_between = (curr.reference_date - prev.reference_date).num_days();
            let distance = days_between.abs();

            let drop = i64::from(previous_total) - i64::from(current_total);
            if drop <= 0 || distance >= gap_days || drop <= distance {
                return None;
            }

            warn!(
                row_index = curr.row_index,
                previous_total,
                current_total,
                days_between,
                "Cumulative total dropped faster than the window moved"
            );
            Some(SequenceAnomaly {
                row_index: curr.row_index,
                previous_reference: prev.reference_date,
                reference_date: curr.reference_date,
                previous_total,
                current_total,
                days_between,
            })
        })
        .collect()
}

/// Sequence check with the given audit configuration.
pub fn validate_sequence(trips: &[Trip], config: &AuditConfig) -> AuditResult<SequenceReport> {
    CrossValidator::new(config.clone()).validate_sequence(trips)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cumulative::ReportedCompliance;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn check(row_index: usize, reference_date: NaiveDate, total: u32) -> CumulativeCheck {
        CumulativeCheck {
            row_index,
            trip_id: format!("t{}", row_index),
            reference_date,
            expected: ReportedCompliance {
                total_days_used: total,
                days_remaining: 90u32.saturating_sub(total),
                is_compliant: total <= 90,
                overstay_days: total.saturating_sub(90),
            },
            actual: None,
            mismatches: Vec::new(),
        }
    }

    #[test]
    fn test_growing_history_is_clean() {
        let trips = vec![
            Trip::with_id("a", "FR", d(1, 1), d(1, 10)),
            Trip::with_id("b", "DE", d(2, 1), d(2, 10)),
            Trip::with_id("c", "IT", d(3, 1), d(3, 10)),
        ];
        let report = validate_sequence(&trips, &AuditConfig::default()).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.checks.len(), 3);
    }

    #[test]
    fn test_drop_after_long_gap_is_not_flagged() {
        let trips = vec![
            Trip::with_id("a", "FR", d(1, 1), d(3, 30)),
            Trip::with_id("b", "DE", d(12, 1), d(12, 5)),
        ];
        let report = validate_sequence(&trips, &AuditConfig::default()).unwrap();
        assert_eq!(report.checks[0].expected.total_days_used, 90);
        assert_eq!(report.checks[1].expected.total_days_used, 5);
        assert!(report.is_clean());
    }

    #[test]
    fn test_nested_trip_drop_matches_window_shift() {
        // B sits inside A, so its prefix is evaluated 60 days earlier
        // and loses exactly those 60 days.
        let trips = vec![
            Trip::with_id("a", "FR", d(1, 1), d(3, 10)),
            Trip::with_id("b", "FR", d(1, 5), d(1, 10)),
        ];
        let report = validate_sequence(&trips, &AuditConfig::default()).unwrap();
        assert_eq!(report.checks[0].expected.total_days_used, 70);
        assert_eq!(report.checks[1].expected.total_days_used, 10);
        assert!(report.is_clean());
    }

    #[test]
    fn test_unexplained_drop_is_flagged() {
        let checks = vec![
            check(0, d(3, 1), 40),
            check(1, d(3, 11), 45),
            check(2, d(3, 21), 20),
        ];
        let anomalies = detect_anomalies(&checks, 180);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].row_index, 2);
        assert_eq!(anomalies[0].previous_total, 45);
        assert_eq!(anomalies[0].current_total, 20);
        assert_eq!(anomalies[0].days_between, 10);

        // Same drop beyond the gap is ignored.
        assert!(detect_anomalies(&checks, 10).is_empty());
    }
}
