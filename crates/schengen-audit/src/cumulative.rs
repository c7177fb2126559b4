//! # Cumulative Cross-Validation
//!
//! Recomputes compliance for every chronological prefix of a trip list and
//! diffs it against results produced elsewhere (typically memoized UI
//! state).
//!
//! ## Prefix Model
//! ```text
//! sorted trips:   T0        T1            T2
//!                 ├──┤      ├────┤        ├──────┤
//!
//! row 0:  [T0]            reference = T0.end
//! row 1:  [T0, T1]        reference = T1.end
//! row 2:  [T0, T1, T2]    reference = T2.end
//! ```
//!
//! Trips are stable-sorted by start date first, so rows follow the order a
//! traveller would have entered them.

use chrono::NaiveDate;
use schengen_core::{ComplianceCalculator, ComplianceResult, Trip};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::config::AuditConfig;
use crate::error::{AuditError, AuditResult};

// =============================================================================
// Reported Results
// =============================================================================

/// The fields of a [`ComplianceResult`] that are compared across code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReportedCompliance {
    pub total_days_used: u32,
    pub days_remaining: u32,
    pub is_compliant: bool,
    pub overstay_days: u32,
}

impl ReportedCompliance {
    /// Decodes a reported result. Extra fields (a full serialized
    /// `ComplianceResult`, for instance) are ignored.
    pub fn from_json(json: &str) -> AuditResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Field-level differences, `self` being the expected side.
    pub fn diff(&self, actual: &ReportedCompliance) -> Vec<FieldMismatch> {
        let mut mismatches = Vec::new();

        if self.total_days_used != actual.total_days_used {
            mismatches.push(FieldMismatch::new(
                "totalDaysUsed",
                self.total_days_used,
                actual.total_days_used,
            ));
        }
        if self.days_remaining != actual.days_remaining {
            mismatches.push(FieldMismatch::new(
                "daysRemaining",
                self.days_remaining,
                actual.days_remaining,
            ));
        }
        if self.is_compliant != actual.is_compliant {
            mismatches.push(FieldMismatch::new(
                "isCompliant",
                self.is_compliant,
                actual.is_compliant,
            ));
        }
        if self.overstay_days != actual.overstay_days {
            mismatches.push(FieldMismatch::new(
                "overstayDays",
                self.overstay_days,
                actual.overstay_days,
            ));
        }

        mismatches
    }
}

impl From<&ComplianceResult> for ReportedCompliance {
    fn from(result: &ComplianceResult) -> Self {
        ReportedCompliance {
            total_days_used: result.total_days_used,
            days_remaining: result.days_remaining,
            is_compliant: result.is_compliant,
            overstay_days: result.overstay_days,
        }
    }
}

/// One disagreeing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldMismatch {
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl FieldMismatch {
    fn new(field: &str, expected: impl ToString, actual: impl ToString) -> Self {
        FieldMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

// =============================================================================
// Cumulative Checks
// =============================================================================

/// Outcome of cross-validating one prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeCheck {
    /// Index of the last trip in the prefix, in sorted order.
    pub row_index: usize,
    pub trip_id: String,
    #[ts(as = "String")]
    pub reference_date: NaiveDate,
    pub expected: ReportedCompliance,
    pub actual: Option<ReportedCompliance>,
    pub mismatches: Vec<FieldMismatch>,
}

impl CumulativeCheck {
    /// True when no reported result was given or it matched.
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Recomputes prefixes with a fixed rule and audit configuration.
#[derive(Debug, Clone, Default)]
pub struct CrossValidator {
    calculator: ComplianceCalculator,
    config: AuditConfig,
}

impl CrossValidator {
    pub fn new(config: AuditConfig) -> Self {
        CrossValidator {
            calculator: ComplianceCalculator::new(config.rules.clone()),
            config,
        }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub(crate) fn calculator(&self) -> &ComplianceCalculator {
        &self.calculator
    }

    /// Cross-validates the prefix ending at `row_index`.
    ///
    /// ## Errors
    /// - `RowOutOfBounds` if `row_index >= trips.len()`
    /// - `Core` if the calculator cannot evaluate the reference date
    pub fn validate_cumulative(
        &self,
        trips: &[Trip],
        row_index: usize,
        actual: Option<&ReportedCompliance>,
    ) -> AuditResult<CumulativeCheck> {
        let sorted = sort_chronologically(trips);
        self.check_prefix(&sorted, row_index, actual)
    }

    /// Cross-validates every prefix. `reported[i]`, when present, is compared
    /// with row `i`.
    pub fn validate_all_prefixes(
        &self,
        trips: &[Trip],
        reported: &[ReportedCompliance],
    ) -> AuditResult<Vec<CumulativeCheck>> {
        let sorted = sort_chronologically(trips);
        (0..sorted.len())
            .map(|row| self.check_prefix(&sorted, row, reported.get(row)))
            .collect()
    }

    pub(crate) fn check_prefix(
        &self,
        sorted: &[Trip],
        row_index: usize,
        actual: Option<&ReportedCompliance>,
    ) -> AuditResult<CumulativeCheck> {
        let last = sorted.get(row_index).ok_or(AuditError::RowOutOfBounds {
            row_index,
            len: sorted.len(),
        })?;
        let reference_date = last.end_date;

        let result = self
            .calculator
            .try_calculate_exact_compliance(&sorted[..=row_index], reference_date)?;
        let expected = ReportedCompliance::from(&result);
        let mismatches = actual.map(|a| expected.diff(a)).unwrap_or_default();

        if mismatches.is_empty() {
            debug!(
                row_index,
                %reference_date,
                total = expected.total_days_used,
                "Prefix consistent"
            );
        } else {
            warn!(
                row_index,
                trip_id = %last.id,
                %reference_date,
                mismatch_count = mismatches.len(),
                "Reported compliance disagrees with recomputation"
            );
        }

        Ok(CumulativeCheck {
            row_index,
            trip_id: last.id.clone(),
            reference_date,
            expected,
            actual: actual.copied(),
            mismatches,
        })
    }
}

pub(crate) fn sort_chronologically(trips: &[Trip]) -> Vec<Trip> {
    let mut sorted = trips.to_vec();
    sorted.sort_by_key(|trip| trip.start_date);
    sorted
}

/// Cross-validates one prefix with the standard rule.
pub fn validate_cumulative(
    trips: &[Trip],
    row_index: usize,
    actual: Option<&ReportedCompliance>,
) -> AuditResult<CumulativeCheck> {
    CrossValidator::default().validate_cumulative(trips, row_index, actual)
}

/// Cross-validates every prefix with the standard rule.
pub fn validate_all_prefixes(
    trips: &[Trip],
    reported: &[ReportedCompliance],
) -> AuditResult<Vec<CumulativeCheck>> {
    CrossValidator::default().validate_all_prefixes(trips, reported)
}

// =============================================================================
// Unit Tests
// =============================================================================
