//! # Trip Validation
//!
//! Structural checks on trip records before they enter computation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Date pickers, required fields                                     │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── ERROR:   unusable trips (shown, excluded from computation)        │
//! │  └── WARNING: suspicious trips (shown, still counted)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: ComplianceCalculator                                         │
//! │  └── Same screening, applied silently; exclusions listed on the        │
//! │      result                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both layer 2 and layer 3 call [`screen_trips`], so a trip flagged as an
//! ERROR here is exactly a trip the calculator leaves out.
//!
//! ## Usage
//! ```rust
//! use chrono::NaiveDate;
//! use schengen_core::{validation::validate_trips_at, Trip};
//!
//! let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
//! let trips = vec![
//!     Trip::with_id("a", "FR", d(6, 1), d(6, 10)),
//!     Trip::with_id("a", "DE", d(7, 1), d(7, 3)),
//! ];
//!
//! let result = validate_trips_at(&trips, d(8, 1));
//! assert!(!result.is_valid);
//! assert_eq!(result.errors[0].field, "id");
//! ```

use chrono::NaiveDate;

use crate::calculator::ComplianceCalculator;
use crate::dates;
use crate::screening::screen_trips;
use crate::types::{Trip, TripValidationResult};

impl ComplianceCalculator {
    /// Validates trips as of `today`.
    pub fn validate_trips_at(&self, trips: &[Trip], today: NaiveDate) -> TripValidationResult {
        let screening = screen_trips(trips, today, self.config());
        let (errors, warnings): (Vec<_>, Vec<_>) =
            screening.issues.into_iter().partition(|issue| issue.is_error());

        TripValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Validates trips as of today's date.
    pub fn validate_trips(&self, trips: &[Trip]) -> TripValidationResult {
        self.validate_trips_at(trips, dates::today())
    }
}

/// Validates trips as of today with the standard rule.
pub fn validate_trips(trips: &[Trip]) -> TripValidationResult {
    ComplianceCalculator::default().validate_trips(trips)
}

/// Validates trips as of `today` with the standard rule.
pub fn validate_trips_at(trips: &[Trip], today: NaiveDate) -> TripValidationResult {
    ComplianceCalculator::default().validate_trips_at(trips, today)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn today() -> NaiveDate {
        d(2024, 8, 1)
    }

    #[test]
    fn test_valid_trips() {
        let trips = vec![
            Trip::with_id("a", "FR", d(2024, 6, 1), d(2024, 6, 10)),
            Trip::with_id("b", "DE", d(2024, 7, 1), d(2024, 7, 3)),
        ];
        let result = validate_trips_at(&trips, today());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let trips = vec![
            Trip::with_id("", "FR", d(2024, 6, 1), d(2024, 6, 10)),
            Trip::with_id("b", "  ", d(2024, 7, 1), d(2024, 7, 3)),
        ];
        let result = validate_trips_at(&trips, today());
        assert!(!result.is_valid);

        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "country"]);
        assert_eq!(result.errors[0].trip_id, None);
        assert_eq!(result.errors[1].trip_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_reversed_and_overlong() {
        let trips = vec![
            Trip::with_id("rev", "FR", d(2024, 6, 10), d(2024, 6, 1)),
            Trip::with_id("long", "FR", d(2024, 1, 1), d(2024, 4, 30)),
        ];
        let result = validate_trips_at(&trips, today());
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].trip_id.as_deref(), Some("rev"));
        assert_eq!(result.errors[1].trip_id.as_deref(), Some("long"));
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut inconsistent = Trip::with_id("a", "FR", d(2024, 6, 1), d(2024, 6, 10));
        inconsistent.days = 12;
        let trips = vec![
            inconsistent,
            Trip::with_id("b", "BE", d(2024, 6, 10), d(2024, 6, 11)),
            Trip::with_id("c", "NL", d(2017, 3, 1), d(2017, 3, 4)),
        ];
        let result = validate_trips_at(&trips, today());
        assert!(result.is_valid);

        let fields: Vec<_> = result.warnings.iter().map(|w| w.field.as_str()).collect();
        assert_eq!(fields, vec!["days", "endDate", "dates"]);
    }

    #[test]
    fn test_validator_and_calculator_agree() {
        let trips = vec![
            Trip::with_id("ok", "FR", d(2024, 6, 1), d(2024, 6, 10)),
            Trip::with_id("ok", "FR", d(2024, 7, 1), d(2024, 7, 10)),
            Trip::with_id("rev", "FR", d(2024, 7, 20), d(2024, 7, 15)),
        ];
        let calculator = ComplianceCalculator::default();
        let validation = calculator.validate_trips_at(&trips, today());
        let result = calculator.calculate_exact_compliance(&trips, today());

        assert_eq!(validation.errors, result.excluded_trips);
        assert_eq!(result.total_days_used, 10);
    }

    #[test]
    fn test_validate_trips_against_today() {
        let today = dates::today();
        let recent = Trip::with_id(
            "recent",
            "FR",
            dates::add_days(today, -20).unwrap(),
            dates::add_days(today, -11).unwrap(),
        );
        let reversed = Trip::with_id(
            "rev",
            "DE",
            dates::add_days(today, -1).unwrap(),
            dates::add_days(today, -5).unwrap(),
        );

        let result = validate_trips(&[recent, reversed]);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].trip_id.as_deref(), Some("rev"));
        assert!(result.warnings.is_empty());
    }
}
