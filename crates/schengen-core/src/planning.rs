//! # Trip Planning
//!
//! "Can I take this trip?" questions, answered by simulating the trip on
//! top of the existing history.
//!
//! ## Why Every Day of the Trip Is Checked
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  existing: ████████████████ 80 days                                     │
//! │  planned:                          ████████████████████ 20 days         │
//! │                                    ▲         ▲                          │
//! │                           day 1: 81 used    day 11: 91 used             │
//! │                           compliant         over the cap                │
//! │                                                                         │
//! │  Compliant on the day of departure, not compliant during the stay.     │
//! │  The report names day 11, the first day over the cap.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two search helpers are thin loops over
//! [`ComplianceCalculator::validate_planned_trip`]; both stop after
//! `max_search_iterations` attempts.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::calculator::{evaluate_days, ComplianceCalculator};
use crate::dates::add_days;
use crate::error::CoreResult;
use crate::occupancy::OccupancyIndex;
use crate::types::{DateRange, PlannedTripValidation, Trip};

const PLANNED_TRIP_ID: &str = "planned";

impl ComplianceCalculator {
    /// Checks every day of `planned_trip` against the existing history.
    ///
    /// Returns the first day the cap is exceeded and the worst overstay seen
    /// during the trip. A reversed trip is invalid and has no violation date.
    pub fn validate_planned_trip(
        &self,
        existing_trips: &[Trip],
        planned_trip: &Trip,
    ) -> PlannedTripValidation {
        match self.try_validate_planned_trip(existing_trips, planned_trip) {
            Ok(validation) => validation,
            Err(e) => {
                warn!(
                    error = %e,
                    start = %planned_trip.start_date,
                    end = %planned_trip.end_date,
                    "Planned trip could not be evaluated"
                );
                PlannedTripValidation {
                    is_valid: false,
                    violation_days: 0,
                    violation_date: None,
                    max_days_in_window: 0,
                }
            }
        }
    }

    /// [`validate_planned_trip`](Self::validate_planned_trip), surfacing errors.
    pub fn try_validate_planned_trip(
        &self,
        existing_trips: &[Trip],
        planned_trip: &Trip,
    ) -> CoreResult<PlannedTripValidation> {
        let trip_days = DateRange::try_new(planned_trip.start_date, planned_trip.end_date)?;

        let screening = self.screen(existing_trips, planned_trip.end_date);
        let span = DateRange::new(
            add_days(trip_days.start, -self.config().window_lookback())?,
            trip_days.end,
        );
        let index = OccupancyIndex::build(
            screening
                .accepted
                .iter()
                .copied()
                .chain(std::iter::once(planned_trip)),
            span,
        );
        let evaluation = evaluate_days(&index, trip_days, self.config())?;

        Ok(PlannedTripValidation {
            is_valid: evaluation.max_overstay == 0,
            violation_days: evaluation.max_overstay,
            violation_date: evaluation.first_violation,
            max_days_in_window: evaluation.max_days_in_window,
        })
    }

    /// Latest start on or before `desired_start` for a compliant trip of
    /// `length_days` days.
    ///
    /// Walks backward one day at a time. `None` when no start within
    /// `max_search_iterations` days works.
    pub fn find_latest_valid_start_date(
        &self,
        existing_trips: &[Trip],
        desired_start: NaiveDate,
        length_days: u32,
    ) -> Option<NaiveDate> {
        if length_days == 0 || length_days > self.config().max_days_in_window {
            debug!(length_days, "No valid start possible for this trip length");
            return None;
        }

        for step in 0..self.config().max_search_iterations {
            let start = add_days(desired_start, -i64::from(step)).ok()?;
            let range = DateRange::starting_at(start, length_days).ok()?;
            let candidate = Trip::with_id(PLANNED_TRIP_ID, "", range.start, range.end);

            if self.validate_planned_trip(existing_trips, &candidate).is_valid {
                debug!(%start, step, "Found latest valid start date");
                return Some(start);
            }
        }

        debug!(%desired_start, length_days, "No valid start date within search limit");
        None
    }

    /// Longest compliant trip starting on `start_date`.
    ///
    /// Tries lengths 1, 2, 3, ... and stops at the first that fails.
    pub fn calculate_max_consecutive_days(
        &self,
        existing_trips: &[Trip],
        start_date: NaiveDate,
    ) -> u32 {
        let mut best = 0;

        for length in 1..=self.config().max_search_iterations {
            let Ok(range) = DateRange::starting_at(start_date, length) else {
                break;
            };
            let candidate = Trip::with_id(PLANNED_TRIP_ID, "", range.start, range.end);
            if !self.validate_planned_trip(existing_trips, &candidate).is_valid {
                break;
            }
            best = length;
        }

        debug!(%start_date, best, "Computed max consecutive days");
        best
    }
}

// =============================================================================
// Default-Configuration Shortcuts
// =============================================================================

/// [`ComplianceCalculator::validate_planned_trip`] with the standard rule.
pub fn validate_planned_trip(
    existing_trips: &[Trip],
    planned_trip: &Trip,
) -> PlannedTripValidation {
    ComplianceCalculator::default().validate_planned_trip(existing_trips, planned_trip)
}

/// [`ComplianceCalculator::find_latest_valid_start_date`] with the standard rule.
pub fn find_latest_valid_start_date(
    existing_trips: &[Trip],
    desired_start: NaiveDate,
    length_days: u32,
) -> Option<NaiveDate> {
    ComplianceCalculator::default().find_latest_valid_start_date(
        existing_trips,
        desired_start,
        length_days,
    )
}

/// [`ComplianceCalculator::calculate_max_consecutive_days`] with the standard rule.
pub fn calculate_max_consecutive_days(existing_trips: &[Trip], start_date: NaiveDate) -> u32 {
    ComplianceCalculator::default().calculate_max_consecutive_days(existing_trips, start_date)
}
