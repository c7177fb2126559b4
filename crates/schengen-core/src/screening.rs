//! # Trip Screening
//!
//! The one place that decides which trips are usable.
//!
//! ## Who Uses It
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          screen_trips()                                 │
//! │                               │                                         │
//! │            ┌──────────────────┴──────────────────┐                      │
//! │            ▼                                     ▼                      │
//! │   validate_trips()                     ComplianceCalculator             │
//! │   reports every finding                computes over `accepted` only,   │
//! │   (ERROR + WARNING)                    lists ERROR findings in          │
//! │                                        `ComplianceResult.excludedTrips` │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! | Check                                   | Severity |
//! |-----------------------------------------|----------|
//! | missing id / country                    | ERROR    |
//! | end date before start date              | ERROR    |
//! | single stay longer than the cap         | ERROR    |
//! | ends more than 20 years before anchor   | ERROR    |
//! | starts more than 10 years after anchor  | ERROR    |
//! | duplicate id (later occurrences)        | ERROR    |
//! | ends more than 5 years before anchor    | WARNING  |
//! | starts more than 2 years after anchor   | WARNING  |
//! | cached `days` differs from duration     | WARNING  |
//! | overlaps another accepted trip          | WARNING  |
//!
//! The anchor is the date the trips are judged against: the reference date
//! for compliance, today for plain validation.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::RuleConfig;
use crate::dates;
use crate::types::{Trip, ValidationError};

/// Trips split into usable ones and findings.
#[derive(Debug, Clone)]
pub struct Screening<'a> {
    /// Trips free of ERROR findings, sorted by start date.
    pub accepted: Vec<&'a Trip>,

    /// Every finding, in input order (overlap warnings last).
    pub issues: Vec<ValidationError>,
}

impl<'a> Screening<'a> {
    /// ERROR findings only.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.issues.iter().filter(|issue| issue.is_error())
    }

    /// WARNING findings only.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationError> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }
}

/// Checks a single trip in isolation.
pub fn screen_trip(trip: &Trip, anchor: NaiveDate, config: &RuleConfig) -> Vec<ValidationError> {
    let mut issues = Vec::new();
    let id = (!trip.id.trim().is_empty()).then_some(trip.id.as_str());

    if id.is_none() {
        issues.push(ValidationError::error("id", "Trip id is required", None));
    }

    if trip.country.trim().is_empty() {
        issues.push(ValidationError::error("country", "Country is required", id));
    }

    let duration = trip.duration_days();
    if duration < 1 {
        issues.push(ValidationError::error(
            "endDate",
            format!(
                "End date {} is before start date {}",
                trip.end_date, trip.start_date
            ),
            id,
        ));
        // Nothing below is meaningful for a reversed range.
        return issues;
    }

    if duration > i64::from(config.max_days_in_window) {
        issues.push(ValidationError::error(
            "dates",
            format!(
                "Single stay of {} days exceeds the {}-day limit",
                duration, config.max_days_in_window
            ),
            id,
        ));
    }

    let years_back = |years: u32| dates::add_years(anchor, -(years as i32)).ok();
    let years_ahead = |years: u32| dates::add_years(anchor, years as i32).ok();

    match years_back(config.sanity_past_years) {
        Some(bound) if trip.end_date < bound => issues.push(ValidationError::error(
            "endDate",
            format!(
                "Trip ended more than {} years ago",
                config.sanity_past_years
            ),
            id,
        )),
        _ => {
            if years_back(config.stale_warning_years).is_some_and(|b| trip.end_date < b) {
                issues.push(ValidationError::warning(
                    "endDate",
                    format!(
                        "Trip ended more than {} years ago",
                        config.stale_warning_years
                    ),
                    id,
                ));
            }
        }
    }

    match years_ahead(config.sanity_future_years) {
        Some(bound) if trip.start_date > bound => issues.push(ValidationError::error(
            "startDate",
            format!(
                "Trip starts more than {} years from now",
                config.sanity_future_years
            ),
            id,
        )),
        _ => {
            if years_ahead(config.future_warning_years).is_some_and(|b| trip.start_date > b) {
                issues.push(ValidationError::warning(
                    "startDate",
                    format!(
                        "Trip starts more than {} years from now",
                        config.future_warning_years
                    ),
                    id,
                ));
            }
        }
    }

    if i64::from(trip.days) != duration {
        issues.push(ValidationError::warning(
            "days",
            format!(
                "Stored duration {} does not match the dates ({} days)",
                trip.days, duration
            ),
            id,
        ));
    }

    issues
}

/// Screens a trip list: per-trip checks, duplicate ids, pairwise overlaps.
pub fn screen_trips<'a>(
    trips: &'a [Trip],
    anchor: NaiveDate,
    config: &RuleConfig,
) -> Screening<'a> {
    let mut issues = Vec::new();
    let mut accepted = Vec::with_capacity(trips.len());
    let mut seen_ids: HashSet<&str> = HashSet::with_capacity(trips.len());

    for trip in trips {
        let mut trip_issues = screen_trip(trip, anchor, config);

        if !trip.id.trim().is_empty() && !seen_ids.insert(trip.id.as_str()) {
            trip_issues.push(ValidationError::error(
                "id",
                format!("Duplicate trip id '{}'", trip.id),
                Some(trip.id.as_str()),
            ));
        }

        if trip_issues.iter().all(|issue| !issue.is_error()) {
            accepted.push(trip);
        }
        issues.extend(trip_issues);
    }

    accepted.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then(a.end_date.cmp(&b.end_date))
            .then_with(|| a.id.cmp(&b.id))
    });

    // Sorted by start: once a later trip starts after `a` ends, none overlap.
    for (i, a) in accepted.iter().enumerate() {
        for b in accepted[i + 1..].iter().take_while(|b| b.start_date <= a.end_date) {
            if let Some(shared) = a.range().intersection(&b.range()) {
                issues.push(ValidationError::warning(
                    "dates",
                    format!(
                        "Overlaps trip '{}' by {} day(s) ({})",
                        a.id,
                        shared.len_days(),
                        shared
                    ),
                    Some(b.id.as_str()),
                ));
            }
        }
    }

    debug!(
        total = trips.len(),
        accepted = accepted.len(),
        issues = issues.len(),
        %anchor,
        "Screened trips"
    );

    Screening { accepted, issues }
}
