//! # Date-Range Overlap Validator
//!
//! "Can I add these dates?" checks for the trip editor.
//!
//! ## Overlap Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  existing         ██████████████                                        │
//! │                                                                         │
//! │  SameDayTravel                  █████████   starts the day it ends     │
//! │  BorderTransition       █                   any other 1-day overlap    │
//! │  Partial       ██████████                   2+ days, sticks out        │
//! │  Full                 ██████                2+ days, one inside other  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Whether an overlap is a conflict depends on [`OverlapOptions`]. Overlaps
//! that the options allow are still returned, in `suppressed`, so the UI can
//! mention them.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::config::{OverlapOptions, RuleConfig};
use crate::dates::add_days;
use crate::types::{DateRange, Trip};

const BATCH_COUNTRY: &str = "pending";

// =============================================================================
// Result Types
// =============================================================================

/// How a candidate range overlaps an existing trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// One range lies entirely inside the other.
    Full,
    /// The ranges share two or more days and neither contains the other.
    Partial,
    /// One range starts on the day the other ends.
    SameDayTravel,
    /// A single shared day that is not a start/end handover.
    BorderTransition,
}

/// One overlap between the candidate and an existing trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DateConflict {
    pub trip_id: String,
    pub country: String,
    #[ts(as = "String")]
    pub overlap_start: NaiveDate,
    #[ts(as = "String")]
    pub overlap_end: NaiveDate,
    pub overlap_days: u32,
    pub kind: ConflictKind,
}

/// Outcome of [`OverlapValidator::validate_date_range`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeValidation {
    pub is_valid: bool,

    /// Overlaps that block the candidate.
    pub conflicts: Vec<DateConflict>,

    /// Overlaps the options allowed.
    pub suppressed: Vec<DateConflict>,

    pub message: String,

    /// Every day covered by an existing trip no longer than the cap, for
    /// calendar shading.
    #[ts(as = "Vec<String>")]
    pub occupied_dates: Vec<NaiveDate>,
}

/// One entry of [`OverlapValidator::validate_multiple_date_ranges`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchRangeResult {
    pub index: usize,
    pub range: DateRange,
    pub result: DateRangeValidation,
}

// =============================================================================
// Validator
// =============================================================================

/// Stateless date-range checker.
#[derive(Debug, Clone, Default)]
pub struct OverlapValidator {
    config: RuleConfig,
}

impl OverlapValidator {
    pub fn new(config: RuleConfig) -> Self {
        OverlapValidator { config }
    }

    /// A validator using `options` and default search limits.
    pub fn with_options(options: OverlapOptions) -> Self {
        OverlapValidator {
            config: RuleConfig {
                overlap: options,
                ..RuleConfig::default()
            },
        }
    }

    pub fn options(&self) -> OverlapOptions {
        self.config.overlap
    }

    /// Checks `range` against every existing trip.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use schengen_core::{DateRange, OverlapValidator, Trip};
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
    /// let existing = vec![Trip::with_id("t1", "FR", d(1), d(10))];
    ///
    /// let result = OverlapValidator::default()
    ///     .validate_date_range(DateRange::new(d(5), d(8)), &existing);
    /// assert!(!result.is_valid);
    /// assert_eq!(result.conflicts[0].overlap_days, 4);
    /// ```
    pub fn validate_date_range(
        &self,
        range: DateRange,
        existing_trips: &[Trip],
    ) -> DateRangeValidation {
        let occupied_dates = occupied_dates(existing_trips, self.config.max_days_in_window);

        if !range.is_well_formed() {
            return DateRangeValidation {
                is_valid: false,
                conflicts: Vec::new(),
                suppressed: Vec::new(),
                message: format!("End date {} is before start date {}", range.end, range.start),
                occupied_dates,
            };
        }

        let (conflicts, suppressed) = self.find_overlaps(range, existing_trips);
        let message = describe(&conflicts, &suppressed);
        debug!(
            %range,
            conflicts = conflicts.len(),
            suppressed = suppressed.len(),
            "Validated date range"
        );

        DateRangeValidation {
            is_valid: conflicts.is_empty(),
            conflicts,
            suppressed,
            message,
            occupied_dates,
        }
    }

    /// Splits every overlap into blocking conflicts and allowed ones.
    fn find_overlaps(
        &self,
        range: DateRange,
        existing_trips: &[Trip],
    ) -> (Vec<DateConflict>, Vec<DateConflict>) {
        let mut conflicts = Vec::new();
        let mut suppressed = Vec::new();

        for trip in existing_trips {
            let trip_range = trip.range();
            if !trip_range.is_well_formed() {
                debug!(trip_id = %trip.id, "Skipping malformed trip in overlap check");
                continue;
            }
            let Some(shared) = range.intersection(&trip_range) else {
                continue;
            };

            let conflict = DateConflict {
                trip_id: trip.id.clone(),
                country: trip.country.clone(),
                overlap_start: shared.start,
                overlap_end: shared.end,
                overlap_days: shared.len_days() as u32,
                kind: classify(range, trip_range, shared),
            };

            if self.is_allowed(conflict.kind) {
                suppressed.push(conflict);
            } else {
                conflicts.push(conflict);
            }
        }

        (conflicts, suppressed)
    }

    fn is_allowed(&self, kind: ConflictKind) -> bool {
        let options = self.config.overlap;
        if options.strict_mode {
            return false;
        }
        match kind {
            ConflictKind::SameDayTravel => {
                options.allow_same_day_travel || options.allow_border_transitions
            }
            ConflictKind::BorderTransition => options.allow_border_transitions,
            ConflictKind::Full | ConflictKind::Partial => false,
        }
    }

    fn is_free(&self, range: DateRange, existing_trips: &[Trip]) -> bool {
        self.find_overlaps(range, existing_trips).0.is_empty()
    }

    /// First conflict-free range of `length_days` days starting on or after
    /// `preferred_start`, looking `search_horizon_days` ahead.
    pub fn find_next_available_date_range(
        &self,
        preferred_start: NaiveDate,
        length_days: u32,
        existing_trips: &[Trip],
    ) -> Option<DateRange> {
        self.find_next_available_date_range_within(
            preferred_start,
            length_days,
            existing_trips,
            self.config.search_horizon_days,
        )
    }

    /// [`find_next_available_date_range`](Self::find_next_available_date_range)
    /// with an explicit horizon.
    pub fn find_next_available_date_range_within(
        &self,
        preferred_start: NaiveDate,
        length_days: u32,
        existing_trips: &[Trip],
        search_limit_days: u32,
    ) -> Option<DateRange> {
        if length_days == 0 {
            return None;
        }

        for offset in 0..search_limit_days {
            let start = add_days(preferred_start, i64::from(offset)).ok()?;
            let candidate = DateRange::starting_at(start, length_days).ok()?;
            if self.is_free(candidate, existing_trips) {
                return Some(candidate);
            }
        }

        debug!(%preferred_start, length_days, search_limit_days, "No free range within horizon");
        None
    }

    /// Up to `max_suggestions` free ranges of `length_days` days near a
    /// conflicted range, closest first.
    ///
    /// Looks back up to `suggestion_lookback_days` before the conflict and
    /// forward from the day after it ends.
    pub fn suggest_alternative_dates(
        &self,
        conflicted: DateRange,
        length_days: u32,
        existing_trips: &[Trip],
    ) -> Vec<DateRange> {
        let mut suggestions: Vec<DateRange> = Vec::new();
        if length_days == 0 || !conflicted.is_well_formed() {
            return suggestions;
        }

        for back in 1..=self.config.suggestion_lookback_days {
            let candidate = add_days(conflicted.start, -i64::from(back))
                .and_then(|start| DateRange::starting_at(start, length_days));
            match candidate {
                Ok(candidate) if self.is_free(candidate, existing_trips) => {
                    suggestions.push(candidate);
                    break;
                }
                Ok(_) => continue,
                Err(_) => break,
            }
        }

        let mut cursor = add_days(conflicted.end, 1).ok();
        while suggestions.len() < self.config.max_suggestions {
            let Some(from) = cursor else { break };
            let Some(found) =
                self.find_next_available_date_range(from, length_days, existing_trips)
            else {
                break;
            };
            suggestions.push(found);
            cursor = add_days(found.end, 1).ok();
        }

        suggestions.sort_by_key(|r| ((r.start - conflicted.start).num_days().abs(), r.start));
        suggestions.dedup();
        suggestions.truncate(self.config.max_suggestions);
        suggestions
    }

    /// Validates ranges in order; each range that passes joins the set the
    /// following ranges are checked against.
    pub fn validate_multiple_date_ranges(
        &self,
        ranges: &[DateRange],
        existing_trips: &[Trip],
    ) -> Vec<BatchRangeResult> {
        let mut working: Vec<Trip> = existing_trips.to_vec();
        let mut results = Vec::with_capacity(ranges.len());

        for (index, range) in ranges.iter().copied().enumerate() {
            let result = self.validate_date_range(range, &working);
            if result.is_valid {
                working.push(Trip::with_id(
                    format!("batch-{index}"),
                    BATCH_COUNTRY,
                    range.start,
                    range.end,
                ));
            }
            results.push(BatchRangeResult { index, range, result });
        }

        results
    }
}

fn classify(candidate: DateRange, existing: DateRange, shared: DateRange) -> ConflictKind {
    if shared.len_days() == 1 {
        if candidate.start == existing.end || candidate.end == existing.start {
            ConflictKind::SameDayTravel
        } else {
            ConflictKind::BorderTransition
        }
    } else if shared == candidate || shared == existing {
        ConflictKind::Full
    } else {
        ConflictKind::Partial
    }
}

fn describe(conflicts: &[DateConflict], suppressed: &[DateConflict]) -> String {
    if conflicts.is_empty() {
        return match suppressed.len() {
            0 => "Dates are available".to_string(),
            n => format!("Dates are available ({n} same-day border crossing(s) allowed)"),
        };
    }

    let details: Vec<String> = conflicts
        .iter()
        .map(|c| {
            format!(
                "{} ({} → {}, {} day(s))",
                c.country, c.overlap_start, c.overlap_end, c.overlap_days
            )
        })
        .collect();
    format!(
        "Dates conflict with {} existing trip(s): {}",
        conflicts.len(),
        details.join(", ")
    )
}

/// Every day covered by a well-formed trip, sorted and de-duplicated.
///
/// Stays longer than `max_days` are left out of the shading, as screening
/// rejects them; they still take part in conflict detection.
fn occupied_dates(trips: &[Trip], max_days: u32) -> Vec<NaiveDate> {
    trips
        .iter()
        .map(Trip::range)
        .filter(|range| (1..=i64::from(max_days)).contains(&range.len_days()))
        .flat_map(|range| range.days())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// =============================================================================
// Default-Configuration Shortcuts
// =============================================================================

/// [`OverlapValidator::validate_date_range`] with `options`.
pub fn validate_date_range(
    range: DateRange,
    existing_trips: &[Trip],
    options: OverlapOptions,
) -> DateRangeValidation {
    OverlapValidator::with_options(options).validate_date_range(range, existing_trips)
}

/// [`OverlapValidator::find_next_available_date_range_within`] with default options.
pub fn find_next_available_date_range(
    preferred_start: NaiveDate,
    length_days: u32,
    existing_trips: &[Trip],
    search_limit_days: u32,
) -> Option<DateRange> {
    OverlapValidator::default().find_next_available_date_range_within(
        preferred_start,
        length_days,
        existing_trips,
        search_limit_days,
    )
}

/// [`OverlapValidator::suggest_alternative_dates`] with default options.
pub fn suggest_alternative_dates(
    conflicted: DateRange,
    length_days: u32,
    existing_trips: &[Trip],
) -> Vec<DateRange> {
    OverlapValidator::default().suggest_alternative_dates(conflicted, length_days, existing_trips)
}

/// [`OverlapValidator::validate_multiple_date_ranges`] with default options.
pub fn validate_multiple_date_ranges(
    ranges: &[DateRange],
    existing_trips: &[Trip],
) -> Vec<BatchRangeResult> {
    OverlapValidator::default().validate_multiple_date_ranges(ranges, existing_trips)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn existing() -> Vec<Trip> {
        vec![Trip::with_id("t1", "FR", d(6, 1), d(6, 10))]
    }

    #[test]
    fn test_overlap_detected() {
        let result = OverlapValidator::default()
            .validate_date_range(DateRange::new(d(6, 5), d(6, 8)), &existing());
        assert!(!result.is_valid);
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].overlap_days, 4);
        assert_eq!(result.conflicts[0].kind, ConflictKind::Full);
        assert_eq!(result.conflicts[0].overlap_start, d(6, 5));
        assert_eq!(result.conflicts[0].overlap_end, d(6, 8));
    }

    #[test]
    fn test_no_conflict() {
        let result = OverlapValidator::default()
            .validate_date_range(DateRange::new(d(6, 15), d(6, 20)), &existing());
        assert!(result.is_valid);
        assert!(result.conflicts.is_empty());
        assert_eq!(result.message, "Dates are available");
        assert_eq!(result.occupied_dates.len(), 10);
    }

    #[test]
    fn test_partial_overlap() {
        let result = OverlapValidator::default()
            .validate_date_range(DateRange::new(d(6, 8), d(6, 14)), &existing());
        assert!(!result.is_valid);
        assert_eq!(result.conflicts[0].kind, ConflictKind::Partial);
        assert_eq!(result.conflicts[0].overlap_days, 3);
        assert!(result.message.contains("FR"));
    }

    #[test]
    fn test_same_day_travel_policy() {
        let handover = DateRange::new(d(6, 10), d(6, 15));

        let default = OverlapValidator::default().validate_date_range(handover, &existing());
        assert!(default.is_valid);
        assert_eq!(default.suppressed.len(), 1);
        assert_eq!(default.suppressed[0].kind, ConflictKind::SameDayTravel);

        let no_same_day = OverlapOptions {
            allow_same_day_travel: false,
            ..OverlapOptions::default()
        };
        assert!(!validate_date_range(handover, &existing(), no_same_day).is_valid);

        let strict = validate_date_range(handover, &existing(), OverlapOptions::strict());
        assert!(!strict.is_valid);
        assert_eq!(strict.conflicts[0].overlap_days, 1);
    }

    #[test]
    fn test_border_transition_policy() {
        let single_day_inside = DateRange::new(d(6, 5), d(6, 5));

        assert!(!OverlapValidator::default()
            .validate_date_range(single_day_inside, &existing())
            .is_valid);

        let border = OverlapOptions {
            allow_border_transitions: true,
            ..OverlapOptions::default()
        };
        let result = validate_date_range(single_day_inside, &existing(), border);
        assert!(result.is_valid);
        assert_eq!(result.suppressed[0].kind, ConflictKind::BorderTransition);

        let strict_border = OverlapOptions {
            allow_border_transitions: true,
            strict_mode: true,
            ..OverlapOptions::default()
        };
        assert!(!validate_date_range(single_day_inside, &existing(), strict_border).is_valid);
    }

    #[test]
    fn test_reversed_candidate() {
        let result = OverlapValidator::default()
            .validate_date_range(DateRange::new(d(6, 20), d(6, 15)), &existing());
        assert!(!result.is_valid);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_find_next_available() {
        // Same-day travel lets the next range start on Jun 10.
        let found = find_next_available_date_range(d(6, 3), 5, &existing(), 365);
        assert_eq!(found, Some(DateRange::new(d(6, 10), d(6, 14))));

        let strict = OverlapValidator::with_options(OverlapOptions::strict());
        assert_eq!(
            strict.find_next_available_date_range(d(6, 3), 5, &existing()),
            Some(DateRange::new(d(6, 11), d(6, 15)))
        );

        assert_eq!(find_next_available_date_range(d(6, 3), 5, &existing(), 3), None);
    }

    #[test]
    fn test_suggest_alternatives() {
        let conflicted = DateRange::new(d(6, 5), d(6, 8));
        let suggestions = suggest_alternative_dates(conflicted, 4, &existing());

        assert_eq!(suggestions.len(), 3);
        assert!(suggestions.contains(&DateRange::new(d(5, 29), d(6, 1))));
        assert!(suggestions.contains(&DateRange::new(d(6, 10), d(6, 13))));
        let validator = OverlapValidator::default();
        for s in &suggestions {
            assert!(validator.validate_date_range(*s, &existing()).is_valid);
            assert_eq!(s.len_days(), 4);
        }
    }

    #[test]
    fn test_batch_ranges_conflict_with_each_other() {
        let ranges = [
            DateRange::new(d(7, 1), d(7, 10)),
            DateRange::new(d(7, 5), d(7, 12)),
            DateRange::new(d(6, 5), d(6, 6)),
            DateRange::new(d(7, 20), d(7, 22)),
        ];
        let results = validate_multiple_date_ranges(&ranges, &existing());

        assert_eq!(results.len(), 4);
        assert!(results[0].result.is_valid);
        assert!(!results[1].result.is_valid);
        assert_eq!(results[1].result.conflicts[0].trip_id, "batch-0");
        assert!(!results[2].result.is_valid);
        assert!(results[3].result.is_valid);
        assert_eq!(results[3].index, 3);
    }

    #[test]
    fn test_overlong_trip_not_expanded_into_occupied_dates() {
        let mut trips = existing();
        trips.push(Trip::with_id(
            "huge",
            "DE",
            NaiveDate::from_ymd_opt(1, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(9999, 12, 31).unwrap(),
        ));

        let result = OverlapValidator::default()
            .validate_date_range(DateRange::new(d(12, 1), d(12, 2)), &trips);

        assert_eq!(result.occupied_dates.len(), 10);
        assert!(!result.is_valid);
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].trip_id, "huge");
        assert_eq!(result.conflicts[0].overlap_days, 2);
    }
}
