//! # Rolling-Window Compliance Calculator
//!
//! Exact day-by-day evaluation of the 90/180 rule.
//!
//! ## How a Result Is Built
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  trips ──► screen_trips(anchor = reference)                             │
//! │               │ accepted (sorted)        │ ERROR findings               │
//! │               ▼                          └──► excludedTrips + warn!     │
//! │  OccupancyIndex over [reference - 358, reference]                       │
//! │               │                                                         │
//! │               ▼                                                         │
//! │  for EVERY day d in [reference - 179, reference]:                       │
//! │      window   = [d - 179, d]                                            │
//! │      count    = occupied days in window                                 │
//! │      overstay = max(0, count - 90)                                      │
//! │               │                                                         │
//! │               ▼                                                         │
//! │  totals taken from d = reference, breakdown = every d                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Evaluating every day rather than only trip endpoints is what makes the
//! answer exact: a window can go over the cap in the middle of the period
//! and come back under by the reference date.
//!
//! ## Failure Contract
//! [`ComplianceCalculator::calculate_exact_compliance`] never fails. Any
//! error is logged and replaced with [`ComplianceResult::fallback`] (nothing
//! used, compliant). Callers that must see the error use
//! [`ComplianceCalculator::try_calculate_exact_compliance`].

use chrono::NaiveDate;
use tracing::{debug, error, warn};

use crate::config::RuleConfig;
use crate::dates::{self, add_days};
use crate::error::CoreResult;
use crate::occupancy::OccupancyIndex;
use crate::screening::{screen_trips, Screening};
use crate::types::{
    ComplianceResult, DateRange, DayBreakdown, RollingWindowCheck, Trip, ValidationError,
};

// =============================================================================
// Window Evaluation
// =============================================================================

/// Per-day checks over a range of reference days.
#[derive(Debug, Clone)]
pub(crate) struct Evaluation {
    pub(crate) checks: Vec<RollingWindowCheck>,
    /// Largest overstay seen on any evaluated day.
    pub(crate) max_overstay: u32,
    /// Highest window count seen on any evaluated day.
    pub(crate) max_days_in_window: u32,
    /// First evaluated day over the cap.
    pub(crate) first_violation: Option<NaiveDate>,
}

/// Runs the trailing-window check for every day of `days`.
///
/// `index` must cover `[days.start - lookback, days.end]`.
pub(crate) fn evaluate_days(
    index: &OccupancyIndex<'_>,
    days: DateRange,
    config: &RuleConfig,
) -> CoreResult<Evaluation> {
    let lookback = config.window_lookback();
    let cap = config.max_days_in_window;

    let mut evaluation = Evaluation {
        checks: Vec::with_capacity(days.len_days().max(0) as usize),
        max_overstay: 0,
        max_days_in_window: 0,
        first_violation: None,
    };

    for day in days.days() {
        let window_start = add_days(day, -lookback)?;
        let days_in_window = index.count(DateRange::new(window_start, day));
        let overstay_days = days_in_window.saturating_sub(cap);

        if overstay_days > 0 && evaluation.first_violation.is_none() {
            evaluation.first_violation = Some(day);
        }
        evaluation.max_overstay = evaluation.max_overstay.max(overstay_days);
        evaluation.max_days_in_window = evaluation.max_days_in_window.max(days_in_window);

        evaluation.checks.push(RollingWindowCheck {
            date: day,
            window_start,
            window_end: day,
            days_in_window,
            is_compliant: overstay_days == 0,
            overstay_days,
        });
    }

    Ok(evaluation)
}

// =============================================================================
// Calculator
// =============================================================================

/// Stateless compliance engine parameterised by a [`RuleConfig`].
///
/// Holds no state between calls; one instance can serve any number of
/// callers.
#[derive(Debug, Clone, Default)]
pub struct ComplianceCalculator {
    config: RuleConfig,
}

impl ComplianceCalculator {
    pub fn new(config: RuleConfig) -> Self {
        ComplianceCalculator { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Screens `trips` against `anchor` and logs every exclusion.
    pub(crate) fn screen<'a>(&self, trips: &'a [Trip], anchor: NaiveDate) -> Screening<'a> {
        let screening = screen_trips(trips, anchor, &self.config);
        for issue in screening.errors() {
            warn!(
                trip_id = issue.trip_id.as_deref().unwrap_or("<none>"),
                field = %issue.field,
                reason = %issue.message,
                "Excluding trip from compliance computation"
            );
        }
        screening
    }

    /// Exact compliance on `reference_date`, or the fallback result.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use schengen_core::{ComplianceCalculator, Trip};
    ///
    /// let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
    /// let trips = vec![Trip::new("FR", d(6, 1), d(6, 10))];
    ///
    /// let result = ComplianceCalculator::default()
    ///     .calculate_exact_compliance(&trips, d(6, 30));
    /// assert_eq!(result.total_days_used, 10);
    /// assert_eq!(result.days_remaining, 80);
    /// ```
    pub fn calculate_exact_compliance(
        &self,
        trips: &[Trip],
        reference_date: NaiveDate,
    ) -> ComplianceResult {
        self.try_calculate_exact_compliance(trips, reference_date)
            .unwrap_or_else(|e| {
                error!(
                    error = %e,
                    %reference_date,
                    trip_count = trips.len(),
                    "Compliance calculation failed, returning fallback result"
                );
                ComplianceResult::fallback(
                    reference_date,
                    self.config.max_days_in_window,
                    self.config.window_days,
                )
            })
    }

    /// Exact compliance on today's date.
    pub fn calculate_exact_compliance_today(&self, trips: &[Trip]) -> ComplianceResult {
        self.calculate_exact_compliance(trips, dates::today())
    }

    /// Exact compliance on `reference_date`, surfacing arithmetic errors.
    pub fn try_calculate_exact_compliance(
        &self,
        trips: &[Trip],
        reference_date: NaiveDate,
    ) -> CoreResult<ComplianceResult> {
        let screening = self.screen(trips, reference_date);
        let (period, evaluation, index) = self.evaluate_period(&screening, reference_date)?;

        let detailed_breakdown = evaluation
            .checks
            .iter()
            .map(|check| {
                let trip_ids: Vec<String> = index
                    .occupants(check.date)
                    .iter()
                    .map(|id| id.to_string())
                    .collect();
                DayBreakdown {
                    date: check.date,
                    is_occupied: !trip_ids.is_empty(),
                    days_in_window: check.days_in_window,
                    is_violation: !check.is_compliant,
                    trip_ids,
                }
            })
            .collect();

        let last = evaluation.checks.last().copied();
        let total_days_used = last.map_or(0, |c| c.days_in_window);
        let overstay_days = last.map_or(0, |c| c.overstay_days);

        debug!(
            %reference_date,
            total_days_used,
            overstay_days,
            max_overstay = evaluation.max_overstay,
            leap_year = dates::is_leap_year(reference_date),
            "Computed exact compliance"
        );

        Ok(ComplianceResult {
            total_days_used,
            days_remaining: self.config.max_days_in_window.saturating_sub(total_days_used),
            is_compliant: overstay_days == 0,
            overstay_days,
            reference_date,
            period_start: period.start,
            period_end: period.end,
            detailed_breakdown,
            excluded_trips: screening.errors().cloned().collect::<Vec<ValidationError>>(),
        })
    }

    /// The per-day window checks behind a [`ComplianceResult`].
    pub fn rolling_window_checks(
        &self,
        trips: &[Trip],
        reference_date: NaiveDate,
    ) -> CoreResult<Vec<RollingWindowCheck>> {
        let screening = self.screen(trips, reference_date);
        let (_, evaluation, _) = self.evaluate_period(&screening, reference_date)?;
        Ok(evaluation.checks)
    }

    /// Largest overstay on any day of the period ending at `reference_date`.
    pub fn max_overstay(&self, trips: &[Trip], reference_date: NaiveDate) -> CoreResult<u32> {
        let screening = self.screen(trips, reference_date);
        let (_, evaluation, _) = self.evaluate_period(&screening, reference_date)?;
        Ok(evaluation.max_overstay)
    }

    fn evaluate_period<'a>(
        &self,
        screening: &Screening<'a>,
        reference_date: NaiveDate,
    ) -> CoreResult<(DateRange, Evaluation, OccupancyIndex<'a>)> {
        let lookback = self.config.window_lookback();
        let period = DateRange::new(add_days(reference_date, -lookback)?, reference_date);
        let span = DateRange::new(add_days(period.start, -lookback)?, reference_date);

        let index = OccupancyIndex::build(screening.accepted.iter().copied(), span);
        let evaluation = evaluate_days(&index, period, &self.config)?;
        Ok((period, evaluation, index))
    }

    /// Days used in the window ending on `end_date`, without the breakdown.
    ///
    /// Accepted trips are merged into disjoint intervals first, so days
    /// shared by overlapping trips count once and the answer always equals
    /// `calculate_exact_compliance(..).total_days_used`.
    pub fn calculate_days_in_window(&self, trips: &[Trip], end_date: NaiveDate) -> u32 {
        let window_start = match add_days(end_date, -self.config.window_lookback()) {
            Ok(start) => start,
            Err(e) => {
                error!(error = %e, %end_date, "Window start out of range");
                return 0;
            }
        };
        let window = DateRange::new(window_start, end_date);

        let screening = self.screen(trips, end_date);
        merge_ranges(screening.accepted.iter().map(|t| t.range()))
            .iter()
            .filter_map(|range| range.intersection(&window))
            .map(|shared| shared.len_days() as u32)
            .sum()
    }

    /// The day the oldest counted day rolls out of the window.
    ///
    /// `None` when no day of the window ending at `reference_date` is
    /// occupied.
    pub fn get_next_reset_date(
        &self,
        trips: &[Trip],
        reference_date: NaiveDate,
    ) -> Option<NaiveDate> {
        let lookback = self.config.window_lookback();
        let window = DateRange::new(add_days(reference_date, -lookback).ok()?, reference_date);

        let screening = self.screen(trips, reference_date);
        let index = OccupancyIndex::build(screening.accepted.iter().copied(), window);
        let oldest = index.first_occupied(window)?;
        add_days(oldest, i64::from(self.config.window_days)).ok()
    }

    /// Days to wait, adding no new travel, until the window is back at or
    /// under the cap. Zero when already compliant.
    pub fn days_until_compliant(
        &self,
        trips: &[Trip],
        reference_date: NaiveDate,
    ) -> CoreResult<u32> {
        let lookback = self.config.window_lookback();
        let window = DateRange::new(add_days(reference_date, -lookback)?, reference_date);

        let screening = self.screen(trips, reference_date);
        let index = OccupancyIndex::build(screening.accepted.iter().copied(), window);
        let cap = self.config.max_days_in_window;

        for wait in 0..=self.config.window_days {
            let day = add_days(reference_date, i64::from(wait))?;
            let start = add_days(day, -lookback)?;
            // Only days up to the reference date count: nothing new is added.
            if index.count(DateRange::new(start, reference_date)) <= cap {
                return Ok(wait);
            }
        }
        Ok(self.config.window_days)
    }
}

/// Merges ranges into sorted, disjoint, non-adjacent-free intervals.
pub(crate) fn merge_ranges<I>(ranges: I) -> Vec<DateRange>
where
    I: IntoIterator<Item = DateRange>,
{
    let mut sorted: Vec<DateRange> = ranges.into_iter().filter(|r| r.is_well_formed()).collect();
    sorted.sort();

    let mut merged: Vec<DateRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

// =============================================================================
// Default-Configuration Shortcuts
// =============================================================================

/// [`ComplianceCalculator::calculate_exact_compliance`] with the standard rule.
pub fn calculate_exact_compliance(trips: &[Trip], reference_date: NaiveDate) -> ComplianceResult {
    ComplianceCalculator::default().calculate_exact_compliance(trips, reference_date)
}

/// [`ComplianceCalculator::calculate_days_in_window`] with the standard rule.
pub fn calculate_days_in_window(trips: &[Trip], end_date: NaiveDate) -> u32 {
    ComplianceCalculator::default().calculate_days_in_window(trips, end_date)
}

/// [`ComplianceCalculator::get_next_reset_date`] with the standard rule.
pub fn get_next_reset_date(trips: &[Trip], reference_date: NaiveDate) -> Option<NaiveDate> {
    ComplianceCalculator::default().get_next_reset_date(trips, reference_date)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComplianceStatus;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn trip(id: &str, start: NaiveDate, end: NaiveDate) -> Trip {
        Trip::with_id(id, "FR", start, end)
    }

    fn calc() -> ComplianceCalculator {
        ComplianceCalculator::default()
    }

    fn assert_identities(result: &ComplianceResult) {
        assert_eq!(result.is_compliant, result.total_days_used <= 90);
        assert_eq!(result.overstay_days, result.total_days_used.saturating_sub(90));
        assert_eq!(result.days_remaining, 90u32.saturating_sub(result.total_days_used));
        assert_eq!(result.period_end, result.reference_date);
        assert_eq!(add_days(result.reference_date, -179).unwrap(), result.period_start);
    }

    #[test]
    fn test_empty_history() {
        let result = calc().calculate_exact_compliance(&[], d(2024, 6, 30));
        assert_eq!(result.total_days_used, 0);
        assert_eq!(result.days_remaining, 90);
        assert!(result.is_compliant);
        assert_eq!(result.detailed_breakdown.len(), 180);
        assert_identities(&result);
    }

    #[test]
    fn test_single_day_stay_counts_one() {
        let trips = [trip("t1", d(2024, 6, 15), d(2024, 6, 15))];
        let result = calc().calculate_exact_compliance(&trips, d(2024, 6, 30));
        assert_eq!(result.total_days_used, 1);
        assert_identities(&result);
    }

    #[test]
    fn test_exact_cap_is_compliant() {
        // Two trips totalling exactly 90 days, the last ending on the reference date.
        let trips = [
            trip("t1", d(2024, 3, 1), d(2024, 4, 14)),
            trip("t2", d(2024, 5, 17), d(2024, 6, 30)),
        ];
        assert_eq!(trips[0].duration_days() + trips[1].duration_days(), 90);

        let result = calc().calculate_exact_compliance(&trips, d(2024, 6, 30));
        assert_eq!(result.total_days_used, 90);
        assert_eq!(result.days_remaining, 0);
        assert!(result.is_compliant);
        assert_eq!(result.overstay_days, 0);
        assert_eq!(result.status(), ComplianceStatus::AtLimit);
        assert_identities(&result);
    }

    #[test]
    fn test_violation_scenario_30_29_33() {
        let trips = [
            trip("t1", d(2024, 1, 1), d(2024, 1, 30)),
            trip("t2", d(2024, 1, 31), d(2024, 2, 28)),
            trip("t3", d(2024, 2, 29), d(2024, 4, 1)),
        ];
        assert_eq!(trips[0].duration_days(), 30);
        assert_eq!(trips[1].duration_days(), 29);
        assert_eq!(trips[2].duration_days(), 33);

        let result = calc().calculate_exact_compliance(&trips, d(2024, 4, 1));
        assert_eq!(result.total_days_used, 92);
        assert!(!result.is_compliant);
        assert_eq!(result.overstay_days, 2);
        assert_eq!(result.days_remaining, 0);
        assert_eq!(result.status(), ComplianceStatus::Overstay);
        assert_identities(&result);

        let violations: Vec<_> = result
            .detailed_breakdown
            .iter()
            .filter(|day| day.is_violation)
            .map(|day| day.date)
            .collect();
        assert_eq!(violations, vec![d(2024, 3, 31), d(2024, 4, 1)]);
    }

    #[test]
    fn test_trip_outside_window_contributes_nothing() {
        let trips = [trip("old", d(2023, 6, 1), d(2023, 6, 20))];
        let result = calc().calculate_exact_compliance(&trips, d(2024, 6, 30));
        assert_eq!(result.total_days_used, 0);
        assert!(result.detailed_breakdown.iter().all(|day| !day.is_occupied));
    }

    #[test]
    fn test_partial_window_overlap() {
        // Window for 2024-06-30 starts 2024-01-03.
        let trips = [trip("t1", d(2023, 12, 25), d(2024, 1, 10))];
        let result = calc().calculate_exact_compliance(&trips, d(2024, 6, 30));
        assert_eq!(result.total_days_used, 8);
    }

    #[test]
    fn test_overlapping_trips_count_once() {
        let trips = [
            trip("a", d(2024, 6, 1), d(2024, 6, 10)),
            trip("b", d(2024, 6, 10), d(2024, 6, 12)),
        ];
        let result = calc().calculate_exact_compliance(&trips, d(2024, 6, 30));
        assert_eq!(result.total_days_used, 12);

        let border_day = result
            .detailed_breakdown
            .iter()
            .find(|day| day.date == d(2024, 6, 10))
            .unwrap();
        assert_eq!(border_day.trip_ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_breakdown_counts_are_per_day() {
        let trips = [trip("t1", d(2024, 6, 1), d(2024, 6, 10))];
        let result = calc().calculate_exact_compliance(&trips, d(2024, 6, 30));

        let on = |date| {
            result
                .detailed_breakdown
                .iter()
                .find(|day| day.date == date)
                .unwrap()
                .days_in_window
        };
        assert_eq!(on(d(2024, 5, 31)), 0);
        assert_eq!(on(d(2024, 6, 1)), 1);
        assert_eq!(on(d(2024, 6, 5)), 5);
        assert_eq!(on(d(2024, 6, 30)), 10);
    }

    #[test]
    fn test_invalid_trips_are_excluded_and_reported() {
        let trips = [
            trip("good", d(2024, 6, 1), d(2024, 6, 10)),
            trip("reversed", d(2024, 6, 20), d(2024, 6, 15)),
            trip("too-long", d(2024, 1, 1), d(2024, 5, 1)),
        ];
        let result = calc().calculate_exact_compliance(&trips, d(2024, 6, 30));
        assert_eq!(result.total_days_used, 10);

        let excluded: Vec<_> = result
            .excluded_trips
            .iter()
            .filter_map(|e| e.trip_id.as_deref())
            .collect();
        assert_eq!(excluded, vec!["reversed", "too-long"]);
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("schengen_core=debug"))
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_fail_open_on_out_of_range_reference() {
        init_tracing();
        let trips = [trip("t1", d(2024, 6, 1), d(2024, 6, 10))];
        let reference = NaiveDate::MIN;

        assert!(calc().try_calculate_exact_compliance(&trips, reference).is_err());

        let result = calc().calculate_exact_compliance(&trips, reference);
        assert_eq!(result.total_days_used, 0);
        assert_eq!(result.days_remaining, 90);
        assert!(result.is_compliant);
    }

    #[test]
    fn test_deterministic() {
        let trips = [
            trip("a", d(2024, 1, 5), d(2024, 2, 20)),
            trip("b", d(2024, 2, 15), d(2024, 3, 1)),
            trip("c", d(2024, 5, 1), d(2024, 5, 30)),
        ];
        let first = calc().calculate_exact_compliance(&trips, d(2024, 6, 1));
        let second = calc().calculate_exact_compliance(&trips, d(2024, 6, 1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_monotonic_when_adding_a_trip() {
        let reference = d(2024, 6, 30);
        let mut trips = vec![trip("a", d(2024, 2, 1), d(2024, 2, 20))];
        let before = calc().calculate_exact_compliance(&trips, reference);

        trips.push(trip("b", d(2023, 12, 20), d(2024, 1, 15)));
        let after = calc().calculate_exact_compliance(&trips, reference);
        assert!(after.total_days_used >= before.total_days_used);
        assert_eq!(after.total_days_used, before.total_days_used + 13);
    }

    #[test]
    fn test_days_in_window_matches_full_algorithm() {
        let trips = [
            trip("a", d(2023, 12, 1), d(2024, 1, 20)),
            trip("b", d(2024, 1, 15), d(2024, 2, 10)),
            trip("c", d(2024, 4, 1), d(2024, 4, 1)),
            trip("d", d(2024, 6, 20), d(2024, 7, 15)),
        ];
        for reference in [d(2024, 1, 10), d(2024, 3, 1), d(2024, 6, 30), d(2024, 9, 1)] {
            let full = calc().calculate_exact_compliance(&trips, reference);
            let fast = calc().calculate_days_in_window(&trips, reference);
            assert_eq!(fast, full.total_days_used, "reference {reference}");
        }
    }

    #[test]
    fn test_leap_year_window() {
        // 2024-02-29 exists; the window for 2024-08-26 starts 2024-02-29.
        let trips = [trip("leap", d(2024, 2, 28), d(2024, 3, 1))];
        assert_eq!(calc().calculate_days_in_window(&trips, d(2024, 8, 26)), 2);
        assert_eq!(calc().calculate_days_in_window(&trips, d(2024, 8, 27)), 1);
        assert_eq!(calc().calculate_days_in_window(&trips, d(2024, 8, 28)), 0);
    }

    #[test]
    fn test_next_reset_date() {
        let trips = [trip("t1", d(2024, 6, 1), d(2024, 6, 10))];
        assert_eq!(
            calc().get_next_reset_date(&trips, d(2024, 6, 30)),
            Some(d(2024, 11, 28))
        );
        assert_eq!(calc().get_next_reset_date(&[], d(2024, 6, 30)), None);
    }

    #[test]
    fn test_days_until_compliant() {
        let trips = [
            trip("t1", d(2024, 1, 1), d(2024, 1, 30)),
            trip("t2", d(2024, 1, 31), d(2024, 2, 28)),
            trip("t3", d(2024, 2, 29), d(2024, 4, 1)),
        ];
        // Jan 1 and Jan 2 leave the window only once it starts on Jan 3,
        // 90 days after the reference date.
        assert_eq!(calc().days_until_compliant(&trips, d(2024, 4, 1)).unwrap(), 90);
        assert_eq!(calc().days_until_compliant(&trips[..1], d(2024, 4, 1)).unwrap(), 0);
    }

    #[test]
    fn test_merge_ranges() {
        let merged = merge_ranges([
            DateRange::new(d(2024, 1, 10), d(2024, 1, 20)),
            DateRange::new(d(2024, 1, 1), d(2024, 1, 5)),
            DateRange::new(d(2024, 1, 15), d(2024, 1, 25)),
        ]);
        assert_eq!(
            merged,
            vec![
                DateRange::new(d(2024, 1, 1), d(2024, 1, 5)),
                DateRange::new(d(2024, 1, 10), d(2024, 1, 25)),
            ]
        );
    }

    #[test]
    fn test_max_overstay_sees_mid_period_violation() {
        // Over the cap in late March, back under by the reference date.
        let trips = [
            trip("t1", d(2024, 1, 1), d(2024, 1, 30)),
            trip("t2", d(2024, 1, 31), d(2024, 2, 28)),
            trip("t3", d(2024, 2, 29), d(2024, 4, 1)),
        ];
        let result = calc().calculate_exact_compliance(&trips, d(2024, 7, 15));
        assert!(result.is_compliant);
        assert_eq!(calc().max_overstay(&trips, d(2024, 7, 15)).unwrap(), 2);
    }

    #[test]
    fn test_rolling_window_checks_cover_every_day() {
        let trips = [
            trip("t1", d(2024, 1, 1), d(2024, 1, 30)),
            trip("t2", d(2024, 1, 31), d(2024, 2, 28)),
            trip("t3", d(2024, 2, 29), d(2024, 4, 1)),
        ];
        let reference = d(2024, 4, 1);
        let checks = calc().rolling_window_checks(&trips, reference).unwrap();

        assert_eq!(checks.len(), 180);
        assert_eq!(checks[0].date, add_days(reference, -179).unwrap());
        assert_eq!(checks[179].date, reference);
        for check in &checks {
            assert_eq!(check.window_end, check.date);
            assert_eq!(check.window_start, add_days(check.date, -179).unwrap());
            assert_eq!(check.is_compliant, check.overstay_days == 0);
        }
        assert_eq!(checks[179].days_in_window, 92);
        assert_eq!(checks.iter().filter(|c| !c.is_compliant).count(), 2);
    }

    #[test]
    fn test_calculate_today_uses_current_date() {
        let today = dates::today();
        let trips = [trip("t1", add_days(today, -9).unwrap(), today)];
        let result = calc().calculate_exact_compliance_today(&trips);

        assert_eq!(result.reference_date, today);
        assert_eq!(result.total_days_used, 10);
        assert_identities(&result);
    }
}
