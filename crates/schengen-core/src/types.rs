//! # Domain Types
//!
//! Core domain types used throughout the calculator.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │      Trip       │   │  ComplianceResult   │   │ ValidationError │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)      │   │  totalDaysUsed      │   │  field          │   │
//! │  │  country        │──►│  daysRemaining      │   │  message        │   │
//! │  │  startDate      │   │  overstayDays       │   │  severity       │   │
//! │  │  endDate        │   │  detailedBreakdown ─┼─┐ │  tripId?        │   │
//! │  │  days (cached)  │   └─────────────────────┘ │ └─────────────────┘   │
//! │  └─────────────────┘                           ▼                       │
//! │                                        ┌─────────────────┐             │
//! │  ┌─────────────────┐                   │  DayBreakdown   │             │
//! │  │   DateRange     │                   │  one per day of │             │
//! │  │  start..=end    │                   │  the window     │             │
//! │  └─────────────────┘                   └─────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All values are immutable once built: every computation produces a fresh
//! result and never edits a trip in place.

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::dates::{self, inclusive_days};
use crate::error::{CoreError, CoreResult};

// =============================================================================
// Date Range
// =============================================================================

/// An inclusive span of calendar days: `start` and `end` both count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range without checking its order.
    #[inline]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Builds a range, rejecting `end < start`.
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if end < start {
            return Err(CoreError::InvalidDateRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// A range of `length` days beginning at `start`.
    pub fn starting_at(start: NaiveDate, length: u32) -> CoreResult<Self> {
        let end = dates::add_days(start, i64::from(length.max(1)) - 1)?;
        Ok(DateRange { start, end })
    }

    /// Builds a range from two timestamps, flooring both to their day.
    pub fn from_timestamps<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Self {
        DateRange {
            start: dates::normalize(start),
            end: dates::normalize(end),
        }
    }

    /// Number of days covered (zero or negative when reversed).
    #[inline]
    pub fn len_days(&self) -> i64 {
        inclusive_days(self.start, self.end)
    }

    /// Whether the range is ordered.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Ranges overlap unless one lies strictly before the other.
    #[inline]
    pub fn overlaps(&self, other: &DateRange) -> bool {
        !(self.end < other.start || other.end < self.start)
    }

    /// The shared days of two ranges, if any.
    pub fn intersection(&self, other: &DateRange) -> Option<DateRange> {
        if !self.overlaps(other) {
            return None;
        }
        Some(DateRange {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Iterates every day of the range in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

// =============================================================================
// Trip
// =============================================================================

/// One continuous stay inside the Schengen Area.
///
/// `days` is a cached copy of the duration kept for display. The
/// authoritative length is always `end_date - start_date + 1`; see
/// [`Trip::duration_days`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Unique identifier (UUID v4 when generated here).
    pub id: String,

    /// Country of entry, usually an ISO 3166 code.
    pub country: String,

    /// First day in the area (counts as a full day).
    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Last day in the area (counts as a full day).
    #[ts(as = "String")]
    pub end_date: NaiveDate,

    /// Cached inclusive duration.
    #[serde(default)]
    pub days: i32,
}

impl Trip {
    /// Creates a trip with a freshly generated id.
    pub fn new(country: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), country, start_date, end_date)
    }

    /// Creates a trip with a caller-provided id.
    pub fn with_id(
        id: impl Into<String>,
        country: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let days = i32::try_from(inclusive_days(start_date, end_date)).unwrap_or(i32::MAX);
        Trip {
            id: id.into(),
            country: country.into(),
            start_date,
            end_date,
            days,
        }
    }

    /// Creates a trip from two timestamps, flooring both to their day.
    pub fn from_timestamps<Tz: TimeZone>(
        country: impl Into<String>,
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
    ) -> Self {
        Self::new(country, dates::normalize(start), dates::normalize(end))
    }

    /// Authoritative inclusive duration.
    #[inline]
    pub fn duration_days(&self) -> i64 {
        inclusive_days(self.start_date, self.end_date)
    }

    /// The trip's dates as a range.
    #[inline]
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

// =============================================================================
// Validation Records
// =============================================================================

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// The trip cannot be used in any computation.
    Error,
    /// Informational; the trip is still used.
    Warning,
}

/// One finding about a trip or a trip list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Field the finding is about (`startDate`, `days`, `id`, ...).
    pub field: String,

    /// Human-readable message for the UI.
    pub message: String,

    pub severity: Severity,

    /// Trip the finding is about, absent for list-level findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
}

impl ValidationError {
    /// An ERROR finding for a trip.
    pub fn error(field: &str, message: impl Into<String>, trip_id: Option<&str>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
            severity: Severity::Error,
            trip_id: trip_id.map(str::to_string),
        }
    }

    /// A WARNING finding for a trip.
    pub fn warning(field: &str, message: impl Into<String>, trip_id: Option<&str>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
            severity: Severity::Warning,
            trip_id: trip_id.map(str::to_string),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Outcome of [`validate_trips`](crate::validation::validate_trips).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TripValidationResult {
    /// True when there are no ERROR findings.
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

// =============================================================================
// Compliance Result
// =============================================================================

/// Traffic-light summary of a [`ComplianceResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// Days are still available.
    Compliant,
    /// Exactly at the cap: compliant, no days left.
    AtLimit,
    /// Over the cap.
    Overstay,
}

/// One calendar day of the evaluated period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DayBreakdown {
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Whether any trip covers this day.
    pub is_occupied: bool,

    /// Occupied days in the window ending on this day.
    pub days_in_window: u32,

    /// Whether the window ending on this day is over the cap.
    pub is_violation: bool,

    /// Trips covering this day (several on border-crossing days).
    pub trip_ids: Vec<String>,
}

/// The window evaluated for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RollingWindowCheck {
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub window_start: NaiveDate,
    #[ts(as = "String")]
    pub window_end: NaiveDate,
    pub days_in_window: u32,
    pub is_compliant: bool,
    pub overstay_days: u32,
}

/// Compliance of a trip history on a reference date.
///
/// ## Invariants
/// - `days_remaining == max(0, cap - total_days_used)`
/// - `is_compliant ⇔ overstay_days == 0 ⇔ total_days_used <= cap`
/// - `period_end == reference_date`, `period_start == reference_date - 179`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    pub total_days_used: u32,
    pub days_remaining: u32,
    pub is_compliant: bool,
    pub overstay_days: u32,
    #[ts(as = "String")]
    pub reference_date: NaiveDate,
    #[ts(as = "String")]
    pub period_start: NaiveDate,
    #[ts(as = "String")]
    pub period_end: NaiveDate,

    /// One entry per day in `[period_start, period_end]`.
    pub detailed_breakdown: Vec<DayBreakdown>,

    /// Trips left out of the computation and why.
    #[serde(default)]
    pub excluded_trips: Vec<ValidationError>,
}

impl ComplianceResult {
    /// The neutral answer returned when computation fails:
    /// nothing used, everything remaining, compliant.
    pub fn fallback(reference_date: NaiveDate, max_days: u32, window_days: u32) -> Self {
        let lookback = i64::from(window_days.max(1)) - 1;
        let period_start = dates::add_days(reference_date, -lookback).unwrap_or(reference_date);
        ComplianceResult {
            total_days_used: 0,
            days_remaining: max_days,
            is_compliant: true,
            overstay_days: 0,
            reference_date,
            period_start,
            period_end: reference_date,
            detailed_breakdown: Vec::new(),
            excluded_trips: Vec::new(),
        }
    }

    /// Badge-level summary.
    pub fn status(&self) -> ComplianceStatus {
        if !self.is_compliant {
            ComplianceStatus::Overstay
        } else if self.days_remaining == 0 {
            ComplianceStatus::AtLimit
        } else {
            ComplianceStatus::Compliant
        }
    }
}

// =============================================================================
// Planned Trip Validation
// =============================================================================

/// Whether a proposed trip keeps the traveller compliant on every one of
/// its days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PlannedTripValidation {
    pub is_valid: bool,

    /// Worst overstay on any day of the trip.
    pub violation_days: u32,

    /// First day of the trip on which the cap is exceeded.
    #[ts(as = "Option<String>")]
    pub violation_date: Option<NaiveDate>,

    /// Highest window count seen during the trip.
    pub max_days_in_window: u32,
}

// =============================================================================
// Unit Tests
// =============================================================================
