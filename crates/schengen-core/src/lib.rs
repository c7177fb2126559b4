//! # schengen-core: Pure 90/180-Day Compliance Logic
//!
//! Decides whether a history of Schengen stays (and a proposed addition)
//! respects the rule "at most 90 days in any rolling 180-day window", and
//! if not, by how much and from which day.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Schengen Calculator Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web UI (timeline, trip editor)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ TypeScript bindings (ts-rs)            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ schengen-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐  ┌─────────────┐  ┌────────────┐  ┌──────────┐ │   │
//! │  │  │ validation │─►│ calculator  │◄─│  overlap   │  │ planning │ │   │
//! │  │  │ screening  │  │ occupancy   │  │ conflicts  │  │ searches │ │   │
//! │  │  └────────────┘  └─────────────┘  └────────────┘  └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SHARED STATE • DETERMINISTIC                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            schengen-audit (cross-validation, latency)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Trips, date ranges, results
//! - [`calculator`] - Rolling-window engine
//! - [`planning`] - Planned-trip checks and searches
//! - [`validation`] - Structural trip validation
//! - [`overlap`] - Date-range conflict detection
//! - [`screening`] - The shared rules for rejecting trips
//! - [`config`] - Rule parameters
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same trips + same reference date = same result
//! 2. **Day Granularity**: `NaiveDate` everywhere, both trip ends inclusive
//! 3. **Every Day Evaluated**: windows are checked for each day, not only
//!    at trip boundaries
//! 4. **Fail Open**: `calculate_exact_compliance` always answers; errors are
//!    logged through `tracing` and replaced by a neutral result
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use schengen_core::{calculate_exact_compliance, Trip};
//!
//! let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
//! let trips = vec![
//!     Trip::new("FR", d(1, 1), d(1, 30)),
//!     Trip::new("DE", d(1, 31), d(2, 28)),
//!     Trip::new("IT", d(2, 29), d(4, 1)),
//! ];
//!
//! let result = calculate_exact_compliance(&trips, d(4, 1));
//! assert_eq!(result.total_days_used, 92);
//! assert_eq!(result.overstay_days, 2);
//! assert!(!result.is_compliant);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod config;
pub mod dates;
pub mod error;
mod occupancy;
pub mod overlap;
pub mod planning;
pub mod screening;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{
    calculate_days_in_window, calculate_exact_compliance, get_next_reset_date, ComplianceCalculator,
};
pub use config::{OverlapOptions, RuleConfig};
pub use error::{CoreError, CoreResult};
pub use overlap::{
    find_next_available_date_range, suggest_alternative_dates, validate_date_range,
    validate_multiple_date_ranges, BatchRangeResult, ConflictKind, DateConflict,
    DateRangeValidation, OverlapValidator,
};
pub use planning::{
    calculate_max_consecutive_days, find_latest_valid_start_date, validate_planned_trip,
};
pub use types::*;
pub use validation::{validate_trips, validate_trips_at};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Days allowed in any window under the standard rule.
pub const MAX_DAYS_IN_WINDOW: u32 = 90;

/// Length of the rolling window under the standard rule.
pub const WINDOW_DAYS: u32 = 180;
