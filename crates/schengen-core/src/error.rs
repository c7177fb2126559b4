//! # Error Types
//!
//! Domain-specific error types for schengen-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  schengen-core errors (this file)                                      │
//! │  └── CoreError        - Date arithmetic and configuration failures     │
//! │                                                                         │
//! │  schengen-audit errors (separate crate)                                │
//! │  └── AuditError       - Cross-validation and benchmark failures        │
//! │                                                                         │
//! │  Trip problems are NOT errors here: they are reported as data          │
//! │  (`ValidationError` records in `types`) so a caller can show all of    │
//! │  them at once.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by the compliance engine.
///
/// The public `calculate_*` entry points never surface these; they log the
/// error and fall back to a neutral result. The `try_*` variants return
/// them so callers can decide for themselves.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A range whose end precedes its start.
    #[error("Invalid date range: {end} is before {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Day arithmetic left chrono's representable range.
    ///
    /// ## When This Occurs
    /// - Reference dates near `NaiveDate::MIN` / `NaiveDate::MAX`
    /// - Search helpers stepping past the end of the calendar
    #[error("Date arithmetic out of range near {date} ({offset_days:+} days)")]
    DateOutOfRange { date: NaiveDate, offset_days: i64 },

    /// Rule configuration failed validation.
    #[error("Invalid rule configuration: {0}")]
    InvalidConfig(String),

    /// Rule configuration could not be parsed.
    #[error("Failed to parse rule configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
