//! # schengen-audit: Cross-Validation and Latency Checks
//!
//! Guards the compliance engine against drift between code paths. Every
//! chronological prefix of a history is recomputed and compared with what a
//! consumer reported for it. Totals are checked for unexplained drops, and
//! the recomputation is timed against a budget.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  trips ──► sort by start ──► prefix 0..n                                │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                    schengen-core calculator (reference = last end)      │
//! │                                   │                                     │
//! │          ┌────────────────────────┼─────────────────────────┐           │
//! │          ▼                        ▼                         ▼           │
//! │   field-level diff        decrease detection         timing vs budget   │
//! │   (CumulativeCheck)       (SequenceReport)           (BenchmarkReport)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use schengen_audit::{validate_cumulative, ReportedCompliance};
//! use schengen_core::Trip;
//!
//! let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
//! let trips = vec![
//!     Trip::new("FR", d(1, 1), d(1, 30)),
//!     Trip::new("DE", d(1, 31), d(2, 28)),
//! ];
//!
//! let reported = ReportedCompliance::from_json(
//!     r#"{"totalDaysUsed":59,"daysRemaining":31,"isCompliant":true,"overstayDays":0}"#,
//! )
//! .unwrap();
//!
//! let check = validate_cumulative(&trips, 1, Some(&reported)).unwrap();
//! assert!(check.is_consistent());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod benchmark;
pub mod config;
pub mod cumulative;
pub mod error;
pub mod sequence;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use benchmark::{benchmark_performance, BenchmarkReport, PrefixTiming};
pub use config::AuditConfig;
pub use cumulative::{
    validate_all_prefixes, validate_cumulative, CrossValidator, CumulativeCheck, FieldMismatch,
    ReportedCompliance,
};
pub use error::{AuditError, AuditResult};
pub use sequence::{detect_anomalies, validate_sequence, SequenceAnomaly, SequenceReport};
