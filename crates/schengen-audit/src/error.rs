//! # Audit Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Audit Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Computation   │  │     Performance         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Core           │  │  LatencyBudgetExceeded  │ │
//! │  │  ConfigParse    │  │  RowOutOfBounds │  │                         │ │
//! │  │  Io             │  │  Json           │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A field-level disagreement between expected and reported results is not
//! an error: it is data, returned in `CumulativeCheck::mismatches`.

use schengen_core::CoreError;
use thiserror::Error;

/// Result type alias for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

#[derive(Debug, Error)]
pub enum AuditError {
    // =========================================================================
    // Computation Errors
    // =========================================================================
    /// The compliance engine itself failed.
    #[error("Compliance engine error: {0}")]
    Core(#[from] CoreError),

    /// Requested prefix does not exist.
    #[error("Row {row_index} out of bounds for {len} trips")]
    RowOutOfBounds { row_index: usize, len: usize },

    /// A reported result could not be decoded.
    #[error("Invalid reported result: {0}")]
    Json(#[from] serde_json::Error),

    // =========================================================================
    // Performance Errors
    // =========================================================================
    /// Average per-prefix latency went over budget.
    #[error("Average latency {average_ms:.2}ms exceeds budget of {budget_ms}ms")]
    LatencyBudgetExceeded { average_ms: f64, budget_ms: u64 },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid audit configuration.
    #[error("Invalid audit configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be parsed.
    #[error("Failed to parse audit config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
