//! # Rule Configuration
//!
//! Parameters of the 90/180 rule and of the search helpers.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where configuration comes from                       │
//! │                                                                         │
//! │  1. Explicit value passed by the caller (highest priority)             │
//! │     ComplianceCalculator::new(RuleConfig { .. })                        │
//! │                                                                         │
//! │  2. TOML text supplied by the host                                     │
//! │     RuleConfig::from_toml_str(..)  (this crate never opens files)      │
//! │                                                                         │
//! │  3. Default values (lowest priority)                                   │
//! │     90 days in any 180-day window                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration Format
//! ```toml
//! maxDaysInWindow = 90
//! windowDays = 180
//! sanityPastYears = 20
//! sanityFutureYears = 10
//!
//! [overlap]
//! allowSameDayTravel = true
//! allowBorderTransitions = false
//! strictMode = false
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Rule Configuration
// =============================================================================

/// Limits of the rolling-window rule plus the sanity bounds used when
/// screening trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    /// Maximum days allowed inside any window (90).
    #[serde(default = "default_max_days")]
    pub max_days_in_window: u32,

    /// Length of the trailing window, reference day included (180).
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Trips ending further back than this are rejected outright.
    #[serde(default = "default_sanity_past_years")]
    pub sanity_past_years: u32,

    /// Trips starting further ahead than this are rejected outright.
    #[serde(default = "default_sanity_future_years")]
    pub sanity_future_years: u32,

    /// Trips ending further back than this get a stale-date warning.
    #[serde(default = "default_stale_warning_years")]
    pub stale_warning_years: u32,

    /// Trips starting further ahead than this get a far-future warning.
    #[serde(default = "default_future_warning_years")]
    pub future_warning_years: u32,

    /// Iteration cap for the planning searches.
    #[serde(default = "default_max_search_iterations")]
    pub max_search_iterations: u32,

    /// Horizon for the forward free-range search.
    #[serde(default = "default_search_horizon_days")]
    pub search_horizon_days: u32,

    /// How far before a conflict alternative dates are searched.
    #[serde(default = "default_suggestion_lookback_days")]
    pub suggestion_lookback_days: u32,

    /// Maximum number of alternative ranges suggested.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Conflict policy for date-range checks.
    #[serde(default)]
    pub overlap: OverlapOptions,
}

fn default_max_days() -> u32 {
    crate::MAX_DAYS_IN_WINDOW
}

fn default_window_days() -> u32 {
    crate::WINDOW_DAYS
}

fn default_sanity_past_years() -> u32 {
    20
}

fn default_sanity_future_years() -> u32 {
    10
}

fn default_stale_warning_years() -> u32 {
    5
}

fn default_future_warning_years() -> u32 {
    2
}

fn default_max_search_iterations() -> u32 {
    100
}

fn default_search_horizon_days() -> u32 {
    365
}

fn default_suggestion_lookback_days() -> u32 {
    30
}

fn default_max_suggestions() -> usize {
    3
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            max_days_in_window: default_max_days(),
            window_days: default_window_days(),
            sanity_past_years: default_sanity_past_years(),
            sanity_future_years: default_sanity_future_years(),
            stale_warning_years: default_stale_warning_years(),
            future_warning_years: default_future_warning_years(),
            max_search_iterations: default_max_search_iterations(),
            search_horizon_days: default_search_horizon_days(),
            suggestion_lookback_days: default_suggestion_lookback_days(),
            max_suggestions: default_max_suggestions(),
            overlap: OverlapOptions::default(),
        }
    }
}

impl RuleConfig {
    /// Parses a configuration from TOML text and validates it.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_toml_str(contents: &str) -> CoreResult<Self> {
        let config: RuleConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_days_in_window == 0 {
            return Err(CoreError::InvalidConfig(
                "max_days_in_window must be greater than 0".into(),
            ));
        }

        if self.window_days < self.max_days_in_window {
            return Err(CoreError::InvalidConfig(format!(
                "window_days ({}) must be at least max_days_in_window ({})",
                self.window_days, self.max_days_in_window
            )));
        }

        if self.stale_warning_years > self.sanity_past_years {
            return Err(CoreError::InvalidConfig(
                "stale_warning_years cannot exceed sanity_past_years".into(),
            ));
        }

        if self.future_warning_years > self.sanity_future_years {
            return Err(CoreError::InvalidConfig(
                "future_warning_years cannot exceed sanity_future_years".into(),
            ));
        }

        if self.max_search_iterations == 0 {
            return Err(CoreError::InvalidConfig(
                "max_search_iterations must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Days before the reference day that still belong to its window.
    #[inline]
    pub fn window_lookback(&self) -> i64 {
        i64::from(self.window_days) - 1
    }
}

// =============================================================================
// Overlap Options
// =============================================================================

/// Which overlaps between a candidate range and an existing trip count as
/// conflicts.
///
/// ## Policy Matrix
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Overlap                         │ default │ border ok │ strict        │
/// │  ────────────────────────────────┼─────────┼───────────┼────────────── │
/// │  starts the day another ends     │ allowed │ allowed   │ conflict      │
/// │  any other 1-day overlap         │ conflict│ allowed   │ conflict      │
/// │  overlap of 2+ days              │ conflict│ conflict  │ conflict      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OverlapOptions {
    /// A range may start on the day another ends (or end on the day
    /// another starts): a same-day border crossing.
    #[serde(default = "default_true")]
    pub allow_same_day_travel: bool,

    /// Any overlap of a single day is a transition, not a conflict.
    #[serde(default)]
    pub allow_border_transitions: bool,

    /// Report every overlap; overrides both flags above.
    #[serde(default)]
    pub strict_mode: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OverlapOptions {
    fn default() -> Self {
        OverlapOptions {
            allow_same_day_travel: true,
            allow_border_transitions: false,
            strict_mode: false,
        }
    }
}

impl OverlapOptions {
    /// Options that report every overlap.
    pub fn strict() -> Self {
        OverlapOptions {
            strict_mode: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuleConfig::default();
        assert_eq!(config.max_days_in_window, 90);
        assert_eq!(config.window_days, 180);
        assert_eq!(config.window_lookback(), 179);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = RuleConfig::from_toml_str(
            r#"
            maxSearchIterations = 50

            [overlap]
            strictMode = true
            "#,
        )
        .unwrap();
        assert_eq!(config.max_search_iterations, 50);
        assert_eq!(config.max_days_in_window, 90);
        assert!(config.overlap.strict_mode);
        assert!(config.overlap.allow_same_day_travel);
    }

    #[test]
    fn test_from_toml_rejects_bad_window() {
        let err = RuleConfig::from_toml_str("windowDays = 30").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        let err = RuleConfig::from_toml_str("windowDays = \"many\"").unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse(_)));
    }
}
