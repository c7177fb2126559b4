//! # Audit Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SCHENGEN_LATENCY_BUDGET_MS=30                                      │
//! │     SCHENGEN_ADVERSARIAL_BUDGET_MS=100                                 │
//! │                                                                         │
//! │  2. TOML Config File (path given by the host)                          │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! latencyBudgetMs = 30
//! adversarialBudgetMs = 100
//! adversarialTripThreshold = 15
//! rollingGapDays = 180
//!
//! [rules]
//! maxDaysInWindow = 90
//! windowDays = 180
//! ```

use std::path::Path;

use schengen_core::RuleConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AuditError, AuditResult};

const ENV_LATENCY_BUDGET: &str = "SCHENGEN_LATENCY_BUDGET_MS";
const ENV_ADVERSARIAL_BUDGET: &str = "SCHENGEN_ADVERSARIAL_BUDGET_MS";

/// Settings for cross-validation and benchmarking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditConfig {
    /// Average per-call budget for typical histories.
    #[serde(default = "default_latency_budget")]
    pub latency_budget_ms: u64,

    /// Average per-call budget for long, overlapping, multi-year histories.
    #[serde(default = "default_adversarial_budget")]
    pub adversarial_budget_ms: u64,

    /// Histories with more trips than this use the adversarial budget.
    #[serde(default = "default_adversarial_threshold")]
    pub adversarial_trip_threshold: usize,

    /// Reference dates closer than this are compared by the sequence check.
    #[serde(default = "default_rolling_gap")]
    pub rolling_gap_days: i64,

    /// Rule the audited results were computed with.
    #[serde(default)]
    pub rules: RuleConfig,
}

fn default_latency_budget() -> u64 {
    30
}

fn default_adversarial_budget() -> u64 {
    100
}

fn default_adversarial_threshold() -> usize {
    15
}

fn default_rolling_gap() -> i64 {
    180
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            latency_budget_ms: default_latency_budget(),
            adversarial_budget_ms: default_adversarial_budget(),
            adversarial_trip_threshold: default_adversarial_threshold(),
            rolling_gap_days: default_rolling_gap(),
            rules: RuleConfig::default(),
        }
    }
}

impl AuditConfig {
    /// Parses and validates TOML text.
    pub fn from_toml_str(contents: &str) -> AuditResult<Self> {
        let config: AuditConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file, when `path` is given and exists
    /// 3. Environment variables
    pub fn load(path: Option<&Path>) -> AuditResult<Self> {
        let mut config = Self::default();

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading audit config from file");
                let contents = std::fs::read_to_string(path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Audit config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("Failed to load audit config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AuditResult<()> {
        if self.latency_budget_ms == 0 {
            return Err(AuditError::InvalidConfig(
                "latencyBudgetMs must be greater than 0".into(),
            ));
        }

        if self.adversarial_budget_ms < self.latency_budget_ms {
            return Err(AuditError::InvalidConfig(format!(
                "adversarialBudgetMs ({}) must be at least latencyBudgetMs ({})",
                self.adversarial_budget_ms, self.latency_budget_ms
            )));
        }

        if self.rolling_gap_days <= 0 {
            return Err(AuditError::InvalidConfig(
                "rollingGapDays must be positive".into(),
            ));
        }

        self.rules.validate()?;
        Ok(())
    }

    /// Budget that applies to a history of `trip_count` trips.
    pub fn budget_for(&self, trip_count: usize) -> u64 {
        if trip_count > self.adversarial_trip_threshold {
            self.adversarial_budget_ms
        } else {
            self.latency_budget_ms
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(ENV_LATENCY_BUDGET) {
            match value.parse::<u64>() {
                Ok(ms) => {
                    debug!(budget_ms = ms, "Overriding latency budget from environment");
                    self.latency_budget_ms = ms;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid {}", ENV_LATENCY_BUDGET),
            }
        }

        if let Ok(value) = std::env::var(ENV_ADVERSARIAL_BUDGET) {
            match value.parse::<u64>() {
                Ok(ms) => {
                    debug!(budget_ms = ms, "Overriding adversarial budget from environment");
                    self.adversarial_budget_ms = ms;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid {}", ENV_ADVERSARIAL_BUDGET),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert_eq!(config.latency_budget_ms, 30);
        assert_eq!(config.budget_for(15), 30);
        assert_eq!(config.budget_for(16), 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = AuditConfig::from_toml_str(
            r#"
            latencyBudgetMs = 20

            [rules]
            maxSearchIterations = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.latency_budget_ms, 20);
        assert_eq!(config.adversarial_budget_ms, 100);
        assert_eq!(config.rules.max_search_iterations, 40);
    }

    #[test]
    fn test_validation_rejects_inverted_budgets() {
        let err = AuditConfig::from_toml_str("latencyBudgetMs = 200").unwrap_err();
        assert!(matches!(err, AuditError::InvalidConfig(_)));

        let err = AuditConfig::from_toml_str("[rules]\nwindowDays = 10").unwrap_err();
        assert!(matches!(err, AuditError::Core(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults_and_env() {
        std::env::set_var(ENV_ADVERSARIAL_BUDGET, "150");
        let path = Path::new("/nonexistent/schengen-audit.toml");
        let config = AuditConfig::load(Some(path)).unwrap();
        std::env::remove_var(ENV_ADVERSARIAL_BUDGET);

        assert_eq!(config.adversarial_budget_ms, 150);
        assert_eq!(config.latency_budget_ms, 30);
    }
}
