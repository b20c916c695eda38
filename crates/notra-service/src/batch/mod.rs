//! Batch orchestration over the provider abstraction.
//!
//! A [`NoteBatch`] is validated, fanned out to the provider with
//! bounded concurrency and a per-item deadline, and reassembled into
//! one [`NoteOutcome`] per item in the original order. A failing item
//! never affects its neighbors; the failure travels in the outcome.

mod orchestrator;
pub mod outcome;
pub mod request;

use std::time::Duration;

use notra_core::{Error, Result};
use serde::{Deserialize, Serialize};
use strum::Display;

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};

pub use orchestrator::BatchOrchestrator;
pub use outcome::{NoteOutcome, ProviderResult};
pub use request::{NoteBatch, NoteRequest};

/// Target for tracing events in this module.
pub const TRACING_TARGET: &str = "notra_service::batch";

/// How note generation surfaces provider failures to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailurePolicy {
    /// Return every outcome, marking failed items in place.
    #[default]
    Partial,
    /// Escalate the first failed item to a call-level error.
    Atomic,
}

/// Configuration for batch processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct BatchConfig {
    /// Maximum number of provider calls in flight per batch.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "batch-max-concurrency",
            env = "BATCH_MAX_CONCURRENCY",
            default_value = "8"
        )
    )]
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Deadline for a single provider call, in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "batch-item-timeout-secs",
            env = "BATCH_ITEM_TIMEOUT_SECS",
            default_value = "30"
        )
    )]
    #[serde(default = "default_item_timeout_secs")]
    pub item_timeout_secs: u64,

    /// How note generation surfaces per-item failures.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "notes-failure-policy",
            env = "NOTES_FAILURE_POLICY",
            value_enum,
            default_value_t = FailurePolicy::Partial
        )
    )]
    #[serde(default)]
    pub notes_failure_policy: FailurePolicy,
}

fn default_max_concurrency() -> usize {
    8
}

fn default_item_timeout_secs() -> u64 {
    30
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            item_timeout_secs: default_item_timeout_secs(),
            notes_failure_policy: FailurePolicy::default(),
        }
    }
}

impl BatchConfig {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 || self.max_concurrency > 64 {
            return Err(Error::configuration()
                .with_message("batch max concurrency must be between 1 and 64"));
        }
        if self.item_timeout_secs == 0 || self.item_timeout_secs > 300 {
            return Err(Error::configuration()
                .with_message("batch item timeout must be between 1 and 300 seconds"));
        }
        Ok(())
    }

    /// Per-item deadline as a [`Duration`].
    pub fn item_timeout(&self) -> Duration {
        Duration::from_secs(self.item_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.item_timeout(), Duration::from_secs(30));
        assert_eq!(config.notes_failure_policy, FailurePolicy::Partial);
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let config = BatchConfig {
            max_concurrency: 0,
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BatchConfig {
            item_timeout_secs: 301,
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_failure_policy_display() {
        assert_eq!(FailurePolicy::Partial.to_string(), "partial");
        assert_eq!(FailurePolicy::Atomic.to_string(), "atomic");
    }
}
