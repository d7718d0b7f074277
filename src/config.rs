//! Monitor configuration
//!
//! Scoring weights and thresholds are fixed constants in `scorer` and
//! `classifier`. What a deployment may tune is how the monitor around the
//! scorer behaves: how many readings it remembers and how quickly a reading
//! goes stale.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ComputeError;
use crate::freshness::{FreshnessWindows, DEFAULT_FRESH_WITHIN_SECS, DEFAULT_STALE_WITHIN_SECS};
use crate::history::DEFAULT_HISTORY_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Ring buffer size for recent readings
    pub history_capacity: usize,
    /// Readings younger than this are fresh (seconds)
    pub fresh_within_secs: i64,
    /// Readings younger than this are stale, older ones outdated (seconds)
    pub stale_within_secs: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            fresh_within_secs: DEFAULT_FRESH_WITHIN_SECS,
            stale_within_secs: DEFAULT_STALE_WITHIN_SECS,
        }
    }
}

impl MonitorConfig {
    /// Parse and validate configuration JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ComputeError> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("loaded monitor config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(self).map_err(ComputeError::JsonError)
    }

    pub fn validate(&self) -> Result<(), ComputeError> {
        if self.history_capacity == 0 {
            return Err(ComputeError::InvalidConfig(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.fresh_within_secs <= 0 {
            return Err(ComputeError::InvalidConfig(
                "fresh_within_secs must be positive".to_string(),
            ));
        }
        if self.stale_within_secs <= self.fresh_within_secs {
            return Err(ComputeError::InvalidConfig(format!(
                "stale_within_secs ({}) must exceed fresh_within_secs ({})",
                self.stale_within_secs, self.fresh_within_secs
            )));
        }
        Ok(())
    }

    pub fn freshness_windows(&self) -> FreshnessWindows {
        FreshnessWindows {
            fresh_within_secs: self.fresh_within_secs,
            stale_within_secs: self.stale_within_secs,
        }
    }
}
