//! Reading freshness
//!
//! Sensor readings arrive as a stream of snapshots. Between ticks the latest
//! reading ages, and past a point its score should no longer be trusted or
//! even shown. Freshness captures that as a tri-state derived from the time
//! elapsed since the reading was received.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default age below which a reading is fresh (seconds)
pub const DEFAULT_FRESH_WITHIN_SECS: i64 = 30;

/// Default age below which a reading is stale rather than outdated (seconds)
pub const DEFAULT_STALE_WITHIN_SECS: i64 = 120;

/// Age windows separating fresh, stale and outdated readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessWindows {
    pub fresh_within_secs: i64,
    pub stale_within_secs: i64,
}

impl Default for FreshnessWindows {
    fn default() -> Self {
        Self {
            fresh_within_secs: DEFAULT_FRESH_WITHIN_SECS,
            stale_within_secs: DEFAULT_STALE_WITHIN_SECS,
        }
    }
}

/// Freshness of the latest reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Score can be trusted
    Fresh,
    /// Score is shown but flagged as untrusted
    Stale,
    /// Score is replaced by placeholders
    Outdated,
}

impl Freshness {
    /// Classify an elapsed duration.
    ///
    /// Negative durations (reading stamped slightly in the future by a skewed
    /// device clock) count as zero.
    pub fn from_elapsed(elapsed: Duration, windows: &FreshnessWindows) -> Self {
        let secs = elapsed.num_milliseconds().max(0) as f64 / 1000.0;

        if secs < windows.fresh_within_secs as f64 {
            Freshness::Fresh
        } else if secs < windows.stale_within_secs as f64 {
            Freshness::Stale
        } else {
            Freshness::Outdated
        }
    }

    /// Classify the reading received at `received_at`, as seen at `now`.
    /// No reading at all is outdated.
    pub fn classify(
        received_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        windows: &FreshnessWindows,
    ) -> Self {
        match received_at {
            Some(received_at) => Self::from_elapsed(now - received_at, windows),
            None => Freshness::Outdated,
        }
    }

    pub fn is_trusted(&self) -> bool {
        matches!(self, Freshness::Fresh)
    }

    pub fn shows_score(&self) -> bool {
        !matches!(self, Freshness::Outdated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Fresh => "fresh",
            Freshness::Stale => "stale",
            Freshness::Outdated => "outdated",
        }
    }
}
