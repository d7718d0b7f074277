//! Pipeline orchestration
//!
//! This module provides the public API for Mindpulse.
//! It orchestrates the flow from raw reading JSON to scores and snapshots.

use chrono::{DateTime, Utc};

use crate::config::MonitorConfig;
use crate::encoder::SnapshotEncoder;
use crate::error::ComputeError;
use crate::freshness::FreshnessWindows;
use crate::history::ReadingHistory;
use crate::schema::ReadingAdapter;
use crate::scorer;
use crate::types::{SensorReading, TimedReading, WellnessSnapshot};

/// Score one raw reading JSON and return the wellness score as JSON.
///
/// # Arguments
/// * `raw_json` - A single biofeedback.reading.v1 object
///
/// # Returns
/// WellnessScore JSON
///
/// # Example
/// ```ignore
/// let score_json = score_reading_json(
///     r#"{"heartRate": 72, "temperature": 36.5, "spo2": 98, "gsr": 100}"#.to_string()
/// )?;
/// ```
pub fn score_reading_json(raw_json: String) -> Result<String, ComputeError> {
    let raw = ReadingAdapter::parse(&raw_json)?;
    let score = scorer::score(&raw.to_reading());
    serde_json::to_string(&score).map_err(ComputeError::JsonError)
}

/// Stateful monitor holding the latest readings.
///
/// Feed it every reading as it arrives; ask it for a snapshot whenever the UI
/// refreshes. The monitor owns the ring buffer, the scorer stays pure.
pub struct WellnessMonitor {
    config: MonitorConfig,
    history: ReadingHistory,
    encoder: SnapshotEncoder,
}

impl Default for WellnessMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl WellnessMonitor {
    /// Create a new monitor with default settings
    pub fn new() -> Self {
        Self::build(MonitorConfig::default())
    }

    /// Create a monitor with explicit settings, rejecting invalid ones
    pub fn with_config(config: MonitorConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MonitorConfig) -> Self {
        Self {
            history: ReadingHistory::new(config.history_capacity),
            encoder: SnapshotEncoder::new(),
            config,
        }
    }

    /// Replace the snapshot encoder (e.g. to pin the instance ID)
    pub fn with_encoder(mut self, encoder: SnapshotEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn history(&self) -> &ReadingHistory {
        &self.history
    }

    fn windows(&self) -> FreshnessWindows {
        self.config.freshness_windows()
    }

    /// Record a reading received at `received_at` and snapshot it
    pub fn ingest(
        &mut self,
        reading: SensorReading,
        received_at: DateTime<Utc>,
    ) -> WellnessSnapshot {
        self.record(TimedReading::new(reading, received_at))
    }

    /// Parse and record a raw reading JSON received at `received_at`.
    ///
    /// Freshness always runs from `received_at`. A device `timestamp` is
    /// reported as the measurement time only.
    pub fn ingest_json(
        &mut self,
        raw_json: &str,
        received_at: DateTime<Utc>,
    ) -> Result<WellnessSnapshot, ComputeError> {
        let raw = ReadingAdapter::parse(raw_json)?;
        let issues = raw.check_ranges();
        if !issues.is_empty() {
            log::warn!("reading has {} range issue(s): {}", issues.len(), issues[0]);
        }
        Ok(self.record(raw.to_timed(received_at)))
    }

    fn record(&mut self, timed: TimedReading) -> WellnessSnapshot {
        let received_at = timed.received_at;
        self.history.push(timed);
        log::debug!(
            "ingested reading (hr={}, gsr={}), history size {}",
            timed.reading.heart_rate_bpm,
            timed.reading.gsr_raw,
            self.history.len()
        );
        self.encoder.encode(&self.history, &self.windows(), received_at)
    }

    /// Snapshot the latest reading as seen at `now`, without a new reading
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> WellnessSnapshot {
        self.encoder.encode(&self.history, &self.windows(), now)
    }

    /// Snapshot the latest reading as seen right now
    pub fn snapshot(&self) -> WellnessSnapshot {
        self.snapshot_at(Utc::now())
    }

    /// Load history state from JSON; it is resized to the configured capacity
    pub fn load_history(&mut self, json: &str) -> Result<(), ComputeError> {
        let mut history =
            ReadingHistory::from_json(json).map_err(|e| ComputeError::ParseError(e.to_string()))?;
        history.resize(self.config.history_capacity);
        log::info!("loaded {} reading(s) into history", history.len());
        self.history = history;
        Ok(())
    }

    /// Save history state to JSON
    pub fn save_history(&self) -> Result<String, ComputeError> {
        self.history
            .to_json()
            .map_err(|e| ComputeError::EncodingError(e.to_string()))
    }
}
