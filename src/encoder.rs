//! Snapshot encoding
//!
//! This module assembles `WellnessSnapshot` payloads from the latest reading,
//! its freshness and the history, and serializes them to JSON. Outdated
//! readings yield a snapshot without a score so the UI renders placeholders.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ComputeError;
use crate::freshness::{Freshness, FreshnessWindows};
use crate::history::ReadingHistory;
use crate::scorer;
use crate::types::{SnapshotProducer, WellnessSnapshot};
use crate::{MINDPULSE_VERSION, PRODUCER_NAME};

/// Current snapshot schema version
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Snapshot encoder for producing versioned JSON payloads
pub struct SnapshotEncoder {
    instance_id: String,
}

impl Default for SnapshotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Build a snapshot of the history's latest reading as seen at `now`
    pub fn encode(
        &self,
        history: &ReadingHistory,
        windows: &FreshnessWindows,
        now: DateTime<Utc>,
    ) -> WellnessSnapshot {
        let latest = history.latest();
        let received_at = latest.map(|timed| timed.received_at);
        let freshness = Freshness::classify(received_at, now, windows);

        let score = match latest {
            Some(timed) if freshness.shows_score() => Some(scorer::score(&timed.reading)),
            _ => None,
        };

        WellnessSnapshot {
            snapshot_version: SNAPSHOT_VERSION.to_string(),
            producer: SnapshotProducer {
                name: PRODUCER_NAME.to_string(),
                version: MINDPULSE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: now.to_rfc3339(),
            received_at_utc: received_at.map(|at| at.to_rfc3339()),
            measured_at_utc: latest
                .and_then(|timed| timed.measured_at)
                .map(|at| at.to_rfc3339()),
            freshness,
            age_sec: received_at.map(|at| (now - at).num_seconds().max(0)),
            trusted: latest.is_some() && freshness.is_trusted(),
            reading: latest.map(|timed| timed.reading),
            score,
            history: history.summary(),
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        history: &ReadingHistory,
        windows: &FreshnessWindows,
        now: DateTime<Utc>,
    ) -> Result<String, ComputeError> {
        let snapshot = self.encode(history, windows, now);
        serde_json::to_string(&snapshot).map_err(ComputeError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SensorReading, TimedReading};
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn history_with(reading: SensorReading) -> ReadingHistory {
        let mut history = ReadingHistory::new(8);
        history.push(TimedReading::new(reading, base()));
        history
    }

    #[test]
    fn test_encode_fresh_snapshot() {
        let history = history_with(SensorReading::new(72.0, 36.5, 98.0, 100.0));
        let encoder = SnapshotEncoder::with_instance_id("test-instance".to_string());
        let snapshot = encoder.encode(
            &history,
            &FreshnessWindows::default(),
            base() + Duration::seconds(5),
        );

        assert_eq!(snapshot.snapshot_version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.producer.name, PRODUCER_NAME);
        assert_eq!(snapshot.producer.version, MINDPULSE_VERSION);
        assert_eq!(snapshot.producer.instance_id, "test-instance");

        assert_eq!(snapshot.freshness, Freshness::Fresh);
        assert_eq!(snapshot.age_sec, Some(5));
        assert!(snapshot.trusted);
        assert!(snapshot.score.is_some());
        assert_eq!(snapshot.history.count, 1);
    }

    #[test]
    fn test_stale_snapshot_is_untrusted() {
        let history = history_with(SensorReading::new(72.0, 36.5, 98.0, 100.0));
        let snapshot = SnapshotEncoder::new().encode(
            &history,
            &FreshnessWindows::default(),
            base() + Duration::seconds(60),
        );

        assert_eq!(snapshot.freshness, Freshness::Stale);
        assert!(!snapshot.trusted);
        assert!(snapshot.score.is_some());
    }

    #[test]
    fn test_outdated_snapshot_hides_score() {
        let history = history_with(SensorReading::new(72.0, 36.5, 98.0, 100.0));
        let snapshot = SnapshotEncoder::new().encode(
            &history,
            &FreshnessWindows::default(),
            base() + Duration::minutes(5),
        );

        assert_eq!(snapshot.freshness, Freshness::Outdated);
        assert!(!snapshot.trusted);
        assert!(snapshot.score.is_none());
        // The reading itself is still reported
        assert!(snapshot.reading.is_some());
    }

    #[test]
    fn test_empty_history() {
        let history = ReadingHistory::new(8);
        let snapshot = SnapshotEncoder::new().encode(&history, &FreshnessWindows::default(), base());

        assert_eq!(snapshot.freshness, Freshness::Outdated);
        assert!(snapshot.reading.is_none());
        assert!(snapshot.received_at_utc.is_none());
        assert!(snapshot.age_sec.is_none());
    }

    #[test]
    fn test_encode_to_json() {
        let history = history_with(SensorReading::new(110.0, 36.5, 98.0, 900.0));
        let json = SnapshotEncoder::new()
            .encode_to_json(&history, &FreshnessWindows::default(), base())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["freshness"], "fresh");
        assert_eq!(parsed["score"]["categories"]["stress"], "Tinggi");
        assert_eq!(parsed["score"]["categories"]["anxiety"], "Tinggi");
        assert!(parsed["score"]["recommendations"]
            .as_array()
            .unwrap()
            .contains(&serde_json::Value::from("breathing_exercise")));
        assert!(parsed.get("producer").is_some());
        assert!(parsed.get("history").is_some());
    }
}
