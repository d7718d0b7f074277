//! Reading history
//!
//! This module keeps a fixed-size ring buffer of the most recent readings.
//! The buffer is owned by the caller (normally a `WellnessMonitor`), never by
//! the scorer, so scoring stays a pure function of one reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::normalizer::Normalizer;
use crate::types::{SensorReading, TimedReading};

/// Default number of readings kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 60;

/// Ring buffer of recent readings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingHistory {
    /// Readings, oldest first
    readings: VecDeque<TimedReading>,
    /// Maximum number of readings kept
    capacity: usize,
}

/// Compact view of the history for snapshot payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub count: usize,
    pub capacity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<SensorReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_utc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_utc: Option<String>,
}

impl Default for ReadingHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ReadingHistory {
    /// Create an empty history. A capacity of zero is raised to one so the
    /// latest reading is always retained.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest when full.
    ///
    /// Stored scalars are always finite and non-negative; anything else
    /// reads as zero, as it does for the scorer.
    pub fn push(&mut self, mut reading: TimedReading) {
        reading.reading = Normalizer::normalize(&reading.reading).reading;
        self.readings.push_back(reading);
        self.trim();
    }

    /// The most recently pushed reading (last write wins)
    pub fn latest(&self) -> Option<&TimedReading> {
        self.readings.back()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Readings from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &TimedReading> {
        self.readings.iter()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }

    /// Field-wise mean of the buffered readings
    pub fn average(&self) -> Option<SensorReading> {
        if self.readings.is_empty() {
            return None;
        }

        let n = self.readings.len() as f64;
        let sum = self
            .readings
            .iter()
            .fold(SensorReading::default(), |acc, timed| SensorReading {
                heart_rate_bpm: acc.heart_rate_bpm + timed.reading.heart_rate_bpm,
                skin_temp_c: acc.skin_temp_c + timed.reading.skin_temp_c,
                spo2: acc.spo2 + timed.reading.spo2,
                gsr_raw: acc.gsr_raw + timed.reading.gsr_raw,
            });

        Some(SensorReading {
            heart_rate_bpm: sum.heart_rate_bpm / n,
            skin_temp_c: sum.skin_temp_c / n,
            spo2: sum.spo2 / n,
            gsr_raw: sum.gsr_raw / n,
        })
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            count: self.readings.len(),
            capacity: self.capacity,
            average: self.average(),
            oldest_utc: self.readings.front().map(|r| format_utc(r.received_at)),
            newest_utc: self.readings.back().map(|r| format_utc(r.received_at)),
        }
    }

    /// Load history from JSON, trimming to capacity if the stored buffer is larger
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut history: Self = serde_json::from_str(json)?;
        history.capacity = history.capacity.max(1);
        for timed in history.readings.iter_mut() {
            timed.reading = Normalizer::normalize(&timed.reading).reading;
        }
        history.trim();
        Ok(history)
    }

    /// Serialize history to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Change capacity, dropping the oldest readings if it shrinks
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.trim();
    }

    fn trim(&mut self) {
        while self.readings.len() > self.capacity {
            if let Some(evicted) = self.readings.pop_front() {
                log::debug!(
                    "evicted reading received at {} from history",
                    evicted.received_at
                );
            }
        }
    }
}

fn format_utc(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn timed(hr: f64, offset_secs: i64) -> TimedReading {
        let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        TimedReading::new(
            SensorReading::new(hr, 36.5, 98.0, 200.0),
            base + Duration::seconds(offset_secs),
        )
    }

    #[test]
    fn test_push_and_latest() {
        let mut history = ReadingHistory::new(5);
        assert!(history.latest().is_none());

        history.push(timed(70.0, 0));
        history.push(timed(75.0, 1));

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().reading.heart_rate_bpm, 75.0);
    }

    #[test]
    fn test_push_sanitizes_non_finite_values() {
        let mut history = ReadingHistory::new(4);
        let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        history.push(TimedReading::new(
            SensorReading::new(f64::NAN, f64::INFINITY, -3.0, 100.0),
            base,
        ));
        history.push(timed(80.0, 1));

        assert_eq!(
            history.latest().map(|t| t.reading.heart_rate_bpm),
            Some(80.0)
        );
        let first = history.iter().next().unwrap().reading;
        assert_eq!(first, SensorReading::new(0.0, 0.0, 0.0, 100.0));

        let average = history.average().unwrap();
        assert!((average.heart_rate_bpm - 40.0).abs() < 0.001);

        let restored = ReadingHistory::from_json(&history.to_json().unwrap()).unwrap();
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let mut history = ReadingHistory::new(3);

        for i in 0..5 {
            history.push(timed(60.0 + (i as f64) * 10.0, i)); // 60, 70, 80, 90, 100
        }

        assert_eq!(history.len(), 3);
        let kept: Vec<f64> = history.iter().map(|r| r.reading.heart_rate_bpm).collect();
        assert_eq!(kept, vec![80.0, 90.0, 100.0]);
        // Average of 80, 90, 100 = 90
        assert!((history.average().unwrap().heart_rate_bpm - 90.0).abs() < 0.001);
    }

    #[test]
    fn test_last_write_wins_even_if_older_timestamp() {
        let mut history = ReadingHistory::new(3);
        history.push(timed(70.0, 10));
        history.push(timed(90.0, 5));

        assert_eq!(history.latest().unwrap().reading.heart_rate_bpm, 90.0);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = ReadingHistory::new(0);
        history.push(timed(70.0, 0));
        history.push(timed(80.0, 1));

        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().reading.heart_rate_bpm, 80.0);
    }

    #[test]
    fn test_summary() {
        let mut history = ReadingHistory::new(4);
        assert_eq!(history.summary().count, 0);
        assert!(history.summary().average.is_none());

        history.push(timed(70.0, 0));
        history.push(timed(80.0, 30));
        let summary = history.summary();

        assert_eq!(summary.count, 2);
        assert_eq!(summary.capacity, 4);
        assert_eq!(summary.average.unwrap().heart_rate_bpm, 75.0);
        assert!(summary.oldest_utc.unwrap() < summary.newest_utc.unwrap());
    }

    #[test]
    fn test_serialization() {
        let mut history = ReadingHistory::new(4);
        history.push(timed(70.0, 0));
        history.push(timed(72.0, 1));

        let json = history.to_json().unwrap();
        let loaded = ReadingHistory::from_json(&json).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.capacity(), 4);
        assert_eq!(loaded.latest(), history.latest());
    }

    #[test]
    fn test_from_json_trims_oversized_buffer() {
        let mut history = ReadingHistory::new(4);
        for i in 0..4 {
            history.push(timed(60.0 + i as f64, i));
        }
        let json = history
            .to_json()
            .unwrap()
            .replace("\"capacity\":4", "\"capacity\":2");

        let loaded = ReadingHistory::from_json(&json).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.latest().unwrap().reading.heart_rate_bpm, 63.0);
    }

    #[test]
    fn test_resize() {
        let mut history = ReadingHistory::new(4);
        for i in 0..4 {
            history.push(timed(60.0 + i as f64, i));
        }
        history.resize(2);
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().next().unwrap().reading.heart_rate_bpm, 62.0);
    }
}
