//! biofeedback.reading.v1 schema definition
//!
//! The shape a sensor device pushes for every tick. Field names follow the
//! canonical snake_case form; the camelCase names used by the device firmware
//! are accepted as aliases. Every numeric field is optional and reads as zero
//! when missing, so a partial tick still scores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{SensorReading, TimedReading};

/// Current schema version
pub const SCHEMA_VERSION: &str = "biofeedback.reading.v1";

/// Plausible heart rate range (bpm)
pub const HEART_RATE_RANGE: (f64, f64) = (30.0, 220.0);
/// Plausible skin temperature range (celsius)
pub const SKIN_TEMP_RANGE: (f64, f64) = (30.0, 43.0);
/// Plausible SpO2 range (percentage)
pub const SPO2_RANGE: (f64, f64) = (70.0, 100.0);
/// GSR ADC range
pub const GSR_RANGE: (f64, f64) = (0.0, 1023.0);

/// One raw sensor tick as received from a device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Heart rate (bpm)
    #[serde(default, alias = "heartRate", alias = "bpm")]
    pub heart_rate_bpm: Option<f64>,
    /// Skin temperature (celsius)
    #[serde(default, alias = "temperature", alias = "temp")]
    pub skin_temp_c: Option<f64>,
    /// Blood oxygen proxy (percentage)
    #[serde(default)]
    pub spo2: Option<f64>,
    /// Raw GSR ADC value
    #[serde(default, alias = "gsr")]
    pub gsr_raw: Option<f64>,
    /// When the device took the reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Device identifier
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "deviceId")]
    pub device_id: Option<String>,
}

/// Non-fatal plausibility issue in a raw reading.
///
/// The scorer accepts any numeric input; these only feed validation reports.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeIssue {
    Missing(&'static str),
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl fmt::Display for RangeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeIssue::Missing(field) => write!(f, "Missing field: {}", field),
            RangeIssue::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "{} value {} outside plausible range {}-{}",
                field, value, min, max
            ),
        }
    }
}

impl RawReading {
    /// Convert to a sensor reading; missing values read as zero
    pub fn to_reading(&self) -> SensorReading {
        SensorReading {
            heart_rate_bpm: self.heart_rate_bpm.unwrap_or(0.0),
            skin_temp_c: self.skin_temp_c.unwrap_or(0.0),
            spo2: self.spo2.unwrap_or(0.0),
            gsr_raw: self.gsr_raw.unwrap_or(0.0),
        }
    }

    /// Pair with the host receipt time; the device timestamp is kept as the
    /// measurement time and never drives freshness
    pub fn to_timed(&self, received_at: DateTime<Utc>) -> TimedReading {
        TimedReading::new(self.to_reading(), received_at).with_measured_at(self.timestamp)
    }

    /// Report missing or implausible values
    pub fn check_ranges(&self) -> Vec<RangeIssue> {
        let fields = [
            ("heart_rate_bpm", self.heart_rate_bpm, HEART_RATE_RANGE),
            ("skin_temp_c", self.skin_temp_c, SKIN_TEMP_RANGE),
            ("spo2", self.spo2, SPO2_RANGE),
            ("gsr_raw", self.gsr_raw, GSR_RANGE),
        ];

        let mut issues = Vec::new();
        for (field, value, (min, max)) in fields {
            match value {
                None => issues.push(RangeIssue::Missing(field)),
                Some(value) if value < min || value > max => {
                    issues.push(RangeIssue::OutOfRange {
                        field,
                        value,
                        min,
                        max,
                    })
                }
                Some(_) => {}
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_canonical_fields() {
        let json = r#"{
            "heart_rate_bpm": 72,
            "skin_temp_c": 36.5,
            "spo2": 98,
            "gsr_raw": 100,
            "timestamp": "2024-01-15T08:00:00Z",
            "device_id": "band-01"
        }"#;
        let raw: RawReading = serde_json::from_str(json).unwrap();

        assert_eq!(raw.to_reading(), SensorReading::new(72.0, 36.5, 98.0, 100.0));
        assert_eq!(raw.device_id.as_deref(), Some("band-01"));
        assert!(raw.timestamp.is_some());
        assert!(raw.check_ranges().is_empty());
    }

    #[test]
    fn test_deserialize_device_aliases() {
        let json = r#"{"heartRate": 80, "temperature": 36.9, "spo2": 97, "gsr": 420}"#;
        let raw: RawReading = serde_json::from_str(json).unwrap();
        assert_eq!(raw.to_reading(), SensorReading::new(80.0, 36.9, 97.0, 420.0));

        let json = r#"{"bpm": 65, "temp": 36.1}"#;
        let raw: RawReading = serde_json::from_str(json).unwrap();
        assert_eq!(raw.heart_rate_bpm, Some(65.0));
        assert_eq!(raw.skin_temp_c, Some(36.1));
    }

    #[test]
    fn test_misspelled_heart_rate_is_ignored() {
        // "bmp" is a known firmware typo; it must not be read as heart rate
        let raw: RawReading = serde_json::from_str(r#"{"bmp": 90, "gsr": 10}"#).unwrap();
        assert_eq!(raw.heart_rate_bpm, None);
        assert_eq!(raw.to_reading().heart_rate_bpm, 0.0);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let raw: RawReading = serde_json::from_str("{}").unwrap();
        assert_eq!(raw.to_reading(), SensorReading::default());
        assert_eq!(raw.check_ranges().len(), 4);
        assert_eq!(raw.check_ranges()[0], RangeIssue::Missing("heart_rate_bpm"));
    }

    #[test]
    fn test_range_issue_display() {
        assert_eq!(
            RangeIssue::Missing("spo2").to_string(),
            "Missing field: spo2"
        );
        let issue = RangeIssue::OutOfRange {
            field: "heart_rate_bpm",
            value: 250.0,
            min: 30.0,
            max: 220.0,
        };
        assert_eq!(
            issue.to_string(),
            "heart_rate_bpm value 250 outside plausible range 30-220"
        );
    }

    #[test]
    fn test_null_fields_are_missing() {
        let raw: RawReading =
            serde_json::from_str(r#"{"heart_rate_bpm": null, "gsr_raw": 12}"#).unwrap();
        assert_eq!(raw.heart_rate_bpm, None);
        assert_eq!(raw.gsr_raw, Some(12.0));
    }

    #[test]
    fn test_out_of_range_reported() {
        let raw = RawReading {
            heart_rate_bpm: Some(250.0),
            skin_temp_c: Some(36.5),
            spo2: Some(98.0),
            gsr_raw: Some(2000.0),
            ..Default::default()
        };
        let issues = raw.check_ranges();

        assert_eq!(issues.len(), 2);
        assert!(matches!(
            issues[0],
            RangeIssue::OutOfRange {
                field: "heart_rate_bpm",
                ..
            }
        ));
        assert!(issues[1].to_string().contains("gsr_raw"));
    }

    #[test]
    fn test_to_timed_without_device_timestamp() {
        let received_at = Utc::now();
        let raw = RawReading {
            heart_rate_bpm: Some(70.0),
            ..Default::default()
        };
        let timed = raw.to_timed(received_at);
        assert_eq!(timed.received_at, received_at);
        assert_eq!(timed.measured_at, None);
    }

    #[test]
    fn test_to_timed_keeps_receipt_time_over_device_clock() {
        let received_at = Utc::now();
        let device_time: DateTime<Utc> = "2023-01-01T00:00:00Z".parse().unwrap();
        let raw = RawReading {
            heart_rate_bpm: Some(70.0),
            timestamp: Some(device_time),
            ..Default::default()
        };
        let timed = raw.to_timed(received_at);
        assert_eq!(timed.received_at, received_at);
        assert_eq!(timed.measured_at, Some(device_time));
    }
}
