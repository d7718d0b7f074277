//! Adapter for biofeedback.reading.v1 payloads
//!
//! Parses single readings, JSON arrays and newline-delimited streams, and
//! builds validation reports for them.

use crate::error::ComputeError;
use crate::schema::raw_reading::{RangeIssue, RawReading};

/// Adapter for parsing raw reading payloads
pub struct ReadingAdapter;

impl ReadingAdapter {
    /// Parse a single reading object
    pub fn parse(json: &str) -> Result<RawReading, ComputeError> {
        serde_json::from_str(json)
            .map_err(|e| ComputeError::ParseError(format!("Failed to parse reading: {}", e)))
    }

    /// Parse a JSON array of readings
    pub fn parse_array(json: &str) -> Result<Vec<RawReading>, ComputeError> {
        serde_json::from_str(json).map_err(ComputeError::JsonError)
    }

    /// Parse newline-delimited JSON readings
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<RawReading>, ComputeError> {
        let mut readings = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<RawReading>(trimmed) {
                Ok(reading) => readings.push(reading),
                Err(e) => {
                    return Err(ComputeError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(readings)
    }

    /// Range-check readings, returning one result per reading with issues
    pub fn validate_readings(readings: &[RawReading]) -> Vec<ValidationResult> {
        readings
            .iter()
            .enumerate()
            .filter_map(|(index, reading)| {
                let issues = reading.check_ranges();
                if issues.is_empty() {
                    None
                } else {
                    Some(ValidationResult {
                        index,
                        device_id: reading.device_id.clone(),
                        issues,
                    })
                }
            })
            .collect()
    }
}

/// Validation result for a single reading
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub index: usize,
    pub device_id: Option<String>,
    pub issues: Vec<RangeIssue>,
}
