//! Reading normalization
//!
//! This module sanitizes raw sensor readings before scoring.
//! - Non-finite and negative scalars collapse to 0 (treated as missing)
//! - GSR converted to a 0-100 percentage of the ADC full scale

use crate::types::{NormalizedReading, SensorReading};

/// Full-scale value of the 10-bit GSR ADC
pub const GSR_FULL_SCALE: f64 = 1023.0;

/// Normalizer for converting sensor readings to normalized readings
pub struct Normalizer;

impl Normalizer {
    /// Normalize a sensor reading
    pub fn normalize(reading: &SensorReading) -> NormalizedReading {
        let sanitized = SensorReading {
            heart_rate_bpm: sanitize(reading.heart_rate_bpm),
            skin_temp_c: sanitize(reading.skin_temp_c),
            spo2: sanitize(reading.spo2),
            gsr_raw: sanitize(reading.gsr_raw),
        };

        NormalizedReading {
            gsr_pct: gsr_percentage(sanitized.gsr_raw),
            reading: sanitized,
        }
    }
}

/// Missing, garbled or negative values read as zero
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// GSR as a percentage of full scale, clamped to 0-100
fn gsr_percentage(gsr_raw: f64) -> f64 {
    (gsr_raw / GSR_FULL_SCALE * 100.0).clamp(0.0, 100.0)
}
