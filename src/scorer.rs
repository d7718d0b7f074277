//! Biofeedback heuristic scoring
//!
//! Derives five wellness axes from one sensor reading through fixed linear
//! combinations and threshold checks:
//! - Stress and anxiety from GSR, heart-rate excess and fever
//! - Energy from activity/comfort bands, reduced by GSR
//! - Focus from GSR, stress and a calm heart-rate band
//! - Mood from GSR, heart-rate excess and comfortable temperature
//!
//! The weights and thresholds below are tuning knobs, not clinical values.
//! Scoring is total: every axis is clamped to [1, 10] and invalid inputs are
//! zeroed by the normalizer before any arithmetic runs.

use crate::classifier::{classify, LOW_CUT};
use crate::insights;
use crate::normalizer::Normalizer;
use crate::types::{
    NormalizedReading, OverallStatus, SensorReading, WellnessAxes, WellnessScore,
};

/// Lowest value any axis can take
pub const MIN_SCORE: f64 = 1.0;
/// Highest value any axis can take
pub const MAX_SCORE: f64 = 10.0;

/// Heart rate above which stress and mood are penalized (bpm)
pub const RESTING_HR_BPM: f64 = 80.0;
/// Heart rate above which anxiety is penalized (bpm)
pub const ANXIETY_HR_BPM: f64 = 90.0;
/// Heart rate reported as elevated (bpm)
pub const TACHYCARDIA_BPM: f64 = 100.0;
/// Skin temperature treated as fever (celsius)
pub const FEVER_TEMP_C: f64 = 37.5;
/// SpO2 below this is reported as low (percentage)
pub const LOW_SPO2_PCT: f64 = 95.0;

/// Heart-rate band for normal activity (bpm, inclusive)
pub const ACTIVE_HR_BAND: (f64, f64) = (60.0, 100.0);
/// Heart-rate band considered calm (bpm, inclusive)
pub const CALM_HR_BAND: (f64, f64) = (55.0, 85.0);
/// Comfortable skin-temperature band (celsius, inclusive)
pub const COMFORT_TEMP_BAND: (f64, f64) = (36.0, 37.2);

const STRESS_BASE: f64 = 1.0;
const STRESS_GSR_WEIGHT: f64 = 0.06;
const STRESS_HR_WEIGHT: f64 = 0.08;
const STRESS_FEVER_PENALTY: f64 = 1.5;

const ANXIETY_BASE: f64 = 1.0;
const ANXIETY_GSR_WEIGHT: f64 = 0.05;
const ANXIETY_HR_WEIGHT: f64 = 0.10;
const ANXIETY_FEVER_PENALTY: f64 = 0.5;

const ENERGY_BASE: f64 = 6.0;
const ENERGY_BAND_BONUS: f64 = 2.0;
const ENERGY_BAND_PENALTY: f64 = 1.5;
const ENERGY_GSR_WEIGHT: f64 = 0.03;

const FOCUS_BASE: f64 = 7.0;
const FOCUS_GSR_WEIGHT: f64 = 0.03;
const FOCUS_STRESS_WEIGHT: f64 = 0.3;
const FOCUS_CALM_BONUS: f64 = 1.0;

const MOOD_BASE: f64 = 7.0;
const MOOD_GSR_WEIGHT: f64 = 0.04;
const MOOD_HR_WEIGHT: f64 = 0.05;
const MOOD_COMFORT_BONUS: f64 = 1.0;

/// Score one sensor reading
pub fn score(reading: &SensorReading) -> WellnessScore {
    let normalized = Normalizer::normalize(reading);
    let axes = compute_axes(&normalized);
    let categories = classify(&axes, &normalized);
    let overall = OverallStatus::from_axes(&axes);
    let (insights, recommendations) = insights::collect(&axes, &normalized);

    WellnessScore {
        mood: axes.mood,
        stress: axes.stress,
        energy: axes.energy,
        focus: axes.focus,
        anxiety: axes.anxiety,
        categories,
        overall,
        insights,
        recommendations,
    }
}

/// Compute the five clamped axes from a normalized reading
pub fn compute_axes(normalized: &NormalizedReading) -> WellnessAxes {
    let stress = compute_stress(normalized);

    WellnessAxes {
        mood: compute_mood(normalized),
        stress,
        energy: compute_energy(normalized),
        focus: compute_focus(normalized, stress),
        anxiety: compute_anxiety(normalized),
    }
}

fn compute_stress(normalized: &NormalizedReading) -> f64 {
    let reading = &normalized.reading;
    let fever = if reading.skin_temp_c > FEVER_TEMP_C {
        STRESS_FEVER_PENALTY
    } else {
        0.0
    };

    clamp_score(
        STRESS_BASE
            + STRESS_GSR_WEIGHT * normalized.gsr_pct
            + STRESS_HR_WEIGHT * excess(reading.heart_rate_bpm, RESTING_HR_BPM)
            + fever,
    )
}

fn compute_anxiety(normalized: &NormalizedReading) -> f64 {
    let reading = &normalized.reading;
    let fever = if reading.skin_temp_c > FEVER_TEMP_C {
        ANXIETY_FEVER_PENALTY
    } else {
        0.0
    };

    clamp_score(
        ANXIETY_BASE
            + ANXIETY_GSR_WEIGHT * normalized.gsr_pct
            + ANXIETY_HR_WEIGHT * excess(reading.heart_rate_bpm, ANXIETY_HR_BPM)
            + fever,
    )
}

fn compute_energy(normalized: &NormalizedReading) -> f64 {
    let reading = &normalized.reading;
    let in_band = in_band(reading.heart_rate_bpm, ACTIVE_HR_BAND)
        && in_band(reading.skin_temp_c, COMFORT_TEMP_BAND);
    let adjustment = if in_band {
        ENERGY_BAND_BONUS
    } else {
        -ENERGY_BAND_PENALTY
    };

    clamp_score(ENERGY_BASE + adjustment - ENERGY_GSR_WEIGHT * normalized.gsr_pct)
}

fn compute_focus(normalized: &NormalizedReading, stress: f64) -> f64 {
    let calm = if in_band(normalized.reading.heart_rate_bpm, CALM_HR_BAND) {
        FOCUS_CALM_BONUS
    } else {
        0.0
    };

    clamp_score(
        FOCUS_BASE - FOCUS_GSR_WEIGHT * normalized.gsr_pct
            - FOCUS_STRESS_WEIGHT * excess(stress, LOW_CUT)
            + calm,
    )
}

fn compute_mood(normalized: &NormalizedReading) -> f64 {
    let reading = &normalized.reading;
    let comfort = if in_band(reading.skin_temp_c, COMFORT_TEMP_BAND) {
        MOOD_COMFORT_BONUS
    } else {
        0.0
    };

    clamp_score(
        MOOD_BASE - MOOD_GSR_WEIGHT * normalized.gsr_pct
            - MOOD_HR_WEIGHT * excess(reading.heart_rate_bpm, RESTING_HR_BPM)
            + comfort,
    )
}

/// Amount by which `value` exceeds `threshold`, never negative
fn excess(value: f64, threshold: f64) -> f64 {
    (value - threshold).max(0.0)
}

fn in_band(value: f64, (low, high): (f64, f64)) -> bool {
    value >= low && value <= high
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_SCORE;
    }
    value.clamp(MIN_SCORE, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CapacityLevel, Insight, Reactivity, Recommendation, RiskLevel};
    use pretty_assertions::assert_eq;

    fn assert_in_range(score: &WellnessScore) {
        for value in [
            score.mood,
            score.stress,
            score.energy,
            score.focus,
            score.anxiety,
        ] {
            assert!(
                (MIN_SCORE..=MAX_SCORE).contains(&value),
                "axis out of range: {value}"
            );
        }
    }

    #[test]
    fn test_resting_reading_is_normal() {
        let score = score(&SensorReading::new(72.0, 36.5, 98.0, 100.0));

        assert_eq!(score.categories.stress, RiskLevel::Normal);
        assert_eq!(score.categories.anxiety, RiskLevel::Normal);
        assert!(score.mood >= 6.0, "mood was {}", score.mood);
        assert!(score.energy >= 6.0, "energy was {}", score.energy);
        assert_eq!(score.overall, OverallStatus::Good);
        assert_eq!(score.insights, vec![Insight::Balanced]);
    }

    #[test]
    fn test_aroused_reading_is_high() {
        let score = score(&SensorReading::new(110.0, 36.5, 98.0, 900.0));

        assert_eq!(score.categories.stress, RiskLevel::Tinggi);
        assert_eq!(score.categories.anxiety, RiskLevel::Tinggi);
        assert_eq!(score.categories.skin_response, Reactivity::Reaktif);
        assert!(score
            .recommendations
            .contains(&Recommendation::BreathingExercise));
    }

    #[test]
    fn test_expected_values_for_resting_reading() {
        let score = score(&SensorReading::new(72.0, 36.5, 98.0, 100.0));
        let gsr_pct = 100.0 / 1023.0 * 100.0;

        assert!((score.stress - (1.0 + 0.06 * gsr_pct)).abs() < 1e-9);
        assert!((score.anxiety - (1.0 + 0.05 * gsr_pct)).abs() < 1e-9);
        assert!((score.energy - (8.0 - 0.03 * gsr_pct)).abs() < 1e-9);
        assert!((score.focus - (8.0 - 0.03 * gsr_pct)).abs() < 1e-9);
        assert!((score.mood - (8.0 - 0.04 * gsr_pct)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_reading_degrades_gracefully() {
        let score = score(&SensorReading::default());

        assert_in_range(&score);
        assert_eq!(score.stress, MIN_SCORE);
        assert_eq!(score.anxiety, MIN_SCORE);
        // Out of the active band: base minus penalty
        assert_eq!(score.energy, 4.5);
        assert_eq!(score.categories.energy, CapacityLevel::Sedang);
        assert_eq!(score.overall, OverallStatus::Good);
    }

    #[test]
    fn test_scores_are_deterministic() {
        let reading = SensorReading::new(93.4, 37.1, 96.0, 612.0);
        let first = score(&reading);
        let second = score(&reading);

        assert_eq!(first, second);
        assert_eq!(first.stress.to_bits(), second.stress.to_bits());
        assert_eq!(first.focus.to_bits(), second.focus.to_bits());
    }

    #[test]
    fn test_stress_monotonic_in_gsr() {
        for (hr, temp) in [(60.0, 36.5), (85.0, 36.8), (120.0, 38.2), (0.0, 0.0)] {
            let mut previous = f64::MIN;
            for gsr in (0..=1100).step_by(25) {
                let stress = score(&SensorReading::new(hr, temp, 97.0, gsr as f64)).stress;
                assert!(
                    stress >= previous,
                    "stress dropped at gsr={gsr} hr={hr} temp={temp}"
                );
                previous = stress;
            }
        }
    }

    #[test]
    fn test_gsr_bounds_stay_in_range() {
        for gsr in [0.0, 1023.0] {
            for hr in [0.0, 40.0, 72.0, 180.0, 250.0] {
                for temp in [0.0, 34.0, 36.5, 41.0] {
                    let score = score(&SensorReading::new(hr, temp, 97.0, gsr));
                    assert_in_range(&score);
                }
            }
        }
    }

    #[test]
    fn test_garbage_input_stays_in_range() {
        let inputs = [
            SensorReading::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN),
            SensorReading::new(f64::INFINITY, f64::INFINITY, 0.0, f64::INFINITY),
            SensorReading::new(-50.0, -10.0, -1.0, -400.0),
            SensorReading::new(1e12, 1e12, 1e12, 1e12),
        ];
        for reading in inputs {
            let score = score(&reading);
            assert_in_range(&score);
            assert!(!score.insights.is_empty());
        }
    }

    #[test]
    fn test_extreme_reading_needs_attention() {
        // Feverish with a racing heart and saturated GSR
        let score = score(&SensorReading::new(140.0, 38.5, 90.0, 1023.0));

        assert_eq!(score.stress, MAX_SCORE);
        assert!(score.energy < LOW_CUT);
        assert_eq!(score.overall, OverallStatus::NeedsAttention);
        assert!(score.insights.contains(&Insight::ElevatedTemperature));
        assert!(score.insights.contains(&Insight::LowOxygen));
    }

    #[test]
    fn test_fever_raises_stress() {
        let normal = score(&SensorReading::new(75.0, 36.8, 98.0, 300.0));
        let fever = score(&SensorReading::new(75.0, 38.0, 98.0, 300.0));
        assert!((fever.stress - normal.stress - STRESS_FEVER_PENALTY).abs() < 1e-9);
        assert!(fever.mood < normal.mood);
    }
}
