//! Core types for the Mindpulse pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw sensor readings, normalized readings, wellness scores and the
//! snapshot payload handed to presentation layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::freshness::Freshness;
use crate::history::HistorySummary;

/// One snapshot of the four biofeedback sensors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorReading {
    /// Heart rate (beats per minute)
    pub heart_rate_bpm: f64,
    /// Skin temperature (celsius)
    pub skin_temp_c: f64,
    /// Blood oxygen proxy (percentage, 0-100)
    pub spo2: f64,
    /// Galvanic skin response, raw ADC value (0-1023)
    pub gsr_raw: f64,
}

impl SensorReading {
    pub fn new(heart_rate_bpm: f64, skin_temp_c: f64, spo2: f64, gsr_raw: f64) -> Self {
        Self {
            heart_rate_bpm,
            skin_temp_c,
            spo2,
            gsr_raw,
        }
    }
}

/// A reading together with the moment it was received
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedReading {
    pub reading: SensorReading,
    /// Receipt time on the host clock; freshness is measured from here
    pub received_at: DateTime<Utc>,
    /// Measurement time on the device clock, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_at: Option<DateTime<Utc>>,
}

impl TimedReading {
    pub fn new(reading: SensorReading, received_at: DateTime<Utc>) -> Self {
        Self {
            reading,
            received_at,
            measured_at: None,
        }
    }

    /// Attach the device-reported measurement time
    pub fn with_measured_at(mut self, measured_at: Option<DateTime<Utc>>) -> Self {
        self.measured_at = measured_at;
        self
    }
}

/// Sanitized reading with GSR expressed on a percentage scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReading {
    /// Finite, non-negative copy of the source reading
    pub reading: SensorReading,
    /// GSR as a percentage of the ADC full scale (0-100)
    pub gsr_pct: f64,
}

/// Level for axes where a high score is a risk (stress, anxiety)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Normal,
    Sedang,
    Tinggi,
}

/// Level for axes where a high score is a resource (mood, energy, focus)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityLevel {
    Rendah,
    Sedang,
    Tinggi,
}

/// Skin conductance reactivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reactivity {
    Stabil,
    Reaktif,
}

/// Overall wellness status across all axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Good,
    Fair,
    NeedsAttention,
}

/// Category label for every scored axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    pub mood: CapacityLevel,
    pub stress: RiskLevel,
    pub energy: CapacityLevel,
    pub focus: CapacityLevel,
    pub anxiety: RiskLevel,
    pub skin_response: Reactivity,
}

/// Observation drawn from the fixed insight catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    ElevatedStress,
    ModerateStress,
    ElevatedAnxiety,
    LowEnergy,
    LowMood,
    ScatteredFocus,
    ElevatedTemperature,
    ElevatedHeartRate,
    LowOxygen,
    ReactiveSkinResponse,
    Balanced,
}

/// Suggested action drawn from the fixed recommendation catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    BreathingExercise,
    ShortBreak,
    GroundingExercise,
    RestAndHydrate,
    ReachOut,
    FocusSession,
    CheckTemperature,
    SlowDown,
    FreshAir,
    MaintainRoutine,
}

/// The five numeric wellness axes, each in [1, 10]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WellnessAxes {
    pub mood: f64,
    pub stress: f64,
    pub energy: f64,
    pub focus: f64,
    pub anxiety: f64,
}

/// Complete scoring result for one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessScore {
    pub mood: f64,
    pub stress: f64,
    pub energy: f64,
    pub focus: f64,
    pub anxiety: f64,
    pub categories: Categories,
    pub overall: OverallStatus,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
}

impl WellnessScore {
    /// The numeric axes of this score
    pub fn axes(&self) -> WellnessAxes {
        WellnessAxes {
            mood: self.mood,
            stress: self.stress,
            energy: self.energy,
            focus: self.focus,
            anxiety: self.anxiety,
        }
    }
}

/// Snapshot producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Snapshot handed to presentation layers after every reading or refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellnessSnapshot {
    pub snapshot_version: String,
    pub producer: SnapshotProducer,
    pub computed_at_utc: String,
    /// When the latest reading arrived, if any reading has arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at_utc: Option<String>,
    /// When the device says it took the latest reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measured_at_utc: Option<String>,
    pub freshness: Freshness,
    /// Seconds since the latest reading arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_sec: Option<i64>,
    /// True only when the reading is fresh enough to trust the score
    pub trusted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<SensorReading>,
    /// Absent when the reading is outdated; render placeholders instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<WellnessScore>,
    pub history: HistorySummary,
}
