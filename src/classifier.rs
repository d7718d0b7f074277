//! Category classification
//!
//! Maps numeric scores onto the labels shown in the app. Every axis uses the
//! same two cut points; the highest matching level wins.

use crate::types::{
    CapacityLevel, Categories, NormalizedReading, OverallStatus, Reactivity, RiskLevel,
    WellnessAxes,
};

/// Scores at or above this are at least "Sedang"
pub const LOW_CUT: f64 = 4.0;

/// Scores at or above this are "Tinggi"
pub const HIGH_CUT: f64 = 7.0;

/// GSR percentage above which skin response counts as reactive
pub const REACTIVE_GSR_PCT: f64 = 70.0;

/// Number of crossed risk markers that makes the overall status "needs attention"
pub const NEEDS_ATTENTION_MARKERS: usize = 3;

/// Number of crossed risk markers that makes the overall status "fair"
pub const FAIR_MARKERS: usize = 2;

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_CUT {
            RiskLevel::Tinggi
        } else if score >= LOW_CUT {
            RiskLevel::Sedang
        } else {
            RiskLevel::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Normal => "Normal",
            RiskLevel::Sedang => "Sedang",
            RiskLevel::Tinggi => "Tinggi",
        }
    }
}

impl CapacityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_CUT {
            CapacityLevel::Tinggi
        } else if score >= LOW_CUT {
            CapacityLevel::Sedang
        } else {
            CapacityLevel::Rendah
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CapacityLevel::Rendah => "Rendah",
            CapacityLevel::Sedang => "Sedang",
            CapacityLevel::Tinggi => "Tinggi",
        }
    }
}

impl Reactivity {
    pub fn from_gsr_pct(gsr_pct: f64) -> Self {
        if gsr_pct > REACTIVE_GSR_PCT {
            Reactivity::Reaktif
        } else {
            Reactivity::Stabil
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Reactivity::Stabil => "Stabil",
            Reactivity::Reaktif => "Reaktif",
        }
    }
}

impl OverallStatus {
    /// Count risk markers: high stress, high anxiety, energy deficit, mood deficit
    pub fn from_axes(axes: &WellnessAxes) -> Self {
        let markers = [
            axes.stress >= HIGH_CUT,
            axes.anxiety >= HIGH_CUT,
            axes.energy < LOW_CUT,
            axes.mood < LOW_CUT,
        ]
        .iter()
        .filter(|crossed| **crossed)
        .count();

        if markers >= NEEDS_ATTENTION_MARKERS {
            OverallStatus::NeedsAttention
        } else if markers >= FAIR_MARKERS {
            OverallStatus::Fair
        } else {
            OverallStatus::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OverallStatus::Good => "Baik",
            OverallStatus::Fair => "Cukup",
            OverallStatus::NeedsAttention => "Perlu Perhatian",
        }
    }
}

/// Derive every category label for a set of axes
pub fn classify(axes: &WellnessAxes, normalized: &NormalizedReading) -> Categories {
    Categories {
        mood: CapacityLevel::from_score(axes.mood),
        stress: RiskLevel::from_score(axes.stress),
        energy: CapacityLevel::from_score(axes.energy),
        focus: CapacityLevel::from_score(axes.focus),
        anxiety: RiskLevel::from_score(axes.anxiety),
        skin_response: Reactivity::from_gsr_pct(normalized.gsr_pct),
    }
}
