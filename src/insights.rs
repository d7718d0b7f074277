//! Insight and recommendation catalog
//!
//! Insights are keyed by the thresholds a reading crosses. They accumulate: a
//! reading can trigger several at once. Output order follows catalog order so
//! identical readings always produce identical lists.

use crate::classifier::{HIGH_CUT, LOW_CUT, REACTIVE_GSR_PCT};
use crate::scorer::{FEVER_TEMP_C, LOW_SPO2_PCT, TACHYCARDIA_BPM};
use crate::types::{Insight, NormalizedReading, Recommendation, WellnessAxes};

impl Insight {
    /// Short message shown alongside the score
    pub fn message(&self) -> &'static str {
        match self {
            Insight::ElevatedStress => "Tingkat stres tinggi terdeteksi",
            Insight::ModerateStress => "Tingkat stres sedang",
            Insight::ElevatedAnxiety => "Indikasi kecemasan tinggi",
            Insight::LowEnergy => "Energi tubuh sedang rendah",
            Insight::LowMood => "Suasana hati sedang menurun",
            Insight::ScatteredFocus => "Fokus mudah terpecah saat ini",
            Insight::ElevatedTemperature => "Suhu tubuh di atas normal",
            Insight::ElevatedHeartRate => "Detak jantung di atas normal",
            Insight::LowOxygen => "Saturasi oksigen di bawah normal",
            Insight::ReactiveSkinResponse => "Respons kulit reaktif terhadap rangsangan",
            Insight::Balanced => "Semua indikator dalam rentang seimbang",
        }
    }

    /// The action paired with this insight, if any
    pub fn recommendation(&self) -> Option<Recommendation> {
        match self {
            Insight::ElevatedStress => Some(Recommendation::BreathingExercise),
            Insight::ModerateStress => Some(Recommendation::ShortBreak),
            Insight::ElevatedAnxiety => Some(Recommendation::GroundingExercise),
            Insight::LowEnergy => Some(Recommendation::RestAndHydrate),
            Insight::LowMood => Some(Recommendation::ReachOut),
            Insight::ScatteredFocus => Some(Recommendation::FocusSession),
            Insight::ElevatedTemperature => Some(Recommendation::CheckTemperature),
            Insight::ElevatedHeartRate => Some(Recommendation::SlowDown),
            Insight::LowOxygen => Some(Recommendation::FreshAir),
            Insight::ReactiveSkinResponse => None,
            Insight::Balanced => Some(Recommendation::MaintainRoutine),
        }
    }
}

impl Recommendation {
    pub fn title(&self) -> &'static str {
        match self {
            Recommendation::BreathingExercise => "Latihan Pernapasan",
            Recommendation::ShortBreak => "Istirahat Sejenak",
            Recommendation::GroundingExercise => "Teknik Grounding",
            Recommendation::RestAndHydrate => "Istirahat dan Minum Air",
            Recommendation::ReachOut => "Terhubung dengan Orang Terdekat",
            Recommendation::FocusSession => "Sesi Fokus Singkat",
            Recommendation::CheckTemperature => "Periksa Suhu Tubuh",
            Recommendation::SlowDown => "Tenangkan Diri",
            Recommendation::FreshAir => "Hirup Udara Segar",
            Recommendation::MaintainRoutine => "Pertahankan Rutinitas",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Recommendation::BreathingExercise => {
                "Lakukan pernapasan 4-7-8 selama 5 menit untuk menurunkan respons stres"
            }
            Recommendation::ShortBreak => {
                "Ambil jeda 5-10 menit dari layar dan regangkan tubuh"
            }
            Recommendation::GroundingExercise => {
                "Coba teknik 5-4-3-2-1: sebutkan hal yang bisa dilihat, disentuh, dan didengar"
            }
            Recommendation::RestAndHydrate => {
                "Minum 2-3 gelas air dan beri tubuh waktu untuk beristirahat"
            }
            Recommendation::ReachOut => {
                "Ngobrol dengan teman atau keluarga dapat membantu memperbaiki suasana hati"
            }
            Recommendation::FocusSession => {
                "Matikan notifikasi dan kerjakan satu tugas selama 25 menit"
            }
            Recommendation::CheckTemperature => {
                "Suhu tubuh tinggi, istirahat dan pantau kondisi kesehatan Anda"
            }
            Recommendation::SlowDown => {
                "Duduk dengan tenang dan tarik napas dalam hingga detak jantung turun"
            }
            Recommendation::FreshAir => {
                "Pindah ke ruangan dengan sirkulasi udara yang baik dan bernapas perlahan"
            }
            Recommendation::MaintainRoutine => {
                "Kondisi stabil, pertahankan pola istirahat dan aktivitas yang baik"
            }
        }
    }
}

/// Collect insights and their recommendations for one scored reading
pub fn collect(
    axes: &WellnessAxes,
    normalized: &NormalizedReading,
) -> (Vec<Insight>, Vec<Recommendation>) {
    let reading = &normalized.reading;
    let mut insights = Vec::new();

    if axes.stress >= HIGH_CUT {
        insights.push(Insight::ElevatedStress);
    } else if axes.stress >= LOW_CUT {
        insights.push(Insight::ModerateStress);
    }
    if axes.anxiety >= HIGH_CUT {
        insights.push(Insight::ElevatedAnxiety);
    }
    if axes.energy < LOW_CUT {
        insights.push(Insight::LowEnergy);
    }
    if axes.mood < LOW_CUT {
        insights.push(Insight::LowMood);
    }
    if axes.focus < LOW_CUT {
        insights.push(Insight::ScatteredFocus);
    }
    if reading.skin_temp_c > FEVER_TEMP_C {
        insights.push(Insight::ElevatedTemperature);
    }
    if reading.heart_rate_bpm > TACHYCARDIA_BPM {
        insights.push(Insight::ElevatedHeartRate);
    }
    // Zero means the sensor reported nothing
    if reading.spo2 > 0.0 && reading.spo2 < LOW_SPO2_PCT {
        insights.push(Insight::LowOxygen);
    }
    if normalized.gsr_pct > REACTIVE_GSR_PCT {
        insights.push(Insight::ReactiveSkinResponse);
    }

    if insights.is_empty() {
        insights.push(Insight::Balanced);
    }

    let mut recommendations: Vec<Recommendation> = Vec::new();
    for recommendation in insights.iter().filter_map(Insight::recommendation) {
        if !recommendations.contains(&recommendation) {
            recommendations.push(recommendation);
        }
    }

    (insights, recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SensorReading;

    fn calm_axes() -> WellnessAxes {
        WellnessAxes {
            mood: 7.5,
            stress: 2.0,
            energy: 7.5,
            focus: 7.5,
            anxiety: 1.5,
        }
    }

    fn normalized(reading: SensorReading, gsr_pct: f64) -> NormalizedReading {
        NormalizedReading { reading, gsr_pct }
    }

    #[test]
    fn test_balanced_when_nothing_crossed() {
        let (insights, recommendations) = collect(
            &calm_axes(),
            &normalized(SensorReading::new(72.0, 36.5, 98.0, 100.0), 9.8),
        );
        assert_eq!(insights, vec![Insight::Balanced]);
        assert_eq!(recommendations, vec![Recommendation::MaintainRoutine]);
    }

    #[test]
    fn test_insights_accumulate() {
        let axes = WellnessAxes {
            mood: 3.0,
            stress: 8.0,
            energy: 3.0,
            focus: 2.5,
            anxiety: 7.5,
        };
        let (insights, recommendations) = collect(
            &axes,
            &normalized(SensorReading::new(115.0, 37.9, 92.0, 950.0), 92.9),
        );

        assert_eq!(
            insights,
            vec![
                Insight::ElevatedStress,
                Insight::ElevatedAnxiety,
                Insight::LowEnergy,
                Insight::LowMood,
                Insight::ScatteredFocus,
                Insight::ElevatedTemperature,
                Insight::ElevatedHeartRate,
                Insight::LowOxygen,
                Insight::ReactiveSkinResponse,
            ]
        );
        assert!(recommendations.contains(&Recommendation::BreathingExercise));
        assert!(recommendations.contains(&Recommendation::GroundingExercise));
        // Reactive skin response has no paired action
        assert_eq!(recommendations.len(), insights.len() - 1);
    }

    #[test]
    fn test_moderate_stress_suggests_break() {
        let mut axes = calm_axes();
        axes.stress = 5.0;
        let (insights, recommendations) = collect(
            &axes,
            &normalized(SensorReading::new(72.0, 36.5, 98.0, 100.0), 9.8),
        );
        assert_eq!(insights, vec![Insight::ModerateStress]);
        assert_eq!(recommendations, vec![Recommendation::ShortBreak]);
    }

    #[test]
    fn test_missing_spo2_is_not_low_oxygen() {
        let (insights, _) = collect(
            &calm_axes(),
            &normalized(SensorReading::new(72.0, 36.5, 0.0, 100.0), 9.8),
        );
        assert!(!insights.contains(&Insight::LowOxygen));
    }

    #[test]
    fn test_catalog_text_is_present() {
        assert!(!Recommendation::BreathingExercise.title().is_empty());
        assert!(Recommendation::BreathingExercise
            .description()
            .contains("pernapasan"));
        assert!(!Insight::ElevatedStress.message().is_empty());
    }
}
