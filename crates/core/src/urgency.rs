//! Heuristic urgency tiers for reports that did not trigger a red flag.

use crate::constants::{HIGH_URGENCY_INTENSITY, MEDIUM_URGENCY_INTENSITY};
use crate::model::{AssociatedSymptom, DurationUnit, SymptomReport, UrgencyLevel};

const HIGH_URGENCY_SYMPTOMS: &[AssociatedSymptom] = &[
    AssociatedSymptom::ShortnessOfBreath,
    AssociatedSymptom::ChestPain,
    AssociatedSymptom::Confusion,
    AssociatedSymptom::VisionChanges,
];

const MEDIUM_URGENCY_SYMPTOMS: &[AssociatedSymptom] = &[
    AssociatedSymptom::Fever,
    AssociatedSymptom::Vomiting,
    AssociatedSymptom::Dizziness,
];

/// Classifies a report into `low`, `medium` or `high`, most severe tier first.
///
/// Never returns `emergency`: that tier is reserved for the red-flag catalog.
pub fn classify_urgency(report: &SymptomReport) -> UrgencyLevel {
    let intensity = report.intensity_or_zero();
    let has_any = |symptoms: &[AssociatedSymptom]| symptoms.iter().any(|s| report.has_symptom(*s));

    if intensity >= HIGH_URGENCY_INTENSITY || has_any(HIGH_URGENCY_SYMPTOMS) {
        return UrgencyLevel::High;
    }

    if intensity >= MEDIUM_URGENCY_INTENSITY
        || has_any(MEDIUM_URGENCY_SYMPTOMS)
        || report.duration == Some(DurationUnit::Weeks)
    {
        return UrgencyLevel::Medium;
    }

    UrgencyLevel::Low
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BodyRegion;
    use triage_types::Intensity;

    fn with_intensity(value: i64) -> SymptomReport {
        SymptomReport {
            intensity: Some(Intensity::new(value).unwrap()),
            ..SymptomReport::new(BodyRegion::AbdomenLowerLeft, "t")
        }
    }

    fn with_symptom(symptom: AssociatedSymptom) -> SymptomReport {
        SymptomReport {
            associated_symptoms: vec![symptom],
            ..SymptomReport::new(BodyRegion::HeadFront, "t")
        }
    }

    #[test]
    fn intensity_alone_is_monotonic() {
        assert_eq!(classify_urgency(&with_intensity(9)), UrgencyLevel::High);
        assert_eq!(classify_urgency(&with_intensity(8)), UrgencyLevel::High);
        assert_eq!(classify_urgency(&with_intensity(6)), UrgencyLevel::Medium);
        assert_eq!(classify_urgency(&with_intensity(5)), UrgencyLevel::Medium);
        assert_eq!(classify_urgency(&with_intensity(4)), UrgencyLevel::Low);
        assert_eq!(classify_urgency(&with_intensity(2)), UrgencyLevel::Low);

        let mut previous = UrgencyLevel::Low;
        for value in 0..=10 {
            let tier = classify_urgency(&with_intensity(value));
            assert!(tier >= previous, "tier dropped at intensity {value}");
            previous = tier;
        }
    }

    #[test]
    fn absent_intensity_is_low() {
        let report = SymptomReport::new(BodyRegion::Chest, "t");
        assert_eq!(classify_urgency(&report), UrgencyLevel::Low);
    }

    #[test]
    fn high_urgency_symptoms() {
        for symptom in HIGH_URGENCY_SYMPTOMS {
            assert_eq!(classify_urgency(&with_symptom(*symptom)), UrgencyLevel::High);
        }
    }

    #[test]
    fn medium_urgency_symptoms() {
        for symptom in MEDIUM_URGENCY_SYMPTOMS {
            assert_eq!(classify_urgency(&with_symptom(*symptom)), UrgencyLevel::Medium);
        }
    }

    #[test]
    fn weeks_duration_is_medium_but_months_is_not() {
        let weeks = SymptomReport {
            duration: Some(DurationUnit::Weeks),
            ..SymptomReport::new(BodyRegion::Chest, "t")
        };
        assert_eq!(classify_urgency(&weeks), UrgencyLevel::Medium);

        let months = SymptomReport {
            duration: Some(DurationUnit::Months),
            ..SymptomReport::new(BodyRegion::Chest, "t")
        };
        assert_eq!(classify_urgency(&months), UrgencyLevel::Low);
    }

    #[test]
    fn unlisted_symptoms_do_not_raise_tier() {
        assert_eq!(
            classify_urgency(&with_symptom(AssociatedSymptom::Fatigue)),
            UrgencyLevel::Low
        );
    }

    #[test]
    fn never_returns_emergency() {
        let report = SymptomReport {
            intensity: Some(Intensity::new(10).unwrap()),
            associated_symptoms: AssociatedSymptom::ALL.to_vec(),
            ..SymptomReport::new(BodyRegion::Chest, "t")
        };
        assert_eq!(classify_urgency(&report), UrgencyLevel::High);
    }
}
