//! Deterministic guidance and explanation text.

use crate::constants::{
    GUIDANCE_EMERGENCY, GUIDANCE_HIGH, GUIDANCE_LOW, GUIDANCE_MEDIUM, TEMPLATE_DISCLAIMER,
};
use crate::model::{CandidateCause, SymptomReport, UrgencyLevel};

pub fn guidance_for(urgency: UrgencyLevel) -> &'static str {
    match urgency {
        UrgencyLevel::Low => GUIDANCE_LOW,
        UrgencyLevel::Medium => GUIDANCE_MEDIUM,
        UrgencyLevel::High => GUIDANCE_HIGH,
        UrgencyLevel::Emergency => GUIDANCE_EMERGENCY,
    }
}

/// Renders the template explanation for a report and its ranked causes.
///
/// The opening sentence names the region and, when non-zero, the intensity. Each cause gets
/// one bullet with its rounded percentage. The text always ends with [`TEMPLATE_DISCLAIMER`].
pub fn template_explanation(report: &SymptomReport, causes: &[CandidateCause]) -> String {
    let mut text = format!(
        "Based on your reported symptoms in the {} area ",
        report.body_region
    );

    let intensity = report.intensity_or_zero();
    if intensity > 0 {
        text.push_str(&format!("with an intensity of {intensity}/10, "));
    }

    text.push_str("there are several possible explanations to consider:\n\n");

    for cause in causes {
        text.push_str(&format!(
            "• {} ({}% match): {}\n\n",
            cause.name,
            cause.probability.percent(),
            cause.description
        ));
    }

    text.push('\n');
    text.push_str(TEMPLATE_DISCLAIMER);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::causes::generate_causes;
    use crate::model::{BodyRegion, PainType};
    use crate::safety::SafetyPolicy;
    use triage_types::Intensity;

    #[test]
    fn guidance_table_has_distinct_entries() {
        let all = [
            UrgencyLevel::Low,
            UrgencyLevel::Medium,
            UrgencyLevel::High,
            UrgencyLevel::Emergency,
        ]
        .map(guidance_for);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(guidance_for(UrgencyLevel::Medium).contains("within the next few days"));
    }

    #[test]
    fn explanation_lists_causes_with_rounded_percentages() {
        let report = SymptomReport {
            pain_type: Some(PainType::Throbbing),
            intensity: Some(Intensity::new(3).unwrap()),
            ..SymptomReport::new(BodyRegion::HeadFront, "t")
        };
        let causes = generate_causes(&report).unwrap();
        let text = template_explanation(&report, &causes);

        assert!(text.starts_with(
            "Based on your reported symptoms in the headFront area with an intensity of 3/10, "
        ));
        assert!(text.contains("• Tension Headache (60% match): Common type of headache"));
        assert!(text.contains("• Migraine (40% match): "));
        assert!(text.find("Tension Headache").unwrap() < text.find("Migraine").unwrap());
        assert!(text.ends_with(TEMPLATE_DISCLAIMER));
    }

    #[test]
    fn explanation_omits_zero_or_absent_intensity() {
        let report = SymptomReport::new(BodyRegion::Chest, "t");
        let causes = generate_causes(&report).unwrap();
        let text = template_explanation(&report, &causes);
        assert!(text.starts_with("Based on your reported symptoms in the chest area there are"));

        let zero = SymptomReport {
            intensity: Some(Intensity::new(0).unwrap()),
            ..report
        };
        assert!(!template_explanation(&zero, &causes).contains("intensity"));
    }

    #[test]
    fn template_text_contains_no_forbidden_phrase() {
        let policy = SafetyPolicy::default();
        for region in BodyRegion::ALL {
            let report = SymptomReport::new(*region, "t");
            let text = template_explanation(&report, &generate_causes(&report).unwrap())
                .to_lowercase();
            assert!(policy.forbidden_phrases().all(|p| !text.contains(p)));
        }
    }
}
