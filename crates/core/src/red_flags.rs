//! Emergency red-flag matching.
//!
//! Red flags are high-specificity symptom combinations that force an emergency classification.
//! They are evaluated before anything else and the first matching rule produces the complete
//! result. No explanation provider is ever consulted for these results.

use crate::causes::CauseTemplate;
use crate::constants::{EMERGENCY_MARKER, SEVERE_PAIN_INTENSITY, TEMPLATE_DISCLAIMER};
use crate::model::{AnalysisResult, AssociatedSymptom, BodyRegion, SymptomReport, UrgencyLevel};
use crate::TriageResult;

/// One entry of the red-flag catalog.
#[derive(Debug)]
pub struct RedFlagRule {
    pub id: &'static str,
    pub condition: fn(&SymptomReport) -> bool,
    pub cause: CauseTemplate,
    /// Instruction following [`EMERGENCY_MARKER`] in the guidance text.
    pub instruction: &'static str,
    pub explanation: &'static str,
    pub red_flags: &'static [&'static str],
}

impl RedFlagRule {
    pub fn matches(&self, report: &SymptomReport) -> bool {
        (self.condition)(report)
    }

    pub fn guidance(&self) -> String {
        format!("{EMERGENCY_MARKER} {}", self.instruction)
    }

    fn to_result(&self) -> TriageResult<AnalysisResult> {
        Ok(AnalysisResult::new(
            UrgencyLevel::Emergency,
            vec![self.cause.instantiate()?],
            self.guidance(),
            self.red_flags.iter().map(|s| (*s).to_owned()).collect(),
            format!("{}\n\n{TEMPLATE_DISCLAIMER}", self.explanation),
        ))
    }
}

fn chest_with_breathlessness(report: &SymptomReport) -> bool {
    report.body_region == BodyRegion::Chest
        && report.has_symptom(AssociatedSymptom::ShortnessOfBreath)
}

fn meningitis_triad(report: &SymptomReport) -> bool {
    report.body_region.is_head()
        && report.has_symptom(AssociatedSymptom::SevereHeadache)
        && report.has_symptom(AssociatedSymptom::Fever)
        && report.has_symptom(AssociatedSymptom::NeckStiffness)
}

fn abdomen_with_blood_in_vomit(report: &SymptomReport) -> bool {
    report.body_region.is_abdomen() && report.has_symptom(AssociatedSymptom::BloodInVomit)
}

fn severe_pain_with_neurological_signs(report: &SymptomReport) -> bool {
    report.intensity_or_zero() >= SEVERE_PAIN_INTENSITY
        && (report.has_symptom(AssociatedSymptom::Confusion)
            || report.has_symptom(AssociatedSymptom::Weakness))
}

fn chest_with_sweating_and_palpitations(report: &SymptomReport) -> bool {
    report.body_region == BodyRegion::Chest
        && report.has_symptom(AssociatedSymptom::Sweating)
        && report.has_symptom(AssociatedSymptom::Palpitations)
}

/// Evaluated in order; the first match wins.
pub static RED_FLAG_RULES: &[RedFlagRule] = &[
    RedFlagRule {
        id: "chest-shortness-of-breath",
        condition: chest_with_breathlessness,
        cause: CauseTemplate {
            name: "Cardiac Event",
            description: "Chest pain with breathing difficulty may indicate a serious cardiac condition.",
            probability: 0.8,
            matching_symptoms: &["Chest pain", "Shortness of breath"],
        },
        instruction: "Call emergency services or go to the nearest emergency room immediately.",
        explanation: "This combination of symptoms requires immediate medical evaluation to rule out serious cardiac conditions.",
        red_flags: &["Chest pain with shortness of breath"],
    },
    RedFlagRule {
        id: "head-meningitis-triad",
        condition: meningitis_triad,
        cause: CauseTemplate {
            name: "Meningitis",
            description: "Severe headache with fever and neck stiffness may indicate meningitis.",
            probability: 0.7,
            matching_symptoms: &["Severe headache", "Fever", "Neck stiffness"],
        },
        instruction: "This combination requires urgent evaluation.",
        explanation: "These symptoms together may indicate a serious infection requiring immediate treatment.",
        red_flags: &["Severe headache", "Fever", "Neck stiffness"],
    },
    RedFlagRule {
        id: "abdomen-blood-in-vomit",
        condition: abdomen_with_blood_in_vomit,
        cause: CauseTemplate {
            name: "Gastrointestinal Bleeding",
            description: "Abdominal pain with blood in vomit indicates serious GI bleeding.",
            probability: 0.85,
            matching_symptoms: &["Abdominal pain", "Blood in vomit"],
        },
        instruction: "Go to the emergency room immediately.",
        explanation: "Gastrointestinal bleeding requires immediate medical intervention.",
        red_flags: &["Abdominal pain with blood in vomit"],
    },
    RedFlagRule {
        id: "severe-pain-neurological",
        condition: severe_pain_with_neurological_signs,
        cause: CauseTemplate {
            name: "Serious Medical Condition",
            description: "Severe pain with neurological symptoms requires immediate evaluation.",
            probability: 0.75,
            matching_symptoms: &["Severe pain", "Confusion or weakness"],
        },
        instruction: "These symptoms require urgent evaluation.",
        explanation: "The combination of severe pain and neurological symptoms needs immediate medical assessment.",
        red_flags: &["Severe pain with neurological symptoms"],
    },
    RedFlagRule {
        id: "chest-sweating-palpitations",
        condition: chest_with_sweating_and_palpitations,
        cause: CauseTemplate {
            name: "Cardiac Event",
            description: "Chest pain with sweating and palpitations may indicate a heart attack.",
            probability: 0.8,
            matching_symptoms: &["Chest pain", "Sweating", "Palpitations"],
        },
        instruction: "Call emergency services immediately.",
        explanation: "These are classic symptoms of a potential cardiac event requiring immediate care.",
        red_flags: &["Chest pain with sweating and palpitations"],
    },
];

/// Returns the first rule matching `report`, if any.
pub fn first_match(report: &SymptomReport) -> Option<&'static RedFlagRule> {
    RED_FLAG_RULES.iter().find(|rule| rule.matches(report))
}

/// Runs the red-flag catalog against a report.
///
/// Returns `Ok(None)` when no rule matches and the pipeline should continue.
///
/// # Errors
///
/// Returns `TriageError::Internal` if the matched rule's cause cannot be instantiated.
pub fn check_red_flags(report: &SymptomReport) -> TriageResult<Option<AnalysisResult>> {
    match first_match(report) {
        Some(rule) => {
            tracing::info!(rule = rule.id, "red flag matched, returning emergency result");
            rule.to_result().map(Some)
        }
        None => Ok(None),
    }
}
