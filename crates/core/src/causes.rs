//! Candidate cause generation.
//!
//! Causes come from an ordered catalog of predicate → candidates rules. Every matching rule
//! contributes its candidates in definition order; when nothing matches, a single generic
//! candidate is returned so the list is never empty. The final list is sorted by descending
//! probability with a stable sort, so equal probabilities keep catalog order.

use crate::constants::APPENDICITIS_INTENSITY;
use crate::model::{AssociatedSymptom, BodyRegion, CandidateCause, PainType, SymptomReport};
use crate::{TriageError, TriageResult};
use triage_types::Probability;

/// Static description of a candidate cause, instantiated fresh for every request.
#[derive(Debug)]
pub struct CauseTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub probability: f64,
    pub matching_symptoms: &'static [&'static str],
}

impl CauseTemplate {
    /// Builds a [`CandidateCause`] from this template.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Internal` if the catalog probability is out of range.
    pub fn instantiate(&self) -> TriageResult<CandidateCause> {
        let probability = Probability::new(self.probability).map_err(|e| {
            TriageError::Internal(format!("catalog cause '{}': {e}", self.name))
        })?;

        Ok(CandidateCause {
            name: self.name.to_owned(),
            description: self.description.to_owned(),
            probability,
            matching_symptoms: self
                .matching_symptoms
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        })
    }
}

/// One entry of the cause catalog.
#[derive(Debug)]
pub struct CauseRule {
    pub id: &'static str,
    pub applies: fn(&SymptomReport) -> bool,
    pub candidates: &'static [CauseTemplate],
}

fn head_throbbing(report: &SymptomReport) -> bool {
    report.body_region.is_head() && report.pain_type == Some(PainType::Throbbing)
}

fn chest_pressure(report: &SymptomReport) -> bool {
    report.body_region == BodyRegion::Chest && report.pain_type == Some(PainType::Pressure)
}

fn upper_right_abdomen_with_nausea(report: &SymptomReport) -> bool {
    report.body_region == BodyRegion::AbdomenUpperRight
        && report.has_symptom(AssociatedSymptom::Nausea)
}

fn severe_lower_right_abdomen(report: &SymptomReport) -> bool {
    report.body_region == BodyRegion::AbdomenLowerRight
        && report.intensity_or_zero() >= APPENDICITIS_INTENSITY
}

pub static CAUSE_RULES: &[CauseRule] = &[
    CauseRule {
        id: "head-throbbing",
        applies: head_throbbing,
        candidates: &[
            CauseTemplate {
                name: "Tension Headache",
                description: "Common type of headache often caused by stress or muscle tension.",
                probability: 0.6,
                matching_symptoms: &["Head pain", "Throbbing sensation"],
            },
            CauseTemplate {
                name: "Migraine",
                description: "Severe headache that may be accompanied by sensitivity to light and sound.",
                probability: 0.4,
                matching_symptoms: &["Head pain", "Throbbing sensation"],
            },
        ],
    },
    CauseRule {
        id: "chest-pressure",
        applies: chest_pressure,
        candidates: &[
            CauseTemplate {
                name: "Muscle Strain",
                description: "Chest wall muscle strain from physical activity or poor posture.",
                probability: 0.5,
                matching_symptoms: &["Chest pressure"],
            },
            CauseTemplate {
                name: "Anxiety",
                description: "Anxiety can cause chest tightness and pressure sensations.",
                probability: 0.3,
                matching_symptoms: &["Chest pressure"],
            },
        ],
    },
    CauseRule {
        id: "upper-right-abdomen-nausea",
        applies: upper_right_abdomen_with_nausea,
        candidates: &[CauseTemplate {
            name: "Gallbladder Issues",
            description: "Upper right abdominal pain with nausea may indicate gallbladder problems.",
            probability: 0.5,
            matching_symptoms: &["Upper right abdominal pain", "Nausea"],
        }],
    },
    CauseRule {
        id: "lower-right-abdomen-severe",
        applies: severe_lower_right_abdomen,
        candidates: &[CauseTemplate {
            name: "Appendicitis",
            description: "Lower right abdominal pain may indicate appendicitis, especially if severe.",
            probability: 0.4,
            matching_symptoms: &["Lower right abdominal pain"],
        }],
    },
];

pub static FALLBACK_CAUSE: CauseTemplate = CauseTemplate {
    name: "General Discomfort",
    description: "Various benign causes may lead to discomfort in this area.",
    probability: 0.5,
    matching_symptoms: &["Pain in selected region"],
};

/// Generates the ranked candidate list for a report.
///
/// # Errors
///
/// Returns `TriageError::Internal` if a catalog entry cannot be instantiated.
pub fn generate_causes(report: &SymptomReport) -> TriageResult<Vec<CandidateCause>> {
    let mut causes = Vec::new();
    for rule in CAUSE_RULES.iter().filter(|rule| (rule.applies)(report)) {
        tracing::debug!(rule = rule.id, "cause rule matched");
        for template in rule.candidates {
            causes.push(template.instantiate()?);
        }
    }

    if causes.is_empty() {
        causes.push(FALLBACK_CAUSE.instantiate()?);
    }

    rank_causes(&mut causes);
    Ok(causes)
}

/// Sorts by descending probability; `sort_by` is stable so ties keep their order.
pub fn rank_causes(causes: &mut [CandidateCause]) {
    causes.sort_by(|a, b| b.probability.cmp(&a.probability));
}
