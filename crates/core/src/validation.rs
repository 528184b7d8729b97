//! Input and output validation utilities.
//!
//! Input helpers convert raw boundary values (as received from JSON or the command line) into
//! the validated types the engine works with. [`validate_result`] checks an assembled
//! [`AnalysisResult`] before it is handed back, so a result is either complete and valid or
//! not returned at all.

use crate::constants::EMERGENCY_MARKER;
use crate::model::{AnalysisResult, UrgencyLevel};
use crate::{TriageError, TriageResult};
use std::num::NonZeroU32;
use triage_types::Intensity;

/// Validates an optional raw intensity.
///
/// # Errors
///
/// Returns `TriageError::InvalidInput` when the value is outside 0-10.
pub fn intensity_from_raw(value: Option<i64>) -> TriageResult<Option<Intensity>> {
    value
        .map(Intensity::new)
        .transpose()
        .map_err(|e| TriageError::InvalidInput(e.to_string()))
}

/// Validates an optional raw duration magnitude.
///
/// # Errors
///
/// Returns `TriageError::InvalidInput` unless the value is a positive integer.
pub fn duration_value_from_raw(value: Option<i64>) -> TriageResult<Option<NonZeroU32>> {
    value
        .map(|v| {
            u32::try_from(v)
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or_else(|| {
                    TriageError::InvalidInput(format!(
                        "durationValue must be a positive integer, got {v}"
                    ))
                })
        })
        .transpose()
}

/// Collapses repeated values, keeping the first occurrence of each.
pub fn dedup_preserving_order<T: PartialEq>(values: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Checks the invariants of an assembled result.
///
/// # Errors
///
/// Returns `TriageError::Internal` describing the first violated invariant.
pub fn validate_result(result: &AnalysisResult) -> TriageResult<()> {
    let fail = |msg: &str| Err(TriageError::Internal(msg.to_owned()));

    if result.possible_causes().is_empty() {
        return fail("result has no possible causes");
    }

    let descending = result
        .possible_causes()
        .windows(2)
        .all(|pair| pair[0].probability >= pair[1].probability);
    if !descending {
        return fail("possible causes are not ordered by descending probability");
    }

    if result.is_emergency() != (result.urgency_level() == UrgencyLevel::Emergency) {
        return fail("emergency flag disagrees with urgency level");
    }

    if !result.red_flags().is_empty() && result.urgency_level() != UrgencyLevel::Emergency {
        return fail("red flags present on a non-emergency result");
    }

    if !result.red_flags().is_empty() && !result.guidance().starts_with(EMERGENCY_MARKER) {
        return fail("red-flag guidance is missing the emergency marker");
    }

    if result.guidance().trim().is_empty() {
        return fail("result has empty guidance");
    }

    if result.ai_explanation().trim().is_empty() {
        return fail("result has empty explanation");
    }

    if !ends_with_disclaimer_paragraph(result.ai_explanation()) {
        return fail("explanation does not end with a disclaimer paragraph");
    }

    Ok(())
}

/// True when `text` is a non-blank body followed by a blank line and a non-blank closing
/// paragraph. Every explanation source (template, red-flag catalog, validated provider output)
/// renders its disclaimer that way.
fn ends_with_disclaimer_paragraph(text: &str) -> bool {
    match text.trim_end().rsplit_once("\n\n") {
        Some((body, disclaimer)) => !body.trim().is_empty() && !disclaimer.trim().is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::causes::FALLBACK_CAUSE;
    use crate::model::CandidateCause;
    use triage_types::Probability;

    const EXPLANATION: &str = "It may be muscular.\n\nNot medical advice.";

    fn cause(name: &str, p: f64) -> CandidateCause {
        CandidateCause {
            name: name.into(),
            description: String::new(),
            probability: Probability::new(p).unwrap(),
            matching_symptoms: vec![],
        }
    }

    #[test]
    fn intensity_from_raw_validates_range() {
        assert_eq!(intensity_from_raw(None).unwrap(), None);
        assert_eq!(intensity_from_raw(Some(10)).unwrap().map(Intensity::value), Some(10));

        let err = intensity_from_raw(Some(11)).expect_err("out of range");
        assert!(matches!(err, TriageError::InvalidInput(msg) if msg.contains("got 11")));
    }

    #[test]
    fn duration_value_must_be_positive() {
        assert_eq!(duration_value_from_raw(Some(3)).unwrap(), NonZeroU32::new(3));
        assert!(duration_value_from_raw(Some(0)).is_err());
        assert!(duration_value_from_raw(Some(-2)).is_err());
        assert!(duration_value_from_raw(Some(i64::MAX)).is_err());
        assert_eq!(duration_value_from_raw(None).unwrap(), None);
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        assert_eq!(dedup_preserving_order(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn accepts_well_formed_result() {
        let result = AnalysisResult::new(
            UrgencyLevel::Low,
            vec![FALLBACK_CAUSE.instantiate().unwrap()],
            "Monitor your symptoms.",
            vec![],
            EXPLANATION,
        );
        validate_result(&result).expect("valid result");
    }

    #[test]
    fn rejects_explanation_without_disclaimer() {
        for text in ["You have appendicitis.", "Body only.\n\n  ", "\n\nDisclaimer only."] {
            let result = AnalysisResult::new(
                UrgencyLevel::Low,
                vec![FALLBACK_CAUSE.instantiate().unwrap()],
                "Monitor your symptoms.",
                vec![],
                text,
            );
            assert!(matches!(
                validate_result(&result),
                Err(TriageError::Internal(msg)) if msg.contains("disclaimer")
            ));
        }
    }

    #[test]
    fn every_explanation_source_passes_disclaimer_check() {
        use crate::guidance::template_explanation;
        use crate::model::{AssociatedSymptom, BodyRegion, SymptomReport};
        use crate::provider::ProviderExplanation;
        use crate::red_flags::check_red_flags;

        let report = SymptomReport::new(BodyRegion::Chest, "t");
        let causes = vec![FALLBACK_CAUSE.instantiate().unwrap()];
        assert!(ends_with_disclaimer_paragraph(&template_explanation(&report, &causes)));

        let provider_text = ProviderExplanation {
            explanation: "It may be muscular.".into(),
            possible_causes: vec![],
            disclaimer: Some("Not medical advice.".into()),
        }
        .into_text();
        assert!(ends_with_disclaimer_paragraph(&provider_text));

        let emergency = check_red_flags(&SymptomReport {
            associated_symptoms: vec![AssociatedSymptom::ShortnessOfBreath],
            ..report
        })
        .unwrap()
        .expect("red flag");
        validate_result(&emergency).expect("red-flag result carries a disclaimer");
    }

    #[test]
    fn rejects_empty_causes() {
        let result = AnalysisResult::new(UrgencyLevel::Low, vec![], "g", vec![], EXPLANATION);
        assert!(matches!(
            validate_result(&result),
            Err(TriageError::Internal(msg)) if msg.contains("no possible causes")
        ));
    }

    #[test]
    fn rejects_unsorted_causes() {
        let result = AnalysisResult::new(
            UrgencyLevel::Low,
            vec![cause("a", 0.2), cause("b", 0.9)],
            "g",
            vec![],
            EXPLANATION,
        );
        assert!(validate_result(&result).is_err());
    }

    #[test]
    fn rejects_red_flags_without_emergency() {
        let result = AnalysisResult::new(
            UrgencyLevel::High,
            vec![cause("a", 0.5)],
            "g",
            vec!["Chest pain".into()],
            EXPLANATION,
        );
        assert!(validate_result(&result).is_err());
    }

    #[test]
    fn rejects_blank_explanation() {
        let result =
            AnalysisResult::new(UrgencyLevel::Low, vec![cause("a", 0.5)], "g", vec![], " ");
        assert!(validate_result(&result).is_err());
    }
}
