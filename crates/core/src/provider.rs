//! Explanation provider contract.
//!
//! A provider turns an [`ExplanationPrompt`] into free-text explanation prose, typically by
//! calling an external language model. Providers are untrusted: the engine applies a timeout,
//! validates every response with [`crate::safety::SafetyPolicy`] and falls back to the
//! deterministic template on any failure.

use crate::constants::SAFETY_PREAMBLE;
use crate::model::SymptomReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request timed out")]
    Timeout,
    #[error("provider transport error: {0}")]
    Transport(String),
    #[error("provider returned HTTP status {0}")]
    Status(u16),
    #[error("provider returned malformed output: {0}")]
    Malformed(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Prompt sent to a provider.
///
/// The only constructor is [`ExplanationPrompt::for_report`], so every prompt starts with the
/// safety preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationPrompt {
    text: String,
}

impl ExplanationPrompt {
    pub fn for_report(report: &SymptomReport) -> Self {
        let mut text = format!("{SAFETY_PREAMBLE}\n\nSYMPTOM INFORMATION:\n");
        text.push_str(&format!("Body Region: {}\n", report.body_region));

        if let Some(pain_type) = report.pain_type {
            text.push_str(&format!("Pain Type: {pain_type}\n"));
        }
        let intensity = report.intensity_or_zero();
        if intensity > 0 {
            text.push_str(&format!("Pain Intensity: {intensity}/10\n"));
        }
        if let Some(duration) = report.duration {
            match report.duration_value {
                Some(value) => text.push_str(&format!("Duration: {value} {duration}\n")),
                None => text.push_str(&format!("Duration: {duration}\n")),
            }
        }
        if let Some(onset) = report.onset {
            text.push_str(&format!("Onset: {onset}\n"));
        }
        if !report.triggers.is_empty() {
            text.push_str(&format!("Triggers: {}\n", join(&report.triggers)));
        }
        if !report.associated_symptoms.is_empty() {
            text.push_str(&format!(
                "Associated Symptoms: {}\n",
                join(&report.associated_symptoms)
            ));
        }

        text.push_str(
            "\nProvide an educational explanation of possible causes with appropriate uncertainty.",
        );
        Self { text }
    }

    /// Full prompt text, preamble included.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The system instructions a chat-style backend should send separately.
    pub fn preamble(&self) -> &'static str {
        SAFETY_PREAMBLE
    }
}

fn join<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A cause suggested by a provider. Informational only: ranking always comes from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCause {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub matching_symptoms: Vec<String>,
}

/// Structured provider response, in the JSON shape requested by the safety preamble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderExplanation {
    pub explanation: String,
    #[serde(default)]
    pub possible_causes: Vec<ProviderCause>,
    #[serde(default)]
    pub disclaimer: Option<String>,
}

impl ProviderExplanation {
    /// Parses a provider reply, tolerating a Markdown code fence around the JSON object.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Malformed` if no JSON object with an `explanation` is found.
    pub fn from_json(raw: &str) -> Result<Self, ProviderError> {
        let trimmed = raw.trim();
        let body = match (trimmed.find('{'), trimmed.rfind('}')) {
            (Some(start), Some(end)) if start < end => &trimmed[start..=end],
            _ => {
                return Err(ProviderError::Malformed(
                    "response does not contain a JSON object".into(),
                ))
            }
        };
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))
    }

    /// The trimmed disclaimer, if one was supplied.
    pub fn disclaimer_text(&self) -> Option<&str> {
        self.disclaimer
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// The explanation without a trailing copy of the disclaimer.
    pub fn body(&self) -> &str {
        let explanation = self.explanation.trim();
        match self.disclaimer_text() {
            Some(disclaimer) => explanation
                .strip_suffix(disclaimer)
                .unwrap_or(explanation)
                .trim_end(),
            None => explanation,
        }
    }

    /// The text delivered to the caller: the body, a blank line, then the disclaimer.
    ///
    /// Only call this after the explanation has passed safety validation.
    pub fn into_text(self) -> String {
        match self.disclaimer_text() {
            Some(disclaimer) => format!("{}\n\n{disclaimer}", self.body()),
            None => self.body().to_owned(),
        }
    }
}

/// Capability interface implemented by explanation backends.
#[async_trait::async_trait]
pub trait ExplanationProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn explain(
        &self,
        prompt: &ExplanationPrompt,
    ) -> Result<ProviderExplanation, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssociatedSymptom, BodyRegion, DurationUnit, PainType, Trigger};
    use std::num::NonZeroU32;
    use triage_types::Intensity;

    #[test]
    fn prompt_always_starts_with_safety_preamble() {
        let prompt = ExplanationPrompt::for_report(&SymptomReport::new(BodyRegion::Chest, "t"));
        assert!(prompt.as_str().starts_with(SAFETY_PREAMBLE));
        assert!(prompt.as_str().contains("Body Region: chest"));
        assert!(!prompt.as_str().contains("Pain Type"));
    }

    #[test]
    fn prompt_includes_all_reported_fields() {
        let report = SymptomReport {
            pain_type: Some(PainType::Pressure),
            intensity: Some(Intensity::new(6).unwrap()),
            duration: Some(DurationUnit::Hours),
            duration_value: NonZeroU32::new(2),
            triggers: vec![Trigger::Movement, Trigger::Breathing],
            associated_symptoms: vec![AssociatedSymptom::Nausea, AssociatedSymptom::Sweating],
            age_range: Some("40-49".into()),
            ..SymptomReport::new(BodyRegion::Chest, "t")
        };
        let prompt = ExplanationPrompt::for_report(&report);
        let text = prompt.as_str();

        assert!(text.contains("Pain Type: pressure\n"));
        assert!(text.contains("Pain Intensity: 6/10\n"));
        assert!(text.contains("Duration: 2 hours\n"));
        assert!(text.contains("Triggers: movement, breathing\n"));
        assert!(text.contains("Associated Symptoms: nausea, sweating\n"));
        assert!(!text.contains("40-49"));
    }

    #[test]
    fn parses_fenced_json_reply() {
        let raw = "```json\n{\"explanation\": \"It could be muscular.\", \"disclaimer\": \"Not medical advice.\"}\n```";
        let parsed = ProviderExplanation::from_json(raw).expect("fenced json");
        assert_eq!(parsed.explanation, "It could be muscular.");
        assert_eq!(parsed.disclaimer.as_deref(), Some("Not medical advice."));
        assert!(parsed.possible_causes.is_empty());
    }

    #[test]
    fn rejects_non_json_reply() {
        let err = ProviderExplanation::from_json("I think it might be a strain.")
            .expect_err("not json");
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[test]
    fn rejects_json_without_explanation() {
        let err = ProviderExplanation::from_json(r#"{"disclaimer": "x"}"#).expect_err("missing");
        assert!(matches!(err, ProviderError::Malformed(msg) if msg.contains("explanation")));
    }

    #[test]
    fn into_text_ends_with_disclaimer_paragraph() {
        let explanation = ProviderExplanation {
            explanation: "It may be muscular.".into(),
            possible_causes: vec![],
            disclaimer: Some("Not medical advice.".into()),
        };
        assert_eq!(
            explanation.clone().into_text(),
            "It may be muscular.\n\nNot medical advice."
        );

        let already = ProviderExplanation {
            explanation: "It may be muscular. Not medical advice.".into(),
            ..explanation
        };
        assert_eq!(already.body(), "It may be muscular.");
        assert_eq!(already.into_text(), "It may be muscular.\n\nNot medical advice.");
    }

    #[test]
    fn zero_intensity_is_left_out_of_prompt() {
        let report = SymptomReport {
            intensity: Some(Intensity::new(0).unwrap()),
            ..SymptomReport::new(BodyRegion::HeadFront, "t")
        };
        let prompt = ExplanationPrompt::for_report(&report);
        assert!(!prompt.as_str().contains("Pain Intensity"));
    }
}
