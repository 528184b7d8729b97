//! Safety validation for provider-generated explanations.
//!
//! Template text is trusted by construction and never passes through here. Everything a
//! provider returns does, before it can reach an [`crate::model::AnalysisResult`].

use crate::constants::DEFAULT_FORBIDDEN_PHRASES;
use crate::provider::ProviderExplanation;
use crate::{TriageError, TriageResult};
use serde::Deserialize;
use std::path::Path;
use triage_types::NonEmptyText;

/// Why a provider explanation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SafetyViolation {
    #[error("forbidden phrase '{0}'")]
    ForbiddenPhrase(String),
    #[error("missing disclaimer")]
    MissingDisclaimer,
    #[error("empty explanation")]
    EmptyExplanation,
}

/// Lowercases `text` and collapses every whitespace run to a single space.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Process-wide safety rules, resolved once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyPolicy {
    forbidden_phrases: Vec<NonEmptyText>,
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self {
            forbidden_phrases: DEFAULT_FORBIDDEN_PHRASES
                .iter()
                .filter_map(|p| NonEmptyText::new(normalize(p)).ok())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SafetyPolicyFile {
    forbidden_phrases: Vec<String>,
}

impl SafetyPolicy {
    /// The built-in denylist extended with `extra` phrases.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Config` if any extra phrase is blank.
    pub fn with_additional_phrases(
        extra: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> TriageResult<Self> {
        let mut policy = Self::default();
        for phrase in extra {
            let phrase = NonEmptyText::new(normalize(phrase.as_ref()))
                .map_err(|_| TriageError::Config("forbidden phrases cannot be blank".into()))?;
            if !policy.forbidden_phrases.contains(&phrase) {
                policy.forbidden_phrases.push(phrase);
            }
        }
        Ok(policy)
    }

    /// Loads extra phrases from a YAML file with a top-level `forbidden_phrases` list.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a phrase is blank.
    pub fn load_yaml(path: &Path) -> TriageResult<Self> {
        let text = std::fs::read_to_string(path).map_err(TriageError::SafetyPolicyRead)?;
        let file: SafetyPolicyFile =
            serde_yaml::from_str(&text).map_err(TriageError::SafetyPolicyParse)?;
        Self::with_additional_phrases(file.forbidden_phrases)
    }

    pub fn forbidden_phrases(&self) -> impl Iterator<Item = &str> {
        self.forbidden_phrases.iter().map(NonEmptyText::as_str)
    }

    /// Checks a provider explanation.
    ///
    /// Both the explanation and the disclaimer are scanned case-insensitively, with whitespace
    /// runs treated as a single space. A missing or blank disclaimer is a violation, as is an
    /// explanation that holds nothing but the disclaimer.
    pub fn validate(&self, output: &ProviderExplanation) -> Result<(), SafetyViolation> {
        let disclaimer = output
            .disclaimer_text()
            .ok_or(SafetyViolation::MissingDisclaimer)?;

        if output.body().is_empty() {
            return Err(SafetyViolation::EmptyExplanation);
        }

        for text in [output.explanation.as_str(), disclaimer] {
            if let Some(phrase) = self.find_forbidden(text) {
                return Err(SafetyViolation::ForbiddenPhrase(phrase.to_owned()));
            }
        }

        Ok(())
    }

    fn find_forbidden(&self, text: &str) -> Option<&str> {
        let normalized = normalize(text);
        self.forbidden_phrases()
            .find(|phrase| normalized.contains(phrase))
    }
}
