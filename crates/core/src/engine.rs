//! Triage orchestration.
//!
//! Evaluation order is fixed: red flags, then urgency, then causes, then guidance and
//! explanation. A red-flag match returns immediately and never reaches the explanation
//! provider. The provider only ever replaces the template explanation, and only after its
//! output passes the safety policy.

use crate::causes::generate_causes;
use crate::config::CoreConfig;
use crate::guidance::{guidance_for, template_explanation};
use crate::model::{AnalysisResult, CandidateCause, SymptomReport, UrgencyLevel};
use crate::provider::{ExplanationPrompt, ExplanationProvider, ProviderError};
use crate::red_flags::check_red_flags;
use crate::urgency::classify_urgency;
use crate::validation::validate_result;
use crate::TriageResult;
use std::sync::Arc;

/// Outcome of the rule-based stages, before any explanation text is chosen.
enum Assessment {
    Emergency(AnalysisResult),
    Heuristic {
        urgency: UrgencyLevel,
        causes: Vec<CandidateCause>,
    },
}

fn assess(report: &SymptomReport) -> TriageResult<Assessment> {
    if let Some(result) = check_red_flags(report)? {
        return Ok(Assessment::Emergency(result));
    }

    let urgency = classify_urgency(report);
    let causes = generate_causes(report)?;
    tracing::debug!(
        urgency = %urgency,
        causes = causes.len(),
        "heuristic assessment complete"
    );

    Ok(Assessment::Heuristic { urgency, causes })
}

fn finish(result: AnalysisResult) -> TriageResult<AnalysisResult> {
    validate_result(&result)?;
    Ok(result)
}

/// Classifies a report using template explanations only.
///
/// This is a pure function of the report: identical reports give identical results.
///
/// # Errors
///
/// Returns `TriageError::Internal` if the assembled result violates a result invariant.
pub fn classify(report: &SymptomReport) -> TriageResult<AnalysisResult> {
    match assess(report)? {
        Assessment::Emergency(result) => finish(result),
        Assessment::Heuristic { urgency, causes } => {
            let explanation = template_explanation(report, &causes);
            finish(AnalysisResult::new(
                urgency,
                causes,
                guidance_for(urgency),
                Vec::new(),
                explanation,
            ))
        }
    }
}

/// The triage engine with an optional explanation provider.
///
/// Holds only read-only configuration, so one instance can be shared across concurrent
/// requests.
#[derive(Clone)]
pub struct TriageEngine {
    cfg: Arc<CoreConfig>,
    provider: Option<Arc<dyn ExplanationProvider>>,
}

impl TriageEngine {
    /// Creates an engine that uses template explanations only.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            provider: None,
        }
    }

    /// Adds an explanation provider.
    pub fn with_provider(mut self, provider: Arc<dyn ExplanationProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Classifies a report.
    ///
    /// Provider failures, timeouts and safety rejections fall back to the template
    /// explanation and are never returned as errors.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Internal` if the assembled result violates a result invariant.
    pub async fn analyze(&self, report: &SymptomReport) -> TriageResult<AnalysisResult> {
        match assess(report)? {
            Assessment::Emergency(result) => finish(result),
            Assessment::Heuristic { urgency, causes } => {
                let explanation = self.explanation(report, &causes).await;
                finish(AnalysisResult::new(
                    urgency,
                    causes,
                    guidance_for(urgency),
                    Vec::new(),
                    explanation,
                ))
            }
        }
    }

    async fn explanation(&self, report: &SymptomReport, causes: &[CandidateCause]) -> String {
        let Some(provider) = self.provider.as_deref() else {
            return template_explanation(report, causes);
        };

        match self.delegate(provider, report).await {
            Some(text) => text,
            None => template_explanation(report, causes),
        }
    }

    /// Returns validated provider text, or `None` when the template must be used.
    async fn delegate(
        &self,
        provider: &dyn ExplanationProvider,
        report: &SymptomReport,
    ) -> Option<String> {
        let prompt = ExplanationPrompt::for_report(report);
        let attempts = 1 + u32::from(self.cfg.provider_retries());

        for attempt in 1..=attempts {
            let outcome =
                match tokio::time::timeout(self.cfg.provider_timeout(), provider.explain(&prompt))
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(ProviderError::Timeout),
                };

            match outcome {
                Ok(output) => {
                    if !output.possible_causes.is_empty() {
                        tracing::debug!(
                            provider = provider.name(),
                            suggested = output.possible_causes.len(),
                            "ignoring provider-suggested causes"
                        );
                    }

                    return match self.cfg.safety_policy().validate(&output) {
                        Ok(()) => Some(output.into_text()),
                        Err(violation) => {
                            tracing::warn!(
                                target: "triage::audit",
                                provider = provider.name(),
                                %violation,
                                "provider explanation rejected, using template"
                            );
                            None
                        }
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        attempt,
                        attempts,
                        error = %e,
                        "explanation provider failed"
                    );
                }
            }
        }

        None
    }
}
