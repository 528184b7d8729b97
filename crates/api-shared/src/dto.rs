//! Request and response bodies for the triage APIs.
//!
//! Requests arrive with closed-vocabulary fields as plain strings so that an unknown value is
//! reported by name as an invalid-input error rather than as an opaque JSON rejection.

use serde::{Deserialize, Serialize};
use triage_core::model::parse_all;
use triage_core::validation::{dedup_preserving_order, duration_value_from_raw, intensity_from_raw};
use triage_core::{AnalysisResult, CandidateCause, SymptomReport, TriageError};
use utoipa::ToSchema;

/// Symptom report as submitted by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeReq {
    #[schema(example = "abdomenLowerRight")]
    pub body_region: String,
    #[serde(default)]
    #[schema(example = "sharp")]
    pub pain_type: Option<String>,
    #[serde(default)]
    #[schema(example = 7, minimum = 0, maximum = 10)]
    pub intensity: Option<i64>,
    #[serde(default)]
    #[schema(example = "hours")]
    pub duration: Option<String>,
    #[serde(default)]
    #[schema(example = 6, minimum = 1)]
    pub duration_value: Option<i64>,
    #[serde(default)]
    #[schema(example = "sudden")]
    pub onset: Option<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub associated_symptoms: Vec<String>,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub biological_sex: Option<String>,
    #[schema(example = "2024-01-01T12:00:00Z")]
    pub timestamp: String,
}

fn parse_optional<T>(value: Option<String>) -> Result<Option<T>, TriageError>
where
    T: std::str::FromStr<Err = TriageError>,
{
    value.map(|v| v.parse()).transpose()
}

impl TryFrom<AnalyzeReq> for SymptomReport {
    type Error = TriageError;

    fn try_from(req: AnalyzeReq) -> Result<Self, Self::Error> {
        Ok(SymptomReport {
            body_region: req.body_region.parse()?,
            pain_type: parse_optional(req.pain_type)?,
            intensity: intensity_from_raw(req.intensity)?,
            duration: parse_optional(req.duration)?,
            duration_value: duration_value_from_raw(req.duration_value)?,
            onset: parse_optional(req.onset)?,
            triggers: dedup_preserving_order(parse_all(req.triggers.as_slice())?),
            associated_symptoms: dedup_preserving_order(parse_all(req.associated_symptoms.as_slice())?),
            age_range: req.age_range,
            biological_sex: req.biological_sex,
            timestamp: req.timestamp,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PossibleCauseRes {
    pub name: String,
    pub description: String,
    /// Likelihood in `[0, 1]`.
    #[schema(example = 0.6)]
    pub probability: f64,
    pub matching_symptoms: Vec<String>,
}

impl From<&CandidateCause> for PossibleCauseRes {
    fn from(cause: &CandidateCause) -> Self {
        Self {
            name: cause.name.clone(),
            description: cause.description.clone(),
            probability: cause.probability.value(),
            matching_symptoms: cause.matching_symptoms.clone(),
        }
    }
}

/// Outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRes {
    #[schema(example = "emergency")]
    pub urgency_level: String,
    pub possible_causes: Vec<PossibleCauseRes>,
    pub guidance: String,
    pub red_flags: Vec<String>,
    pub ai_explanation: String,
    pub is_emergency: bool,
}

impl From<&AnalysisResult> for AnalysisRes {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            urgency_level: result.urgency_level().as_str().to_string(),
            possible_causes: result.possible_causes().iter().map(Into::into).collect(),
            guidance: result.guidance().to_string(),
            red_flags: result.red_flags().to_vec(),
            ai_explanation: result.ai_explanation().to_string(),
            is_emergency: result.is_emergency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    #[schema(example = "healthy")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfoRes {
    pub message: String,
    pub version: String,
    pub status: String,
}

/// Error body returned with 4xx and 5xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    #[schema(example = "Analysis failed")]
    pub detail: String,
}
