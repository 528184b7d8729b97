//! Symptom report, candidate cause and analysis result types.
//!
//! All enumerations are closed vocabularies. Their wire names (camelCase, as sent by clients)
//! are the only accepted spellings; anything else is rejected with
//! [`TriageError::InvalidInput`] before the engine runs.

use crate::{TriageError, TriageResult};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use triage_types::{Intensity, Probability};

/// Declares a closed vocabulary enum with its wire spelling, `FromStr` and `Display`.
macro_rules! closed_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every member of the vocabulary, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire spelling of this value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = TriageError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(TriageError::InvalidInput(format!(
                        "unknown {} '{}'",
                        $kind, other
                    ))),
                }
            }
        }
    };
}

closed_vocabulary! {
    /// Anatomical zone the symptoms are reported in.
    BodyRegion, "body region" {
        HeadFront => "headFront",
        HeadBack => "headBack",
        HeadLeft => "headLeft",
        HeadRight => "headRight",
        Chest => "chest",
        AbdomenUpperLeft => "abdomenUpperLeft",
        AbdomenUpperRight => "abdomenUpperRight",
        AbdomenLowerLeft => "abdomenLowerLeft",
        AbdomenLowerRight => "abdomenLowerRight",
    }
}

impl BodyRegion {
    pub fn is_head(self) -> bool {
        matches!(
            self,
            BodyRegion::HeadFront | BodyRegion::HeadBack | BodyRegion::HeadLeft | BodyRegion::HeadRight
        )
    }

    pub fn is_abdomen(self) -> bool {
        matches!(
            self,
            BodyRegion::AbdomenUpperLeft
                | BodyRegion::AbdomenUpperRight
                | BodyRegion::AbdomenLowerLeft
                | BodyRegion::AbdomenLowerRight
        )
    }
}

closed_vocabulary! {
    PainType, "pain type" {
        Sharp => "sharp",
        Dull => "dull",
        Burning => "burning",
        Pressure => "pressure",
        Stabbing => "stabbing",
        Throbbing => "throbbing",
        Cramping => "cramping",
    }
}

closed_vocabulary! {
    /// Unit of the reported symptom duration.
    DurationUnit, "duration unit" {
        Minutes => "minutes",
        Hours => "hours",
        Days => "days",
        Weeks => "weeks",
        Months => "months",
    }
}

closed_vocabulary! {
    Onset, "onset" {
        Sudden => "sudden",
        Gradual => "gradual",
    }
}

closed_vocabulary! {
    Trigger, "trigger" {
        Movement => "movement",
        Breathing => "breathing",
        Eating => "eating",
        Stress => "stress",
        Touch => "touch",
        Rest => "rest",
        None => "none",
    }
}

closed_vocabulary! {
    AssociatedSymptom, "associated symptom" {
        Fever => "fever",
        Nausea => "nausea",
        Vomiting => "vomiting",
        Dizziness => "dizziness",
        ShortnessOfBreath => "shortnessOfBreath",
        RadiatingPain => "radiatingPain",
        Numbness => "numbness",
        Weakness => "weakness",
        Confusion => "confusion",
        VisionChanges => "visionChanges",
        HearingChanges => "hearingChanges",
        ChestPain => "chestPain",
        Palpitations => "palpitations",
        Sweating => "sweating",
        Chills => "chills",
        Fatigue => "fatigue",
        LossOfAppetite => "lossOfAppetite",
        BloodInStool => "bloodInStool",
        BloodInVomit => "bloodInVomit",
        SevereHeadache => "severeHeadache",
        NeckStiffness => "neckStiffness",
    }
}

/// Ordinal urgency tier. Declaration order is severity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Emergency,
}

impl UrgencyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
            UrgencyLevel::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One triage episode as reported by the user.
///
/// `triggers` and `associated_symptoms` have set semantics: use
/// [`crate::validation::dedup_preserving_order`] when building a report from raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomReport {
    pub body_region: BodyRegion,
    #[serde(default)]
    pub pain_type: Option<PainType>,
    #[serde(default)]
    pub intensity: Option<Intensity>,
    #[serde(default)]
    pub duration: Option<DurationUnit>,
    #[serde(default)]
    pub duration_value: Option<NonZeroU32>,
    #[serde(default)]
    pub onset: Option<Onset>,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    #[serde(default)]
    pub associated_symptoms: Vec<AssociatedSymptom>,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub biological_sex: Option<String>,
    /// Caller-supplied and never interpreted by the engine.
    pub timestamp: String,
}

impl SymptomReport {
    /// A report carrying only the mandatory fields.
    pub fn new(body_region: BodyRegion, timestamp: impl Into<String>) -> Self {
        Self {
            body_region,
            pain_type: None,
            intensity: None,
            duration: None,
            duration_value: None,
            onset: None,
            triggers: Vec::new(),
            associated_symptoms: Vec::new(),
            age_range: None,
            biological_sex: None,
            timestamp: timestamp.into(),
        }
    }

    pub fn has_symptom(&self, symptom: AssociatedSymptom) -> bool {
        self.associated_symptoms.contains(&symptom)
    }

    /// Reported intensity, with an absent value read as 0.
    pub fn intensity_or_zero(&self) -> u8 {
        self.intensity.map(Intensity::value).unwrap_or(0)
    }
}

/// A named, probability-scored, non-diagnostic explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateCause {
    pub name: String,
    pub description: String,
    pub probability: Probability,
    pub matching_symptoms: Vec<String>,
}

/// The complete outcome of one classification.
///
/// Fields are read-only; `is_emergency` is derived from `urgency_level` at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    urgency_level: UrgencyLevel,
    possible_causes: Vec<CandidateCause>,
    guidance: String,
    red_flags: Vec<String>,
    ai_explanation: String,
    is_emergency: bool,
}

impl AnalysisResult {
    pub fn new(
        urgency_level: UrgencyLevel,
        possible_causes: Vec<CandidateCause>,
        guidance: impl Into<String>,
        red_flags: Vec<String>,
        ai_explanation: impl Into<String>,
    ) -> Self {
        Self {
            urgency_level,
            possible_causes,
            guidance: guidance.into(),
            red_flags,
            ai_explanation: ai_explanation.into(),
            is_emergency: urgency_level == UrgencyLevel::Emergency,
        }
    }

    pub fn urgency_level(&self) -> UrgencyLevel {
        self.urgency_level
    }

    pub fn possible_causes(&self) -> &[CandidateCause] {
        &self.possible_causes
    }

    pub fn guidance(&self) -> &str {
        &self.guidance
    }

    pub fn red_flags(&self) -> &[String] {
        &self.red_flags
    }

    pub fn ai_explanation(&self) -> &str {
        &self.ai_explanation
    }

    pub fn is_emergency(&self) -> bool {
        self.is_emergency
    }
}

/// Parses a list of wire spellings into closed vocabulary values.
pub fn parse_all<T>(values: &[impl AsRef<str>]) -> TriageResult<Vec<T>>
where
    T: std::str::FromStr<Err = TriageError>,
{
    values.iter().map(|v| v.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_round_trips_wire_names() {
        for symptom in AssociatedSymptom::ALL {
            let parsed: AssociatedSymptom = symptom.as_str().parse().expect("wire name parses");
            assert_eq!(parsed, *symptom);
        }
        assert_eq!(AssociatedSymptom::ALL.len(), 21);
        assert_eq!(BodyRegion::ALL.len(), 9);
    }

    #[test]
    fn unknown_vocabulary_value_is_invalid_input() {
        let err = "elbow".parse::<BodyRegion>().expect_err("unknown region");
        assert!(matches!(err, TriageError::InvalidInput(msg) if msg.contains("body region 'elbow'")));
    }

    #[test]
    fn vocabulary_is_case_sensitive() {
        assert!("Chest".parse::<BodyRegion>().is_err());
        assert!("shortness_of_breath".parse::<AssociatedSymptom>().is_err());
    }

    #[test]
    fn urgency_levels_are_ordinal() {
        assert!(UrgencyLevel::Low < UrgencyLevel::Medium);
        assert!(UrgencyLevel::Medium < UrgencyLevel::High);
        assert!(UrgencyLevel::High < UrgencyLevel::Emergency);
    }

    #[test]
    fn region_groups() {
        assert!(BodyRegion::HeadLeft.is_head());
        assert!(!BodyRegion::Chest.is_head());
        assert!(BodyRegion::AbdomenLowerLeft.is_abdomen());
        assert!(!BodyRegion::Chest.is_abdomen());
    }

    #[test]
    fn report_deserializes_from_wire_json() {
        let report: SymptomReport = serde_json::from_str(
            r#"{
                "bodyRegion": "abdomenLowerRight",
                "painType": "cramping",
                "intensity": 7,
                "duration": "days",
                "durationValue": 2,
                "associatedSymptoms": ["nausea"],
                "timestamp": "2024-05-01T10:00:00Z"
            }"#,
        )
        .expect("valid report");

        assert_eq!(report.body_region, BodyRegion::AbdomenLowerRight);
        assert_eq!(report.intensity_or_zero(), 7);
        assert!(report.has_symptom(AssociatedSymptom::Nausea));
        assert!(report.triggers.is_empty());
    }

    #[test]
    fn report_rejects_unknown_symptom() {
        let err = serde_json::from_str::<SymptomReport>(
            r#"{"bodyRegion": "chest", "associatedSymptoms": ["hiccups"], "timestamp": "t"}"#,
        )
        .expect_err("unknown symptom");
        assert!(err.to_string().contains("hiccups"));
    }

    #[test]
    fn report_rejects_zero_duration_value() {
        assert!(serde_json::from_str::<SymptomReport>(
            r#"{"bodyRegion": "chest", "durationValue": 0, "timestamp": "t"}"#,
        )
        .is_err());
    }

    #[test]
    fn result_derives_emergency_flag_from_urgency() {
        let result = AnalysisResult::new(UrgencyLevel::High, vec![], "g", vec![], "e");
        assert!(!result.is_emergency());

        let result = AnalysisResult::new(UrgencyLevel::Emergency, vec![], "g", vec![], "e");
        assert!(result.is_emergency());
    }

    #[test]
    fn result_serializes_camel_case_fields() {
        let result = AnalysisResult::new(UrgencyLevel::Low, vec![], "g", vec![], "e");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["urgencyLevel"], "low");
        assert_eq!(json["isEmergency"], false);
        assert!(json["redFlags"].as_array().unwrap().is_empty());
        assert_eq!(json["aiExplanation"], "e");
    }

    #[test]
    fn parse_all_stops_at_first_unknown_value() {
        let ok: Vec<Trigger> = parse_all(&["movement", "rest"]).unwrap();
        assert_eq!(ok, vec![Trigger::Movement, Trigger::Rest]);
        assert!(parse_all::<Trigger>(&["movement", "sneezing"]).is_err());
    }
}
