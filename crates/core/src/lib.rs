//! # Triage Core
//!
//! Rule-based symptom triage for a single structured symptom report.
//!
//! The engine runs a fixed pipeline:
//! - red-flag matching, which overrides everything else,
//! - heuristic urgency classification,
//! - candidate cause generation and ranking,
//! - deterministic guidance and explanation text, optionally delegated to an
//!   [`ExplanationProvider`] whose output is gated by the [`SafetyPolicy`].
//!
//! **No API concerns**: HTTP servers, wire DTOs and CLI parsing belong in `api-rest`,
//! `api-shared` and `cli`. Concrete provider backends live in `triage-llm`.

pub mod causes;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod guidance;
pub mod model;
pub mod provider;
pub mod red_flags;
pub mod safety;
pub mod urgency;
pub mod validation;

pub use config::{CoreConfig, ProviderKind, ProviderSettings};
pub use engine::{classify, TriageEngine};
pub use error::{TriageError, TriageResult};
pub use model::{
    AnalysisResult, AssociatedSymptom, BodyRegion, CandidateCause, DurationUnit, Onset, PainType,
    SymptomReport, Trigger, UrgencyLevel,
};
pub use provider::{ExplanationPrompt, ExplanationProvider, ProviderError, ProviderExplanation};
pub use safety::{SafetyPolicy, SafetyViolation};
pub use triage_types::{Intensity, Probability};
