//! # API Shared
//!
//! Wire-level definitions shared by the triage front ends.
//!
//! Contains:
//! - Request and response DTOs with OpenAPI schemas (`dto` module)
//! - Conversion from raw requests into validated [`triage_core::SymptomReport`]s
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the `triage-run` binary.

pub mod dto;
pub mod health;

pub use dto::{AnalysisRes, AnalyzeReq, ErrorRes, HealthRes, PossibleCauseRes, ServiceInfoRes};
pub use health::HealthService;
