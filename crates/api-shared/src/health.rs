use crate::dto::{HealthRes, ServiceInfoRes};

/// Simple health service shared by every front end.
///
/// Provides the standard liveness and service banner responses.
pub struct HealthService;

impl HealthService {
    /// Liveness check. Never consults the engine or the explanation provider.
    pub fn check_health() -> HealthRes {
        HealthRes {
            status: "healthy".into(),
        }
    }

    /// Service banner returned from the root route.
    pub fn service_info() -> ServiceInfoRes {
        ServiceInfoRes {
            message: "Symptom Checker API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            status: "operational".into(),
        }
    }
}
