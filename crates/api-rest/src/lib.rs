//! # API REST
//!
//! REST API for the symptom triage engine.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON rejection mapping, CORS)
//!
//! Uses `api-shared` for wire types and `triage-core` for the engine itself.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    AnalysisRes, AnalyzeReq, ErrorRes, HealthRes, HealthService, PossibleCauseRes, ServiceInfoRes,
};
use triage_core::{SymptomReport, TriageEngine, TriageError};

/// Application state for the REST API server.
///
/// The engine holds only read-only configuration and is cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    engine: TriageEngine,
}

impl AppState {
    pub fn new(engine: TriageEngine) -> Self {
        Self { engine }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(root, health, analyze),
    components(schemas(
        AnalyzeReq,
        AnalysisRes,
        PossibleCauseRes,
        HealthRes,
        ServiceInfoRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with documentation routes and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Failure of a REST request.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal,
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => {
                tracing::error!("analysis error: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Analysis failed".to_string(),
            ),
        };
        (status, Json(ErrorRes { detail })).into_response()
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = ServiceInfoRes)
    )
)]
/// Service banner with name, version and status.
async fn root() -> Json<ServiceInfoRes> {
    Json(HealthService::service_info())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks. Does not touch the engine.
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzeReq,
    responses(
        (status = 200, description = "Triage result", body = AnalysisRes),
        (status = 400, description = "Invalid symptom report", body = ErrorRes),
        (status = 500, description = "Analysis failed", body = ErrorRes)
    )
)]
/// Analyse a symptom report
///
/// Validates the report at the boundary, runs the triage engine and returns the urgency
/// level, ranked possible causes, guidance, red flags and explanation.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the body is not valid JSON for this schema, or
/// - any field is outside its closed vocabulary or numeric range.
///
/// Returns `500 Internal Server Error` if the engine cannot produce a valid result.
#[axum::debug_handler]
async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeReq>, JsonRejection>,
) -> Result<Json<AnalysisRes>, ApiError> {
    let Json(req) = payload?;
    let report = SymptomReport::try_from(req)?;

    tracing::info!(
        body_region = %report.body_region,
        symptoms = report.associated_symptoms.len(),
        "analysing symptom report"
    );

    let result = state.engine.analyze(&report).await?;
    Ok(Json(AnalysisRes::from(&result)))
}
