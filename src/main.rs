use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use triage_core::config::{
    provider_retries_from_env_value, provider_timeout_from_env_value, resolve_safety_policy,
};
use triage_core::{CoreConfig, ProviderKind, ProviderSettings, TriageEngine};
use triage_llm::provider_from_settings;

/// Main entry point for the triage service
///
/// Resolves configuration once from the environment, builds the engine and serves the REST API.
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `TRIAGE_PROVIDER`: explanation provider, `none`, `openai` or `gemini` (default: "none")
/// - `TRIAGE_PROVIDER_URL`: provider base URL (default depends on the provider)
/// - `TRIAGE_PROVIDER_MODEL`: model name (default: "gpt-4" or "gemini-pro")
/// - `TRIAGE_PROVIDER_API_KEY`, else `OPENAI_API_KEY` / `GEMINI_API_KEY`: provider API key
/// - `TRIAGE_PROVIDER_TIMEOUT_MS`: per-attempt provider timeout (default: 5000)
/// - `TRIAGE_PROVIDER_RETRIES`: provider retries, 0 or 1 (default: 1)
/// - `TRIAGE_SAFETY_POLICY`: YAML file of extra forbidden phrases
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any configuration value is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let cfg = Arc::new(CoreConfig::new(
        provider_timeout_from_env_value(std::env::var("TRIAGE_PROVIDER_TIMEOUT_MS").ok())?,
        provider_retries_from_env_value(std::env::var("TRIAGE_PROVIDER_RETRIES").ok())?,
        resolve_safety_policy(std::env::var("TRIAGE_SAFETY_POLICY").ok().map(PathBuf::from))?,
    )?);

    let provider_kind = std::env::var("TRIAGE_PROVIDER").ok();
    let vendor_key_env = provider_kind
        .as_deref()
        .map(str::parse::<ProviderKind>)
        .transpose()?
        .and_then(ProviderKind::vendor_key_env);
    let api_key = std::env::var("TRIAGE_PROVIDER_API_KEY")
        .ok()
        .or_else(|| vendor_key_env.and_then(|name| std::env::var(name).ok()));

    let settings = ProviderSettings::from_values(
        provider_kind,
        std::env::var("TRIAGE_PROVIDER_URL").ok(),
        std::env::var("TRIAGE_PROVIDER_MODEL").ok(),
        api_key,
    )?;

    let mut engine = TriageEngine::new(cfg.clone());
    if let Some(provider) = provider_from_settings(&settings, cfg.provider_timeout())? {
        engine = engine.with_provider(provider);
    }

    tracing::info!(
        "++ Explanation provider: {}",
        engine.provider_name().unwrap_or("template")
    );
    tracing::info!("++ Starting triage REST on {}", rest_addr);

    let app = router(AppState::new(engine));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
