//! HTTP explanation providers for the triage engine.
//!
//! Each backend sends the safety preamble as system instructions and the full explanation
//! prompt as the user turn, then parses the reply as the JSON object the preamble asks for.
//! Retries and fallback are handled by the engine, so each `explain` call makes exactly one
//! request.

mod gemini;
mod openai;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use std::sync::Arc;
use std::time::Duration;
use triage_core::{
    ExplanationProvider, ProviderError, ProviderKind, ProviderSettings, TriageError, TriageResult,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the configured provider, or `None` when template explanations are selected.
///
/// # Errors
///
/// Returns `TriageError::Config` if the provider settings are unusable.
pub fn provider_from_settings(
    settings: &ProviderSettings,
    timeout: Duration,
) -> TriageResult<Option<Arc<dyn ExplanationProvider>>> {
    let provider: Arc<dyn ExplanationProvider> = match settings.kind {
        ProviderKind::None => return Ok(None),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(settings, timeout)?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(settings, timeout)?),
    };
    Ok(Some(provider))
}

/// Checks that `base_url` is a credential-free http(s) URL and strips trailing slashes.
pub(crate) fn validate_base_url(base_url: &str) -> TriageResult<String> {
    let base_url = base_url.trim_end_matches('/');

    let parsed = reqwest::Url::parse(base_url)
        .map_err(|e| TriageError::Config(format!("invalid provider URL '{base_url}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(TriageError::Config(format!(
            "provider URL must use http or https scheme, got: {}",
            parsed.scheme()
        )));
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(TriageError::Config(
            "provider URL must not contain credentials".into(),
        ));
    }

    Ok(base_url.to_string())
}

pub(crate) fn require_api_key(settings: &ProviderSettings) -> TriageResult<String> {
    settings
        .api_key
        .clone()
        .ok_or_else(|| TriageError::Config("provider API key is required".into()))
}

pub(crate) fn build_client(timeout: Duration) -> TriageResult<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .build()
        .map_err(|e| TriageError::Config(format!("failed to create HTTP client: {e}")))
}

pub(crate) fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(err.to_string())
    }
}
