//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the engine. The helpers here take raw values rather than reading process-wide
//! environment variables, so request handling never observes configuration changes and tests
//! can build configurations directly.

use crate::constants::{DEFAULT_PROVIDER_RETRIES, DEFAULT_PROVIDER_TIMEOUT, MAX_PROVIDER_RETRIES};
use crate::safety::SafetyPolicy;
use crate::{TriageError, TriageResult};
use std::path::PathBuf;
use std::time::Duration;

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_PROVIDER_URL: &str = "https://api.openai.com";

/// Default model requested from the provider.
pub const DEFAULT_PROVIDER_MODEL: &str = "gpt-4";

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    provider_timeout: Duration,
    provider_retries: u8,
    safety_policy: SafetyPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            provider_retries: DEFAULT_PROVIDER_RETRIES,
            safety_policy: SafetyPolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Config` if the timeout is zero or more than one retry is requested.
    pub fn new(
        provider_timeout: Duration,
        provider_retries: u8,
        safety_policy: SafetyPolicy,
    ) -> TriageResult<Self> {
        if provider_timeout.is_zero() {
            return Err(TriageError::Config(
                "provider timeout must be greater than zero".into(),
            ));
        }

        if provider_retries > MAX_PROVIDER_RETRIES {
            return Err(TriageError::Config(format!(
                "provider retries cannot exceed {MAX_PROVIDER_RETRIES}"
            )));
        }

        Ok(Self {
            provider_timeout,
            provider_retries,
            safety_policy,
        })
    }

    pub fn provider_timeout(&self) -> Duration {
        self.provider_timeout
    }

    pub fn provider_retries(&self) -> u8 {
        self.provider_retries
    }

    pub fn safety_policy(&self) -> &SafetyPolicy {
        &self.safety_policy
    }
}

/// Which explanation backend to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    /// Template explanations only.
    None,
    /// An OpenAI-compatible chat completions API.
    OpenAi,
    /// Google Gemini `generateContent`.
    Gemini,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::None => "none",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Vendor-specific variable holding the API key, used when no explicit key is configured.
    pub fn vendor_key_env(self) -> Option<&'static str> {
        match self {
            ProviderKind::None => None,
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Gemini => Some("GEMINI_API_KEY"),
        }
    }

    fn default_url(self) -> &'static str {
        match self {
            ProviderKind::Gemini => DEFAULT_GEMINI_URL,
            ProviderKind::None | ProviderKind::OpenAi => DEFAULT_PROVIDER_URL,
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => DEFAULT_GEMINI_MODEL,
            ProviderKind::None | ProviderKind::OpenAi => DEFAULT_PROVIDER_MODEL,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "template" => Ok(ProviderKind::None),
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(TriageError::Config(format!(
                "unsupported explanation provider: {other}"
            ))),
        }
    }
}

/// Connection settings for an external explanation provider.
#[derive(Clone, Debug)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl ProviderSettings {
    /// Builds provider settings from optional raw values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Config` for an unknown provider kind, or a remote provider
    /// without an API key.
    pub fn from_values(
        kind: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
        api_key: Option<String>,
    ) -> TriageResult<Self> {
        let kind = kind
            .map(|k| k.parse::<ProviderKind>())
            .transpose()?
            .unwrap_or(ProviderKind::None);
        let api_key = non_blank(api_key);

        if kind != ProviderKind::None && api_key.is_none() {
            return Err(TriageError::Config(format!(
                "the {kind} provider requires an API key"
            )));
        }

        Ok(Self {
            kind,
            base_url: non_blank(base_url).unwrap_or_else(|| kind.default_url().into()),
            model: non_blank(model).unwrap_or_else(|| kind.default_model().into()),
            api_key,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the provider timeout in milliseconds from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn provider_timeout_from_env_value(value: Option<String>) -> TriageResult<Duration> {
    match non_blank(value) {
        None => Ok(DEFAULT_PROVIDER_TIMEOUT),
        Some(v) => v
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| TriageError::Config(format!("invalid provider timeout '{v}'"))),
    }
}

/// Parse the provider retry count from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default retry count.
pub fn provider_retries_from_env_value(value: Option<String>) -> TriageResult<u8> {
    match non_blank(value) {
        None => Ok(DEFAULT_PROVIDER_RETRIES),
        Some(v) => v
            .parse::<u8>()
            .map_err(|_| TriageError::Config(format!("invalid provider retry count '{v}'"))),
    }
}

/// Resolve the safety policy, extending the built-in denylist from `path` when given.
pub fn resolve_safety_policy(path: Option<PathBuf>) -> TriageResult<SafetyPolicy> {
    match path {
        Some(path) => {
            tracing::info!("loading additional forbidden phrases from {}", path.display());
            SafetyPolicy::load_yaml(&path)
        }
        None => Ok(SafetyPolicy::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_timeout() {
        let err = CoreConfig::new(Duration::ZERO, 0, SafetyPolicy::default())
            .expect_err("zero timeout");
        assert!(matches!(err, TriageError::Config(msg) if msg.contains("timeout")));
    }

    #[test]
    fn rejects_more_than_one_retry() {
        let err = CoreConfig::new(Duration::from_secs(1), 2, SafetyPolicy::default())
            .expect_err("two retries");
        assert!(matches!(err, TriageError::Config(msg) if msg.contains("retries")));
    }

    #[test]
    fn provider_kind_parses_known_values() {
        assert_eq!("none".parse::<ProviderKind>().unwrap(), ProviderKind::None);
        assert_eq!(" OpenAI ".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert!("claude".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn provider_settings_apply_defaults() {
        let settings = ProviderSettings::from_values(None, None, Some("  ".into()), None).unwrap();
        assert_eq!(settings.kind, ProviderKind::None);
        assert_eq!(settings.base_url, DEFAULT_PROVIDER_URL);
        assert_eq!(settings.model, DEFAULT_PROVIDER_MODEL);
    }

    #[test]
    fn openai_provider_requires_api_key() {
        let err = ProviderSettings::from_values(Some("openai".into()), None, None, None)
            .expect_err("missing key");
        assert!(matches!(err, TriageError::Config(msg) if msg.contains("API key")));

        let settings =
            ProviderSettings::from_values(Some("openai".into()), None, None, Some("sk-x".into()))
                .unwrap();
        assert_eq!(settings.kind, ProviderKind::OpenAi);
    }

    #[test]
    fn gemini_settings_use_gemini_defaults() {
        let err = ProviderSettings::from_values(Some("gemini".into()), None, None, None)
            .expect_err("missing key");
        assert!(matches!(err, TriageError::Config(msg) if msg.contains("gemini provider")));

        let settings =
            ProviderSettings::from_values(Some("gemini".into()), None, None, Some("g-key".into()))
                .unwrap();
        assert_eq!(settings.kind, ProviderKind::Gemini);
        assert_eq!(settings.base_url, DEFAULT_GEMINI_URL);
        assert_eq!(settings.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(ProviderKind::Gemini.vendor_key_env(), Some("GEMINI_API_KEY"));
    }

    #[test]
    fn timeout_and_retries_from_env_values() {
        assert_eq!(
            provider_timeout_from_env_value(None).unwrap(),
            DEFAULT_PROVIDER_TIMEOUT
        );
        assert_eq!(
            provider_timeout_from_env_value(Some("250".into())).unwrap(),
            Duration::from_millis(250)
        );
        assert!(provider_timeout_from_env_value(Some("soon".into())).is_err());

        assert_eq!(provider_retries_from_env_value(Some(" ".into())).unwrap(), 1);
        assert_eq!(provider_retries_from_env_value(Some("0".into())).unwrap(), 0);
        assert!(provider_retries_from_env_value(Some("-1".into())).is_err());
    }

    #[test]
    fn safety_policy_defaults_without_path() {
        assert_eq!(resolve_safety_policy(None).unwrap(), SafetyPolicy::default());
    }
}
