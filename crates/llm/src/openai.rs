//! OpenAI-compatible chat completions backend.

use crate::{build_client, require_api_key, transport_error, validate_base_url};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use triage_core::{
    ExplanationPrompt, ExplanationProvider, ProviderError, ProviderExplanation, ProviderSettings,
    TriageResult,
};

/// Sampling temperature; low for consistent, conservative wording.
const TEMPERATURE: f32 = 0.3;

/// Upper bound on generated tokens.
const MAX_TOKENS: u32 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Explanation provider backed by an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiProvider {
    /// Creates a provider from startup settings.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Config` if the base URL is not a credential-free http(s) URL,
    /// the API key is missing, or the HTTP client cannot be built.
    pub fn new(settings: &ProviderSettings, timeout: Duration) -> TriageResult<Self> {
        let base_url = validate_base_url(&settings.base_url)?;
        let api_key = require_api_key(settings)?;
        let client = build_client(timeout)?;

        tracing::info!("openai explanation provider configured for {}", base_url);

        Ok(Self {
            client,
            endpoint: format!("{base_url}/v1/chat/completions"),
            model: settings.model.clone(),
            api_key,
        })
    }

    fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| ProviderError::Unavailable("API key is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn request<'a>(&'a self, prompt: &ExplanationPrompt) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: prompt.preamble().into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: prompt.as_str().into(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        }
    }
}

#[async_trait]
impl ExplanationProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn explain(
        &self,
        prompt: &ExplanationPrompt,
    ) -> Result<ProviderExplanation, ProviderError> {
        debug!("requesting explanation from {} with model {}", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers()?)
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("invalid completion body: {e}")))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Malformed("no response choices returned".into()))?;

        ProviderExplanation::from_json(&content)
    }
}
