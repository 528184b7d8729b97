//! Google Gemini `generateContent` backend.

use crate::{build_client, require_api_key, transport_error, validate_base_url};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use triage_core::{
    ExplanationPrompt, ExplanationProvider, ProviderError, ProviderExplanation, ProviderSettings,
    TriageResult,
};

const TEMPERATURE: f32 = 0.3;
const MAX_OUTPUT_TOKENS: u32 = 500;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Explanation provider backed by the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiProvider {
    /// Creates a provider from startup settings.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Config` if the base URL is unusable, the API key is missing, or
    /// the HTTP client cannot be built.
    pub fn new(settings: &ProviderSettings, timeout: Duration) -> TriageResult<Self> {
        let base_url = validate_base_url(&settings.base_url)?;
        let api_key = require_api_key(settings)?;
        let client = build_client(timeout)?;

        tracing::info!("gemini explanation provider configured for {}", base_url);

        Ok(Self {
            client,
            endpoint: format!(
                "{base_url}/v1beta/models/{}:generateContent",
                settings.model
            ),
            api_key,
        })
    }

    fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| ProviderError::Unavailable("API key is not a valid header value".into()))?;
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn request(&self, prompt: &ExplanationPrompt) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: prompt.preamble().into(),
                }],
            },
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: prompt.as_str().into(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

#[async_trait]
impl ExplanationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn explain(
        &self,
        prompt: &ExplanationPrompt,
    ) -> Result<ProviderExplanation, ProviderError> {
        debug!("requesting explanation from {}", self.endpoint);

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

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("invalid generateContent body: {e}")))?;

        // A blocked prompt comes back with no candidates.
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .ok_or_else(|| ProviderError::Malformed("no candidates returned".into()))?;

        ProviderExplanation::from_json(&text)
    }
}
