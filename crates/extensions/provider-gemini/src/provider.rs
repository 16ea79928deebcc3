//! Gemini provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use ugt_protocols::provider::{temperature_for, with_keepalive, DEFAULT_KEEPALIVE};
use ugt_protocols::{FragmentStream, PromptRequest, ProviderError, ProviderKind, TranslationProvider};

use crate::client::GeminiClient;
use crate::parser::{object_fragments, response_texts};
use crate::types::GenerateContentRequest;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub(crate) const SOURCE: &str = "gemini";
const CREDENTIAL_LABEL: &str = "Google Gemini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1200);

/// Gemini adapter.
pub struct GeminiProvider {
    client: GeminiClient,
    keepalive: Duration,
}

impl GeminiProvider {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_BASE_URL)
    }

    /// `base_url` is the API root; `/models/{model}:{method}` is appended.
    pub fn with_url(base_url: impl Into<String>) -> Self {
        Self {
            client: GeminiClient::new(base_url, DEFAULT_TIMEOUT),
            keepalive: DEFAULT_KEEPALIVE,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = GeminiClient::new(self.client.base_url().to_string(), timeout);
        self
    }

    pub fn with_keepalive_period(mut self, period: Duration) -> Self {
        self.keepalive = period;
        self
    }

    fn build_request(&self, request: &PromptRequest) -> (String, GenerateContentRequest) {
        let model = request.model_or(self.default_model()).to_string();
        let body = GenerateContentRequest::user_prompt(request.prompt.clone(), temperature_for(&model));
        (model, body)
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn complete(&self, request: PromptRequest) -> Result<String, ProviderError> {
        let api_key = request.require_credential(CREDENTIAL_LABEL)?;
        let (model, body) = self.build_request(&request);

        let response = self.client.generate_content(&model, api_key, &body).await?;
        if response.candidates.is_empty() && response.error.is_none() {
            return Err(ProviderError::InvalidResponse(
                "Unexpected Gemini response format".to_string(),
            ));
        }
        Ok(response_texts(response).concat())
    }

    async fn stream(&self, request: PromptRequest) -> Result<FragmentStream, ProviderError> {
        let api_key = request.require_credential(CREDENTIAL_LABEL)?;
        let (model, body) = self.build_request(&request);

        let response = self
            .client
            .stream_generate_content(&model, api_key, &body)
            .await?;
        debug!(model = %model, "Gemini stream connected");

        Ok(with_keepalive(
            object_fragments(response.bytes_stream()),
            self.keepalive,
        ))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
