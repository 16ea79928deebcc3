//! OpenAI provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use ugt_protocols::provider::{
    sse_fragments, temperature_for, with_keepalive, DEFAULT_KEEPALIVE,
};
use ugt_protocols::{FragmentStream, PromptRequest, ProviderError, ProviderKind, TranslationProvider};

use crate::api::{api_error_message, ApiMessage, ApiRequest, ApiResponse};
use crate::parser::{parse_response, parse_stream_data};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub(crate) const SOURCE: &str = "openai";
const LABEL: &str = "OpenAI";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1200);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenAI chat completions adapter.
pub struct OpenAiProvider {
    api_url: String,
    client: reqwest::Client,
    timeout: Duration,
    keepalive: Duration,
}

impl OpenAiProvider {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_API_URL)
    }

    /// Create provider with a custom endpoint (for OpenAI-compatible APIs).
    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            client: build_client(DEFAULT_TIMEOUT),
            timeout: DEFAULT_TIMEOUT,
            keepalive: DEFAULT_KEEPALIVE,
        }
    }

    /// Hard cap on a whole call, body included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self.timeout = timeout;
        self
    }

    pub fn with_keepalive_period(mut self, period: Duration) -> Self {
        self.keepalive = period;
        self
    }

    fn build_request(&self, request: &PromptRequest, stream: bool) -> ApiRequest {
        let model = request.model_or(self.default_model()).to_string();
        ApiRequest {
            temperature: temperature_for(&model),
            model,
            messages: vec![ApiMessage::user(request.prompt.clone())],
            stream,
        }
    }

    async fn send_request(
        &self,
        request: &PromptRequest,
        stream: bool,
    ) -> Result<reqwest::Response, ProviderError> {
        let credential = request.require_credential(LABEL)?;
        let api_request = self.build_request(request, stream);
        debug!(model = %api_request.model, stream, "Sending OpenAI request");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(credential)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ProviderError::network(&e, e.is_timeout(), self.timeout))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = match api_error_message(&body) {
                Some(message) => format!("{} API error: {}", LABEL, message),
                None => format!("{} API error: {}", LABEL, status),
            };
            warn!(status, error = %message, "OpenAI request failed");
            return Err(ProviderError::from_api_response(status, message));
        }

        Ok(response)
    }
}

impl Default for OpenAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn complete(&self, request: PromptRequest) -> Result<String, ProviderError> {
        let response = self.send_request(&request, false).await?;
        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        parse_response(api_response)
    }

    async fn stream(&self, request: PromptRequest) -> Result<FragmentStream, ProviderError> {
        let response = self.send_request(&request, true).await?;
        debug!("OpenAI stream connected");

        let fragments = sse_fragments(SOURCE, response.bytes_stream(), parse_stream_data);
        Ok(with_keepalive(fragments, self.keepalive))
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
