//! Anthropic provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use ugt_protocols::provider::{
    sse_fragments, temperature_for, with_keepalive, DEFAULT_KEEPALIVE,
};
use ugt_protocols::{FragmentStream, PromptRequest, ProviderError, ProviderKind, TranslationProvider};

use crate::api::{api_error_message, ApiMessage, ApiRequest, ApiResponse};
use crate::parser::{parse_response, parse_stream_data};

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const API_VERSION: &str = "2023-06-01";

pub(crate) const SOURCE: &str = "anthropic";
const LABEL: &str = "Anthropic";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1200);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Output budget for `model`.
pub fn max_tokens_for(model: &str) -> u32 {
    if model.contains("claude-3-7-sonnet") {
        64000
    } else if model.contains("claude-3-5-sonnet") || model.contains("claude-3-5-haiku") {
        8192
    } else {
        4096
    }
}

/// Anthropic messages adapter.
pub struct AnthropicProvider {
    api_url: String,
    client: reqwest::Client,
    timeout: Duration,
    keepalive: Duration,
}

impl AnthropicProvider {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_API_URL)
    }

    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            client: build_client(DEFAULT_TIMEOUT),
            timeout: DEFAULT_TIMEOUT,
            keepalive: DEFAULT_KEEPALIVE,
        }
    }

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
            max_tokens: max_tokens_for(&model),
            temperature: temperature_for(&model),
            model,
            messages: vec![ApiMessage::user(request.prompt.clone())],
            stream: stream.then_some(true),
        }
    }

    async fn send_request(
        &self,
        request: &PromptRequest,
        stream: bool,
    ) -> Result<reqwest::Response, ProviderError> {
        let credential = request.require_credential(LABEL)?;
        let api_request = self.build_request(request, stream);
        debug!(
            model = %api_request.model,
            max_tokens = api_request.max_tokens,
            stream,
            "Sending Anthropic request"
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", credential)
            .header("anthropic-version", API_VERSION)
            .header("anthropic-dangerous-direct-browser-access", "true")
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ProviderError::network(&e, e.is_timeout(), self.timeout))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let detail = api_error_message(&body).unwrap_or_else(|| status.to_string());
            let message = format!("{} API error: {}", LABEL, detail);
            warn!(status, error = %message, "Anthropic request failed");
            return Err(ProviderError::from_api_response(status, message));
        }

        Ok(response)
    }
}

impl Default for AnthropicProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
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
        debug!("Anthropic stream connected");

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
