//! Gemini API client.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use ugt_protocols::ProviderError;

use crate::types::*;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Characters of a non-JSON error body kept in the error message.
const ERROR_BODY_CHARS: usize = 200;

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .timeout(timeout)
                .build()
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Falling back to default HTTP client");
                    Client::new()
                }),
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate content (non-streaming).
    pub async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        debug!(model, "Gemini generate_content");
        let response = self.post(model, "generateContent", api_key, request).await?;
        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Unexpected Gemini response format: {}", e)))
    }

    /// Generate content (streaming). The body is a JSON array that grows
    /// as the model writes.
    pub async fn stream_generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, ProviderError> {
        debug!(model, "Gemini stream_generate_content");
        self.post(model, "streamGenerateContent", api_key, request).await
    }

    async fn post(
        &self,
        model: &str,
        method: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/models/{}:{}", self.base_url, model, method);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::network(&e, e.is_timeout(), self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("Gemini API error: {}", error_detail(status.as_u16(), &body));
            warn!(status = status.as_u16(), error = %message, "Gemini request failed");
            return Err(ProviderError::from_api_response(status.as_u16(), message));
        }

        Ok(response)
    }
}

/// `error.message` of the body, else the start of the raw body, else the
/// status code.
fn error_detail(status: u16, body: &str) -> String {
    if let Ok(error) = serde_json::from_str::<GeminiError>(body) {
        if let Some(message) = error.error.message.filter(|m| !m.trim().is_empty()) {
            return message;
        }
    }
    let snippet: String = body.trim().chars().take(ERROR_BODY_CHARS).collect();
    if snippet.is_empty() {
        status.to_string()
    } else {
        snippet
    }
}
