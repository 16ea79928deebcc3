//! Prompt request sent to a provider.

use crate::error::ProviderError;

/// A fully-rendered prompt plus what the transport needs to send it.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub credential: String,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            credential: credential.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Requested model, falling back to the adapter default.
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.model.as_deref() {
            Some(model) if !model.trim().is_empty() => model,
            _ => default,
        }
    }

    /// Reject a blank credential before any network call.
    pub fn require_credential(&self, label: &str) -> Result<&str, ProviderError> {
        let credential = self.credential.trim();
        if credential.is_empty() {
            return Err(ProviderError::AuthenticationFailed(format!(
                "{} API key is required",
                label
            )));
        }
        Ok(credential)
    }
}
