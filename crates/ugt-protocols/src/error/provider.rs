//! Provider transport errors.

use std::fmt::Display;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Context length exceeded: {0}")]
    ContextLengthExceeded(String),

    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    /// A success response whose body could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

impl ProviderError {
    /// Classify a non-success HTTP response.
    ///
    /// `message` should already carry the provider label, e.g.
    /// `"OpenAI API error: Invalid API key"`.
    pub fn from_api_response(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();

        match status {
            401 | 403 => Self::AuthenticationFailed(message),
            429 => Self::RateLimited(message),
            400 | 413 if lower.contains("context length")
                || lower.contains("context_length")
                || lower.contains("too many tokens") =>
            {
                Self::ContextLengthExceeded(message)
            }
            400 if lower.contains("safety") || lower.contains("content filter") => {
                Self::ContentFiltered(message)
            }
            400 | 404 | 422 => Self::InvalidRequest(message),
            _ => Self::ApiError { status, message },
        }
    }

    /// Map a client-side transport failure.
    pub fn network(err: impl Display, timed_out: bool, timeout: Duration) -> Self {
        if timed_out {
            Self::Timeout(timeout.as_secs())
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Whether the failure points at the credential.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
