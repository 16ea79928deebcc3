//! Operation-level translation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ProviderError;

/// Phrases that mark a failure message as credential-related.
const CREDENTIAL_KEYWORDS: &[&str] = &[
    "api key",
    "missing key",
    "invalid key",
    "authentication",
    "credentials",
    "token",
    "api_key",
    "api-key",
];

/// Errors that end a translation operation.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("No API key configured for {provider}")]
    MissingCredential { provider: String },

    #[error("Transport error: {0}")]
    Transport(#[from] ProviderError),

    #[error("Selection contains no translatable text")]
    EmptySelection,

    #[error("Connection timed out after {idle_secs} seconds of inactivity")]
    ConnectionLost { idle_secs: u64 },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Translation cancelled")]
    Cancelled,
}

/// Coarse classification of a [`TranslationError`], reported upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingCredential,
    Transport,
    MalformedChunk,
    EmptySelection,
    ConnectionLost,
    UnknownProvider,
    Cancelled,
}

impl TranslationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential { .. } => ErrorKind::MissingCredential,
            Self::Transport(_) => ErrorKind::Transport,
            Self::EmptySelection => ErrorKind::EmptySelection,
            Self::ConnectionLost { .. } => ErrorKind::ConnectionLost,
            Self::UnknownProvider(_) => ErrorKind::UnknownProvider,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether the host should point the user at credential settings.
    pub fn credential_hint(&self) -> bool {
        match self {
            Self::MissingCredential { .. } => true,
            Self::Transport(err) if err.is_authentication() => true,
            other => mentions_credentials(&other.to_string()),
        }
    }
}

/// Keyword check used for errors that arrive only as text.
pub fn mentions_credentials(message: &str) -> bool {
    let lower = message.to_lowercase();
    CREDENTIAL_KEYWORDS.iter().any(|k| lower.contains(k))
}

#[cfg(test)]
#[path = "translation_tests.rs"]
mod tests;
