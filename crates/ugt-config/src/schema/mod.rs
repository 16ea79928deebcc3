//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod schema_runtime;

pub use schema_runtime::*;

/// Provider keys understood by the translator.
pub const KNOWN_PROVIDERS: &[&str] = &["openai", "anthropic", "gemini"];

/// Target languages written without spaces between words.
pub const DEFAULT_NO_SPACE_LANGUAGES: &[&str] = &[
    "ja", "japanese", "zh", "chinese", "ko", "korean", "th", "thai", "vi", "vietnamese",
];

pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub translation: TranslationConfig,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub liveness: LivenessConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// API key for `provider`: the configured value, else `env_var`.
    pub fn api_key_for(&self, provider: &str, env_var: &str) -> Option<String> {
        self.providers
            .get(provider)
            .and_then(|p| p.api_key.clone())
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(env_var).ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Endpoint override for `provider`, if any.
    pub fn base_url_for(&self, provider: &str) -> Option<&str> {
        self.providers
            .get(provider)
            .and_then(|p| p.base_url.as_deref())
    }

    /// Model to request: translation.model, else the provider's default_model.
    pub fn model_for(&self, provider: &str) -> Option<String> {
        self.translation.model.clone().or_else(|| {
            self.providers
                .get(provider)
                .and_then(|p| p.default_model.clone())
        })
    }
}

/// What to translate into and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Must contain `{{text}}`; `{{target}}` and `{{instruction}}` optional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,

    #[serde(default = "default_true")]
    pub streaming: bool,

    #[serde(default = "default_no_space_languages")]
    pub no_space_languages: Vec<String>,

    /// Leave placeholder spans in the output instead of freezing them.
    #[serde(default)]
    pub keep_placeholders: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            target_language: default_target_language(),
            prompt_template: None,
            instruction: None,
            streaming: true,
            no_space_languages: default_no_space_languages(),
            keep_placeholders: false,
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_target_language() -> String {
    "English".to_string()
}

fn default_no_space_languages() -> Vec<String> {
    DEFAULT_NO_SPACE_LANGUAGES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
