//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, KNOWN_PROVIDERS};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// First error as a [`ConfigError`], for callers that stop on failure.
    pub fn into_error(self) -> Option<ConfigError> {
        self.errors.into_iter().next().map(|e| ConfigError::InvalidValue {
            field: e.path,
            message: e.message,
        })
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_translation(config, &mut result);
        Self::validate_providers(config, &mut result);
        Self::validate_liveness(config, &mut result);
        Self::validate_extraction(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_translation(config: &Config, result: &mut ValidationResult) {
        let translation = &config.translation;

        if !KNOWN_PROVIDERS.contains(&translation.provider.as_str()) {
            result.add_error(ValidationError::new(
                "translation.provider",
                format!(
                    "Unknown provider '{}', expected one of: {}",
                    translation.provider,
                    KNOWN_PROVIDERS.join(", ")
                ),
            ));
        }

        if translation.target_language.trim().is_empty() {
            result.add_error(ValidationError::new(
                "translation.target_language",
                "Target language cannot be empty",
            ));
        }

        if let Some(template) = translation
            .prompt_template
            .as_deref()
            .filter(|t| !t.trim().is_empty())
        {
            if !template.contains("{{text}}") {
                result.add_error(ValidationError::new(
                    "translation.prompt_template",
                    "Template must contain the {{text}} placeholder",
                ));
            }
            if !template.contains("{{target}}") {
                result.add_warning(ValidationWarning::new(
                    "translation.prompt_template",
                    "Template has no {{target}} placeholder; the target language will not be sent",
                ));
            }
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        for (name, provider) in &config.providers {
            if !KNOWN_PROVIDERS.contains(&name.as_str()) {
                result.add_warning(ValidationWarning::new(
                    format!("providers.{}", name),
                    "Unknown provider section is ignored",
                ));
            }

            if let Some(url) = &provider.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        format!("providers.{}.base_url", name),
                        "base_url must start with http:// or https://",
                    ));
                }
            }
        }

        let active = &config.translation.provider;
        let has_key = config
            .providers
            .get(active)
            .and_then(|p| p.api_key.as_deref())
            .is_some_and(|k| !k.trim().is_empty());
        if KNOWN_PROVIDERS.contains(&active.as_str()) && !has_key {
            result.add_warning(ValidationWarning::new(
                format!("providers.{}.api_key", active),
                "No API key configured; the provider's environment variable will be used",
            ));
        }
    }

    fn validate_liveness(config: &Config, result: &mut ValidationResult) {
        let liveness = &config.liveness;

        if liveness.probe_after_secs == 0 {
            result.add_error(ValidationError::new(
                "liveness.probe_after_secs",
                "probe_after_secs must be greater than 0",
            ));
        }

        if liveness.lost_after_secs <= liveness.probe_after_secs {
            result.add_error(ValidationError::new(
                "liveness.lost_after_secs",
                "lost_after_secs must exceed probe_after_secs",
            ));
        }

        if liveness.tick_millis == 0 {
            result.add_error(ValidationError::new(
                "liveness.tick_millis",
                "tick_millis must be greater than 0",
            ));
        }

        if liveness.keepalive_secs == 0 {
            result.add_error(ValidationError::new(
                "liveness.keepalive_secs",
                "keepalive_secs must be greater than 0",
            ));
        }

        if liveness.transport_timeout_secs < liveness.lost_after_secs {
            result.add_warning(ValidationWarning::new(
                "liveness.transport_timeout_secs",
                "Transport timeout is shorter than the liveness limit; stalls will surface as timeouts",
            ));
        }
    }

    fn validate_extraction(config: &Config, result: &mut ValidationResult) {
        let extraction = &config.extraction;

        if extraction.placeholder_class.trim().is_empty() {
            result.add_error(ValidationError::new(
                "extraction.placeholder_class",
                "Placeholder class cannot be empty",
            ));
        }

        if extraction.id_attribute.is_empty()
            || extraction.id_attribute.chars().any(char::is_whitespace)
        {
            result.add_error(ValidationError::new(
                "extraction.id_attribute",
                "id_attribute must be a non-empty attribute name without whitespace",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!("Unrecognized level '{}', falling back to info", config.logging.level),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
