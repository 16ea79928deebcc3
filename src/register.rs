//! Provider registration and config mapping.

use std::sync::Arc;

use tracing::{info, warn};

use ugt_config::Config;
use ugt_core::{ExtractorOptions, ProviderRegistry, SessionOptions};
use ugt_protocols::{ProviderKind, TranslationError, TranslationProvider, TranslationSettings};
use ugt_provider_anthropic::AnthropicProvider;
use ugt_provider_gemini::GeminiProvider;
use ugt_provider_openai::OpenAiProvider;

/// Per-invocation overrides from the command line.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub target: Option<String>,
    pub no_stream: bool,
    pub keep_placeholders: bool,
}

/// Register every provider adapter, applying endpoint and timing overrides.
pub(crate) fn register_providers(registry: &ProviderRegistry, config: &Config) {
    let liveness = &config.liveness;

    let openai = match config.base_url_for(ProviderKind::OpenAi.as_str()) {
        Some(url) => OpenAiProvider::with_url(url),
        None => OpenAiProvider::new(),
    }
    .with_timeout(liveness.transport_timeout())
    .with_keepalive_period(liveness.keepalive());

    let anthropic = match config.base_url_for(ProviderKind::Anthropic.as_str()) {
        Some(url) => AnthropicProvider::with_url(url),
        None => AnthropicProvider::new(),
    }
    .with_timeout(liveness.transport_timeout())
    .with_keepalive_period(liveness.keepalive());

    let gemini = match config.base_url_for(ProviderKind::Gemini.as_str()) {
        Some(url) => GeminiProvider::with_url(url),
        None => GeminiProvider::new(),
    }
    .with_timeout(liveness.transport_timeout())
    .with_keepalive_period(liveness.keepalive());

    let providers: [Arc<dyn TranslationProvider>; 3] =
        [Arc::new(openai), Arc::new(anthropic), Arc::new(gemini)];
    for provider in providers {
        let id = provider.id().to_string();
        if let Err(e) = registry.register(provider) {
            warn!("Failed to register {} provider: {}", id, e);
        }
    }
    info!("Registered providers: {:?}", registry.list_ids());
}

/// Settings for one operation: config values, then command-line overrides.
pub(crate) fn translation_settings(
    config: &Config,
    overrides: &Overrides,
) -> Result<TranslationSettings, TranslationError> {
    let translation = &config.translation;
    let provider: ProviderKind = overrides
        .provider
        .as_deref()
        .unwrap_or(&translation.provider)
        .parse()?;

    let mut settings = TranslationSettings::new(
        provider,
        overrides
            .target
            .clone()
            .unwrap_or_else(|| translation.target_language.clone()),
    )
    .with_streaming(translation.streaming && !overrides.no_stream);

    if let Some(model) = overrides
        .model
        .clone()
        .or_else(|| config.model_for(provider.as_str()))
    {
        settings = settings.with_model(model);
    }
    if let Some(template) = &translation.prompt_template {
        settings = settings.with_template(template.clone());
    }
    if let Some(instruction) = &translation.instruction {
        settings = settings.with_instruction(instruction.clone());
    }
    if let Some(key) = config.api_key_for(provider.as_str(), provider.credential_env()) {
        settings = settings.with_credential(key);
    }
    Ok(settings)
}

pub(crate) fn session_options(config: &Config, overrides: &Overrides) -> SessionOptions {
    let liveness = &config.liveness;
    SessionOptions {
        probe_after: liveness.probe_after(),
        lost_after: liveness.lost_after(),
        tick: liveness.tick(),
        keep_placeholders: config.translation.keep_placeholders || overrides.keep_placeholders,
        no_space_languages: config.translation.no_space_languages.clone(),
    }
}

pub(crate) fn extractor_options(config: &Config) -> ExtractorOptions {
    let extraction = &config.extraction;
    ExtractorOptions {
        placeholder_class: extraction.placeholder_class.clone(),
        id_attribute: extraction.id_attribute.clone(),
        skip_tags: extraction.skip_tags.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ugt_config::ConfigLoader;

    #[test]
    fn test_settings_from_config() {
        let config = ConfigLoader::load_str(
            r#"
            [translation]
            provider = "anthropic"
            target_language = "French"
            instruction = "Keep it formal"

            [providers.anthropic]
            api_key = "sk-ant-config"
            default_model = "claude-3-5-haiku-latest"
            "#,
        )
        .unwrap();

        let settings = translation_settings(&config, &Overrides::default()).unwrap();
        assert_eq!(settings.provider, ProviderKind::Anthropic);
        assert_eq!(settings.target_language, "French");
        assert_eq!(settings.effective_model(), "claude-3-5-haiku-latest");
        assert_eq!(settings.credential(), Some("sk-ant-config"));
        assert_eq!(settings.instruction.as_deref(), Some("Keep it formal"));
        assert!(settings.streaming);
    }

    #[test]
    fn test_overrides_win() {
        let config = ConfigLoader::load_str(
            r#"
            [providers.gemini]
            api_key = "gm-config"
            "#,
        )
        .unwrap();
        let overrides = Overrides {
            provider: Some("gemini".to_string()),
            model: Some("gemini-2.0-flash".to_string()),
            target: Some("Japanese".to_string()),
            no_stream: true,
            keep_placeholders: true,
        };

        let settings = translation_settings(&config, &overrides).unwrap();
        assert_eq!(settings.provider, ProviderKind::Gemini);
        assert_eq!(settings.effective_model(), "gemini-2.0-flash");
        assert_eq!(settings.target_language, "Japanese");
        assert!(!settings.streaming);
        assert!(session_options(&config, &overrides).keep_placeholders);
    }

    #[test]
    fn test_unknown_provider_override() {
        let config = Config::default();
        let overrides = Overrides {
            provider: Some("mistral".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            translation_settings(&config, &overrides),
            Err(TranslationError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_options_from_config() {
        let config = ConfigLoader::load_str(
            r#"
            [liveness]
            probe_after_secs = 10
            lost_after_secs = 40

            [extraction]
            skip_tags = ["script"]
            "#,
        )
        .unwrap();

        let options = session_options(&config, &Overrides::default());
        assert_eq!(options.probe_after.as_secs(), 10);
        assert_eq!(options.lost_after.as_secs(), 40);
        assert!(!options.keep_placeholders);
        assert_eq!(extractor_options(&config).skip_tags, vec!["script"]);
    }

    #[test]
    fn test_all_providers_registered() {
        let registry = ProviderRegistry::new();
        register_providers(&registry, &Config::default());
        let mut ids = registry.list_ids();
        ids.sort();
        assert_eq!(ids, vec!["anthropic", "gemini", "openai"]);
    }
}
