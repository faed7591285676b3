//! Configuration for the OpenAI-compatible provider.

use ragchat_types::config::OpenAiSettings;

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: String,
    /// Model used when a request leaves `model` empty.
    pub model: String,
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`.
pub fn openai_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key: api_key.into(),
        model: model.into(),
    }
}

/// Build a config from the `[openai]` settings section.
///
/// A non-default `base_url` targets any OpenAI-compatible server; the
/// provider name then becomes `openai_compatible`.
pub fn from_settings(settings: &OpenAiSettings) -> OpenAiCompatConfig {
    let mut config = openai_defaults(&settings.api_key, &settings.model_name);
    if !settings.base_url.is_empty() && settings.base_url != config.base_url {
        config.provider_name = "openai_compatible".into();
        config.base_url = settings.base_url.trim_end_matches('/').to_string();
    }
    config
}
