//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`](ragchat_core::llm::provider::LlmProvider)
//! used by the agent and the retrieval tool, plus a factory that builds it
//! from the `[openai]` settings.

pub mod openai_compat;

use ragchat_core::llm::box_provider::BoxLlmProvider;
use ragchat_types::config::OpenAiSettings;
use ragchat_types::llm::LlmError;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from the `[openai]` settings.
///
/// # Errors
///
/// Returns `AuthenticationFailed` when no API key is configured.
pub fn create_provider(settings: &OpenAiSettings) -> Result<BoxLlmProvider, LlmError> {
    if settings.api_key.is_empty() {
        return Err(LlmError::AuthenticationFailed);
    }
    let config = openai_compat::config::from_settings(settings);
    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_openai() {
        let settings = OpenAiSettings {
            api_key: "sk-test".to_string(),
            ..OpenAiSettings::default()
        };
        let provider = create_provider(&settings).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_create_provider_missing_key() {
        let result = create_provider(&OpenAiSettings::default());
        match result {
            Err(LlmError::AuthenticationFailed) => {}
            Err(other) => panic!("Expected AuthenticationFailed, got: {other}"),
            Ok(_) => panic!("Expected error but got Ok"),
        }
    }
}
