//! LLM provider implementations and construction from the environment.

pub mod openai_compat;

use secrecy::SecretString;

use shortlist_core::llm::box_provider::BoxLlmProvider;
use shortlist_types::config::LlmConfig;

use self::openai_compat::OpenAiCompatibleProvider;

/// Environment variable holding the Groq API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Build the Groq provider for `api_key`.
///
/// Returns `None` for a missing or blank key, which puts the service in
/// static mode.
pub fn create_provider(api_key: Option<SecretString>, llm: &LlmConfig) -> Option<BoxLlmProvider> {
    use secrecy::ExposeSecret;

    let key = api_key.filter(|k| !k.expose_secret().trim().is_empty())?;
    let config = openai_compat::config::groq_defaults(key, llm);
    Some(BoxLlmProvider::new(OpenAiCompatibleProvider::new(config)))
}

/// Read `GROQ_API_KEY` and build the provider, if any.
pub fn provider_from_env(llm: &LlmConfig) -> Option<BoxLlmProvider> {
    let key = std::env::var(API_KEY_ENV).ok().map(SecretString::from);
    let provider = create_provider(key, llm);
    match &provider {
        Some(p) => tracing::info!(provider = p.name(), model = p.model(), "LLM provider configured"),
        None => tracing::info!("{API_KEY_ENV} not set, running in static mode"),
    }
    provider
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_blank_key_is_static_mode() {
        let llm = LlmConfig::default();
        assert!(create_provider(None, &llm).is_none());
        assert!(create_provider(Some(SecretString::from("  ")), &llm).is_none());
    }

    #[test]
    fn test_key_builds_groq_provider() {
        let mut llm = LlmConfig::default();
        llm.model = "llama-3.1-8b-instant".to_string();
        let provider = create_provider(Some(SecretString::from("gsk_abc")), &llm).unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.model(), "llama-3.1-8b-instant");
    }
}
