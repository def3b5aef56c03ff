//! Configuration and Groq defaults for the OpenAI-compatible provider.

use secrecy::SecretString;

use shortlist_types::config::LlmConfig;

/// Configuration for an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "groq").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.groq.com/openai/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request does not name one.
    pub model: String,
    /// Prefix every valid key for this provider starts with, if known.
    pub key_prefix: Option<&'static str>,
}

/// Groq configuration built from the `[llm]` section of `config.toml`.
///
/// Groq keys start with `gsk_`.
pub fn groq_defaults(api_key: SecretString, llm: &LlmConfig) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "groq".into(),
        base_url: llm.base_url.clone(),
        api_key,
        model: llm.model.clone(),
        key_prefix: Some("gsk_"),
    }
}
