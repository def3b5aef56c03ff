//! LLM request/response types.
//!
//! These types model the data shapes for LLM provider interactions:
//! completion requests, usage tracking, and error handling.

use serde::{Deserialize, Serialize};

/// Request to an LLM provider for a completion.
///
/// A shortlist build is a single turn: the analyst system prompt plus one
/// user prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Empty means "use the provider's configured model".
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// Response from an LLM provider for a non-streaming completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    /// Model that actually answered, as reported by the provider.
    pub model: String,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

/// Reason why the LLM stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    /// Output hit `max_tokens`; the JSON body is probably cut off.
    MaxTokens,
    ContentFilter,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    /// The model answered, but not with a usable shortlist.
    #[error("{0}")]
    InvalidResponse(String),
}

/// Substrings that mark a provider message as quota/rate-limit exhaustion.
const QUOTA_MARKERS: &[&str] = &[
    "429",
    "quota",
    "rate_limit",
    "Rate limit",
    "insufficient_quota",
];

impl LlmError {
    /// Whether this failure means the provider quota is exhausted.
    ///
    /// Such failures degrade to static results instead of failing the request.
    /// Only provider-reported messages are searched for quota markers.
    pub fn is_quota_exhausted(&self) -> bool {
        let message = match self {
            LlmError::RateLimited { .. } => return true,
            LlmError::Provider { message } => message,
            LlmError::Overloaded(message) => message,
            _ => return false,
        };
        QUOTA_MARKERS.iter().any(|marker| message.contains(marker))
    }
}
