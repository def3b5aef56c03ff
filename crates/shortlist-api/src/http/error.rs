//! Application error type mapping to HTTP status codes and envelope format.

use axum::response::{IntoResponse, Response};

use shortlist_types::error::ShortlistError;
use shortlist_types::llm::LlmError;

use crate::http::response::{ApiResponse, RequestTimer, status_for_code};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Shortlist service errors.
    Shortlist(ShortlistError),
    /// Request rejected before reaching the service.
    Validation(String),
    /// Body was not a JSON object.
    InvalidBody(String),
}

impl From<ShortlistError> for AppError {
    fn from(e: ShortlistError) -> Self {
        AppError::Shortlist(e)
    }
}

impl AppError {
    /// Machine-readable code and user-facing message.
    fn code_and_message(&self) -> (&'static str, String) {
        match self {
            AppError::Shortlist(ShortlistError::Validation(msg)) | AppError::Validation(msg) => {
                ("VALIDATION_ERROR", msg.clone())
            }
            AppError::InvalidBody(msg) => ("INVALID_BODY", format!("Invalid request body: {msg}")),
            AppError::Shortlist(ShortlistError::NotFound) => (
                "SHORTLIST_NOT_FOUND",
                "Shortlist research data no longer exists or was moved.".to_string(),
            ),
            AppError::Shortlist(ShortlistError::Llm(LlmError::AuthenticationFailed)) => (
                "LLM_NOT_CONFIGURED",
                "LLM API key not configured or invalid. Set GROQ_API_KEY to a valid Groq key."
                    .to_string(),
            ),
            AppError::Shortlist(ShortlistError::Llm(e)) => {
                ("LLM_ERROR", format!("Failed to build shortlist: {e}"))
            }
            AppError::Shortlist(ShortlistError::StorageError(msg)) => {
                ("STORAGE_ERROR", format!("Database error: {msg}"))
            }
        }
    }
}

impl AppError {
    fn respond(self, request_id: String, response_time_ms: u64) -> Response {
        let (code, message) = self.code_and_message();

        if status_for_code(code).is_server_error() {
            tracing::error!(%request_id, code, %message, "request failed");
        } else {
            tracing::debug!(%request_id, code, %message, "request rejected");
        }

        ApiResponse::error(code, &message, request_id, response_time_ms).into_response()
    }
}

/// Rejections raised before a handler runs (e.g. by extractors).
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.respond(uuid::Uuid::now_v7().to_string(), 0)
    }
}

/// An [`AppError`] carrying the id and elapsed time of the request it ended.
///
/// Built with [`RequestTimer::fail`].
#[derive(Debug)]
pub struct TimedError {
    error: AppError,
    request_id: String,
    response_time_ms: u64,
}

impl TimedError {
    pub fn new(error: AppError, timer: &RequestTimer) -> Self {
        Self {
            error,
            request_id: timer.request_id.clone(),
            response_time_ms: timer.elapsed_ms(),
        }
    }
}

impl IntoResponse for TimedError {
    fn into_response(self) -> Response {
        self.error.respond(self.request_id, self.response_time_ms)
    }
}
