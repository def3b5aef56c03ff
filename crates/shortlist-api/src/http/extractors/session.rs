//! Session extractor.
//!
//! Shortlists are grouped by session for history and retention. Clients
//! identify their session with the `X-Session-Id` header; requests without
//! one share the default session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use shortlist_types::shortlist::DEFAULT_SESSION;

use crate::http::error::AppError;

pub const SESSION_HEADER: &str = "x-session-id";

const MAX_SESSION_LEN: usize = 128;

/// The caller's session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(SESSION_HEADER) else {
            return Ok(SessionId(DEFAULT_SESSION.to_string()));
        };

        let value = value
            .to_str()
            .map_err(|_| AppError::Validation("Invalid X-Session-Id header encoding".to_string()))?
            .trim();

        if value.is_empty() {
            return Ok(SessionId(DEFAULT_SESSION.to_string()));
        }
        if value.len() > MAX_SESSION_LEN {
            return Err(AppError::Validation(format!(
                "X-Session-Id must be at most {MAX_SESSION_LEN} characters."
            )));
        }
        Ok(SessionId(value.to_string()))
    }
}
