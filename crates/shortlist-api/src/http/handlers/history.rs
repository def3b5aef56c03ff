//! Session history handler.

use axum::extract::State;

use shortlist_types::shortlist::Shortlist;

use crate::http::error::TimedError;
use crate::http::extractors::session::SessionId;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// GET /api/v1/history - Most recent shortlists for the caller's session.
pub async fn list_history(
    State(state): State<AppState>,
    SessionId(session): SessionId,
) -> Result<ApiResponse<Vec<Shortlist>>, TimedError> {
    let timer = RequestTimer::start();
    let history = state
        .shortlist_service
        .history(&session)
        .await
        .map_err(|e| timer.fail(e))?;

    Ok(ApiResponse::success(history, &timer).with_link("self", "/api/v1/history"))
}
