//! Shortlist submit and fetch handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use shortlist_core::export::markdown::render_markdown;
use shortlist_core::validate::validate_request;
use shortlist_types::error::ShortlistError;
use shortlist_types::shortlist::{ShortlistId, ShortlistRequest, ShortlistResult};

use crate::http::error::{AppError, TimedError};
use crate::http::extractors::query::ShortlistQuery;
use crate::http::extractors::session::SessionId;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedShortlist {
    pub id: ShortlistId,
    pub result: ShortlistResult,
}

/// POST /api/v1/shortlist - Build and save a shortlist.
pub async fn create_shortlist(
    State(state): State<AppState>,
    SessionId(session): SessionId,
    body: Result<Json<ShortlistRequest>, JsonRejection>,
) -> Result<ApiResponse<CreatedShortlist>, TimedError> {
    let timer = RequestTimer::start();

    let Json(body) = body.map_err(|e| timer.fail(AppError::InvalidBody(e.body_text())))?;
    let input = validate_request(&body).map_err(|e| timer.fail(e))?;

    let shortlist = state
        .shortlist_service
        .build(input, &session)
        .await
        .map_err(|e| timer.fail(e))?;
    let id = shortlist.id.clone();

    Ok(ApiResponse::success(
        CreatedShortlist {
            id: id.clone(),
            result: shortlist.results,
        },
        &timer,
    )
    .with_link("self", &format!("/api/v1/shortlist/{id}"))
    .with_link("markdown", &format!("/api/v1/shortlist/{id}?format=markdown")))
}

/// GET /api/v1/shortlist/{id} - Fetch a stored shortlist as JSON or markdown.
pub async fn get_shortlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ShortlistQuery>,
) -> Result<Response, TimedError> {
    let timer = RequestTimer::start();

    // A malformed id can never match a stored record.
    let id: ShortlistId = id.parse().map_err(|_| timer.fail(ShortlistError::NotFound))?;
    let shortlist = state
        .shortlist_service
        .get(&id)
        .await
        .map_err(|e| timer.fail(e))?;

    if query.wants_markdown() {
        let disposition = format!("attachment; filename=\"shortlist-{}.md\"", id.short());
        return Ok((
            [
                (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            render_markdown(&shortlist),
        )
            .into_response());
    }

    Ok(ApiResponse::success(shortlist, &timer)
        .with_link("self", &format!("/api/v1/shortlist/{id}"))
        .with_link("markdown", &format!("/api/v1/shortlist/{id}?format=markdown"))
        .into_response())
}
