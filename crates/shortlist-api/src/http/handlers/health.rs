//! Health endpoint handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::state::AppState;

/// GET /api/v1/health and /health - Aggregated health report.
///
/// Returned bare (no envelope); 503 when any check fails.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.health_report().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
