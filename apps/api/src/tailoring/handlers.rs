//! Axum route handlers for the Tailoring API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::tailoring::orchestrator::TailoringStatus;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SubmitParams {
    /// Block until the request resolves instead of returning 202.
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
    #[serde(flatten)]
    pub status: TailoringStatus,
}

/// GET /api/v1/tailor
pub async fn handle_status(State(state): State<AppState>) -> Json<TailoringStatus> {
    Json(state.orchestrator.status().await)
}

/// POST /api/v1/tailor[?wait=true]
///
/// Starts tailoring for the selected job description and returns 202 at once;
/// poll GET /api/v1/tailor for the result. With `wait=true` the response is
/// sent after the request resolves, and a failed request returns its error.
pub async fn handle_submit(
    State(state): State<AppState>,
    Query(params): Query<SubmitParams>,
) -> Result<(StatusCode, Json<TailoringStatus>), AppError> {
    if params.wait {
        state.orchestrator.run().await?;
        return Ok((StatusCode::OK, Json(state.orchestrator.status().await)));
    }

    let submission = state.orchestrator.submit().await?;
    Ok((StatusCode::ACCEPTED, Json(submission.status)))
}

/// DELETE /api/v1/tailor
pub async fn handle_cancel(State(state): State<AppState>) -> Json<CancelResponse> {
    let (cancelled, status) = state.orchestrator.cancel().await;
    Json(CancelResponse { cancelled, status })
}

/// POST /api/v1/tailor/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<TailoringStatus> {
    Json(state.orchestrator.reset().await)
}
