use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::RefreshReport;

const REFRESHED_MESSAGE: &str = "Leaderboard refreshed successfully";

// ── Types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: RefreshReport,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub last_refresh: Option<RefreshReport>,
}

// ── Start ────────────────────────────────────────────────────────

/// Recompute the leaderboard and wait for the result.
///
/// Answers 200 whenever the pipeline ran, even if it found no data; the
/// report's `status` tells the cases apart. A second refresh arriving while
/// one is running gets 409.
pub async fn start_refresh(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let report = state
        .orchestrator
        .refresh(&state.store)
        .await
        .map_err(|e| ApiError::Conflict(e.to_string()))?;

    Ok(Json(RefreshResponse {
        message: REFRESHED_MESSAGE.to_string(),
        report,
    }))
}

// ── Status ───────────────────────────────────────────────────────

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: state.store.is_refreshing(),
        last_refresh: state.store.last_report().await,
    })
}
