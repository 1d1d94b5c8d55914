use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::models::LeaderboardEntry;

/// Current ranking, best first. Empty until the first refresh.
pub async fn leaderboard(State(state): State<AppState>) -> Json<Vec<LeaderboardEntry>> {
    Json(state.store.entries().await)
}
