use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{models::SessionSummary, AppState};

#[derive(Debug, Serialize)]
pub struct HighScoreResponse {
    pub high_score: u32,
}

/// List live game sessions, oldest first
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<SessionSummary>> {
    let mut sessions: Vec<SessionSummary> = state
        .sessions
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    sessions.sort_by_key(|s| s.connected_at);
    Json(sessions)
}

/// Best score since the server started
pub async fn high_score(State(state): State<Arc<AppState>>) -> Json<HighScoreResponse> {
    Json(HighScoreResponse {
        high_score: state.high_score(),
    })
}
