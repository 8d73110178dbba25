use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GameMode, GamePhase};

/// Registry entry describing a live WebSocket game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub mode: Option<GameMode>,
    pub phase: GamePhase,
    pub score: u32,
    pub level: u32,
    pub connected_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn new(session_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            mode: None,
            phase: GamePhase::Menu,
            score: 0,
            level: 1,
            connected_at: now,
            updated_at: now,
        }
    }
}
