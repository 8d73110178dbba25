use serde::{Deserialize, Serialize};
use crate::game::{GameSnapshot, RowInsertion};
use crate::models::{GameMode, TileId};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    StartGame {
        mode: GameMode,
    },
    ToggleTile {
        tile_id: TileId,
    },
    SetPaused {
        paused: bool,
    },
    Restart,
    ReturnToMenu,
    RequestState,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameState {
        snapshot: GameSnapshot,
    },
    MatchCleared {
        tile_ids: Vec<TileId>,
        points: u32,
        score: u32,
        level: u32,
    },
    SelectionRejected {
        sum: u32,
        target: u32,
    },
    RowInserted {
        dropped: usize,
        game_over: bool,
    },
    GameOver {
        score: u32,
        high_score: u32,
    },
    Error {
        message: String,
    },
}

impl From<RowInsertion> for ServerMessage {
    fn from(insertion: RowInsertion) -> Self {
        ServerMessage::RowInserted {
            dropped: insertion.dropped,
            game_over: insertion.game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_client_messages() {
        let msg: ClientMessage =
            serde_json::from_value(json!({ "type": "start_game", "mode": "time" })).unwrap();
        assert!(matches!(msg, ClientMessage::StartGame { mode: GameMode::Time }));

        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "toggle_tile",
            "tile_id": "67e55044-10b1-426f-9247-bb680e5fe0c8"
        }))
        .unwrap();
        assert!(matches!(msg, ClientMessage::ToggleTile { .. }));

        let msg: ClientMessage = serde_json::from_value(json!({ "type": "return_to_menu" })).unwrap();
        assert!(matches!(msg, ClientMessage::ReturnToMenu));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result = serde_json::from_value::<ClientMessage>(json!({
            "type": "start_game",
            "mode": "zen"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_server_message_tags() {
        let value = serde_json::to_value(ServerMessage::SelectionRejected { sum: 15, target: 10 }).unwrap();
        assert_eq!(value, json!({ "type": "selection_rejected", "sum": 15, "target": 10 }));

        let value = serde_json::to_value(ServerMessage::from(RowInsertion {
            dropped: 0,
            game_over: true,
        }))
        .unwrap();
        assert_eq!(value["type"], "row_inserted");
        assert_eq!(value["game_over"], true);
    }
}
