use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// A new row is pushed in after every successful match
    #[default]
    Classic,
    /// A new row is pushed in whenever the round timer runs out
    Time,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    #[serde(rename = "gameover")]
    GameOver,
}

/// Stable identity of a tile for its whole lifetime on the grid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct TileId(pub Uuid);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub value: u8,
    pub row: usize,
    pub col: usize,
}

impl Tile {
    #[allow(dead_code)]
    pub fn position(&self) -> Position {
        Position {
            row: self.row,
            col: self.col,
        }
    }
}
