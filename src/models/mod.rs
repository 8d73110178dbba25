pub mod game;
pub mod session;

pub use game::{GameMode, GamePhase, Position, Tile, TileId};
pub use session::SessionSummary;
