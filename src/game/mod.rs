// Grid state and round rules

pub mod engine;
pub mod generator;
pub mod grid;
pub mod scorer;
pub mod timer;
pub mod validator;

pub use engine::{Evaluation, GameSnapshot, GridEngine, RowInsertion};
pub use generator::TileGenerator;
pub use grid::Grid;
pub use scorer::Scorer;
pub use timer::RoundTimer;
pub use validator::{SelectionValidator, SelectionVerdict};
