use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::{
    config::GameConfig,
    game::{Grid, RoundTimer, Scorer, SelectionValidator, SelectionVerdict, TileGenerator},
    models::{GameMode, GamePhase, Tile, TileId},
};

/// Result of pushing a new row in at the bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowInsertion {
    /// Tiles pushed off the top of the board
    pub dropped: usize,
    pub game_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub cleared: Vec<TileId>,
    pub points: u32,
    pub levels_gained: u32,
    /// Classic mode only
    pub row_inserted: Option<RowInsertion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Not playing, paused, or nothing selected
    Idle,
    Pending { sum: u32 },
    Matched(MatchOutcome),
    /// Selection went past the target and was cleared
    Rejected { sum: u32 },
}

/// Everything a client needs to draw the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub mode: GameMode,
    pub phase: GamePhase,
    pub paused: bool,
    pub rows: usize,
    pub cols: usize,
    pub grid: Vec<Vec<Option<Tile>>>,
    pub selection: Vec<TileId>,
    pub selection_sum: u32,
    pub target: u32,
    pub score: u32,
    pub level: u32,
    pub high_score: u32,
    pub time_remaining: Option<u32>,
    pub time_limit: Option<u32>,
}

/// Owns the whole round: board, selection, target, score, level, mode and
/// timer. All state changes go through the methods below.
pub struct GridEngine<R: Rng = StdRng> {
    config: GameConfig,
    rng: R,
    grid: Grid,
    selection: Vec<TileId>,
    target: u32,
    score: u32,
    level: u32,
    high_score: u32,
    mode: GameMode,
    phase: GamePhase,
    paused: bool,
    timer: RoundTimer,
}

impl GridEngine<StdRng> {
    /// Engine backed by an OS-seeded RNG, for live games
    pub fn from_os_rng(config: GameConfig) -> Self {
        Self::new(config, StdRng::from_os_rng())
    }
}

impl<R: Rng> GridEngine<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        Self {
            grid: Grid::new(config.rows, config.cols),
            timer: RoundTimer::new(config.time_limit_secs),
            config,
            rng,
            selection: Vec::new(),
            target: 0,
            score: 0,
            level: 1,
            high_score: 0,
            mode: GameMode::Classic,
            phase: GamePhase::Menu,
            paused: false,
        }
    }

    #[allow(dead_code)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selection(&self) -> &[TileId] {
        &self.selection
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Seed the best score, e.g. from a server-wide record
    pub fn set_high_score(&mut self, high_score: u32) {
        self.high_score = self.high_score.max(high_score);
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn time_remaining(&self) -> Option<u32> {
        (self.mode == GameMode::Time).then(|| self.timer.remaining_secs())
    }

    fn is_active(&self) -> bool {
        self.phase == GamePhase::Playing && !self.paused
    }

    /// Whether the one-second clock should currently be driving `tick`
    pub fn timer_running(&self) -> bool {
        self.mode == GameMode::Time && self.is_active()
    }

    /// Start a fresh round in `mode`, from any phase
    pub fn start_game(&mut self, mode: GameMode) {
        self.grid = Grid::new(self.config.rows, self.config.cols);
        let first_row = self.grid.rows() - self.config.initial_rows.min(self.grid.rows() - 1);
        for row in first_row..self.grid.rows() {
            for tile in TileGenerator::generate_row(&mut self.rng, row, self.grid.cols()) {
                self.grid.place(tile);
            }
        }

        self.selection.clear();
        self.score = 0;
        self.level = 1;
        self.target = TileGenerator::random_target(&mut self.rng, self.level);
        self.mode = mode;
        self.phase = GamePhase::Playing;
        self.paused = false;
        self.timer = RoundTimer::new(self.config.time_limit_secs);

        tracing::debug!(
            "Started {:?} game with {} tiles, target {}",
            mode,
            self.grid.len(),
            self.target
        );
    }

    pub fn restart(&mut self) {
        self.start_game(self.mode);
    }

    pub fn return_to_menu(&mut self) {
        self.grid = Grid::new(self.config.rows, self.config.cols);
        self.selection.clear();
        self.target = 0;
        self.score = 0;
        self.level = 1;
        self.phase = GamePhase::Menu;
        self.paused = false;
        self.timer.reset();
    }

    /// Returns true if the paused flag actually changed
    pub fn set_paused(&mut self, paused: bool) -> bool {
        if self.phase != GamePhase::Playing || self.paused == paused {
            return false;
        }
        self.paused = paused;
        true
    }

    /// Add or remove a tile from the selection. Returns false when nothing
    /// changed (not playing, paused, or unknown id).
    pub fn toggle_selection(&mut self, tile_id: TileId) -> bool {
        if !self.is_active() || !self.grid.contains(tile_id) {
            return false;
        }
        if let Some(index) = self.selection.iter().position(|id| *id == tile_id) {
            self.selection.remove(index);
        } else {
            self.selection.push(tile_id);
        }
        true
    }

    pub fn selection_sum(&self) -> u32 {
        Scorer::selection_sum(&self.grid, &self.selection)
    }

    pub fn evaluate_selection(&mut self) -> Evaluation {
        if !self.is_active() {
            return Evaluation::Idle;
        }

        let sum = self.selection_sum();
        match SelectionValidator::classify(sum, self.selection.len(), self.target) {
            SelectionVerdict::Empty => Evaluation::Idle,
            SelectionVerdict::Pending { sum } => Evaluation::Pending { sum },
            SelectionVerdict::Overflow { sum } => {
                tracing::debug!("Selection sum {} overshot target {}", sum, self.target);
                self.selection.clear();
                Evaluation::Rejected { sum }
            }
            SelectionVerdict::Match { .. } => Evaluation::Matched(self.clear_match()),
        }
    }

    fn clear_match(&mut self) -> MatchOutcome {
        let cleared = std::mem::take(&mut self.selection);
        let points = Scorer::match_points(self.target, cleared.len());
        self.score = self.score.saturating_add(points);

        self.grid.remove_tiles(&cleared);
        self.grid.apply_gravity();
        debug_assert!(self.grid.is_settled());

        self.target = TileGenerator::random_target(&mut self.rng, self.level);

        let row_inserted = match self.mode {
            GameMode::Classic => self.insert_row(),
            GameMode::Time => {
                self.timer.reset();
                None
            }
        };

        let level = Scorer::level_for_score(self.score, self.level, self.config.level_score_step);
        let levels_gained = level - self.level;
        if levels_gained > 0 {
            tracing::info!("Reached level {} at score {}", level, self.score);
        }
        self.level = level;

        tracing::debug!(
            "Cleared {} tiles for {} points, next target {}",
            cleared.len(),
            points,
            self.target
        );

        MatchOutcome {
            cleared,
            points,
            levels_gained,
            row_inserted,
        }
    }

    /// Push every row up by one and add a fresh row at the bottom.
    /// Only acts while a round is being played.
    pub fn insert_row(&mut self) -> Option<RowInsertion> {
        if self.phase != GamePhase::Playing {
            return None;
        }

        let bottom = self.grid.bottom_row();
        let new_row = TileGenerator::generate_row(&mut self.rng, bottom, self.grid.cols());
        let dropped = self.grid.push_bottom_row(new_row);
        SelectionValidator::retain_present(&self.grid, &mut self.selection);

        if self.mode == GameMode::Time {
            self.timer.reset();
        }

        let game_over = !dropped.is_empty() || self.check_game_over();
        if game_over && self.phase == GamePhase::Playing {
            self.end_game();
        }

        Some(RowInsertion {
            dropped: dropped.len(),
            game_over,
        })
    }

    /// Ends the round if any tile sits in the top row
    pub fn check_game_over(&mut self) -> bool {
        if self.phase == GamePhase::GameOver {
            return true;
        }
        if self.phase == GamePhase::Playing && self.grid.top_row_occupied() {
            self.end_game();
            return true;
        }
        false
    }

    fn end_game(&mut self) {
        self.phase = GamePhase::GameOver;
        self.paused = false;
        self.selection.clear();
        if self.score > self.high_score {
            self.high_score = self.score;
            tracing::info!("New high score: {}", self.high_score);
        }
        tracing::info!("Game over with score {} at level {}", self.score, self.level);
    }

    /// One second of time mode. Returns the insertion if the clock ran out.
    pub fn tick(&mut self) -> Option<RowInsertion> {
        if !self.timer_running() {
            return None;
        }
        if self.timer.tick() {
            return self.insert_row();
        }
        None
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            mode: self.mode,
            phase: self.phase,
            paused: self.paused,
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            grid: self.grid.cells().to_vec(),
            selection: self.selection.clone(),
            selection_sum: self.selection_sum(),
            target: self.target,
            score: self.score,
            level: self.level,
            high_score: self.high_score,
            time_remaining: self.time_remaining(),
            time_limit: (self.mode == GameMode::Time).then(|| self.timer.limit_secs()),
        }
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[cfg(test)]
    pub(crate) fn set_target_for_test(&mut self, target: u32) {
        self.target = target;
    }

    #[cfg(test)]
    pub(crate) fn set_score_for_test(&mut self, score: u32) {
        self.score = score;
    }
}
