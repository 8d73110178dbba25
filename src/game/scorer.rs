use crate::game::Grid;
use crate::models::TileId;

pub struct Scorer;

impl Scorer {
    /// Sum of the values of the selected tiles still on the grid
    pub fn selection_sum(grid: &Grid, selection: &[TileId]) -> u32 {
        selection
            .iter()
            .filter_map(|id| grid.tile(*id))
            .map(|tile| tile.value as u32)
            .sum()
    }

    /// Points for clearing `count` tiles that matched `target`
    pub fn match_points(target: u32, count: usize) -> u32 {
        target.saturating_mul(count as u32)
    }

    /// Level reached with `score`, never lower than `level`.
    ///
    /// Each level needs `level * step` points, so one big match can skip
    /// several levels at once.
    pub fn level_for_score(score: u32, level: u32, step: u32) -> u32 {
        let mut level = level.max(1);
        while score >= level.saturating_mul(step) {
            level += 1;
        }
        level
    }
}
