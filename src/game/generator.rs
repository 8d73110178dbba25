use rand::Rng;
use uuid::Builder;

use crate::models::{Tile, TileId};

pub const TILE_MIN_VALUE: u8 = 1;
pub const TILE_MAX_VALUE: u8 = 9;
pub const TARGET_MIN: u32 = 10;
pub const TARGET_MAX: u32 = 19;

/// Produces fresh tiles and targets from whatever random source it is handed.
///
/// Nothing here looks at engine state, so a seeded RNG gives a fully
/// reproducible sequence of rows, ids and targets.
pub struct TileGenerator;

impl TileGenerator {
    /// Generate a full row of new tiles for `row`
    pub fn generate_row(rng: &mut impl Rng, row: usize, cols: usize) -> Vec<Tile> {
        (0..cols)
            .map(|col| Self::generate_tile(rng, row, col))
            .collect()
    }

    pub fn generate_tile(rng: &mut impl Rng, row: usize, col: usize) -> Tile {
        Tile {
            id: Self::tile_id(rng),
            value: rng.random_range(TILE_MIN_VALUE..=TILE_MAX_VALUE),
            row,
            col,
        }
    }

    /// New target sum. Grows by one every two levels; there is no check that
    /// the current board can actually reach it.
    pub fn random_target(rng: &mut impl Rng, level: u32) -> u32 {
        rng.random_range(TARGET_MIN..=TARGET_MAX) + level / 2
    }

    fn tile_id(rng: &mut impl Rng) -> TileId {
        TileId(Builder::from_random_bytes(rng.random()).into_uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_row_generation() {
        let mut rng = StdRng::seed_from_u64(7);
        let row = TileGenerator::generate_row(&mut rng, 9, 6);

        assert_eq!(row.len(), 6);
        assert!(row.iter().all(|tile| tile.row == 9));
        assert_eq!(row.iter().map(|t| t.col).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
        assert!(row
            .iter()
            .all(|tile| (TILE_MIN_VALUE..=TILE_MAX_VALUE).contains(&tile.value)));
    }

    #[test]
    fn test_tile_ids_are_unique() {
        let mut rng = StdRng::seed_from_u64(1);
        let ids: HashSet<TileId> = (0..50)
            .flat_map(|row| TileGenerator::generate_row(&mut rng, row, 6))
            .map(|tile| tile.id)
            .collect();
        assert_eq!(ids.len(), 300);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = TileGenerator::generate_row(&mut StdRng::seed_from_u64(42), 9, 6);
        let b = TileGenerator::generate_row(&mut StdRng::seed_from_u64(42), 9, 6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_target_range_scales_with_level() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let target = TileGenerator::random_target(&mut rng, 1);
            assert!((10..=19).contains(&target));
        }
        for _ in 0..200 {
            let target = TileGenerator::random_target(&mut rng, 6);
            assert!((13..=22).contains(&target));
        }
    }
}
