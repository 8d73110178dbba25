use crate::game::Grid;
use crate::models::TileId;

/// How a selection's sum compares to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionVerdict {
    /// Nothing is selected
    Empty,
    /// Sum still below target, keep selecting
    Pending { sum: u32 },
    /// Sum hits the target exactly
    Match { sum: u32 },
    /// Sum went past the target
    Overflow { sum: u32 },
}

pub struct SelectionValidator;

impl SelectionValidator {
    pub fn classify(sum: u32, count: usize, target: u32) -> SelectionVerdict {
        if count == 0 {
            SelectionVerdict::Empty
        } else if target > 0 && sum == target {
            SelectionVerdict::Match { sum }
        } else if sum > target {
            SelectionVerdict::Overflow { sum }
        } else {
            SelectionVerdict::Pending { sum }
        }
    }

    /// Drop selected ids whose tiles are no longer on the grid
    pub fn retain_present(grid: &Grid, selection: &mut Vec<TileId>) {
        selection.retain(|id| grid.contains(*id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tile;
    use uuid::Uuid;

    #[test]
    fn test_classify() {
        assert_eq!(SelectionValidator::classify(0, 0, 10), SelectionVerdict::Empty);
        assert_eq!(
            SelectionValidator::classify(10, 2, 10),
            SelectionVerdict::Match { sum: 10 }
        );
        assert_eq!(
            SelectionValidator::classify(15, 2, 10),
            SelectionVerdict::Overflow { sum: 15 }
        );
        assert_eq!(
            SelectionValidator::classify(6, 1, 10),
            SelectionVerdict::Pending { sum: 6 }
        );
    }

    #[test]
    fn test_zero_target_never_matches() {
        assert_eq!(
            SelectionValidator::classify(0, 1, 0),
            SelectionVerdict::Pending { sum: 0 }
        );
        assert_eq!(
            SelectionValidator::classify(4, 1, 0),
            SelectionVerdict::Overflow { sum: 4 }
        );
    }

    #[test]
    fn test_retain_present() {
        let mut grid = Grid::new(10, 6);
        let kept = TileId(Uuid::from_u128(1));
        grid.place(Tile { id: kept, value: 5, row: 9, col: 3 });

        let mut selection = vec![kept, TileId(Uuid::from_u128(2))];
        SelectionValidator::retain_present(&grid, &mut selection);
        assert_eq!(selection, vec![kept]);
    }
}
