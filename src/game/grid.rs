use crate::models::{Position, Tile, TileId};

/// Fixed-size board of optional tiles. Row 0 is the top, `rows - 1` the bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Option<Tile>>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![None; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn bottom_row(&self) -> usize {
        self.rows - 1
    }

    pub fn cells(&self) -> &[Vec<Option<Tile>>] {
        &self.cells
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.cells.get(pos.row)?.get(pos.col)?.as_ref()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten().flatten()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles().find(|tile| tile.id == id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tile(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tiles().count()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.tiles().next().is_none()
    }

    /// Put a tile at its own (row, col). Returns false when the position is
    /// out of bounds or already taken.
    pub fn place(&mut self, tile: Tile) -> bool {
        match self
            .cells
            .get_mut(tile.row)
            .and_then(|row| row.get_mut(tile.col))
        {
            Some(cell) if cell.is_none() => {
                *cell = Some(tile);
                true
            }
            _ => false,
        }
    }

    /// Remove every tile whose id is listed, returning the removed tiles
    pub fn remove_tiles(&mut self, ids: &[TileId]) -> Vec<Tile> {
        let mut removed = Vec::with_capacity(ids.len());
        for cell in self.cells.iter_mut().flatten() {
            if cell.is_some_and(|tile| ids.contains(&tile.id)) {
                removed.extend(cell.take());
            }
        }
        removed
    }

    /// Let every tile fall to the lowest open row of its column.
    ///
    /// Tiles keep their relative vertical order: each column is stably sorted
    /// by original row, bottom first, then restacked from the bottom up.
    pub fn apply_gravity(&mut self) {
        for col in 0..self.cols {
            let mut column: Vec<Tile> = (0..self.rows)
                .filter_map(|row| self.cells[row][col].take())
                .collect();
            column.sort_by(|a, b| b.row.cmp(&a.row));

            for (offset, mut tile) in column.into_iter().enumerate() {
                let row = self.bottom_row() - offset;
                tile.row = row;
                self.cells[row][col] = Some(tile);
            }
        }
    }

    /// Move every row up by one and lay `new_row` along the bottom.
    ///
    /// Tiles that were in row 0 have nowhere to go and are returned.
    pub fn push_bottom_row(&mut self, new_row: Vec<Tile>) -> Vec<Tile> {
        let dropped: Vec<Tile> = self.cells[0].iter_mut().filter_map(Option::take).collect();

        self.cells.rotate_left(1);
        for (row, cells) in self.cells.iter_mut().enumerate() {
            for tile in cells.iter_mut().flatten() {
                tile.row = row;
            }
        }

        let bottom = self.bottom_row();
        for mut tile in new_row.into_iter().take(self.cols) {
            tile.row = bottom;
            if let Some(cell) = self.cells[bottom].get_mut(tile.col) {
                *cell = Some(tile);
            }
        }

        dropped
    }

    pub fn top_row_occupied(&self) -> bool {
        self.cells[0].iter().any(Option::is_some)
    }

    #[allow(dead_code)]
    pub fn column_sums(&self) -> Vec<u32> {
        (0..self.cols)
            .map(|col| {
                (0..self.rows)
                    .filter_map(|row| self.cells[row][col].as_ref())
                    .map(|tile| tile.value as u32)
                    .sum()
            })
            .collect()
    }

    #[allow(dead_code)]
    pub fn total_value(&self) -> u32 {
        self.tiles().map(|tile| tile.value as u32).sum()
    }

    /// True when no column has an empty cell underneath a filled one
    pub fn is_settled(&self) -> bool {
        (0..self.cols).all(|col| {
            let mut seen_tile = false;
            for row in 0..self.rows {
                match (&self.cells[row][col], seen_tile) {
                    (Some(_), _) => seen_tile = true,
                    (None, true) => return false,
                    (None, false) => {}
                }
            }
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn tile(n: u128, value: u8, row: usize, col: usize) -> Tile {
        Tile {
            id: TileId(Uuid::from_u128(n)),
            value,
            row,
            col,
        }
    }

    #[test]
    fn test_place_rejects_occupied_and_out_of_bounds() {
        let mut grid = Grid::new(10, 6);
        assert!(grid.place(tile(1, 3, 9, 0)));
        assert!(!grid.place(tile(2, 4, 9, 0)));
        assert!(!grid.place(tile(3, 4, 10, 0)));
        assert!(!grid.place(tile(4, 4, 0, 6)));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_gravity_preserves_column_order() {
        let mut grid = Grid::new(10, 6);
        grid.place(tile(1, 1, 2, 0));
        grid.place(tile(2, 2, 5, 0));
        grid.place(tile(3, 3, 9, 0));
        grid.place(tile(4, 4, 4, 1));

        grid.apply_gravity();

        assert_eq!(grid.get(Position { row: 9, col: 0 }).unwrap().value, 3);
        assert_eq!(grid.get(Position { row: 8, col: 0 }).unwrap().value, 2);
        assert_eq!(grid.get(Position { row: 7, col: 0 }).unwrap().value, 1);
        assert_eq!(grid.get(Position { row: 9, col: 1 }).unwrap().value, 4);
        assert!(grid.is_settled());
        assert!(grid.tiles().all(|t| grid.get(t.position()) == Some(t)));
    }

    #[test]
    fn test_gravity_keeps_column_sums() {
        let mut grid = Grid::new(10, 6);
        grid.place(tile(1, 7, 0, 2));
        grid.place(tile(2, 5, 6, 2));
        grid.place(tile(3, 9, 3, 5));
        let before = grid.column_sums();

        grid.apply_gravity();

        assert_eq!(grid.column_sums(), before);
        assert_eq!(grid.column_sums().iter().sum::<u32>(), grid.total_value());
        assert_eq!(grid.total_value(), 21);
    }

    #[test]
    fn test_remove_tiles() {
        let mut grid = Grid::new(10, 6);
        grid.place(tile(1, 3, 9, 0));
        grid.place(tile(2, 7, 9, 1));
        grid.place(tile(3, 5, 9, 2));

        let removed = grid.remove_tiles(&[TileId(Uuid::from_u128(1)), TileId(Uuid::from_u128(3))]);

        assert_eq!(removed.len(), 2);
        assert_eq!(grid.len(), 1);
        assert!(grid.contains(TileId(Uuid::from_u128(2))));
    }

    #[test]
    fn test_push_bottom_row_shifts_up() {
        let mut grid = Grid::new(3, 2);
        grid.place(tile(1, 4, 2, 0));
        grid.place(tile(2, 6, 1, 1));

        let dropped = grid.push_bottom_row(vec![tile(3, 1, 2, 0), tile(4, 2, 2, 1)]);

        assert!(dropped.is_empty());
        assert_eq!(grid.tile(TileId(Uuid::from_u128(1))).unwrap().row, 1);
        assert_eq!(grid.tile(TileId(Uuid::from_u128(2))).unwrap().row, 0);
        assert_eq!(grid.get(Position { row: 2, col: 1 }).unwrap().value, 2);
        assert!(grid.top_row_occupied());
    }

    #[test]
    fn test_push_bottom_row_drops_top_row() {
        let mut grid = Grid::new(3, 2);
        grid.place(tile(1, 4, 0, 0));

        let dropped = grid.push_bottom_row(vec![tile(2, 1, 2, 0)]);

        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].value, 4);
        assert!(!grid.contains(TileId(Uuid::from_u128(1))));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_is_settled_detects_gaps() {
        let mut grid = Grid::new(4, 1);
        grid.place(tile(1, 1, 1, 0));
        grid.place(tile(2, 1, 3, 0));
        assert!(!grid.is_settled());
    }
}
