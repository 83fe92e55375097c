//! The cell matrix
//!
//! Indexed `[row][col]`. Dimensions are `(2*n_i+1) x (2*n_j+1)`: odd rows
//! and columns hold room and corridor interiors, even ones hold walls.
//! Indexing outside the grid panics; neighbour walks go through
//! `offset`, which returns `None` off the edge.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellFlags};
use super::direction::Direction;
use super::room::RoomId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    n_i: usize,
    n_j: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Fully open grid for the given half-dimensions
    pub fn new(n_i: usize, n_j: usize) -> Self {
        Self {
            n_i,
            n_j,
            cells: vec![vec![Cell::default(); 2 * n_j + 1]; 2 * n_i + 1],
        }
    }

    pub fn n_i(&self) -> usize {
        self.n_i
    }

    pub fn n_j(&self) -> usize {
        self.n_j
    }

    pub fn n_rows(&self) -> usize {
        self.cells.len()
    }

    pub fn n_cols(&self) -> usize {
        2 * self.n_j + 1
    }

    pub fn max_row(&self) -> usize {
        2 * self.n_i
    }

    pub fn max_col(&self) -> usize {
        2 * self.n_j
    }

    pub fn get(&self, r: usize, c: usize) -> &Cell {
        &self.cells[r][c]
    }

    pub fn get_mut(&mut self, r: usize, c: usize) -> &mut Cell {
        &mut self.cells[r][c]
    }

    /// Replace a cell
    pub fn set(&mut self, r: usize, c: usize, cell: Cell) {
        self.cells[r][c] = cell;
    }

    /// OR structural flags into a cell
    pub fn merge_flags(&mut self, r: usize, c: usize, flags: CellFlags) {
        self.cells[r][c].merge(flags);
    }

    /// Clear structural flags on a cell
    pub fn clear_flags(&mut self, r: usize, c: usize, flags: CellFlags) {
        self.cells[r][c].clear(flags);
    }

    pub fn room_id_at(&self, r: usize, c: usize) -> Option<RoomId> {
        self.cells[r][c].room_id()
    }

    pub fn in_bounds(&self, r: isize, c: isize) -> bool {
        r >= 0 && c >= 0 && (r as usize) <= self.max_row() && (c as usize) <= self.max_col()
    }

    /// Position `(dr, dc)` away from `(r, c)`, if it is on the grid
    pub fn offset(&self, r: usize, c: usize, dr: isize, dc: isize) -> Option<(usize, usize)> {
        let nr = r as isize + dr;
        let nc = c as isize + dc;
        if self.in_bounds(nr, nc) {
            Some((nr as usize, nc as usize))
        } else {
            None
        }
    }

    /// Neighbour one step in `dir`
    pub fn step(&self, r: usize, c: usize, dir: Direction) -> Option<(usize, usize)> {
        self.offset(r, c, dir.di(), dir.dj())
    }

    /// Open 4-neighbours of a cell
    pub fn open_neighbours(&self, r: usize, c: usize) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| {
                self.step(r, c, dir)
                    .is_some_and(|(nr, nc)| self.get(nr, nc).is_open())
            })
            .collect()
    }

    /// Row-major iterator over every position and cell
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, cell)| (r, c, cell)))
    }

    /// Packed masks, row by row
    pub fn to_bits(&self) -> Vec<Vec<u32>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(Cell::bits).collect())
            .collect()
    }

    /// One character per cell, one line per row
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.n_rows() * (self.n_cols() + 1));
        for row in &self.cells {
            out.extend(row.iter().map(Cell::symbol));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let grid = Grid::new(10, 5);
        assert_eq!(grid.n_rows(), 21);
        assert_eq!(grid.n_cols(), 11);
        assert_eq!(grid.max_row(), 20);
        assert_eq!(grid.max_col(), 10);
    }

    #[test]
    fn test_offset_bounds() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.offset(0, 0, -1, 0), None);
        assert_eq!(grid.offset(6, 6, 0, 1), None);
        assert_eq!(grid.offset(3, 3, 2, -2), Some((5, 1)));
        assert_eq!(grid.step(0, 3, Direction::North), None);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_panics() {
        let grid = Grid::new(3, 3);
        let _ = grid.get(7, 0);
    }

    #[test]
    fn test_merge_and_clear() {
        let mut grid = Grid::new(3, 3);
        grid.merge_flags(1, 1, CellFlags::CORRIDOR);
        assert!(grid.get(1, 1).is_corridor());
        assert_eq!(grid.open_neighbours(1, 2), vec![Direction::West]);
        grid.clear_flags(1, 1, CellFlags::CORRIDOR);
        assert!(grid.get(1, 1).is_rock());
    }

    #[test]
    fn test_ascii_shape() {
        let grid = Grid::new(2, 3);
        let ascii = grid.to_ascii();
        let lines: Vec<&str> = ascii.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.chars().count() == 7));
    }

    #[test]
    fn test_packed_export_decodes() {
        use crate::dungeon::cell::{DoorKind, StairKind};

        let mut grid = Grid::new(3, 3);
        grid.get_mut(1, 1).make_room(RoomId::new(7).unwrap());
        grid.get_mut(1, 1).set_label(b'7');
        grid.get_mut(1, 2).mark_entrance();
        grid.get_mut(1, 2).set_door(DoorKind::Locked);
        grid.get_mut(1, 3).make_corridor();
        grid.get_mut(1, 3).set_stair(StairKind::Up);
        grid.set(5, 5, Cell::blocked());

        let bits = grid.to_bits();
        assert_eq!(bits.len(), grid.n_rows());
        assert!(bits.iter().all(|row| row.len() == grid.n_cols()));
        assert_eq!(bits[0][0], 0);
        for (r, c, cell) in grid.iter() {
            assert_eq!(Cell::from_bits(bits[r][c]).as_ref(), Some(cell), "({r}, {c})");
        }
    }
}
