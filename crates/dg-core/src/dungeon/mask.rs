//! Dungeon silhouettes
//!
//! Blocks every cell outside the chosen shape before anything is placed.

use super::cell::Cell;
use super::grid::Grid;
use crate::config::DungeonLayout;

/// Apply a layout to a fresh grid; returns the number of blocked cells
pub fn apply_mask(grid: &mut Grid, layout: &DungeonLayout) -> usize {
    if let Some(template) = layout.template() {
        mask_cells(grid, &template)
    } else if *layout == DungeonLayout::Round {
        round_mask(grid)
    } else {
        0
    }
}

/// Nearest-fit scale a 0/1 template over the grid
pub fn mask_cells(grid: &mut Grid, mask: &[Vec<u8>]) -> usize {
    let mask_rows = mask.len();
    let mask_cols = mask.first().map_or(0, Vec::len);
    if mask_rows == 0 || mask_cols == 0 {
        return 0;
    }
    let rows = grid.n_rows();
    let cols = grid.n_cols();

    let mut blocked = 0;
    for r in 0..rows {
        let mr = r * mask_rows / rows;
        for c in 0..cols {
            let mc = c * mask_cols / cols;
            if mask[mr][mc] == 0 {
                grid.set(r, c, Cell::blocked());
                blocked += 1;
            }
        }
    }
    blocked
}

/// Block everything farther from the centre than half the column count
pub fn round_mask(grid: &mut Grid) -> usize {
    let center_r = (grid.n_rows() / 2) as f64;
    let center_c = (grid.n_cols() / 2) as f64;

    let mut blocked = 0;
    for r in 0..grid.n_rows() {
        for c in 0..grid.n_cols() {
            let d = ((r as f64 - center_r).powi(2) + (c as f64 - center_c).powi(2)).sqrt();
            if d > center_c {
                grid.set(r, c, Cell::blocked());
                blocked += 1;
            }
        }
    }
    blocked
}
