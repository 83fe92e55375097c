//! Stairs
//!
//! A stair goes on the closed end of a straight corridor run: the cell and
//! the two behind it must be plain corridor, everything else around it
//! wall. Sites on the outermost ring of odd cells are used first.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::cell::StairKind;
use super::direction::{Direction, Offset, StairEnd};
use super::grid::Grid;
use crate::rng::GenRng;

/// A placed stair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stair {
    pub row: usize,
    pub col: usize,
    /// First corridor cell leading away from the stair
    pub next_row: usize,
    pub next_col: usize,
    /// Direction from the stair to `next`
    pub dir: Direction,
    pub kind: StairKind,
}

/// A cell where a stair could go, facing `facing`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StairSite {
    pub row: usize,
    pub col: usize,
    pub facing: Direction,
}

fn cell_at(grid: &Grid, r: usize, c: usize, (dr, dc): Offset) -> Option<(usize, usize)> {
    grid.offset(r, c, dr, dc)
}

/// Whether `(r, c)` is a closed corridor end facing `facing`
pub fn is_stair_end(grid: &Grid, r: usize, c: usize, facing: Direction) -> bool {
    let end = StairEnd::new(facing);
    let walled = end.walled.iter().all(|&off| {
        cell_at(grid, r, c, off).is_none_or(|(nr, nc)| !grid.get(nr, nc).is_open())
    });
    walled
        && end.corridor.iter().all(|&off| {
            cell_at(grid, r, c, off).is_some_and(|(nr, nc)| grid.get(nr, nc).is_plain_corridor())
        })
}

/// Every stair site, edge sites first, each group shuffled
pub fn stair_sites(grid: &Grid, rng: &mut GenRng) -> Vec<StairSite> {
    let mut edge = Vec::new();
    let mut inner = Vec::new();
    for i in 0..grid.n_i() {
        let r = i * 2 + 1;
        for j in 0..grid.n_j() {
            let c = j * 2 + 1;
            if !grid.get(r, c).is_plain_corridor() {
                continue;
            }
            let on_edge = r == 1 || c == 1 || r == grid.max_row() - 1 || c == grid.max_col() - 1;
            for facing in Direction::ALL {
                if is_stair_end(grid, r, c, facing) {
                    let site = StairSite { row: r, col: c, facing };
                    if on_edge {
                        edge.push(site);
                    } else {
                        inner.push(site);
                    }
                }
            }
        }
    }
    rng.shuffle(&mut edge);
    rng.shuffle(&mut inner);
    edge.extend(inner);
    edge
}

/// Kind of the `k`-th stair: one down, one up, then random
fn stair_kind(k: usize, rng: &mut GenRng) -> StairKind {
    match k {
        0 => StairKind::Down,
        1 => StairKind::Up,
        _ if rng.rn2(2) == 0 => StairKind::Down,
        _ => StairKind::Up,
    }
}

/// Place up to `count` stairs; fewer if the map runs out of sites
pub fn emplace_stairs(grid: &mut Grid, rng: &mut GenRng, count: u8) -> Vec<Stair> {
    let mut stairs = Vec::new();
    if count == 0 {
        return stairs;
    }
    let mut sites = stair_sites(grid, rng).into_iter();

    for k in 0..usize::from(count) {
        // Sites next to a stair placed earlier stop qualifying.
        let Some(site) = sites.find(|s| is_stair_end(grid, s.row, s.col, s.facing)) else {
            warn!("no site left for stair {} of {count}", k + 1);
            break;
        };
        let kind = stair_kind(k, rng);
        let dir = site.facing.opposite();
        // The corridor behind a valid site is always on the grid.
        let Some((next_row, next_col)) = grid.step(site.row, site.col, dir) else {
            continue;
        };
        grid.get_mut(site.row, site.col).set_stair(kind);
        stairs.push(Stair {
            row: site.row,
            col: site.col,
            next_row,
            next_col,
            dir,
            kind,
        });
    }
    debug!("placed {} stairs", stairs.len());
    stairs
}
