//! Corridor growth
//!
//! A randomized depth-first maze over the odd cells left as rock after
//! rooms and doors are placed. Each carve moves two cells at a time so
//! corridors stay on the odd lattice with walls between them:
//!
//! ```text
//!   # # # # #        # # # # #
//!   # @ # . #   ->   # , , , #
//!   # # # # #        # # # # #
//! ```
//!
//! The walk keeps an explicit stack and backtracks, so every strand fills
//! its whole pocket of rock. The straightness bias decides how often the
//! previous direction is tried first.

use log::debug;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::grid::Grid;
use crate::rng::GenRng;

/// What a growth pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthReport {
    /// Seeds a strand was started from
    pub strands: usize,
    /// Cells turned into corridor
    pub carved: usize,
    /// Steps that changed direction, over every branch
    pub turns: usize,
    /// Largest number of turns between a strand seed and any cell it reached
    pub max_branch_turns: usize,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    r: usize,
    c: usize,
    prev: Option<Direction>,
    turns: usize,
    dirs: [Direction; 4],
    next: usize,
}

impl Frame {
    fn new(
        r: usize,
        c: usize,
        prev: Option<Direction>,
        turns: usize,
        rng: &mut GenRng,
        straightness: u8,
    ) -> Self {
        let mut dirs = Direction::ALL;
        rng.shuffle(&mut dirs);
        if let Some(prev) = prev {
            if rng.percent(straightness) {
                if let Some(pos) = dirs.iter().position(|&d| d == prev) {
                    dirs[..=pos].rotate_right(1);
                }
            }
        }
        Self {
            r,
            c,
            prev,
            turns,
            dirs,
            next: 0,
        }
    }

    fn next_dir(&mut self) -> Option<Direction> {
        let dir = self.dirs.get(self.next).copied();
        self.next += 1;
        dir
    }
}

/// Fill every odd rock cell with corridor
pub fn grow_corridors(grid: &mut Grid, rng: &mut GenRng, straightness: u8) -> GrowthReport {
    let mut report = GrowthReport::default();
    for i in 0..grid.n_i() {
        let r = i * 2 + 1;
        for j in 0..grid.n_j() {
            let c = j * 2 + 1;
            if grid.get(r, c).is_rock() {
                report.strands += 1;
                grow_strand(grid, rng, straightness, r, c, &mut report);
            }
        }
    }
    debug!(
        "grew {} corridor strands: {} cells, {} turns (max {} on one branch)",
        report.strands, report.carved, report.turns, report.max_branch_turns
    );
    report
}

/// Mid and destination cells of a two-cell move, if both are rock
fn tunnel(grid: &Grid, r: usize, c: usize, dir: Direction) -> Option<[(usize, usize); 2]> {
    let mid = grid.step(r, c, dir)?;
    let dest = grid.step(mid.0, mid.1, dir)?;
    let clear = grid.get(mid.0, mid.1).is_rock() && grid.get(dest.0, dest.1).is_rock();
    clear.then_some([mid, dest])
}

fn grow_strand(
    grid: &mut Grid,
    rng: &mut GenRng,
    straightness: u8,
    r: usize,
    c: usize,
    report: &mut GrowthReport,
) {
    // A seed boxed in on all sides still becomes a one-cell corridor.
    grid.get_mut(r, c).make_corridor();
    report.carved += 1;

    let mut stack = vec![Frame::new(r, c, None, 0, rng, straightness)];
    while let Some(frame) = stack.last_mut() {
        let Some(dir) = frame.next_dir() else {
            stack.pop();
            continue;
        };
        let (r, c, prev, turns) = (frame.r, frame.c, frame.prev, frame.turns);

        let Some([mid, dest]) = tunnel(grid, r, c, dir) else {
            continue;
        };
        grid.get_mut(mid.0, mid.1).make_corridor();
        grid.get_mut(dest.0, dest.1).make_corridor();
        report.carved += 2;

        let turned = prev.is_some_and(|p| p != dir);
        let turns = turns + usize::from(turned);
        report.turns += usize::from(turned);
        report.max_branch_turns = report.max_branch_turns.max(turns);

        stack.push(Frame::new(dest.0, dest.1, Some(dir), turns, rng, straightness));
    }
}
