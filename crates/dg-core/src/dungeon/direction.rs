//! Cardinal directions and the neighbourhood tables built from them

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::consts::STAIR_RUN;

/// Row/column offset
pub type Offset = (isize, isize);

/// Cardinal direction on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Every direction, in a fixed order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Row delta
    pub const fn di(self) -> isize {
        match self {
            Direction::North => -1,
            Direction::South => 1,
            Direction::West | Direction::East => 0,
        }
    }

    /// Column delta
    pub const fn dj(self) -> isize {
        match self {
            Direction::West => -1,
            Direction::East => 1,
            Direction::North | Direction::South => 0,
        }
    }

    pub const fn offset(self) -> Offset {
        (self.di(), self.dj())
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// A direction at right angles (the other one is its opposite)
    pub const fn perpendicular(self) -> Direction {
        match self {
            Direction::North | Direction::South => Direction::East,
            Direction::West | Direction::East => Direction::South,
        }
    }
}

fn scaled(a: Offset, k: isize) -> Offset {
    (a.0 * k, a.1 * k)
}

fn sum(a: Offset, b: Offset) -> Offset {
    (a.0 + b.0, a.1 + b.1)
}

/// Cells around a stair facing `dir`
///
/// The stair is a corridor end: the corridor runs back along `-dir`, and
/// every cell on the other three sides (diagonals included) is wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StairEnd {
    pub walled: [Offset; 7],
    pub corridor: [Offset; STAIR_RUN],
    pub next: Offset,
}

impl StairEnd {
    pub fn new(dir: Direction) -> Self {
        let d = dir.offset();
        let p = dir.perpendicular().offset();
        let back = scaled(d, -1);
        Self {
            walled: [
                p,
                scaled(p, -1),
                d,
                sum(d, p),
                sum(d, scaled(p, -1)),
                sum(back, p),
                sum(back, scaled(p, -1)),
            ],
            corridor: [(0, 0), back, scaled(d, -2)],
            next: back,
        }
    }
}

/// Cells examined when closing a dead end whose only opening is `dir`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEnd {
    pub walled: [Offset; 5],
    pub recurse: Offset,
}

impl CloseEnd {
    pub fn new(dir: Direction) -> Self {
        let d = dir.offset();
        let p = dir.perpendicular().offset();
        let back = scaled(d, -1);
        Self {
            walled: [
                p,
                scaled(p, -1),
                back,
                sum(back, p),
                sum(back, scaled(p, -1)),
            ],
            recurse: d,
        }
    }
}
