//! Room placement
//!
//! Two strategies feed candidate rectangles to `emplace_room`:
//! - Scattered: a fixed number of fully random attempts
//! - Packed: one attempt anchored at every free odd cell, row-major
//!
//! A candidate is sounded against the grid before anything is written, so
//! a rejected attempt leaves no trace.

use log::debug;

use super::grid::Grid;
use super::room::{Room, RoomId, RoomSpec};
use crate::config::{DungeonConfig, RoomLayout};
use crate::consts::MAX_ROOMS;
use crate::rng::GenRng;

/// Room placement parameters, derived from the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomParams {
    pub layout: RoomLayout,
    pub n_i: usize,
    pub n_j: usize,
    /// Smallest side in half-units
    pub base: usize,
    /// Number of half-unit sizes above `base`
    pub radix: usize,
    pub max_rooms: u16,
    pub border_skip_percent: u8,
    /// Attempts made by the scattered strategy
    pub scatter_attempts: usize,
}

impl RoomParams {
    pub fn from_config(cfg: &DungeonConfig) -> Self {
        Self {
            layout: cfg.room_layout,
            n_i: cfg.n_i(),
            n_j: cfg.n_j(),
            base: cfg.room_base(),
            radix: cfg.room_radix(),
            max_rooms: cfg.max_rooms.min(MAX_ROOMS),
            border_skip_percent: cfg.border_skip_percent,
            scatter_attempts: alloc_rooms(cfg.n_rows, cfg.n_cols, cfg.room_max),
        }
    }
}

/// Number of scattered attempts for a dungeon of the given size
pub fn alloc_rooms(n_rows: usize, n_cols: usize, room_max: usize) -> usize {
    let room_area = room_max.saturating_mul(room_max);
    if room_area == 0 {
        return 0;
    }
    n_rows.saturating_mul(n_cols) / room_area
}

/// Run the configured strategy; returns the number of rooms placed
pub fn emplace_rooms(
    grid: &mut Grid,
    rooms: &mut Vec<Room>,
    rng: &mut GenRng,
    params: &RoomParams,
) -> usize {
    let before = rooms.len();
    match params.layout {
        RoomLayout::Packed => pack_rooms(grid, rooms, rng, params),
        RoomLayout::Scattered => scatter_rooms(grid, rooms, rng, params),
    }
    let placed = rooms.len() - before;
    debug!("placed {placed} rooms ({:?} layout)", params.layout);
    placed
}

fn pack_rooms(grid: &mut Grid, rooms: &mut Vec<Room>, rng: &mut GenRng, params: &RoomParams) {
    for i in 0..params.n_i {
        let r = i * 2 + 1;
        for j in 0..params.n_j {
            let c = j * 2 + 1;
            if grid.get(r, c).is_room() {
                continue;
            }
            if (i == 0 || j == 0) && rng.percent(params.border_skip_percent) {
                continue;
            }
            emplace_room(grid, rooms, rng, params, RoomSpec::anchored(i, j));
        }
    }
}

fn scatter_rooms(grid: &mut Grid, rooms: &mut Vec<Room>, rng: &mut GenRng, params: &RoomParams) {
    for _ in 0..params.scatter_attempts {
        emplace_room(grid, rooms, rng, params, RoomSpec::default());
    }
}

/// Roll whatever the request leaves open
///
/// Sizes come from `base + rn2(radix)`; with a fixed anchor the range is
/// narrowed so the room still fits between the anchor and the far edge.
pub fn set_room(rng: &mut GenRng, params: &RoomParams, spec: RoomSpec) -> RoomSpec {
    let base = params.base as i32;
    let radix = params.radix as i32;

    let roll_side = |rng: &mut GenRng, anchor: Option<usize>, n: usize| -> usize {
        match anchor {
            Some(a) => {
                let room = (n as i32 - base - a as i32).max(0);
                (rng.rn2(room.min(radix)) + base) as usize
            }
            None => (rng.rn2(radix) + base) as usize,
        }
    };

    let height = spec
        .height
        .unwrap_or_else(|| roll_side(rng, spec.i, params.n_i));
    let width = spec
        .width
        .unwrap_or_else(|| roll_side(rng, spec.j, params.n_j));
    let i = spec
        .i
        .unwrap_or_else(|| rng.rn2(params.n_i as i32 - height as i32) as usize);
    let j = spec
        .j
        .unwrap_or_else(|| rng.rn2(params.n_j as i32 - width as i32) as usize);

    RoomSpec {
        i: Some(i),
        j: Some(j),
        height: Some(height),
        width: Some(width),
    }
}

/// Result of sounding a footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sounding {
    Clear,
    Blocked,
    Overlaps(RoomId),
}

/// Inspect a footprint without writing anything
pub fn sound_room(grid: &Grid, r1: usize, c1: usize, r2: usize, c2: usize) -> Sounding {
    let mut hit = None;
    for r in r1..=r2 {
        for c in c1..=c2 {
            let cell = grid.get(r, c);
            if cell.is_blocked() {
                return Sounding::Blocked;
            }
            if hit.is_none() && cell.is_room() {
                hit = cell.room_id();
            }
        }
    }
    hit.map_or(Sounding::Clear, Sounding::Overlaps)
}

/// Try to place one room; commits it atomically on success
pub fn emplace_room(
    grid: &mut Grid,
    rooms: &mut Vec<Room>,
    rng: &mut GenRng,
    params: &RoomParams,
    spec: RoomSpec,
) -> Option<RoomId> {
    if rooms.len() >= usize::from(params.max_rooms) {
        return None;
    }

    let proto = set_room(rng, params, spec);
    let (i, j) = (proto.i?, proto.j?);
    let (height, width) = (proto.height?, proto.width?);

    let r1 = i * 2 + 1;
    let c1 = j * 2 + 1;
    let r2 = (i + height) * 2 - 1;
    let c2 = (j + width) * 2 - 1;

    if r1 < 1 || r2 >= grid.max_row() || c1 < 1 || c2 >= grid.max_col() {
        return None;
    }

    if sound_room(grid, r1, c1, r2, c2) != Sounding::Clear {
        return None;
    }

    let id = RoomId::new(u16::try_from(rooms.len() + 1).ok()?)?;
    for r in r1..=r2 {
        for c in c1..=c2 {
            grid.get_mut(r, c).make_room(id);
        }
    }

    let room = Room::new(id, r1, r2, c1, c2);
    for (r, c) in room.ring() {
        grid.get_mut(r, c).mark_perimeter();
    }
    rooms.push(room);
    Some(id)
}
