//! Dungeon generation
//!
//! Runs the stages in a fixed order over one mutable state. The seeded
//! generator lives in that state, so a seed and a configuration always
//! produce the same map.

use log::info;
use serde::{Deserialize, Serialize};

use super::clean::{CleanReport, clean_dungeon};
use super::connect::{JoinReport, join_regions};
use super::corridor::{GrowthReport, grow_corridors};
use super::door::open_rooms;
use super::grid::Grid;
use super::invariants;
use super::label::label_rooms;
use super::mask::apply_mask;
use super::placement::{RoomParams, emplace_rooms};
use super::room::Room;
use super::stairs::{Stair, emplace_stairs};
use crate::config::DungeonConfig;
use crate::error::GenerationError;
use crate::rng::GenRng;

/// Counters collected along the way
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub masked: usize,
    pub doors: usize,
    pub labels: usize,
    pub growth: GrowthReport,
    pub joins: JoinReport,
    pub clean: CleanReport,
}

/// Mutable state threaded through the stages
#[derive(Debug, Clone)]
pub struct GenState {
    pub grid: Grid,
    pub rooms: Vec<Room>,
    pub stairs: Vec<Stair>,
    pub stats: GenerationStats,
    pub rng: GenRng,
}

impl GenState {
    pub fn new(cfg: &DungeonConfig) -> Self {
        Self {
            grid: Grid::new(cfg.n_i(), cfg.n_j()),
            rooms: Vec::new(),
            stairs: Vec::new(),
            stats: GenerationStats::default(),
            rng: GenRng::new(cfg.seed),
        }
    }

    pub fn init_cells(&mut self, cfg: &DungeonConfig) {
        self.stats.masked = apply_mask(&mut self.grid, &cfg.dungeon_layout);
    }

    pub fn place_rooms(&mut self, cfg: &DungeonConfig) {
        let params = RoomParams::from_config(cfg);
        emplace_rooms(&mut self.grid, &mut self.rooms, &mut self.rng, &params);
    }

    pub fn open_rooms(&mut self, cfg: &DungeonConfig) {
        self.stats.doors = open_rooms(
            &mut self.grid,
            &mut self.rooms,
            &mut self.rng,
            &cfg.door_set.weights(),
            cfg.door_density,
        );
    }

    pub fn label_rooms(&mut self) {
        self.stats.labels = label_rooms(&mut self.grid, &mut self.rooms);
    }

    pub fn corridors(&mut self, cfg: &DungeonConfig) {
        self.stats.growth = grow_corridors(
            &mut self.grid,
            &mut self.rng,
            cfg.corridor_layout.straightness(),
        );
        self.stats.joins = join_regions(
            &mut self.grid,
            &mut self.rooms,
            &mut self.rng,
            &cfg.door_set.weights(),
        );
    }

    pub fn emplace_stairs(&mut self, cfg: &DungeonConfig) {
        self.stairs = emplace_stairs(&mut self.grid, &mut self.rng, cfg.add_stairs);
    }

    pub fn clean(&mut self, cfg: &DungeonConfig) {
        self.stats.clean = clean_dungeon(
            &mut self.grid,
            &mut self.rooms,
            &mut self.rng,
            cfg.remove_deadends,
        );
    }

    /// Freeze the state into a snapshot
    pub fn finish(self, cfg: &DungeonConfig) -> Dungeon {
        Dungeon {
            seed: cfg.seed,
            map_style: cfg.map_style.clone(),
            grid: self.grid,
            rooms: self.rooms,
            stairs: self.stairs,
            stats: self.stats,
        }
    }
}

/// A finished map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    seed: u64,
    map_style: String,
    grid: Grid,
    rooms: Vec<Room>,
    stairs: Vec<Stair>,
    stats: GenerationStats,
}

impl Dungeon {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Renderer style name, passed through from the configuration
    pub fn map_style(&self) -> &str {
        &self.map_style
    }

    pub fn n_i(&self) -> usize {
        self.grid.n_i()
    }

    pub fn n_j(&self) -> usize {
        self.grid.n_j()
    }

    pub fn n_rows(&self) -> usize {
        self.grid.n_rows()
    }

    pub fn n_cols(&self) -> usize {
        self.grid.n_cols()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Rooms in id order (`rooms()[id.index()]`)
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn stairs(&self) -> &[Stair] {
        &self.stairs
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Re-run every structural check on this map
    ///
    /// Connectivity is only required when region joining succeeded; a
    /// custom mask can wall regions apart for good.
    pub fn check(&self) -> Result<(), GenerationError> {
        run_checks(&self.grid, &self.rooms, &self.stairs, &self.stats.joins)
    }

    pub fn to_ascii(&self) -> String {
        self.grid.to_ascii()
    }
}

fn run_checks(
    grid: &Grid,
    rooms: &[Room],
    stairs: &[Stair],
    joins: &JoinReport,
) -> Result<(), GenerationError> {
    invariants::check_structure(grid, rooms, stairs)?;
    if joins.is_connected() {
        invariants::check_connected(grid)?;
    }
    Ok(())
}

/// Generate a complete map
pub fn generate(cfg: &DungeonConfig) -> Result<Dungeon, GenerationError> {
    cfg.validate()?;
    info!(
        "generating {}x{} dungeon, seed {}",
        cfg.n_rows, cfg.n_cols, cfg.seed
    );

    let mut state = GenState::new(cfg);
    state.init_cells(cfg);
    state.place_rooms(cfg);
    state.open_rooms(cfg);
    state.label_rooms();
    state.corridors(cfg);
    state.emplace_stairs(cfg);
    state.clean(cfg);

    if cfg!(debug_assertions) {
        run_checks(&state.grid, &state.rooms, &state.stairs, &state.stats.joins)?;
    }

    let dungeon = state.finish(cfg);
    info!(
        "seed {}: {} rooms, {} doors, {} stairs",
        dungeon.seed,
        dungeon.rooms.len(),
        dungeon.rooms.iter().map(|r| r.doors.len()).sum::<usize>(),
        dungeon.stairs.len()
    );
    Ok(dungeon)
}
