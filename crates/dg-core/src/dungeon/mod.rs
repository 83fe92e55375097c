//! Dungeon system
//!
//! Contains the cell grid, rooms, and the generation stages that fill it.

mod cell;
mod clean;
mod connect;
mod corridor;
mod direction;
mod door;
mod generation;
mod grid;
pub mod invariants;
mod label;
mod mask;
mod placement;
mod room;
mod stairs;

pub use cell::{Cell, CellFlags, DoorKind, StairKind};
pub use clean::{CleanReport, clean_dungeon, dead_end, dead_ends};
pub use connect::{JoinReport, RegionMap, label_regions, region_count};
pub use corridor::{GrowthReport, grow_corridors};
pub use direction::{CloseEnd, Direction, Offset, StairEnd};
pub use door::{ConnectionSet, Sill, SillTarget, door_sills, open_rooms};
pub use generation::{Dungeon, GenState, GenerationStats, generate};
pub use grid::Grid;
pub use label::label_rooms;
pub use mask::apply_mask;
pub use placement::{RoomParams, emplace_room, emplace_rooms, set_room};
pub use room::{DoorTarget, Doorway, Room, RoomId, RoomSpec};
pub use stairs::{Stair, StairSite, emplace_stairs, stair_sites};
