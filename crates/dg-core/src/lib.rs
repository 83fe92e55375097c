//! dg-core: seeded tile dungeon generation
//!
//! Builds a complete map from an integer seed: rooms, doors, maze
//! corridors, stairs, then a cleanup pass. No I/O; rendering and
//! persistence are left to the caller, who gets a serializable snapshot.
//!
//! ```no_run
//! use dg_core::{DungeonConfig, generate};
//!
//! let dungeon = generate(&DungeonConfig::with_seed(42)).unwrap();
//! print!("{}", dungeon.to_ascii());
//! ```

pub mod config;
pub mod consts;
pub mod dungeon;
pub mod error;
mod rng;

pub use config::{CorridorLayout, DoorSet, DoorWeights, DungeonConfig, DungeonLayout, RoomLayout};
pub use dungeon::{Dungeon, generate};
pub use error::{ConfigError, GenerationError};
pub use rng::GenRng;
