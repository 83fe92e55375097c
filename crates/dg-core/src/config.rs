//! Generator configuration
//!
//! `DungeonConfig` is an immutable value: it is validated once, then handed
//! by reference to the pipeline. Each stage receives only the parameters it
//! needs.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::consts::{MAX_DIMENSION, MAX_ROOMS, MIN_DIMENSION};
use crate::error::ConfigError;

/// Overall silhouette of the map
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DungeonLayout {
    /// Fully open rectangle
    #[default]
    None,
    /// Ring with a blocked centre
    Box,
    /// Plus shape with blocked corners
    Cross,
    /// Circle inscribed in the column span
    Round,
    /// Caller supplied 0/1 template, scaled to the grid
    Custom(Vec<Vec<u8>>),
}

impl DungeonLayout {
    /// Template grid for this layout, if it is template based
    pub fn template(&self) -> Option<Vec<Vec<u8>>> {
        match self {
            DungeonLayout::Box => Some(vec![vec![1, 1, 1], vec![1, 0, 1], vec![1, 1, 1]]),
            DungeonLayout::Cross => Some(vec![vec![0, 1, 0], vec![1, 1, 1], vec![0, 1, 0]]),
            DungeonLayout::Custom(mask) => Some(mask.clone()),
            DungeonLayout::None | DungeonLayout::Round => None,
        }
    }

    /// Parse a layout name (case-insensitive); custom templates have no name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" | "rectangle" | "square" => Some(DungeonLayout::None),
            "box" => Some(DungeonLayout::Box),
            "cross" => Some(DungeonLayout::Cross),
            "round" => Some(DungeonLayout::Round),
            _ => None,
        }
    }
}

/// Room placement strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum RoomLayout {
    /// Row-major scan anchoring a room at every free odd cell
    Packed,
    /// A fixed number of independent random placements
    #[default]
    Scattered,
}

/// Corridor straightness preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CorridorLayout {
    /// Never prefers the previous direction
    Labyrinth,
    /// Keeps the previous direction half of the time
    #[default]
    Bent,
    /// Always tries the previous direction first
    Straight,
    /// Explicit percentage
    Custom(u8),
}

impl CorridorLayout {
    /// Probability (percent) of retrying the previous direction first
    pub fn straightness(self) -> u8 {
        match self {
            CorridorLayout::Labyrinth => 0,
            CorridorLayout::Bent => 50,
            CorridorLayout::Straight => 100,
            CorridorLayout::Custom(p) => p,
        }
    }

    /// Parse a preset name or a bare percentage
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "labyrinth" => Some(CorridorLayout::Labyrinth),
            "bent" | "errant" => Some(CorridorLayout::Bent),
            "straight" => Some(CorridorLayout::Straight),
            other => other.parse::<u8>().ok().map(CorridorLayout::Custom),
        }
    }
}

/// Relative weights of the door kinds, in `DoorKind::ALL` order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorWeights {
    pub arch: u32,
    pub door: u32,
    pub locked: u32,
    pub trapped: u32,
    pub secret: u32,
    pub portcullis: u32,
}

impl DoorWeights {
    /// Weights as a slice-friendly array
    pub fn as_array(&self) -> [u32; 6] {
        [
            self.arch,
            self.door,
            self.locked,
            self.trapped,
            self.secret,
            self.portcullis,
        ]
    }

    pub fn total(&self) -> u32 {
        self.as_array().iter().sum()
    }
}

/// Door kind presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DoorSet {
    /// Open archways only
    None,
    /// Arches and plain doors
    Basic,
    /// Mostly arches with a sprinkling of everything else
    #[default]
    Standard,
    /// Locks, secrets and portcullises
    Secure,
    /// Traps everywhere
    Deathtrap,
    Custom(DoorWeights),
}

impl DoorSet {
    pub fn weights(&self) -> DoorWeights {
        let w = |arch, door, locked, trapped, secret, portcullis| DoorWeights {
            arch,
            door,
            locked,
            trapped,
            secret,
            portcullis,
        };
        match self {
            DoorSet::None => w(1, 0, 0, 0, 0, 0),
            DoorSet::Basic => w(60, 40, 0, 0, 0, 0),
            DoorSet::Standard => w(55, 20, 8, 7, 6, 4),
            DoorSet::Secure => w(10, 30, 30, 5, 15, 10),
            DoorSet::Deathtrap => w(10, 20, 15, 30, 15, 10),
            DoorSet::Custom(weights) => *weights,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(DoorSet::None),
            "basic" => Some(DoorSet::Basic),
            "standard" => Some(DoorSet::Standard),
            "secure" => Some(DoorSet::Secure),
            "deathtrap" => Some(DoorSet::Deathtrap),
            _ => None,
        }
    }
}

/// Everything a generation run depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub seed: u64,
    /// Requested rows; the grid uses `2 * (n_rows / 2) + 1`
    pub n_rows: usize,
    /// Requested columns; the grid uses `2 * (n_cols / 2) + 1`
    pub n_cols: usize,
    pub dungeon_layout: DungeonLayout,
    /// Smallest room side, in cells
    pub room_min: usize,
    /// Largest room side, in cells
    pub room_max: usize,
    pub room_layout: RoomLayout,
    /// Rooms stop being placed once this many exist
    pub max_rooms: u16,
    /// Packed layout: chance to skip an anchor on the top row or left column
    pub border_skip_percent: u8,
    pub corridor_layout: CorridorLayout,
    /// Chance each dead end is collapsed during cleanup
    pub remove_deadends: u8,
    pub add_stairs: u8,
    pub door_set: DoorSet,
    /// Scales the per-room door count, in percent
    pub door_density: u8,
    /// Forwarded untouched to the renderer
    pub map_style: String,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            n_rows: 39,
            n_cols: 39,
            dungeon_layout: DungeonLayout::None,
            room_min: 3,
            room_max: 9,
            room_layout: RoomLayout::Scattered,
            max_rooms: MAX_ROOMS,
            border_skip_percent: 50,
            corridor_layout: CorridorLayout::Bent,
            remove_deadends: 50,
            add_stairs: 2,
            door_set: DoorSet::Standard,
            door_density: 100,
            map_style: "Standard".to_string(),
        }
    }
}

impl DungeonConfig {
    /// Default configuration with the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Half-height of the grid in odd cells
    pub fn n_i(&self) -> usize {
        self.n_rows / 2
    }

    /// Half-width of the grid in odd cells
    pub fn n_j(&self) -> usize {
        self.n_cols / 2
    }

    /// Smallest room side in half-units
    pub fn room_base(&self) -> usize {
        self.room_min.div_ceil(2)
    }

    /// Number of distinct room sides in half-units
    pub fn room_radix(&self) -> usize {
        self.room_max.saturating_sub(self.room_min) / 2 + 1
    }

    /// Check every parameter; generation refuses to start otherwise
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dim_ok = |d: usize| (MIN_DIMENSION..=MAX_DIMENSION).contains(&d);
        if !dim_ok(self.n_rows) || !dim_ok(self.n_cols) {
            return Err(ConfigError::InvalidDimensions {
                rows: self.n_rows,
                cols: self.n_cols,
                min: MIN_DIMENSION,
                max: MAX_DIMENSION,
            });
        }
        if self.room_min < 1 {
            return Err(ConfigError::RoomMinTooSmall(self.room_min));
        }
        if self.room_max > MAX_DIMENSION {
            return Err(ConfigError::RoomMaxTooLarge {
                value: self.room_max,
                limit: MAX_DIMENSION,
            });
        }
        if self.room_min > self.room_max {
            return Err(ConfigError::RoomBounds {
                min: self.room_min,
                max: self.room_max,
            });
        }
        if self.max_rooms > MAX_ROOMS {
            return Err(ConfigError::TooManyRooms {
                value: self.max_rooms,
                limit: MAX_ROOMS,
            });
        }
        for (field, value) in [
            ("border_skip_percent", self.border_skip_percent),
            ("remove_deadends", self.remove_deadends),
            ("corridor_layout", self.corridor_layout.straightness()),
        ] {
            if value > 100 {
                return Err(ConfigError::PercentOutOfRange { field, value });
            }
        }
        if let DungeonLayout::Custom(mask) = &self.dungeon_layout {
            let width = mask.first().map_or(0, Vec::len);
            if width == 0 || mask.iter().any(|row| row.len() != width) {
                return Err(ConfigError::BadMask);
            }
            let areas = mask_areas(mask);
            if areas > 1 {
                return Err(ConfigError::DisconnectedMask(areas));
            }
        }
        if self.door_set.weights().total() == 0 {
            return Err(ConfigError::NoDoorWeights);
        }
        Ok(())
    }
}

/// Number of 4-connected areas of open (non-zero) template cells
fn mask_areas(mask: &[Vec<u8>]) -> usize {
    let rows = mask.len();
    let cols = mask.first().map_or(0, Vec::len);
    let mut seen = vec![vec![false; cols]; rows];
    let mut areas = 0;
    let mut stack = Vec::new();

    for r in 0..rows {
        for c in 0..cols {
            if mask[r][c] == 0 || seen[r][c] {
                continue;
            }
            areas += 1;
            seen[r][c] = true;
            stack.push((r, c));
            while let Some((r, c)) = stack.pop() {
                let neighbours = [
                    r.checked_sub(1).map(|r| (r, c)),
                    (r + 1 < rows).then_some((r + 1, c)),
                    c.checked_sub(1).map(|c| (r, c)),
                    (c + 1 < cols).then_some((r, c + 1)),
                ];
                for (nr, nc) in neighbours.into_iter().flatten() {
                    if mask[nr][nc] != 0 && !seen[nr][nc] {
                        seen[nr][nc] = true;
                        stack.push((nr, nc));
                    }
                }
            }
        }
    }
    areas
}
