//! Generator constants

/// Hard cap on rooms per map (the room id field is 10 bits wide)
pub const MAX_ROOMS: u16 = 999;

/// Shift of the room id inside a packed cell mask
pub const ROOM_ID_SHIFT: u32 = 6;

/// Shift of the label byte inside a packed cell mask
pub const LABEL_SHIFT: u32 = 24;

/// Display units per grid cell (room height/width are reported in these)
pub const CELL_UNITS: usize = 10;

/// Smallest accepted row or column count
pub const MIN_DIMENSION: usize = 7;

/// Largest accepted row or column count
pub const MAX_DIMENSION: usize = 1023;

/// Length of the straight corridor run a stair needs behind it
pub const STAIR_RUN: usize = 3;
