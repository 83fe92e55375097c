//! Room records
//!
//! Rooms are owned by the grid through the room id packed into each
//! interior cell; the metadata lives here, in a table indexed by id.

use serde::{Deserialize, Serialize};

use super::cell::DoorKind;
use super::direction::Direction;
use crate::consts::{CELL_UNITS, MAX_ROOMS};

/// Room identifier, dense from 1, never 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u16);

impl RoomId {
    /// Build an id; `None` for 0 or anything above the room cap
    pub fn new(id: u16) -> Option<Self> {
        (1..=MAX_ROOMS).contains(&id).then_some(Self(id))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Position in a zero-based room table
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }
}

impl core::fmt::Display for RoomId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a doorway opens onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorTarget {
    Room(RoomId),
    Corridor,
    /// Nothing carved beyond it (only seen before cleanup)
    Rock,
}

/// A door in a room wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doorway {
    pub row: usize,
    pub col: usize,
    /// Direction from the room through the door
    pub dir: Direction,
    pub kind: DoorKind,
    pub leads_to: DoorTarget,
}

/// A placed room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Anchor row (same as `north`)
    pub row: usize,
    /// Anchor column (same as `west`)
    pub col: usize,
    pub north: usize,
    pub south: usize,
    pub west: usize,
    pub east: usize,
    /// Height in display units
    pub height: usize,
    /// Width in display units
    pub width: usize,
    pub area: usize,
    /// First cell of the room label, once labelled
    pub label_anchor: Option<(usize, usize)>,
    pub doors: Vec<Doorway>,
}

impl Room {
    /// Room spanning rows `north..=south` and columns `west..=east`
    pub fn new(id: RoomId, north: usize, south: usize, west: usize, east: usize) -> Self {
        let height = (south - north + 1) * CELL_UNITS;
        let width = (east - west + 1) * CELL_UNITS;
        Self {
            id,
            row: north,
            col: west,
            north,
            south,
            west,
            east,
            height,
            width,
            area: height * width,
            label_anchor: None,
            doors: Vec::new(),
        }
    }

    /// Interior height in half-units (odd cells)
    pub fn height_units(&self) -> usize {
        (self.south - self.north) / 2 + 1
    }

    /// Interior width in half-units (odd cells)
    pub fn width_units(&self) -> usize {
        (self.east - self.west) / 2 + 1
    }

    pub fn contains(&self, r: usize, c: usize) -> bool {
        (self.north..=self.south).contains(&r) && (self.west..=self.east).contains(&c)
    }

    /// Cells of the ring one beyond the interior
    pub fn ring(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (r1, r2, c1, c2) = (self.north - 1, self.south + 1, self.west - 1, self.east + 1);
        (r1..=r2)
            .flat_map(move |r| [(r, c1), (r, c2)])
            .chain((c1 + 1..c2).flat_map(move |c| [(r1, c), (r2, c)]))
    }
}

/// Proto-room: anything left `None` is rolled by the placer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomSpec {
    pub i: Option<usize>,
    pub j: Option<usize>,
    /// Height in half-units
    pub height: Option<usize>,
    /// Width in half-units
    pub width: Option<usize>,
}

impl RoomSpec {
    /// Anchored at odd cell `(2i+1, 2j+1)`, size rolled
    pub fn anchored(i: usize, j: usize) -> Self {
        Self {
            i: Some(i),
            j: Some(j),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_range() {
        assert!(RoomId::new(0).is_none());
        assert!(RoomId::new(1).is_some());
        assert!(RoomId::new(999).is_some());
        assert!(RoomId::new(1000).is_none());
        assert_eq!(RoomId::new(5).unwrap().index(), 4);
    }

    #[test]
    fn test_room_metrics() {
        let room = Room::new(RoomId::new(1).unwrap(), 3, 7, 5, 9);
        assert_eq!(room.height, 50);
        assert_eq!(room.width, 50);
        assert_eq!(room.area, 2500);
        assert_eq!(room.height_units(), 3);
        assert_eq!(room.width_units(), 3);
        assert!(room.contains(3, 9));
        assert!(!room.contains(2, 9));
    }

    #[test]
    fn test_ring_covers_border_once() {
        let room = Room::new(RoomId::new(1).unwrap(), 1, 3, 1, 5);
        let mut ring: Vec<_> = room.ring().collect();
        let len = ring.len();
        ring.sort();
        ring.dedup();
        assert_eq!(ring.len(), len);
        // (3 + 2) rows by (5 + 2) columns, minus the 3x5 interior
        assert_eq!(len, 5 * 7 - 3 * 5);
        assert!(ring.iter().all(|&(r, c)| !room.contains(r, c)));
    }
}
