//! Door placement
//!
//! Every room gets a handful of openings cut through its perimeter. A door
//! is only legal on a sill: an edge interior cell whose wall neighbour is
//! perimeter and whose cell beyond the wall lies inside the grid.

use hashbrown::HashSet;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::cell::DoorKind;
use super::direction::Direction;
use super::grid::Grid;
use super::room::{DoorTarget, Doorway, Room, RoomId};
use crate::config::DoorWeights;
use crate::rng::GenRng;

/// What lies beyond a sill's wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SillTarget {
    Room(RoomId),
    Corridor,
    Rock,
}

impl From<SillTarget> for DoorTarget {
    fn from(target: SillTarget) -> Self {
        match target {
            SillTarget::Room(id) => DoorTarget::Room(id),
            SillTarget::Corridor => DoorTarget::Corridor,
            SillTarget::Rock => DoorTarget::Rock,
        }
    }
}

/// A candidate opening
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sill {
    /// Room interior cell on the edge
    pub sill: (usize, usize),
    /// Wall cell the door goes into
    pub door: (usize, usize),
    /// Cell just outside the wall
    pub out: (usize, usize),
    pub dir: Direction,
    pub target: SillTarget,
}

/// Room pairs already joined by a door
///
/// Keys are ordered so `(a, b)` and `(b, a)` are the same connection.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSet(HashSet<(RoomId, RoomId)>);

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: RoomId, b: RoomId) -> (RoomId, RoomId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Record a connection; false if it was already there
    pub fn insert(&mut self, a: RoomId, b: RoomId) -> bool {
        self.0.insert(Self::key(a, b))
    }

    pub fn contains(&self, a: RoomId, b: RoomId) -> bool {
        self.0.contains(&Self::key(a, b))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Pick a door kind by weight
pub fn pick_door_kind(rng: &mut GenRng, weights: &DoorWeights) -> DoorKind {
    rng.weighted(&weights.as_array())
        .map_or(DoorKind::Arch, |idx| DoorKind::ALL[idx])
}

/// Number of openings to cut in a room
///
/// Grows with the square root of the room area, scaled by `density`
/// percent, never below one.
pub fn alloc_opens(room: &Room, rng: &mut GenRng, density: u8) -> usize {
    let units = room.height_units() * room.width_units();
    let flumph = (units as f64).sqrt() as i32;
    let n = (flumph + rng.rn2(flumph)) as usize;
    (n * usize::from(density) / 100).max(1)
}

/// Every legal sill of a room, edge by edge
pub fn door_sills(grid: &Grid, room: &Room) -> Vec<Sill> {
    let mut sills = Vec::new();

    if room.north >= 3 {
        for c in (room.west..=room.east).step_by(2) {
            sills.extend(check_sill(grid, room, room.north, c, Direction::North));
        }
    }
    if room.south + 2 <= grid.max_row() {
        for c in (room.west..=room.east).step_by(2) {
            sills.extend(check_sill(grid, room, room.south, c, Direction::South));
        }
    }
    if room.west >= 3 {
        for r in (room.north..=room.south).step_by(2) {
            sills.extend(check_sill(grid, room, r, room.west, Direction::West));
        }
    }
    if room.east + 2 <= grid.max_col() {
        for r in (room.north..=room.south).step_by(2) {
            sills.extend(check_sill(grid, room, r, room.east, Direction::East));
        }
    }
    sills
}

fn check_sill(grid: &Grid, room: &Room, r: usize, c: usize, dir: Direction) -> Option<Sill> {
    let door = grid.step(r, c, dir)?;
    let out = grid.step(door.0, door.1, dir)?;

    let door_cell = grid.get(door.0, door.1);
    if !door_cell.is_perimeter() || door_cell.is_blocked() || door_cell.is_doorspace() {
        return None;
    }
    let out_cell = grid.get(out.0, out.1);
    if out_cell.is_blocked() {
        return None;
    }

    let target = if let Some(id) = out_cell.room_id() {
        if id == room.id {
            return None;
        }
        SillTarget::Room(id)
    } else if out_cell.is_corridor() {
        SillTarget::Corridor
    } else {
        SillTarget::Rock
    };

    Some(Sill {
        sill: (r, c),
        door,
        out,
        dir,
        target,
    })
}

/// Cut doors for every room, in id order; returns the doors placed
pub fn open_rooms(
    grid: &mut Grid,
    rooms: &mut [Room],
    rng: &mut GenRng,
    weights: &DoorWeights,
    density: u8,
) -> usize {
    let mut connections = ConnectionSet::new();
    let mut placed = 0;
    for idx in 0..rooms.len() {
        placed += open_room(grid, rooms, idx, rng, weights, density, &mut connections);
    }
    debug!(
        "opened {placed} doors, {} room pairs connected",
        connections.len()
    );
    placed
}

fn open_room(
    grid: &mut Grid,
    rooms: &mut [Room],
    idx: usize,
    rng: &mut GenRng,
    weights: &DoorWeights,
    density: u8,
    connections: &mut ConnectionSet,
) -> usize {
    let mut sills = door_sills(grid, &rooms[idx]);
    if sills.is_empty() {
        return 0;
    }
    let id = rooms[idx].id;
    let n_opens = alloc_opens(&rooms[idx], rng, density);

    let mut placed = 0;
    let mut slot = 0;
    while slot < n_opens {
        let Some(sill) = rng.take(&mut sills) else {
            break;
        };
        // A sill sharing a door with an earlier one is retried for free.
        if grid.get(sill.door.0, sill.door.1).is_doorspace() {
            continue;
        }
        slot += 1;

        if let SillTarget::Room(other) = sill.target {
            if !connections.insert(id, other) {
                trace!("rooms {id} and {other} already connected");
                continue;
            }
        }

        for (r, c) in [sill.sill, sill.door, sill.out] {
            grid.get_mut(r, c).mark_entrance();
        }
        let kind = pick_door_kind(rng, weights);
        grid.get_mut(sill.door.0, sill.door.1).set_door(kind);

        rooms[idx].doors.push(Doorway {
            row: sill.door.0,
            col: sill.door.1,
            dir: sill.dir,
            kind,
            leads_to: sill.target.into(),
        });
        if let SillTarget::Room(other) = sill.target {
            rooms[other.index()].doors.push(Doorway {
                row: sill.door.0,
                col: sill.door.1,
                dir: sill.dir.opposite(),
                kind,
                leads_to: DoorTarget::Room(id),
            });
        }
        placed += 1;
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DoorSet, DungeonConfig, RoomLayout};
    use crate::dungeon::placement::{RoomParams, emplace_room};
    use crate::dungeon::room::RoomSpec;

    fn setup(specs: &[RoomSpec]) -> (Grid, Vec<Room>, GenRng) {
        let params = RoomParams::from_config(&DungeonConfig {
            room_layout: RoomLayout::Scattered,
            ..DungeonConfig::default()
        });
        let mut grid = Grid::new(params.n_i, params.n_j);
        let mut rooms = Vec::new();
        let mut rng = GenRng::new(77);
        for &spec in specs {
            emplace_room(&mut grid, &mut rooms, &mut rng, &params, spec).unwrap();
        }
        (grid, rooms, rng)
    }

    fn spec(i: usize, j: usize, h: usize, w: usize) -> RoomSpec {
        RoomSpec {
            i: Some(i),
            j: Some(j),
            height: Some(h),
            width: Some(w),
        }
    }

    #[test]
    fn test_sill_count_interior_room() {
        let (grid, rooms, _) = setup(&[spec(3, 3, 2, 3)]);
        let sills = door_sills(&grid, &rooms[0]);
        // two per side on the short edges, three on the long ones
        assert_eq!(sills.len(), 2 * 3 + 2 * 2);
        assert!(sills.iter().all(|s| s.target == SillTarget::Rock));
        for s in &sills {
            assert!(grid.get(s.door.0, s.door.1).is_perimeter());
        }
    }

    #[test]
    fn test_no_sills_on_grid_edge() {
        let (grid, rooms, _) = setup(&[spec(0, 0, 2, 2)]);
        let sills = door_sills(&grid, &rooms[0]);
        assert!(sills.iter().all(|s| matches!(s.dir, Direction::South | Direction::East)));
        assert_eq!(sills.len(), 4);
    }

    #[test]
    fn test_shared_wall_targets_neighbour() {
        let (grid, rooms, _) = setup(&[spec(1, 1, 2, 2), spec(1, 3, 2, 2)]);
        let east: Vec<_> = door_sills(&grid, &rooms[0])
            .into_iter()
            .filter(|s| s.dir == Direction::East)
            .collect();
        assert_eq!(east.len(), 2);
        assert!(east.iter().all(|s| s.target == SillTarget::Room(rooms[1].id)));
    }

    #[test]
    fn test_door_count_floor() {
        let (_, rooms, mut rng) = setup(&[spec(3, 3, 1, 1)]);
        for _ in 0..20 {
            assert_eq!(alloc_opens(&rooms[0], &mut rng, 0), 1);
            assert_eq!(alloc_opens(&rooms[0], &mut rng, 100), 1);
        }
        let (_, rooms, mut rng) = setup(&[spec(3, 3, 4, 4)]);
        for _ in 0..20 {
            let n = alloc_opens(&rooms[0], &mut rng, 100);
            assert!((4..8).contains(&n));
        }
    }

    #[test]
    fn test_connection_set_is_unordered() {
        let a = RoomId::new(1).unwrap();
        let b = RoomId::new(2).unwrap();
        let mut set = ConnectionSet::new();
        assert!(set.insert(b, a));
        assert!(!set.insert(a, b));
        assert!(set.contains(a, b));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_adjacent_rooms_share_one_door() {
        let (mut grid, mut rooms, mut rng) = setup(&[spec(1, 1, 1, 2), spec(1, 3, 1, 2)]);
        let weights = DoorSet::Standard.weights();
        open_rooms(&mut grid, &mut rooms, &mut rng, &weights, 100);

        let shared = |room: &Room| {
            room.doors
                .iter()
                .filter(|d| matches!(d.leads_to, DoorTarget::Room(_)))
                .count()
        };
        assert!(shared(&rooms[0]) <= 1);
        assert_eq!(shared(&rooms[0]), shared(&rooms[1]));
    }

    #[test]
    fn test_doors_land_on_walls() {
        let (mut grid, mut rooms, mut rng) = setup(&[spec(3, 3, 3, 3), spec(10, 10, 2, 4)]);
        let weights = DoorSet::Standard.weights();
        let placed = open_rooms(&mut grid, &mut rooms, &mut rng, &weights, 100);
        assert!(placed >= 2);
        for room in &rooms {
            assert!(!room.doors.is_empty());
            for door in &room.doors {
                let cell = grid.get(door.row, door.col);
                assert_eq!(cell.door(), Some(door.kind));
                assert!(!cell.is_perimeter());
                assert!(!cell.is_openspace());
                assert!((door.row % 2 == 0) != (door.col % 2 == 0));
            }
        }
    }

    #[test]
    fn test_arch_only_door_set() {
        let (mut grid, mut rooms, mut rng) = setup(&[spec(5, 5, 3, 3)]);
        open_rooms(&mut grid, &mut rooms, &mut rng, &DoorSet::None.weights(), 100);
        assert!(rooms[0].doors.iter().all(|d| d.kind == DoorKind::Arch));
    }
}
