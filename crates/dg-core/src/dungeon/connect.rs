//! Region joining
//!
//! After corridors are grown the map can still fall apart into several
//! walkable regions: rock pockets sealed off by rooms, rooms whose sills
//! all faced the grid edge. This pass floods the open cells, then opens
//! single wall cells between different regions until one is left. A
//! perimeter wall gets a door; a rock wall becomes corridor.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::door::pick_door_kind;
use super::grid::Grid;
use super::room::{DoorTarget, Doorway, Room};
use crate::config::DoorWeights;
use crate::rng::GenRng;

/// Connected-component labels of the walkable cells
#[derive(Debug, Clone)]
pub struct RegionMap {
    labels: Vec<Vec<Option<usize>>>,
    count: usize,
}

impl RegionMap {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn region_at(&self, r: usize, c: usize) -> Option<usize> {
        self.labels[r][c]
    }
}

/// Flood-fill the open cells (rooms, corridors, doors), 4-connected
pub fn label_regions(grid: &Grid) -> RegionMap {
    let mut labels = vec![vec![None; grid.n_cols()]; grid.n_rows()];
    let mut count = 0;
    let mut stack = Vec::new();

    for (r, c, cell) in grid.iter() {
        if !cell.is_open() || labels[r][c].is_some() {
            continue;
        }
        labels[r][c] = Some(count);
        stack.push((r, c));
        while let Some((r, c)) = stack.pop() {
            for dir in Direction::ALL {
                let Some((nr, nc)) = grid.step(r, c, dir) else {
                    continue;
                };
                if labels[nr][nc].is_none() && grid.get(nr, nc).is_open() {
                    labels[nr][nc] = Some(count);
                    stack.push((nr, nc));
                }
            }
        }
        count += 1;
    }
    RegionMap { labels, count }
}

/// Number of separate walkable regions
pub fn region_count(grid: &Grid) -> usize {
    label_regions(grid).count()
}

/// A wall cell whose two axis neighbours sit in different regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bridge {
    pub row: usize,
    pub col: usize,
    /// Direction from the first neighbour, through the wall, to the second
    pub dir: Direction,
}

/// The axis a wall cell separates, if it lies between two interiors
fn wall_axis(r: usize, c: usize) -> Option<Direction> {
    match (r % 2, c % 2) {
        (1, 0) => Some(Direction::East),
        (0, 1) => Some(Direction::South),
        _ => None,
    }
}

pub fn find_bridges(grid: &Grid, regions: &RegionMap) -> Vec<Bridge> {
    let mut bridges = Vec::new();
    for (r, c, cell) in grid.iter() {
        let Some(dir) = wall_axis(r, c) else {
            continue;
        };
        if cell.is_blocked() || cell.is_open() {
            continue;
        }
        let (Some(a), Some(b)) = (
            grid.step(r, c, dir.opposite()),
            grid.step(r, c, dir),
        ) else {
            continue;
        };
        match (regions.region_at(a.0, a.1), regions.region_at(b.0, b.1)) {
            (Some(ra), Some(rb)) if ra != rb => bridges.push(Bridge { row: r, col: c, dir }),
            _ => {}
        }
    }
    bridges
}

fn target_of(grid: &Grid, r: usize, c: usize) -> DoorTarget {
    match grid.room_id_at(r, c) {
        Some(id) => DoorTarget::Room(id),
        None => DoorTarget::Corridor,
    }
}

fn open_bridge(
    grid: &mut Grid,
    rooms: &mut [Room],
    bridge: Bridge,
    rng: &mut GenRng,
    weights: &DoorWeights,
) {
    let (r, c) = (bridge.row, bridge.col);
    if !grid.get(r, c).is_perimeter() {
        grid.get_mut(r, c).make_corridor();
        return;
    }

    let kind = pick_door_kind(rng, weights);
    grid.get_mut(r, c).mark_entrance();
    grid.get_mut(r, c).set_door(kind);

    let sides = [
        (grid.step(r, c, bridge.dir.opposite()), bridge.dir),
        (grid.step(r, c, bridge.dir), bridge.dir.opposite()),
    ];
    for (side, dir) in sides {
        let Some((sr, sc)) = side else { continue };
        let Some(id) = grid.room_id_at(sr, sc) else {
            continue;
        };
        let beyond = grid.step(r, c, dir);
        let leads_to = beyond.map_or(DoorTarget::Rock, |(br, bc)| target_of(grid, br, bc));
        rooms[id.index()].doors.push(Doorway {
            row: r,
            col: c,
            dir,
            kind,
            leads_to,
        });
    }
}

/// Outcome of `join_regions`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinReport {
    /// Walls opened
    pub joins: usize,
    /// Regions left; more than one only when a mask walls them apart
    pub regions: usize,
}

impl JoinReport {
    pub fn is_connected(&self) -> bool {
        self.regions <= 1
    }
}

/// Open walls until the map is one region or no wall can be opened
pub fn join_regions(
    grid: &mut Grid,
    rooms: &mut [Room],
    rng: &mut GenRng,
    weights: &DoorWeights,
) -> JoinReport {
    let mut joins = 0;
    let regions = loop {
        let regions = label_regions(grid);
        if regions.count() <= 1 {
            break regions.count();
        }
        let mut bridges = find_bridges(grid, &regions);
        let Some(bridge) = rng.take(&mut bridges) else {
            warn!(
                "{} regions left with no wall to open between them",
                regions.count()
            );
            break regions.count();
        };
        open_bridge(grid, rooms, bridge, rng, weights);
        joins += 1;
    };
    debug!("joined regions through {joins} walls");
    JoinReport { joins, regions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DoorSet;
    use crate::dungeon::Cell;
    use crate::dungeon::room::RoomId;

    fn corridor(grid: &mut Grid, cells: &[(usize, usize)]) {
        for &(r, c) in cells {
            grid.get_mut(r, c).make_corridor();
        }
    }

    #[test]
    fn test_label_regions() {
        let mut grid = Grid::new(3, 3);
        assert_eq!(region_count(&grid), 0);
        corridor(&mut grid, &[(1, 1), (1, 2), (1, 3), (5, 5)]);
        let regions = label_regions(&grid);
        assert_eq!(regions.count(), 2);
        assert_eq!(regions.region_at(1, 1), regions.region_at(1, 3));
        assert_ne!(regions.region_at(1, 1), regions.region_at(5, 5));
        assert_eq!(regions.region_at(0, 0), None);
    }

    #[test]
    fn test_rock_bridge_becomes_corridor() {
        let mut grid = Grid::new(3, 3);
        corridor(&mut grid, &[(1, 1), (1, 3)]);
        let bridges = find_bridges(&grid, &label_regions(&grid));
        assert_eq!(
            bridges,
            vec![Bridge {
                row: 1,
                col: 2,
                dir: Direction::East
            }]
        );
        let weights = DoorSet::Basic.weights();
        let report = join_regions(&mut grid, &mut [], &mut GenRng::new(1), &weights);
        assert_eq!(report, JoinReport { joins: 1, regions: 1 });
        assert!(grid.get(1, 2).is_plain_corridor());
        assert_eq!(region_count(&grid), 1);
    }

    #[test]
    fn test_perimeter_bridge_becomes_door() {
        let mut grid = Grid::new(3, 3);
        let id = RoomId::new(1).unwrap();
        grid.get_mut(1, 1).make_room(id);
        grid.get_mut(1, 2).mark_perimeter();
        corridor(&mut grid, &[(1, 3)]);
        let mut rooms = vec![Room::new(id, 1, 1, 1, 1)];

        let weights = DoorSet::Standard.weights();
        let report = join_regions(&mut grid, &mut rooms, &mut GenRng::new(2), &weights);
        assert!(report.is_connected());
        let cell = grid.get(1, 2);
        assert!(cell.is_doorspace());
        assert!(!cell.is_perimeter());
        assert_eq!(rooms[0].doors.len(), 1);
        assert_eq!(rooms[0].doors[0].dir, Direction::East);
        assert_eq!(rooms[0].doors[0].leads_to, DoorTarget::Corridor);
    }

    #[test]
    fn test_blocked_walls_are_not_bridges() {
        let mut grid = Grid::new(3, 3);
        corridor(&mut grid, &[(1, 1), (1, 3)]);
        grid.set(1, 2, Cell::blocked());
        let weights = DoorSet::Basic.weights();
        let report = join_regions(&mut grid, &mut [], &mut GenRng::new(1), &weights);
        assert_eq!(report, JoinReport { joins: 0, regions: 2 });
        assert!(!report.is_connected());
        assert_eq!(region_count(&grid), 2);
    }
}
