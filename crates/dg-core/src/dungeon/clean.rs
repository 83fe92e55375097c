//! Cleanup
//!
//! Runs last. Collapses dead-end corridors, closes doors left without a
//! passage on both sides, then brings the flags and the room door lists
//! back in line with the grid.

use log::debug;
use serde::{Deserialize, Serialize};

use super::direction::{CloseEnd, Direction};
use super::grid::Grid;
use super::room::{DoorTarget, Doorway, Room};
use crate::rng::GenRng;

/// What a cleanup pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    pub collapsed: usize,
    pub doors_reverted: usize,
}

/// The single opening of a dead-end corridor cell, if it is one
///
/// The cell must be plain corridor with exactly one open neighbour, that
/// neighbour must not be a stair, and the walls around its closed end
/// must hold.
pub fn dead_end(grid: &Grid, r: usize, c: usize) -> Option<Direction> {
    if !grid.get(r, c).is_plain_corridor() {
        return None;
    }
    let open = grid.open_neighbours(r, c);
    let [dir] = open.as_slice() else {
        return None;
    };
    let end = CloseEnd::new(*dir);
    let (nr, nc) = grid.offset(r, c, end.recurse.0, end.recurse.1)?;
    if grid.get(nr, nc).stair().is_some() {
        return None;
    }
    let walled = end.walled.iter().all(|&(dr, dc)| {
        grid.offset(r, c, dr, dc)
            .is_none_or(|(nr, nc)| !grid.get(nr, nc).is_open())
    });
    walled.then_some(*dir)
}

/// Every dead end, row-major
pub fn dead_ends(grid: &Grid) -> Vec<(usize, usize)> {
    grid.iter()
        .filter(|&(r, c, _)| dead_end(grid, r, c).is_some())
        .map(|(r, c, _)| (r, c))
        .collect()
}

/// Collapse dead ends, each with probability `percent`
pub fn remove_deadends(grid: &mut Grid, rng: &mut GenRng, percent: u8) -> usize {
    if percent == 0 {
        return 0;
    }
    let mut collapsed = 0;
    for (r, c) in dead_ends(grid) {
        if dead_end(grid, r, c).is_some() && rng.percent(percent) {
            collapsed += collapse_from(grid, r, c);
        }
    }
    collapsed
}

/// Fill a dead end back in, following the corridor while it stays one
fn collapse_from(grid: &mut Grid, r: usize, c: usize) -> usize {
    let mut collapsed = 0;
    let mut work = vec![(r, c)];
    while let Some((r, c)) = work.pop() {
        // An earlier chain may already have changed this cell.
        let Some(dir) = dead_end(grid, r, c) else {
            continue;
        };
        let Some((nr, nc)) = grid.step(r, c, dir) else {
            continue;
        };
        grid.get_mut(r, c).collapse();
        collapsed += 1;
        if grid.get(nr, nc).is_plain_corridor() {
            work.push((nr, nc));
        }
    }
    collapsed
}

/// Close every door that no longer has open space on both sides
pub fn fix_doors(grid: &mut Grid) -> usize {
    let broken: Vec<(usize, usize)> = grid
        .iter()
        .filter(|&(r, c, cell)| cell.is_doorspace() && !door_passable(grid, r, c))
        .map(|(r, c, _)| (r, c))
        .collect();
    for &(r, c) in &broken {
        grid.get_mut(r, c).revert_door();
    }
    broken.len()
}

fn door_passable(grid: &Grid, r: usize, c: usize) -> bool {
    let dir = if r % 2 == 0 {
        Direction::South
    } else {
        Direction::East
    };
    [dir, dir.opposite()].into_iter().all(|d| {
        grid.step(r, c, d)
            .is_some_and(|(nr, nc)| grid.get(nr, nc).is_openspace())
    })
}

/// Drop entrance flags on cells nothing was carved into
pub fn clear_stray_entrances(grid: &mut Grid) {
    let (rows, cols) = (grid.n_rows(), grid.n_cols());
    for r in 0..rows {
        for c in 0..cols {
            grid.get_mut(r, c).clear_stray_entrance();
        }
    }
}

/// Rebuild each room's door list from what is left on the grid
pub fn rebuild_doors(grid: &Grid, rooms: &mut [Room]) {
    for room in rooms.iter_mut() {
        let mut doors = Vec::new();
        for (r, c) in room.ring() {
            let Some(kind) = grid.get(r, c).door() else {
                continue;
            };
            let Some(dir) = Direction::ALL.into_iter().find(|&d| {
                grid.step(r, c, d.opposite())
                    .is_some_and(|(sr, sc)| room.contains(sr, sc))
            }) else {
                continue;
            };
            let leads_to = match grid.step(r, c, dir) {
                Some((nr, nc)) => match grid.room_id_at(nr, nc) {
                    Some(id) => DoorTarget::Room(id),
                    None if grid.get(nr, nc).is_corridor() => DoorTarget::Corridor,
                    None => DoorTarget::Rock,
                },
                None => DoorTarget::Rock,
            };
            doors.push(Doorway {
                row: r,
                col: c,
                dir,
                kind,
                leads_to,
            });
        }
        doors.sort_by_key(|d| (d.row, d.col));
        room.doors = doors;
    }
}

/// The whole cleanup pass
pub fn clean_dungeon(
    grid: &mut Grid,
    rooms: &mut [Room],
    rng: &mut GenRng,
    remove_percent: u8,
) -> CleanReport {
    let collapsed = remove_deadends(grid, rng, remove_percent);
    let doors_reverted = fix_doors(grid);
    clear_stray_entrances(grid);
    rebuild_doors(grid, rooms);

    let report = CleanReport {
        collapsed,
        doors_reverted,
    };
    debug!(
        "cleanup collapsed {} corridor cells, reverted {} doors",
        report.collapsed, report.doors_reverted
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::cell::{DoorKind, StairKind};
    use crate::dungeon::room::RoomId;

    fn corridor(grid: &mut Grid, cells: impl IntoIterator<Item = (usize, usize)>) {
        for (r, c) in cells {
            grid.get_mut(r, c).make_corridor();
        }
    }

    #[test]
    fn test_dead_end_detection() {
        let mut grid = Grid::new(4, 4);
        corridor(&mut grid, (1..=5).map(|c| (1, c)));
        assert_eq!(dead_end(&grid, 1, 1), Some(Direction::East));
        assert_eq!(dead_end(&grid, 1, 5), Some(Direction::West));
        assert_eq!(dead_end(&grid, 1, 3), None);
        assert_eq!(dead_ends(&grid), vec![(1, 1), (1, 5)]);
    }

    #[test]
    fn test_full_removal_collapses_line() {
        let mut grid = Grid::new(4, 4);
        corridor(&mut grid, (1..=5).map(|c| (1, c)));
        let collapsed = remove_deadends(&mut grid, &mut GenRng::new(1), 100);
        // one cell survives with no open neighbours
        assert_eq!(collapsed, 4);
        assert!(dead_ends(&grid).is_empty());
    }

    #[test]
    fn test_zero_percent_keeps_everything() {
        let mut grid = Grid::new(4, 4);
        corridor(&mut grid, (1..=5).map(|c| (1, c)));
        let before = grid.clone();
        assert_eq!(remove_deadends(&mut grid, &mut GenRng::new(1), 0), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_stairs_survive() {
        let mut grid = Grid::new(4, 4);
        corridor(&mut grid, (1..=7).map(|c| (1, c)));
        grid.get_mut(1, 1).set_stair(StairKind::Down);
        remove_deadends(&mut grid, &mut GenRng::new(1), 100);
        assert_eq!(grid.get(1, 1).stair(), Some(StairKind::Down));
        assert!(grid.get(1, 2).is_corridor());
        assert!(dead_ends(&grid).is_empty());
    }

    #[test]
    fn test_loop_has_no_dead_ends() {
        let mut grid = Grid::new(3, 3);
        let ring = (1..=5)
            .flat_map(|c| [(1, c), (5, c)])
            .chain((2..=4).flat_map(|r| [(r, 1), (r, 5)]));
        corridor(&mut grid, ring);
        assert!(dead_ends(&grid).is_empty());
    }

    #[test]
    fn test_broken_door_reverted() {
        let mut grid = Grid::new(3, 3);
        let id = RoomId::new(1).unwrap();
        grid.get_mut(1, 1).make_room(id);
        grid.get_mut(1, 2).mark_perimeter();
        grid.get_mut(1, 2).set_door(DoorKind::Door);
        let mut rooms = vec![Room::new(id, 1, 1, 1, 1)];

        let report = clean_dungeon(&mut grid, &mut rooms, &mut GenRng::new(1), 100);
        assert_eq!(report.doors_reverted, 1);
        assert!(grid.get(1, 2).is_perimeter());
        assert!(rooms[0].doors.is_empty());
    }

    #[test]
    fn test_door_list_rebuilt() {
        let mut grid = Grid::new(3, 3);
        let id = RoomId::new(1).unwrap();
        grid.get_mut(1, 1).make_room(id);
        grid.get_mut(1, 2).mark_entrance();
        grid.get_mut(1, 2).set_door(DoorKind::Secret);
        corridor(&mut grid, [(1, 3), (1, 4), (1, 5), (2, 5), (3, 5)]);
        grid.get_mut(3, 3).mark_entrance();
        let mut rooms = vec![Room::new(id, 1, 1, 1, 1)];

        clean_dungeon(&mut grid, &mut rooms, &mut GenRng::new(1), 0);
        assert_eq!(
            rooms[0].doors,
            vec![Doorway {
                row: 1,
                col: 2,
                dir: Direction::East,
                kind: DoorKind::Secret,
                leads_to: DoorTarget::Corridor,
            }]
        );
        assert!(!grid.get(3, 3).is_entrance());
        assert!(grid.get(1, 2).is_entrance());
    }
}
