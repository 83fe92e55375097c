//! Structural checks over a finished map
//!
//! `check` is run by `generate` in debug builds and by the test suites;
//! any failure means a stage broke the grid model.

use super::clean::dead_ends;
use super::connect::region_count;
use super::grid::Grid;
use super::room::Room;
use super::stairs::Stair;
use crate::error::GenerationError;

type Check = Result<(), GenerationError>;

/// Run every check
pub fn check(grid: &Grid, rooms: &[Room], stairs: &[Stair]) -> Check {
    check_structure(grid, rooms, stairs)?;
    check_connected(grid)
}

/// Every check except connectivity
pub fn check_structure(grid: &Grid, rooms: &[Room], stairs: &[Stair]) -> Check {
    check_cells(grid)?;
    check_rooms(grid, rooms)?;
    check_doors(grid)?;
    check_stairs(grid, stairs)
}

/// Every cell holds a legal flag combination
pub fn check_cells(grid: &Grid) -> Check {
    for (r, c, cell) in grid.iter() {
        if cell.is_room() && cell.is_corridor() {
            return Err(GenerationError::invariant(r, c, "room and corridor"));
        }
        if cell.is_room() && cell.is_perimeter() {
            return Err(GenerationError::invariant(r, c, "room cell marked perimeter"));
        }
        if cell.is_doorspace() && (cell.is_perimeter() || cell.is_openspace()) {
            return Err(GenerationError::invariant(r, c, "door on perimeter or open space"));
        }
        if cell.stair().is_some() && !cell.is_corridor() {
            return Err(GenerationError::invariant(r, c, "stair off a corridor"));
        }
        if cell.is_blocked() && cell.is_open() {
            return Err(GenerationError::invariant(r, c, "blocked cell is walkable"));
        }
        if cell.is_room() != cell.room_id().is_some() {
            return Err(GenerationError::invariant(r, c, "room flag without room id"));
        }
        let on_border = r == 0 || c == 0 || r == grid.max_row() || c == grid.max_col();
        if on_border && cell.is_open() {
            return Err(GenerationError::invariant(r, c, "walkable cell on the border"));
        }
    }
    Ok(())
}

/// Rooms sit inside the grid, own their whole rectangle, and nothing else
pub fn check_rooms(grid: &Grid, rooms: &[Room]) -> Check {
    for (idx, room) in rooms.iter().enumerate() {
        if room.id.index() != idx {
            return Err(GenerationError::invariant(
                room.north,
                room.west,
                format!("room {} stored at index {idx}", room.id),
            ));
        }
        if room.north < 1
            || room.west < 1
            || room.south >= grid.max_row()
            || room.east >= grid.max_col()
        {
            return Err(GenerationError::invariant(
                room.north,
                room.west,
                format!("room {} out of bounds", room.id),
            ));
        }
        for r in room.north..=room.south {
            for c in room.west..=room.east {
                if grid.room_id_at(r, c) != Some(room.id) {
                    return Err(GenerationError::invariant(
                        r,
                        c,
                        format!("cell not owned by room {}", room.id),
                    ));
                }
            }
        }
        for other in &rooms[idx + 1..] {
            let disjoint = room.south < other.north
                || other.south < room.north
                || room.east < other.west
                || other.east < room.west;
            if !disjoint {
                return Err(GenerationError::invariant(
                    room.north,
                    room.west,
                    format!("rooms {} and {} overlap", room.id, other.id),
                ));
            }
        }
    }
    for (r, c, cell) in grid.iter() {
        let owned = cell
            .room_id()
            .and_then(|id| rooms.get(id.index()))
            .is_some_and(|room| room.contains(r, c));
        if cell.is_room() && !owned {
            return Err(GenerationError::invariant(r, c, "room cell outside every room"));
        }
    }
    Ok(())
}

/// Every door has walkable space on both sides of its wall
pub fn check_doors(grid: &Grid) -> Check {
    for (r, c, cell) in grid.iter() {
        if !cell.is_doorspace() {
            continue;
        }
        let sides = if r % 2 == 0 {
            [grid.offset(r, c, -1, 0), grid.offset(r, c, 1, 0)]
        } else {
            [grid.offset(r, c, 0, -1), grid.offset(r, c, 0, 1)]
        };
        let passable = sides
            .iter()
            .all(|side| side.is_some_and(|(nr, nc)| grid.get(nr, nc).is_openspace()));
        if !passable {
            return Err(GenerationError::invariant(r, c, "door leads nowhere"));
        }
    }
    Ok(())
}

/// Recorded stairs match the grid
pub fn check_stairs(grid: &Grid, stairs: &[Stair]) -> Check {
    let on_grid = grid.iter().filter(|(_, _, cell)| cell.stair().is_some()).count();
    if on_grid != stairs.len() {
        return Err(GenerationError::invariant(
            0,
            0,
            format!("{on_grid} stair cells but {} stairs recorded", stairs.len()),
        ));
    }
    for stair in stairs {
        if grid.get(stair.row, stair.col).stair() != Some(stair.kind) {
            return Err(GenerationError::invariant(stair.row, stair.col, "stair record mismatch"));
        }
        if !grid.get(stair.next_row, stair.next_col).is_corridor() {
            return Err(GenerationError::invariant(
                stair.next_row,
                stair.next_col,
                "stair leads into wall",
            ));
        }
    }
    Ok(())
}

/// At most one walkable region
pub fn check_connected(grid: &Grid) -> Check {
    match region_count(grid) {
        0 | 1 => Ok(()),
        n => Err(GenerationError::invariant(0, 0, format!("{n} disconnected regions"))),
    }
}

/// Dead ends left on the map
pub fn count_dead_ends(grid: &Grid) -> usize {
    dead_ends(grid).len()
}
