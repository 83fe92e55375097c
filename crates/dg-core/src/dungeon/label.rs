//! Room labels
//!
//! Each room's decimal id is written across its middle row, centred and
//! clipped to the room so it never spills onto a wall.

use super::grid::Grid;
use super::room::Room;

/// Label every room; returns the number of label bytes written
pub fn label_rooms(grid: &mut Grid, rooms: &mut [Room]) -> usize {
    rooms.iter_mut().map(|room| label_room(grid, room)).sum()
}

pub fn label_room(grid: &mut Grid, room: &mut Room) -> usize {
    let label = room.id.to_string();
    let len = label.len();
    let row = (room.north + room.south) / 2;
    let col = ((room.west + room.east + 1).saturating_sub(len) / 2).clamp(room.west, room.east);

    let mut written = 0;
    for (offset, byte) in label.bytes().enumerate() {
        let c = col + offset;
        if c > room.east {
            break;
        }
        grid.get_mut(row, c).set_label(byte);
        written += 1;
    }
    room.label_anchor = Some((row, col));
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::room::RoomId;

    fn room_at(id: u16, north: usize, south: usize, west: usize, east: usize) -> (Grid, Room) {
        let mut grid = Grid::new(20, 20);
        let id = RoomId::new(id).unwrap();
        for r in north..=south {
            for c in west..=east {
                grid.get_mut(r, c).make_room(id);
            }
        }
        (grid, Room::new(id, north, south, west, east))
    }

    #[test]
    fn test_single_digit_centred() {
        let (mut grid, mut room) = room_at(7, 3, 7, 3, 7);
        assert_eq!(label_room(&mut grid, &mut room), 1);
        assert_eq!(room.label_anchor, Some((5, 5)));
        assert_eq!(grid.get(5, 5).label(), Some(b'7'));
        assert_eq!(grid.get(5, 5).symbol(), '7');
    }

    #[test]
    fn test_multi_digit_clipped() {
        let (mut grid, mut room) = room_at(123, 1, 1, 1, 1);
        assert_eq!(label_room(&mut grid, &mut room), 1);
        assert_eq!(grid.get(1, 1).label(), Some(b'1'));
        assert_eq!(grid.get(1, 2).label(), None);
    }

    #[test]
    fn test_labels_stay_inside() {
        let (mut grid, mut room) = room_at(42, 5, 9, 5, 11);
        label_room(&mut grid, &mut room);
        for (r, c, cell) in grid.iter() {
            if cell.label().is_some() {
                assert!(room.contains(r, c));
            }
        }
        assert_eq!(grid.get(7, 7).label(), Some(b'4'));
        assert_eq!(grid.get(7, 8).label(), Some(b'2'));
    }
}
