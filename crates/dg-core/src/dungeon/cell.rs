//! Map cells
//!
//! A cell is a small typed record: structural flags, an optional door
//! kind, an optional stair, an optional owning room and an optional label
//! byte. The mutators keep the combinations legal; `Cell::bits` exports the
//! packed mask renderers expect.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::room::RoomId;
use crate::consts::{LABEL_SHIFT, ROOM_ID_SHIFT};

bitflags! {
    /// Packed cell mask layout
    ///
    /// Only the structural bits (`STRUCTURAL`) are stored in `Cell::flags`;
    /// the rest describe the exported mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u32 {
        const BLOCKED = 0x0000_0001;
        const ROOM = 0x0000_0002;
        const CORRIDOR = 0x0000_0004;
        const PERIMETER = 0x0000_0010;
        const ENTRANCE = 0x0000_0020;
        const ROOM_ID = 0x0000_FFC0;

        const ARCH = 0x0001_0000;
        const DOOR = 0x0002_0000;
        const LOCKED = 0x0004_0000;
        const TRAPPED = 0x0008_0000;
        const SECRET = 0x0010_0000;
        const PORTC = 0x0020_0000;
        const STAIR_DN = 0x0040_0000;
        const STAIR_UP = 0x0080_0000;

        const LABEL = 0xFF00_0000;

        const OPENSPACE = Self::ROOM.bits() | Self::CORRIDOR.bits();
        const DOORSPACE = Self::ARCH.bits()
            | Self::DOOR.bits()
            | Self::LOCKED.bits()
            | Self::TRAPPED.bits()
            | Self::SECRET.bits()
            | Self::PORTC.bits();
        const ESPACE = Self::ENTRANCE.bits() | Self::DOORSPACE.bits() | Self::LABEL.bits();
        const STAIRS = Self::STAIR_DN.bits() | Self::STAIR_UP.bits();

        const BLOCK_ROOM = Self::BLOCKED.bits() | Self::ROOM.bits();
        const BLOCK_CORR = Self::BLOCKED.bits() | Self::PERIMETER.bits() | Self::CORRIDOR.bits();
        const BLOCK_DOOR = Self::BLOCKED.bits() | Self::DOORSPACE.bits();

        const STRUCTURAL = Self::BLOCKED.bits()
            | Self::ROOM.bits()
            | Self::CORRIDOR.bits()
            | Self::PERIMETER.bits()
            | Self::ENTRANCE.bits();
    }
}

impl Serialize for CellFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(CellFlags::from_bits_truncate(bits) & CellFlags::STRUCTURAL)
    }
}

/// Door subtype; a cell carries at most one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[repr(u8)]
pub enum DoorKind {
    Arch = 0,
    Door = 1,
    Locked = 2,
    Trapped = 3,
    Secret = 4,
    Portcullis = 5,
}

impl DoorKind {
    /// All kinds, in weight-table order
    pub const ALL: [DoorKind; 6] = [
        DoorKind::Arch,
        DoorKind::Door,
        DoorKind::Locked,
        DoorKind::Trapped,
        DoorKind::Secret,
        DoorKind::Portcullis,
    ];

    /// Bit of this kind in the packed mask
    pub const fn flag(self) -> CellFlags {
        match self {
            DoorKind::Arch => CellFlags::ARCH,
            DoorKind::Door => CellFlags::DOOR,
            DoorKind::Locked => CellFlags::LOCKED,
            DoorKind::Trapped => CellFlags::TRAPPED,
            DoorKind::Secret => CellFlags::SECRET,
            DoorKind::Portcullis => CellFlags::PORTC,
        }
    }

    /// Debug dump character
    pub const fn symbol(self) -> char {
        match self {
            DoorKind::Arch => '\'',
            DoorKind::Door => '+',
            DoorKind::Locked => 'x',
            DoorKind::Trapped => '^',
            DoorKind::Secret => 's',
            DoorKind::Portcullis => '|',
        }
    }
}

/// Stair direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum StairKind {
    Down,
    Up,
}

impl StairKind {
    pub const fn flag(self) -> CellFlags {
        match self {
            StairKind::Down => CellFlags::STAIR_DN,
            StairKind::Up => CellFlags::STAIR_UP,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            StairKind::Down => '>',
            StairKind::Up => '<',
        }
    }
}

/// One grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    flags: CellFlags,
    door: Option<DoorKind>,
    stair: Option<StairKind>,
    room: Option<RoomId>,
    label: Option<u8>,
}

impl Cell {
    /// A cell outside the dungeon silhouette
    pub fn blocked() -> Self {
        Self {
            flags: CellFlags::BLOCKED,
            ..Self::default()
        }
    }

    /// Structural flags
    pub fn flags(&self) -> CellFlags {
        self.flags
    }

    pub fn is_blocked(&self) -> bool {
        self.flags.contains(CellFlags::BLOCKED)
    }

    pub fn is_room(&self) -> bool {
        self.flags.contains(CellFlags::ROOM)
    }

    pub fn is_corridor(&self) -> bool {
        self.flags.contains(CellFlags::CORRIDOR)
    }

    pub fn is_perimeter(&self) -> bool {
        self.flags.contains(CellFlags::PERIMETER)
    }

    pub fn is_entrance(&self) -> bool {
        self.flags.contains(CellFlags::ENTRANCE)
    }

    pub fn door(&self) -> Option<DoorKind> {
        self.door
    }

    pub fn stair(&self) -> Option<StairKind> {
        self.stair
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.room
    }

    pub fn label(&self) -> Option<u8> {
        self.label
    }

    pub fn is_doorspace(&self) -> bool {
        self.door.is_some()
    }

    /// Room or corridor (`OPENSPACE`)
    pub fn is_openspace(&self) -> bool {
        self.flags.intersects(CellFlags::OPENSPACE)
    }

    /// Walkable: open space or a doorway
    pub fn is_open(&self) -> bool {
        self.is_openspace() || self.is_doorspace()
    }

    /// Unclaimed rock a corridor may tunnel through
    pub fn is_rock(&self) -> bool {
        !self
            .flags
            .intersects(CellFlags::BLOCK_CORR | CellFlags::ROOM)
            && self.door.is_none()
    }

    /// Corridor without a stair on it
    pub fn is_plain_corridor(&self) -> bool {
        self.is_corridor() && self.stair.is_none()
    }

    /// OR structural flags in
    pub fn merge(&mut self, flags: CellFlags) {
        debug_assert!(
            CellFlags::STRUCTURAL.contains(flags),
            "only structural flags are stored on a cell"
        );
        debug_assert!(
            !(flags | self.flags).contains(CellFlags::OPENSPACE),
            "a cell is never both room and corridor"
        );
        self.flags |= flags & CellFlags::STRUCTURAL;
        self.normalize();
    }

    /// Clear structural flags
    pub fn clear(&mut self, flags: CellFlags) {
        self.flags.remove(flags & CellFlags::STRUCTURAL);
    }

    // Anything walkable sheds BLOCKED and PERIMETER.
    fn normalize(&mut self) {
        if self.is_open() {
            self.flags.remove(CellFlags::BLOCKED | CellFlags::PERIMETER);
        }
    }

    /// Turn this cell into the interior of room `id`
    pub fn make_room(&mut self, id: RoomId) {
        debug_assert!(!self.is_corridor());
        if self.is_entrance() {
            self.flags.remove(CellFlags::ENTRANCE);
            self.door = None;
            self.label = None;
        } else {
            self.flags.remove(CellFlags::PERIMETER);
        }
        self.flags.insert(CellFlags::ROOM);
        self.room = Some(id);
        self.normalize();
    }

    /// Mark as room wall unless it is a room interior or a live entrance
    ///
    /// Returns whether the flag was set.
    pub fn mark_perimeter(&mut self) -> bool {
        if self.is_room() || self.is_entrance() || self.is_doorspace() {
            return false;
        }
        self.flags.insert(CellFlags::PERIMETER);
        true
    }

    /// Part of an opening: sill, door or the cell just outside
    pub fn mark_entrance(&mut self) {
        self.flags.remove(CellFlags::PERIMETER);
        self.flags.insert(CellFlags::ENTRANCE);
    }

    pub fn set_door(&mut self, kind: DoorKind) {
        debug_assert!(!self.is_openspace(), "doors sit in walls");
        self.flags.remove(CellFlags::PERIMETER | CellFlags::BLOCKED);
        self.door = Some(kind);
    }

    /// Close a doorway back into plain wall
    pub fn revert_door(&mut self) {
        self.door = None;
        self.flags.remove(CellFlags::ENTRANCE);
        self.flags.insert(CellFlags::PERIMETER);
    }

    pub fn make_corridor(&mut self) {
        debug_assert!(!self.is_room() && self.door.is_none());
        self.flags.remove(CellFlags::ENTRANCE | CellFlags::BLOCKED);
        self.flags.insert(CellFlags::CORRIDOR);
    }

    pub fn set_stair(&mut self, kind: StairKind) {
        debug_assert!(self.is_corridor(), "stairs sit on corridors");
        self.stair = Some(kind);
    }

    pub fn set_label(&mut self, byte: u8) {
        self.label = Some(byte);
    }

    /// Fill a plain corridor cell back in
    pub fn collapse(&mut self) {
        debug_assert!(self.is_plain_corridor(), "only plain corridor collapses");
        *self = Cell::blocked();
    }

    /// Drop an ENTRANCE left on a cell nothing was carved into
    pub fn clear_stray_entrance(&mut self) {
        if self.is_entrance() && !self.is_open() {
            self.flags.remove(CellFlags::ENTRANCE);
        }
    }

    /// Packed mask
    pub fn bits(&self) -> u32 {
        let mut bits = self.flags.bits();
        if let Some(id) = self.room {
            bits |= u32::from(id.get()) << ROOM_ID_SHIFT;
        }
        if let Some(kind) = self.door {
            bits |= kind.flag().bits();
        }
        if let Some(kind) = self.stair {
            bits |= kind.flag().bits();
        }
        if let Some(label) = self.label {
            bits |= u32::from(label) << LABEL_SHIFT;
        }
        bits
    }

    /// Decode a packed mask, rejecting illegal combinations
    pub fn from_bits(bits: u32) -> Option<Self> {
        let raw = CellFlags::from_bits_retain(bits);
        let flags = raw & CellFlags::STRUCTURAL;

        let doors: Vec<DoorKind> = DoorKind::ALL
            .into_iter()
            .filter(|k| raw.contains(k.flag()))
            .collect();
        if doors.len() > 1 {
            return None;
        }
        let stair = match (raw.contains(CellFlags::STAIR_DN), raw.contains(CellFlags::STAIR_UP)) {
            (true, true) => return None,
            (true, false) => Some(StairKind::Down),
            (false, true) => Some(StairKind::Up),
            (false, false) => None,
        };
        if flags.contains(CellFlags::OPENSPACE)
            || (flags.contains(CellFlags::ROOM) && flags.contains(CellFlags::PERIMETER))
            || (!doors.is_empty() && flags.contains(CellFlags::PERIMETER))
            || (stair.is_some() && !flags.contains(CellFlags::CORRIDOR))
        {
            return None;
        }

        let id_bits = (bits & CellFlags::ROOM_ID.bits()) >> ROOM_ID_SHIFT;
        let room = if id_bits == 0 {
            None
        } else {
            Some(RoomId::new(id_bits as u16)?)
        };
        let label = match (bits & CellFlags::LABEL.bits()) >> LABEL_SHIFT {
            0 => None,
            b => Some(b as u8),
        };

        Some(Self {
            flags,
            door: doors.first().copied(),
            stair,
            room,
            label,
        })
    }

    /// Debug dump character
    pub fn symbol(&self) -> char {
        if let Some(kind) = self.stair {
            return kind.symbol();
        }
        if let Some(kind) = self.door {
            return kind.symbol();
        }
        if self.is_room() {
            return self.label.map_or('.', char::from);
        }
        if self.is_corridor() {
            return ',';
        }
        if self.is_blocked() && !self.is_perimeter() {
            return ' ';
        }
        '#'
    }
}
