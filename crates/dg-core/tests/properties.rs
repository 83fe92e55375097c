use dg_core::dungeon::invariants::{check, count_dead_ends};
use dg_core::dungeon::{Cell, region_count};
use dg_core::{CorridorLayout, DungeonConfig, DungeonLayout, RoomLayout, generate};
use proptest::prelude::*;

fn arb_layout() -> impl Strategy<Value = DungeonLayout> {
    prop_oneof![
        Just(DungeonLayout::None),
        Just(DungeonLayout::Box),
        Just(DungeonLayout::Cross),
        Just(DungeonLayout::Round),
    ]
}

fn arb_room_layout() -> impl Strategy<Value = RoomLayout> {
    prop_oneof![Just(RoomLayout::Packed), Just(RoomLayout::Scattered)]
}

fn arb_config() -> impl Strategy<Value = DungeonConfig> {
    (
        any::<u64>(),
        7usize..=41,
        7usize..=41,
        1usize..=5,
        0usize..=6,
        arb_room_layout(),
        0u8..=100,
        0u8..=100,
        0u8..=4,
        arb_layout(),
    )
        .prop_map(
            |(seed, n_rows, n_cols, room_min, extra, room_layout, straight, remove, stairs, layout)| {
                DungeonConfig {
                    seed,
                    n_rows,
                    n_cols,
                    dungeon_layout: layout,
                    room_min,
                    room_max: room_min + extra,
                    room_layout,
                    corridor_layout: CorridorLayout::Custom(straight),
                    remove_deadends: remove,
                    add_stairs: stairs,
                    ..DungeonConfig::default()
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_generation_is_deterministic(cfg in arb_config()) {
        let a = generate(&cfg).unwrap();
        let b = generate(&cfg).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn prop_structure_holds(cfg in arb_config()) {
        let dungeon = generate(&cfg).unwrap();
        prop_assert!(check(dungeon.grid(), dungeon.rooms(), dungeon.stairs()).is_ok());
        prop_assert!(region_count(dungeon.grid()) <= 1);
        prop_assert!(dungeon.stairs().len() <= usize::from(cfg.add_stairs));
    }

    #[test]
    fn prop_packed_masks_decode(cfg in arb_config()) {
        let dungeon = generate(&cfg).unwrap();
        for (_, _, cell) in dungeon.grid().iter() {
            prop_assert_eq!(Cell::from_bits(cell.bits()), Some(*cell));
        }
    }

    #[test]
    fn prop_rooms_in_bounds(cfg in arb_config()) {
        let dungeon = generate(&cfg).unwrap();
        let grid = dungeon.grid();
        for room in dungeon.rooms() {
            prop_assert!(room.north % 2 == 1 && room.west % 2 == 1);
            prop_assert!(room.south < grid.max_row() && room.east < grid.max_col());
            prop_assert!(room.height_units() >= cfg.room_base());
            prop_assert!(room.width_units() >= cfg.room_base());
        }
        prop_assert!(dungeon.rooms().len() <= usize::from(cfg.max_rooms));
    }

    #[test]
    fn prop_full_removal_leaves_no_dead_ends(mut cfg in arb_config()) {
        cfg.remove_deadends = 100;
        let dungeon = generate(&cfg).unwrap();
        prop_assert_eq!(count_dead_ends(dungeon.grid()), 0);
    }
}
