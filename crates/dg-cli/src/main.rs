//! Dungeon generator
//!
//! Command-line front end: builds a configuration from a JSON file and
//! flags, generates one map and prints it.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, debug};

use dg_core::dungeon::{DoorTarget, Dungeon};
use dg_core::{CorridorLayout, DoorSet, DungeonConfig, DungeonLayout, RoomLayout, generate};

/// Seeded tile dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungeon-gen")]
#[command(author, version, about = "Generate a random dungeon map", long_about = None)]
struct Args {
    /// JSON configuration file; flags override its fields
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Random seed (defaults to the current time)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Grid rows
    #[arg(long = "rows")]
    rows: Option<usize>,

    /// Grid columns
    #[arg(long = "cols")]
    cols: Option<usize>,

    /// Dungeon silhouette (none, box, cross, round)
    #[arg(short = 'l', long = "layout")]
    layout: Option<String>,

    /// Smallest room side
    #[arg(long = "room-min")]
    room_min: Option<usize>,

    /// Largest room side
    #[arg(long = "room-max")]
    room_max: Option<usize>,

    /// Room placement (packed, scattered)
    #[arg(long = "room-layout")]
    room_layout: Option<String>,

    /// Stop placing rooms after this many
    #[arg(long = "max-rooms")]
    max_rooms: Option<u16>,

    /// Packed layout: percent chance to skip a border anchor
    #[arg(long = "border-skip")]
    border_skip: Option<u8>,

    /// Corridor style (labyrinth, bent, straight) or a straightness percent
    #[arg(long = "corridors")]
    corridors: Option<String>,

    /// Percent of dead ends to collapse
    #[arg(short = 'd', long = "remove-deadends")]
    remove_deadends: Option<u8>,

    /// Number of stairs
    #[arg(long = "stairs")]
    stairs: Option<u8>,

    /// Door set (none, basic, standard, secure, deathtrap)
    #[arg(long = "doors")]
    doors: Option<String>,

    /// Door count scale, in percent
    #[arg(long = "door-density")]
    door_density: Option<u8>,

    /// Map style name handed to renderers
    #[arg(long = "style")]
    style: Option<String>,

    /// Print the whole snapshot as JSON instead of the map
    #[arg(long = "json")]
    json: bool,

    /// Verbose output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<DungeonConfig> {
    let Some(path) = path else {
        return Ok(DungeonConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

fn build_config(args: &Args) -> Result<DungeonConfig> {
    let mut cfg = load_config(args.config.as_ref())?;

    cfg.seed = match (args.seed, &args.config) {
        (Some(seed), _) => seed,
        (None, Some(_)) => cfg.seed,
        (None, None) => time_seed(),
    };
    if let Some(rows) = args.rows {
        cfg.n_rows = rows;
    }
    if let Some(cols) = args.cols {
        cfg.n_cols = cols;
    }
    if let Some(name) = &args.layout {
        cfg.dungeon_layout =
            DungeonLayout::from_name(name).ok_or_else(|| anyhow!("unknown layout: {name}"))?;
    }
    if let Some(min) = args.room_min {
        cfg.room_min = min;
    }
    if let Some(max) = args.room_max {
        cfg.room_max = max;
    }
    if let Some(name) = &args.room_layout {
        cfg.room_layout = name
            .parse::<RoomLayout>()
            .map_err(|_| anyhow!("unknown room layout: {name}"))?;
    }
    if let Some(max) = args.max_rooms {
        cfg.max_rooms = max;
    }
    if let Some(p) = args.border_skip {
        cfg.border_skip_percent = p;
    }
    if let Some(name) = &args.corridors {
        cfg.corridor_layout = CorridorLayout::from_name(name)
            .ok_or_else(|| anyhow!("unknown corridor style: {name}"))?;
    }
    if let Some(p) = args.remove_deadends {
        cfg.remove_deadends = p;
    }
    if let Some(n) = args.stairs {
        cfg.add_stairs = n;
    }
    if let Some(name) = &args.doors {
        cfg.door_set = DoorSet::from_name(name).ok_or_else(|| anyhow!("unknown door set: {name}"))?;
    }
    if let Some(p) = args.door_density {
        cfg.door_density = p;
    }
    if let Some(style) = &args.style {
        cfg.map_style = style.clone();
    }
    Ok(cfg)
}

fn leads_to(target: DoorTarget) -> String {
    match target {
        DoorTarget::Room(id) => format!("room {id}"),
        DoorTarget::Corridor => "corridor".to_string(),
        DoorTarget::Rock => "rock".to_string(),
    }
}

fn print_report(dungeon: &Dungeon) {
    println!(
        "seed {}  {}x{}  style {}",
        dungeon.seed(),
        dungeon.n_rows(),
        dungeon.n_cols(),
        dungeon.map_style()
    );
    print!("{}", dungeon.to_ascii());
    println!();

    println!(
        "{:>4} {:>4} {:>4} {:>6} {:>6} {:>6}  doors",
        "id", "row", "col", "height", "width", "area"
    );
    for room in dungeon.rooms() {
        let doors: Vec<String> = room
            .doors
            .iter()
            .map(|d| format!("{}@({},{})->{}", d.kind, d.row, d.col, leads_to(d.leads_to)))
            .collect();
        println!(
            "{:>4} {:>4} {:>4} {:>6} {:>6} {:>6}  {}",
            room.id,
            room.row,
            room.col,
            room.height,
            room.width,
            room.area,
            doors.join(" ")
        );
    }

    for stair in dungeon.stairs() {
        println!(
            "stair {} at ({}, {}) -> ({}, {})",
            stair.kind, stair.row, stair.col, stair.next_row, stair.next_col
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let cfg = build_config(&args)?;
    debug!("configuration: {cfg:?}");

    let dungeon = generate(&cfg).context("dungeon generation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dungeon)?);
    } else {
        print_report(&dungeon);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(flags: &[&str]) -> Args {
        Args::parse_from(std::iter::once("dungeon-gen").chain(flags.iter().copied()))
    }

    #[test]
    fn test_flags_applied() {
        let cfg = build_config(&args(&[
            "-s", "42", "--rows", "21", "-l", "Cross", "--corridors", "30", "--doors", "secure",
        ]))
        .unwrap();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.n_rows, 21);
        assert_eq!(cfg.n_cols, DungeonConfig::default().n_cols);
        assert_eq!(cfg.dungeon_layout, DungeonLayout::Cross);
        assert_eq!(cfg.corridor_layout, CorridorLayout::Custom(30));
        assert_eq!(cfg.door_set, DoorSet::Secure);
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = std::env::temp_dir().join("dungeon_gen_test_config.json");
        fs::write(&path, r#"{"seed": 9, "n_rows": 25, "room_max": 7, "room_layout": "Packed"}"#)
            .unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        let cfg = build_config(&args(&["--config", &path_arg, "--rows", "31"])).unwrap();
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.n_rows, 31);
        assert_eq!(cfg.room_max, 7);
        assert_eq!(cfg.room_layout, RoomLayout::Packed);

        let cfg = build_config(&args(&["-c", &path_arg, "-s", "3", "--room-layout", "scattered"]))
            .unwrap();
        assert_eq!(cfg.seed, 3);
        assert_eq!(cfg.room_layout, RoomLayout::Scattered);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unknown_names_rejected() {
        let err = build_config(&args(&["-s", "1", "-l", "hexagon"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown layout: hexagon");
        assert!(build_config(&args(&["-s", "1", "--room-layout", "heap"])).is_err());
        assert!(build_config(&args(&["-s", "1", "--corridors", "twisty"])).is_err());
        assert!(build_config(&args(&["-s", "1", "--doors", "glass"])).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let err = build_config(&args(&["-c", "/nonexistent/dungeon.json"])).unwrap_err();
        assert!(err.to_string().starts_with("reading config"));
    }
}
