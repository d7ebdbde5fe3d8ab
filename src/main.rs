use std::error::Error;

use clap::Parser;
use log::warn;

use camping_world::ascii::{self, AsciiMode};
use camping_world::coords::TileCoord;
use camping_world::explorer;
use camping_world::export::{self, DEFAULT_CELL_SIZE};
use camping_world::params::WorldParams;
use camping_world::tilemap::{sample_around, terrain_counts};
use camping_world::world::WorldSession;

#[derive(Parser, Debug)]
#[command(name = "camping_world")]
#[command(about = "Explore an infinite camping world grown from a text key")]
struct Args {
    /// World key (defaults to the params file's default key)
    #[arg(short, long)]
    key: Option<String>,

    /// Use a random world key
    #[arg(long, conflicts_with = "key")]
    random_key: bool,

    /// JSON file with world generation parameters
    #[arg(short, long)]
    params: Option<String>,

    /// Center tile X coordinate
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    x: i32,

    /// Center tile Y coordinate
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    y: i32,

    /// Width of the printed region in tiles
    #[arg(short = 'W', long, default_value = "64")]
    width: usize,

    /// Height of the printed region in tiles
    #[arg(short = 'H', long, default_value = "32")]
    height: usize,

    /// Print with ANSI true color
    #[arg(long)]
    colored: bool,

    /// Print terrain only, without decor or tents
    #[arg(long)]
    terrain_only: bool,

    /// Activate a tile before rendering, as "x,y" (repeatable)
    #[arg(long, value_parser = parse_tile, allow_hyphen_values = true)]
    activate: Vec<TileCoord>,

    /// Click a world-space position before rendering, as "x,y" (repeatable)
    #[arg(long, value_parser = parse_world_pos, allow_hyphen_values = true)]
    click: Vec<(f64, f64)>,

    /// Export the region as a PNG minimap
    #[arg(long)]
    export_png: Option<String>,

    /// Pixel size of one tile in the PNG minimap
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
    cell_size: u32,

    /// Export the region as JSON
    #[arg(long)]
    export_json: Option<String>,

    /// Export the region as an annotated text file
    #[arg(long)]
    export_txt: Option<String>,

    /// Launch the interactive terminal explorer
    #[arg(short, long)]
    explore: bool,
}

fn parse_pair<T: std::str::FromStr>(s: &str) -> Result<(T, T), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got \"{}\"", s))?;
    let a = a.trim().parse().map_err(|_| format!("invalid x in \"{}\"", s))?;
    let b = b.trim().parse().map_err(|_| format!("invalid y in \"{}\"", s))?;
    Ok((a, b))
}

fn parse_tile(s: &str) -> Result<TileCoord, String> {
    parse_pair::<i32>(s).map(|(x, y)| TileCoord::new(x, y))
}

fn parse_world_pos(s: &str) -> Result<(f64, f64), String> {
    parse_pair::<f64>(s)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let params = match &args.params {
        Some(path) => {
            println!("Loading parameters from {}", path);
            WorldParams::from_json_file(path)?
        }
        None => WorldParams::default(),
    };

    let mut session = WorldSession::with_params(params)?;
    if args.random_key {
        let key = format!("{:08x}", rand::random::<u32>());
        session.reseed(&key);
    } else if let Some(key) = &args.key {
        session.reseed(key);
    }
    println!("World key: {} (seed {})", session.key(), session.seed());

    for &coord in &args.activate {
        if !session.activate_tile(coord) {
            warn!("cannot activate water tile {}", coord);
        }
    }
    for &(wx, wy) in &args.click {
        let coord = session.pick(wx, wy);
        if session.activate_at(wx, wy) {
            println!("Clicked ({}, {}) -> tile {}", wx, wy, coord);
        } else {
            warn!("click at ({}, {}) hit water tile {}", wx, wy, coord);
        }
    }

    if args.explore {
        println!("Launching terminal explorer...");
        return explorer::run_explorer(session);
    }

    let center = TileCoord::new(args.x, args.y);
    let region = sample_around(&mut session, center, args.width, args.height);
    let palette = session.params().palette.clone();
    let mode = if args.terrain_only { AsciiMode::Terrain } else { AsciiMode::Full };

    println!("Region {}x{} around {}", args.width, args.height, center);
    ascii::print_ascii_region(&region, &palette, mode, args.colored);

    let total = (args.width * args.height).max(1);
    for (kind, count) in terrain_counts(&region) {
        println!("  {:<12} {:.1}%", kind.display_name(), 100.0 * count as f64 / total as f64);
    }
    let structures = session.structures();
    if !structures.is_empty() {
        println!("Tents: {}", structures.len());
    }

    let seed = session.seed().value();
    if let Some(path) = &args.export_png {
        match export::export_region_png(&region, &palette, args.cell_size, path) {
            Ok((w, h)) => println!("Exported {}x{} minimap to: {}", w, h, path),
            Err(e) => eprintln!("Failed to export minimap: {}", e),
        }
    }
    if let Some(path) = &args.export_json {
        match export::export_region_json(&region, &palette, session.key(), seed, path) {
            Ok(()) => println!("Exported region JSON to: {}", path),
            Err(e) => eprintln!("Failed to export JSON: {}", e),
        }
    }
    if let Some(path) = &args.export_txt {
        match ascii::export_region_file(&region, &palette, session.key(), seed, path) {
            Ok(()) => println!("Exported region text to: {}", path),
            Err(e) => eprintln!("Failed to export text: {}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tile() {
        assert_eq!(parse_tile("3,-4"), Ok(TileCoord::new(3, -4)));
        assert_eq!(parse_tile(" -1 , 2 "), Ok(TileCoord::new(-1, 2)));
        assert!(parse_tile("3").is_err());
        assert!(parse_tile("a,b").is_err());
    }

    #[test]
    fn test_parse_world_pos() {
        assert_eq!(parse_world_pos("1.5,-0.25"), Ok((1.5, -0.25)));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["camping_world", "--key", "lake", "--activate", "1,2", "--activate", "-3,4"]);
        assert_eq!(args.key.as_deref(), Some("lake"));
        assert_eq!(args.activate, vec![TileCoord::new(1, 2), TileCoord::new(-3, 4)]);
        assert_eq!(args.width, 64);
    }
}
