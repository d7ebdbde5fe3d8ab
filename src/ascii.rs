//! ASCII rendering and export module for world regions
//!
//! Provides functions to render sampled regions as ASCII text and export to files.

use std::fs::File;
use std::io::{self, Write};

use chrono::Local;

use crate::decor::DecorKind;
use crate::terrain::TerrainKind;
use crate::tilemap::{terrain_counts, Tilemap};
use crate::world::TileView;

/// Glyph drawn for a tile carrying a structure
pub const STRUCTURE_CHAR: char = 'A';

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AsciiMode {
    /// Terrain with decor and structures on top
    Full,
    /// Terrain only
    Terrain,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Full => "Full",
            AsciiMode::Terrain => "Terrain",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Full, AsciiMode::Terrain]
    }
}

/// Get ASCII character for a terrain kind
pub fn terrain_char(kind: TerrainKind) -> char {
    match kind {
        TerrainKind::Water => '~',
        TerrainKind::Grass => '"',
        TerrainKind::DirtSmall => '.',
        TerrainKind::DirtMedium => ':',
        TerrainKind::DirtLarge => '#',
    }
}

pub fn decor_char(kind: DecorKind) -> char {
    match kind {
        DecorKind::Tree(_) => 'T',
        DecorKind::Grass(_) => ',',
        DecorKind::Flower(_) => '*',
    }
}

pub fn decor_color(kind: DecorKind) -> (u8, u8, u8) {
    match kind {
        DecorKind::Tree(_) => (20, 70, 24),
        DecorKind::Grass(_) => (170, 230, 120),
        DecorKind::Flower(_) => (240, 120, 190),
    }
}

pub fn structure_color() -> (u8, u8, u8) {
    (255, 160, 40)
}

/// Glyph and foreground color for a tile. Structures win over decor.
pub fn tile_glyph(view: &TileView, palette: &[DecorKind], mode: AsciiMode) -> (char, (u8, u8, u8)) {
    let base = (terrain_char(view.terrain), (230, 230, 230));
    if mode == AsciiMode::Terrain {
        return base;
    }
    if view.structure_present {
        return (STRUCTURE_CHAR, structure_color());
    }
    match view.decor_variant().and_then(|v| palette.get(v)) {
        Some(&kind) => (decor_char(kind), decor_color(kind)),
        None => base,
    }
}

/// Render a region to ASCII string
pub fn render_ascii_region(region: &Tilemap<TileView>, palette: &[DecorKind], mode: AsciiMode) -> String {
    let mut result = String::with_capacity((region.width + 1) * region.height);
    for row in region.rows() {
        for view in row {
            result.push(tile_glyph(view, palette, mode).0);
        }
        result.push('\n');
    }
    result
}

/// Render a region with ANSI true color (terrain as background)
pub fn render_colored_ascii_region(
    region: &Tilemap<TileView>,
    palette: &[DecorKind],
    mode: AsciiMode,
) -> String {
    let mut result = String::new();
    for row in region.rows() {
        for view in row {
            let (ch, fg) = tile_glyph(view, palette, mode);
            result.push_str(&ansi_colored_char(ch, fg, view.terrain.color()));
        }
        result.push('\n');
    }
    result
}

/// Format a single character with ANSI true color (24-bit) - foreground and background
pub fn ansi_colored_char(ch: char, fg: (u8, u8, u8), bg: (u8, u8, u8)) -> String {
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        fg.0, fg.1, fg.2,
        bg.0, bg.1, bg.2,
        ch
    )
}

/// Generate legend for map characters
pub fn legend() -> String {
    let mut s = String::from("Legend:\n");
    for &kind in TerrainKind::all() {
        s.push_str(&format!("  {} {}\n", terrain_char(kind), kind.display_name()));
    }
    s.push_str(&format!("  {} Tree\n", decor_char(DecorKind::Tree(1))));
    s.push_str(&format!("  {} Grass tuft\n", decor_char(DecorKind::Grass(1))));
    s.push_str(&format!("  {} Flower\n", decor_char(DecorKind::Flower(1))));
    s.push_str(&format!("  {} Tent\n", STRUCTURE_CHAR));
    s
}

/// Print a region to stdout
pub fn print_ascii_region(region: &Tilemap<TileView>, palette: &[DecorKind], mode: AsciiMode, colored: bool) {
    if colored {
        print!("{}", render_colored_ascii_region(region, palette, mode));
    } else {
        print!("{}", render_ascii_region(region, palette, mode));
    }
}

/// Export a region with a header, the map, a legend and terrain statistics.
pub fn export_region_file(
    region: &Tilemap<TileView>,
    palette: &[DecorKind],
    key: &str,
    seed: u32,
    path: &str,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    let total = region.width * region.height;

    writeln!(file, "=== CAMPING WORLD REGION ===")?;
    writeln!(file, "Key: {}", key)?;
    writeln!(file, "Seed: {:#010x}", seed)?;
    writeln!(
        file,
        "Region: {}x{} tiles from {}",
        region.width, region.height, region.origin
    )?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    write!(file, "{}", render_ascii_region(region, palette, AsciiMode::Full))?;
    writeln!(file)?;
    write!(file, "{}", legend())?;
    writeln!(file)?;

    writeln!(file, "=== TERRAIN ===")?;
    for (kind, count) in terrain_counts(region) {
        let pct = 100.0 * count as f64 / total.max(1) as f64;
        writeln!(file, "  {:<12} {:>6} ({:.1}%)", kind.display_name(), count, pct)?;
    }
    let decorated = region.values().filter(|v| v.decor_present()).count();
    let structures = region.values().filter(|v| v.structure_present).count();
    writeln!(file, "  Decor:       {:>6}", decorated)?;
    writeln!(file, "  Structures:  {:>6}", structures)?;

    Ok(())
}
