//! Region exports: PNG minimap and JSON dump.

use std::fs::File;
use std::io::BufWriter;

use image::{ImageBuffer, Rgb, RgbImage};
use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::ascii::{decor_color, structure_color};
use crate::decor::DecorKind;
use crate::tilemap::Tilemap;
use crate::world::TileView;

/// Default pixel size of one tile in the minimap
pub const DEFAULT_CELL_SIZE: u32 = 8;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("nothing to export: region is {width}x{height}")]
    EmptyRegion { width: usize, height: usize },
    #[error("minimap too large: {width}x{height} tiles at {cell_size}px per tile")]
    ImageTooLarge { width: usize, height: usize, cell_size: u32 },
}

fn ensure_not_empty(region: &Tilemap<TileView>) -> Result<(), ExportError> {
    if region.is_empty() {
        return Err(ExportError::EmptyRegion {
            width: region.width,
            height: region.height,
        });
    }
    Ok(())
}

/// Pixel dimensions of a region's minimap, or `None` if they overflow `u32`.
pub fn image_dimensions(region: &Tilemap<TileView>, cell_size: u32) -> Option<(u32, u32)> {
    let cell = cell_size.max(1);
    let width = u32::try_from(region.width).ok()?.checked_mul(cell)?;
    let height = u32::try_from(region.height).ok()?.checked_mul(cell)?;
    Some((width, height))
}

/// Draw a region as a minimap: each tile is a square of terrain color, with a
/// centered marker for decor and a larger one for structures.
pub fn render_region_image(
    region: &Tilemap<TileView>,
    palette: &[DecorKind],
    cell_size: u32,
) -> Result<RgbImage, ExportError> {
    let cell = cell_size.max(1);
    let (img_width, img_height) = image_dimensions(region, cell).ok_or(ExportError::ImageTooLarge {
        width: region.width,
        height: region.height,
        cell_size,
    })?;
    let mut img: RgbImage = ImageBuffer::new(img_width, img_height);

    for (x, y, view) in region.iter() {
        let cell_x = x as u32 * cell;
        let cell_y = y as u32 * cell;
        let (r, g, b) = view.terrain.color();
        fill_square(&mut img, cell_x, cell_y, cell, Rgb([r, g, b]));

        let marker = if view.structure_present {
            Some((structure_color(), cell / 2))
        } else {
            view.decor_variant()
                .and_then(|v| palette.get(v))
                .map(|&kind| (decor_color(kind), cell / 4))
        };
        if let Some(((mr, mg, mb), size)) = marker {
            let size = size.max(1);
            let inset = (cell - size) / 2;
            fill_square(&mut img, cell_x + inset, cell_y + inset, size, Rgb([mr, mg, mb]));
        }
    }

    Ok(img)
}

fn fill_square(img: &mut RgbImage, x0: u32, y0: u32, size: u32, color: Rgb<u8>) {
    for py in y0..(y0 + size).min(img.height()) {
        for px in x0..(x0 + size).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

pub fn export_region_png(
    region: &Tilemap<TileView>,
    palette: &[DecorKind],
    cell_size: u32,
    path: &str,
) -> Result<(u32, u32), ExportError> {
    ensure_not_empty(region)?;
    let img = render_region_image(region, palette, cell_size)?;
    img.save(path)?;
    info!("exported {}x{} minimap to {}", img.width(), img.height(), path);
    Ok((img.width(), img.height()))
}

/// Serialized form of a sampled region
#[derive(Debug, Serialize)]
pub struct RegionExport<'a> {
    pub key: &'a str,
    pub seed: u32,
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileExport>,
}

#[derive(Debug, Serialize)]
pub struct TileExport {
    #[serde(flatten)]
    pub view: TileView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decor_kind: Option<DecorKind>,
}

impl<'a> RegionExport<'a> {
    pub fn new(region: &Tilemap<TileView>, palette: &[DecorKind], key: &'a str, seed: u32) -> Self {
        let tiles = region
            .values()
            .map(|&view| TileExport {
                view,
                decor_kind: view.decor_variant().and_then(|v| palette.get(v).copied()),
            })
            .collect();
        RegionExport {
            key,
            seed,
            width: region.width,
            height: region.height,
            tiles,
        }
    }
}

pub fn export_region_json(
    region: &Tilemap<TileView>,
    palette: &[DecorKind],
    key: &str,
    seed: u32,
    path: &str,
) -> Result<(), ExportError> {
    ensure_not_empty(region)?;
    let export = RegionExport::new(region, palette, key, seed);
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &export)?;
    info!("exported {} tiles to {}", export.tiles.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::TileCoord;
    use crate::decor::DecorEntry;
    use crate::terrain::TerrainKind;
    use crate::tilemap::sample_region;
    use crate::world::WorldSession;

    #[test]
    fn test_image_size_and_terrain_color() {
        let mut session = WorldSession::new();
        let region = sample_region(&mut session, TileCoord::new(0, 0), 6, 4);
        let palette = session.params().palette.clone();
        let img = render_region_image(&region, &palette, 5).unwrap();
        assert_eq!(img.dimensions(), (30, 20));

        // Cell corners are never covered by markers
        let (r, g, b) = region.get(2, 3).terrain.color();
        assert_eq!(*img.get_pixel(10, 15), Rgb([r, g, b]));
    }

    #[test]
    fn test_structure_marker_drawn() {
        let region = Tilemap::from_fn(TileCoord::new(0, 0), 1, 1, |coord| TileView {
            coord,
            terrain: TerrainKind::Grass,
            decor: DecorEntry::Absent,
            structure_present: true,
        });
        let img = render_region_image(&region, &DecorKind::default_palette(), 8).unwrap();
        let (r, g, b) = structure_color();
        assert_eq!(*img.get_pixel(4, 4), Rgb([r, g, b]));
    }

    #[test]
    fn test_empty_region_rejected() {
        let filler = TileView {
            coord: TileCoord::new(0, 0),
            terrain: TerrainKind::Water,
            decor: DecorEntry::Absent,
            structure_present: false,
        };
        let region = Tilemap::new_with(TileCoord::new(0, 0), 0, 0, filler);
        let err = export_region_png(&region, &[], 4, "unused.png").unwrap_err();
        assert!(matches!(err, ExportError::EmptyRegion { .. }));
        let err = export_region_json(&region, &[], "default", 0, "unused.json").unwrap_err();
        assert!(matches!(err, ExportError::EmptyRegion { .. }));
        assert!(!std::path::Path::new("unused.json").exists());
    }

    #[test]
    fn test_oversized_minimap_rejected() {
        let region = Tilemap::from_fn(TileCoord::new(0, 0), 3, 2, |coord| TileView {
            coord,
            terrain: TerrainKind::Grass,
            decor: DecorEntry::Absent,
            structure_present: false,
        });
        assert_eq!(image_dimensions(&region, 4), Some((12, 8)));
        assert_eq!(image_dimensions(&region, u32::MAX), None);
        let err = export_region_png(&region, &[], u32::MAX, "unused.png").unwrap_err();
        assert!(matches!(err, ExportError::ImageTooLarge { cell_size: u32::MAX, .. }));
    }

    #[test]
    fn test_json_shape() {
        let region = Tilemap::from_fn(TileCoord::new(3, -1), 1, 1, |coord| TileView {
            coord,
            terrain: TerrainKind::Grass,
            decor: DecorEntry::Present { variant: 7 },
            structure_present: false,
        });
        let palette = DecorKind::default_palette();
        let export = RegionExport::new(&region, &palette, "default", 42);
        let value = serde_json::to_value(&export).unwrap();
        let tile = &value["tiles"][0];
        assert_eq!(tile["coord"]["x"], 3);
        assert_eq!(tile["terrain"], "GRASS");
        assert_eq!(tile["decor"]["state"], "present");
        assert_eq!(tile["decor_kind"]["grass"], 2);
        assert_eq!(value["key"], "default");
    }
}
