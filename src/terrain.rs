//! Terrain classification
//!
//! Maps a tile to one of five terrain kinds by sampling the noise field at
//! the scaled tile position and bucketing the sample against ascending
//! cutoffs. Results are memoized per tile for the lifetime of the classifier;
//! a cache hit never resamples.

use std::collections::HashMap;
use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::coords::TileCoord;
use crate::noise_field::NoiseField;
use crate::params::{TerrainThresholds, WorldParams};
use crate::seeds::WorldSeed;

/// Terrain category of a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerrainKind {
    Water,
    Grass,
    DirtSmall,
    DirtMedium,
    DirtLarge,
}

impl TerrainKind {
    pub fn all() -> &'static [Self] {
        &[
            Self::Water,
            Self::Grass,
            Self::DirtSmall,
            Self::DirtMedium,
            Self::DirtLarge,
        ]
    }

    /// Bucket a noise sample against the cutoffs.
    pub fn from_sample(sample: f64, thresholds: &TerrainThresholds) -> Self {
        if sample < thresholds.water {
            TerrainKind::Water
        } else if sample < thresholds.grass {
            TerrainKind::Grass
        } else if sample < thresholds.dirt_small {
            TerrainKind::DirtSmall
        } else if sample < thresholds.dirt_medium {
            TerrainKind::DirtMedium
        } else {
            TerrainKind::DirtLarge
        }
    }

    pub fn is_water(&self) -> bool {
        matches!(self, TerrainKind::Water)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainKind::Water => "Water",
            TerrainKind::Grass => "Grass",
            TerrainKind::DirtSmall => "Small Dirt",
            TerrainKind::DirtMedium => "Medium Dirt",
            TerrainKind::DirtLarge => "Large Dirt",
        }
    }

    /// RGB color used by the map previews
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            TerrainKind::Water => (52, 120, 196),
            TerrainKind::Grass => (96, 168, 72),
            TerrainKind::DirtSmall => (156, 146, 88),
            TerrainKind::DirtMedium => (140, 108, 64),
            TerrainKind::DirtLarge => (112, 80, 48),
        }
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainKind::Water => write!(f, "WATER"),
            TerrainKind::Grass => write!(f, "GRASS"),
            TerrainKind::DirtSmall => write!(f, "DIRT_SMALL"),
            TerrainKind::DirtMedium => write!(f, "DIRT_MEDIUM"),
            TerrainKind::DirtLarge => write!(f, "DIRT_LARGE"),
        }
    }
}

/// Memoizing terrain classifier for one world seed.
#[derive(Debug)]
pub struct TerrainClassifier {
    noise: NoiseField,
    scale: f64,
    thresholds: TerrainThresholds,
    cache: HashMap<TileCoord, TerrainKind>,
}

impl TerrainClassifier {
    pub fn new(seed: WorldSeed, params: &WorldParams) -> Self {
        TerrainClassifier {
            noise: NoiseField::from_params(seed, params),
            scale: params.noise_scale,
            thresholds: params.thresholds.clone(),
            cache: HashMap::new(),
        }
    }

    pub fn classify(&mut self, coord: TileCoord) -> TerrainKind {
        if let Some(&kind) = self.cache.get(&coord) {
            return kind;
        }
        let kind = self.sample(coord);
        trace!("terrain miss at {}: {}", coord, kind);
        self.cache.insert(coord, kind);
        kind
    }

    /// Cached classification without computing anything.
    pub fn cached(&self, coord: TileCoord) -> Option<TerrainKind> {
        self.cache.get(&coord).copied()
    }

    /// Classify without touching the cache.
    pub fn sample(&self, coord: TileCoord) -> TerrainKind {
        let n = self
            .noise
            .sample(coord.x as f64 * self.scale, coord.y as f64 * self.scale);
        TerrainKind::from_sample(n, &self.thresholds)
    }

    pub fn seed(&self) -> WorldSeed {
        self.noise.seed()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(key: &str) -> TerrainClassifier {
        TerrainClassifier::new(WorldSeed::from_key(key), &WorldParams::default())
    }

    #[test]
    fn test_bucket_boundaries() {
        let t = TerrainThresholds::default();
        assert_eq!(TerrainKind::from_sample(0.0, &t), TerrainKind::Water);
        assert_eq!(TerrainKind::from_sample(0.3799, &t), TerrainKind::Water);
        assert_eq!(TerrainKind::from_sample(0.38, &t), TerrainKind::Grass);
        assert_eq!(TerrainKind::from_sample(0.48, &t), TerrainKind::DirtSmall);
        assert_eq!(TerrainKind::from_sample(0.65, &t), TerrainKind::DirtMedium);
        assert_eq!(TerrainKind::from_sample(0.88, &t), TerrainKind::DirtLarge);
        assert_eq!(TerrainKind::from_sample(1.0, &t), TerrainKind::DirtLarge);
    }

    #[test]
    fn test_classify_is_memoized() {
        let mut c = classifier("default");
        assert!(c.is_empty());
        let first = c.classify(TileCoord::new(3, -9));
        assert_eq!(c.len(), 1);
        assert_eq!(c.cached(TileCoord::new(3, -9)), Some(first));
        assert_eq!(c.classify(TileCoord::new(3, -9)), first);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_cache_matches_uncached_sample() {
        let mut c = classifier("default");
        for y in -20..20 {
            for x in -20..20 {
                let coord = TileCoord::new(x, y);
                assert_eq!(c.classify(coord), c.sample(coord));
            }
        }
    }

    #[test]
    fn test_world_has_water_and_land() {
        let mut c = classifier("default");
        let mut water = 0;
        let mut land = 0;
        for y in -100..100 {
            for x in -100..100 {
                if c.classify(TileCoord::new(x, y)).is_water() {
                    water += 1;
                } else {
                    land += 1;
                }
            }
        }
        assert!(water > 0, "expected some water tiles");
        assert!(land > water, "expected mostly land, got {water} water / {land} land");
    }
}
