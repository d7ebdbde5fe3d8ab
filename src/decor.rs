//! Decor placement
//!
//! Decides whether a tile carries a decorative object (tree, grass tuft,
//! flower) and which variant. Water tiles and tiles orthogonally adjacent to
//! water never get decor. Presence and variant are two independent hash draws
//! keyed by distinct prefixes.

use std::collections::HashMap;
use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::coords::TileCoord;
use crate::seeds::{tile_hash, WorldSeed};
use crate::terrain::{TerrainClassifier, TerrainKind};

const ROLL_PREFIX: &str = "decor-roll:";
const PICK_PREFIX: &str = "decor-pick:";

/// A decorative object a renderer can draw on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorKind {
    Tree(u8),
    Grass(u8),
    Flower(u8),
}

impl DecorKind {
    /// Six trees, two grass tufts, two flowers.
    pub fn default_palette() -> Vec<DecorKind> {
        let mut palette: Vec<DecorKind> = (1..=6).map(DecorKind::Tree).collect();
        palette.extend([DecorKind::Grass(1), DecorKind::Grass(2)]);
        palette.extend([DecorKind::Flower(2), DecorKind::Flower(3)]);
        palette
    }

    pub fn display_name(&self) -> String {
        match self {
            DecorKind::Tree(n) => format!("Tree {}", n),
            DecorKind::Grass(n) => format!("Grass {}", n),
            DecorKind::Flower(n) => format!("Flower {}", n),
        }
    }
}

impl fmt::Display for DecorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecorKind::Tree(n) => write!(f, "tree{}", n),
            DecorKind::Grass(n) => write!(f, "grass{}", n),
            DecorKind::Flower(n) => write!(f, "flower{}", n),
        }
    }
}

/// Resolved decor for a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DecorEntry {
    Absent,
    /// Index into the decor palette
    Present { variant: usize },
}

impl DecorEntry {
    pub fn is_present(&self) -> bool {
        matches!(self, DecorEntry::Present { .. })
    }

    pub fn variant(&self) -> Option<usize> {
        match self {
            DecorEntry::Absent => None,
            DecorEntry::Present { variant } => Some(*variant),
        }
    }
}

/// True if the tile or any of its four orthogonal neighbours is water.
pub fn is_near_water(terrain: &mut TerrainClassifier, coord: TileCoord) -> bool {
    if terrain.classify(coord).is_water() {
        return true;
    }
    coord
        .neighbors4()
        .iter()
        .any(|&neighbor| terrain.classify(neighbor).is_water())
}

/// Memoizing decor resolver for one world seed.
#[derive(Debug)]
pub struct DecorResolver {
    seed: WorldSeed,
    density: u32,
    palette_len: usize,
    cache: HashMap<TileCoord, DecorEntry>,
}

impl DecorResolver {
    pub fn new(seed: WorldSeed, density: u32, palette_len: usize) -> Self {
        DecorResolver {
            seed,
            density,
            palette_len,
            cache: HashMap::new(),
        }
    }

    /// Resolve decor for `coord`, whose own classification the caller has
    /// already computed as `kind`. The classifier is only consulted for the
    /// water-adjacency check.
    pub fn resolve(
        &mut self,
        terrain: &mut TerrainClassifier,
        coord: TileCoord,
        kind: TerrainKind,
    ) -> DecorEntry {
        if let Some(&entry) = self.cache.get(&coord) {
            return entry;
        }
        let entry = self.compute(terrain, coord, kind);
        trace!("decor miss at {}: {:?}", coord, entry);
        self.cache.insert(coord, entry);
        entry
    }

    fn compute(
        &self,
        terrain: &mut TerrainClassifier,
        coord: TileCoord,
        kind: TerrainKind,
    ) -> DecorEntry {
        if self.palette_len == 0 || kind.is_water() || is_near_water(terrain, coord) {
            return DecorEntry::Absent;
        }

        // Modulo roll, not a uniform draw; shared keys depend on it.
        let roll = tile_hash(ROLL_PREFIX, coord, self.seed) % 100;
        if roll >= self.density {
            return DecorEntry::Absent;
        }

        let variant = tile_hash(PICK_PREFIX, coord, self.seed) as usize % self.palette_len;
        DecorEntry::Present { variant }
    }

    pub fn cached(&self, coord: TileCoord) -> Option<DecorEntry> {
        self.cache.get(&coord).copied()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
