//! World session
//!
//! Owns the active world key and seed together with every piece of state
//! derived from them. All derived state lives in one [`Epoch`]; reseeding
//! swaps the whole epoch in a single assignment.

use std::mem;

use log::debug;
use serde::Serialize;

use crate::coords::TileCoord;
use crate::decor::{DecorEntry, DecorKind, DecorResolver};
use crate::interaction::InteractionStore;
use crate::params::{ParamsError, WorldParams};
use crate::seeds::WorldSeed;
use crate::terrain::{TerrainClassifier, TerrainKind};

/// Everything derived from one world seed.
#[derive(Debug)]
struct Epoch {
    seed: WorldSeed,
    terrain: TerrainClassifier,
    decor: DecorResolver,
    interactions: InteractionStore,
}

impl Epoch {
    fn new(seed: WorldSeed, params: &WorldParams) -> Self {
        Epoch {
            seed,
            terrain: TerrainClassifier::new(seed, params),
            decor: DecorResolver::new(seed, params.decor_density, params.palette.len()),
            interactions: InteractionStore::new(),
        }
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            terrain_entries: self.terrain.len(),
            decor_entries: self.decor.len(),
            interaction_entries: self.interactions.len(),
        }
    }
}

/// What a renderer needs to draw one tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TileView {
    pub coord: TileCoord,
    pub terrain: TerrainKind,
    pub decor: DecorEntry,
    pub structure_present: bool,
}

impl TileView {
    pub fn decor_present(&self) -> bool {
        self.decor.is_present()
    }

    pub fn decor_variant(&self) -> Option<usize> {
        self.decor.variant()
    }
}

/// Hover/selection state for a tile. Water is never interactable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub coord: TileCoord,
    pub terrain: TerrainKind,
    pub interactable: bool,
}

/// Number of memoized entries in the current epoch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub terrain_entries: usize,
    pub decor_entries: usize,
    pub interaction_entries: usize,
}

/// A single infinite world, driven by one render/interaction loop.
#[derive(Debug)]
pub struct WorldSession {
    params: WorldParams,
    key: String,
    epoch: Epoch,
}

impl WorldSession {
    /// Session with default parameters, seeded with the default key.
    pub fn new() -> Self {
        Self::from_valid_params(WorldParams::default())
    }

    pub fn with_params(params: WorldParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self::from_valid_params(params))
    }

    fn from_valid_params(params: WorldParams) -> Self {
        let key = params.default_key.clone();
        let seed = WorldSeed::from_key(&key);
        let epoch = Epoch::new(seed, &params);
        debug!("world session started with key {:?} (seed {})", key, seed);
        WorldSession { params, key, epoch }
    }

    /// Switch to the world named by `key`, discarding all derived state.
    pub fn reseed(&mut self, key: &str) {
        let seed = WorldSeed::from_key(key);
        let previous = mem::replace(&mut self.epoch, Epoch::new(seed, &self.params));
        self.key = key.to_string();

        let dropped = previous.stats();
        debug!(
            "reseeded to key {:?} (seed {}), dropped {} terrain / {} decor / {} interaction entries",
            key, seed, dropped.terrain_entries, dropped.decor_entries, dropped.interaction_entries
        );
    }

    /// Terrain, decor and structure state of a tile.
    pub fn query_tile(&mut self, coord: TileCoord) -> TileView {
        let epoch = &mut self.epoch;
        let terrain = epoch.terrain.classify(coord);
        let decor = epoch.decor.resolve(&mut epoch.terrain, coord, terrain);
        TileView {
            coord,
            terrain,
            decor,
            structure_present: !terrain.is_water() && epoch.interactions.parity(coord),
        }
    }

    /// Register a click on a tile. Water tiles ignore it.
    /// Returns whether the tile's counter changed.
    pub fn activate_tile(&mut self, coord: TileCoord) -> bool {
        let epoch = &mut self.epoch;
        epoch.interactions.activate(&mut epoch.terrain, coord)
    }

    pub fn selection(&mut self, coord: TileCoord) -> Selection {
        let terrain = self.epoch.terrain.classify(coord);
        Selection {
            coord,
            terrain,
            interactable: !terrain.is_water(),
        }
    }

    /// Tile picked by a continuous world-space position.
    pub fn pick(&self, world_x: f64, world_y: f64) -> TileCoord {
        TileCoord::from_world(world_x, world_y, self.params.pick_offset)
    }

    pub fn query_at(&mut self, world_x: f64, world_y: f64) -> TileView {
        let coord = self.pick(world_x, world_y);
        self.query_tile(coord)
    }

    pub fn activate_at(&mut self, world_x: f64, world_y: f64) -> bool {
        let coord = self.pick(world_x, world_y);
        self.activate_tile(coord)
    }

    pub fn selection_at(&mut self, world_x: f64, world_y: f64) -> Selection {
        let coord = self.pick(world_x, world_y);
        self.selection(coord)
    }

    /// Palette entry for a resolved decor.
    pub fn decor_kind(&self, decor: DecorEntry) -> Option<DecorKind> {
        decor
            .variant()
            .and_then(|variant| self.params.palette.get(variant).copied())
    }

    pub fn interaction_count(&self, coord: TileCoord) -> u32 {
        self.epoch.interactions.counter(coord)
    }

    /// Tiles carrying a structure in the current epoch, sorted.
    pub fn structures(&self) -> Vec<TileCoord> {
        let mut coords: Vec<TileCoord> = self.epoch.interactions.structures().collect();
        coords.sort();
        coords
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn seed(&self) -> WorldSeed {
        self.epoch.seed
    }

    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.epoch.stats()
    }
}

impl Default for WorldSession {
    fn default() -> Self {
        Self::new()
    }
}
