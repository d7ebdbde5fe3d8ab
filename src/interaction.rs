//! Per-tile interaction counters.
//!
//! Each activation of a land tile bumps its counter; an odd counter means a
//! structure (tent) stands on the tile. Water tiles ignore activation.

use std::collections::HashMap;

use log::trace;

use crate::coords::TileCoord;
use crate::terrain::TerrainClassifier;

#[derive(Debug, Default)]
pub struct InteractionStore {
    counters: HashMap<TileCoord, u32>,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter for `coord` unless it is water.
    /// Returns whether the activation was applied.
    pub fn activate(&mut self, terrain: &mut TerrainClassifier, coord: TileCoord) -> bool {
        if terrain.classify(coord).is_water() {
            trace!("ignored activation of water tile {}", coord);
            return false;
        }
        let counter = self.counters.entry(coord).or_insert(0);
        // Wrapping keeps parity alternating at the top of the range.
        *counter = counter.wrapping_add(1);
        true
    }

    pub fn counter(&self, coord: TileCoord) -> u32 {
        self.counters.get(&coord).copied().unwrap_or(0)
    }

    /// True iff the counter is odd.
    pub fn parity(&self, coord: TileCoord) -> bool {
        self.counter(coord) % 2 == 1
    }

    /// Tiles that currently carry a structure.
    pub fn structures(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.counters
            .iter()
            .filter(|(_, count)| **count % 2 == 1)
            .map(|(&coord, _)| coord)
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WorldParams;
    use crate::seeds::WorldSeed;

    fn terrain() -> TerrainClassifier {
        TerrainClassifier::new(WorldSeed::from_key("default"), &WorldParams::default())
    }

    fn find(terrain: &mut TerrainClassifier, water: bool) -> TileCoord {
        (-100..100)
            .flat_map(|y| (-100..100).map(move |x| TileCoord::new(x, y)))
            .find(|&c| terrain.classify(c).is_water() == water)
            .expect("search window should contain both water and land")
    }

    #[test]
    fn test_activation_toggles_parity() {
        let mut terrain = terrain();
        let land = find(&mut terrain, false);
        let mut store = InteractionStore::new();

        assert!(!store.parity(land));
        for n in 1..=5u32 {
            assert!(store.activate(&mut terrain, land));
            assert_eq!(store.counter(land), n);
            assert_eq!(store.parity(land), n % 2 == 1);
        }
    }

    #[test]
    fn test_water_activation_is_ignored() {
        let mut terrain = terrain();
        let water = find(&mut terrain, true);
        let mut store = InteractionStore::new();

        for _ in 0..3 {
            assert!(!store.activate(&mut terrain, water));
        }
        assert_eq!(store.counter(water), 0);
        assert!(!store.parity(water));
        assert!(store.is_empty());
    }

    #[test]
    fn test_structures_lists_odd_counters() {
        let mut terrain = terrain();
        let land = find(&mut terrain, false);
        let other = land.offset(0, 1);
        let mut store = InteractionStore::new();

        store.activate(&mut terrain, land);
        if !terrain.classify(other).is_water() {
            store.activate(&mut terrain, other);
            store.activate(&mut terrain, other);
        }
        let structures: Vec<_> = store.structures().collect();
        assert_eq!(structures, vec![land]);
    }
}
