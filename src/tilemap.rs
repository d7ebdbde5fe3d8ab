//! Rectangular windows over the infinite tile grid

use std::collections::BTreeMap;

use crate::coords::TileCoord;
use crate::terrain::TerrainKind;
use crate::world::{TileView, WorldSession};

/// A rectangular window of the infinite world, anchored at `origin`.
///
/// Local `(x, y)` indices run from `(0, 0)` to `(width - 1, height - 1)`;
/// [`Tilemap::coord`] maps them back to world tile coordinates.
#[derive(Clone, Debug)]
pub struct Tilemap<T> {
    pub origin: TileCoord,
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(origin: TileCoord, width: usize, height: usize, value: T) -> Self {
        Self {
            origin,
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Tilemap<T> {
    /// Build a window by evaluating `f` at every covered world tile, row by row.
    pub fn from_fn(
        origin: TileCoord,
        width: usize,
        height: usize,
        mut f: impl FnMut(TileCoord) -> T,
    ) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(origin.offset(x as i32, y as i32)));
            }
        }
        Self {
            origin,
            width,
            height,
            data,
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) outside window");
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Look up by world coordinate; `None` outside the window.
    pub fn get_world(&self, coord: TileCoord) -> Option<&T> {
        let x = coord.x as i64 - self.origin.x as i64;
        let y = coord.y as i64 - self.origin.y as i64;
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.get(x as usize, y as usize))
    }

    /// World coordinate of a local index.
    pub fn coord(&self, x: usize, y: usize) -> TileCoord {
        self.origin.offset(x as i32, y as i32)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over all cells with their local coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Rows of the window, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.width.max(1))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

/// Query every tile of a window through the session's cached read path.
pub fn sample_region(
    session: &mut WorldSession,
    origin: TileCoord,
    width: usize,
    height: usize,
) -> Tilemap<TileView> {
    Tilemap::from_fn(origin, width, height, |coord| session.query_tile(coord))
}

/// Window centered on `center`.
pub fn sample_around(
    session: &mut WorldSession,
    center: TileCoord,
    width: usize,
    height: usize,
) -> Tilemap<TileView> {
    let origin = center.offset(-(width as i32 / 2), -(height as i32 / 2));
    sample_region(session, origin, width, height)
}

/// Count of each terrain kind in a sampled window
pub fn terrain_counts(region: &Tilemap<TileView>) -> BTreeMap<TerrainKind, usize> {
    let mut counts = BTreeMap::new();
    for view in region.values() {
        *counts.entry(view.terrain).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_layout() {
        let map = Tilemap::from_fn(TileCoord::new(-2, 5), 3, 2, |c| (c.x, c.y));
        assert_eq!(*map.get(0, 0), (-2, 5));
        assert_eq!(*map.get(2, 1), (0, 6));
        assert_eq!(map.coord(1, 1), TileCoord::new(-1, 6));
        assert_eq!(map.get_world(TileCoord::new(0, 6)), Some(&(0, 6)));
        assert_eq!(map.get_world(TileCoord::new(1, 6)), None);
        assert_eq!(map.get_world(TileCoord::new(-3, 5)), None);
        assert_eq!(map.rows().count(), 2);
    }

    #[test]
    fn test_set_and_iter() {
        let mut map = Tilemap::new_with(TileCoord::new(0, 0), 4, 4, 0u8);
        map.set(1, 2, 9);
        *map.get_mut(3, 3) += 1;
        let nonzero: Vec<_> = map.iter().filter(|(_, _, v)| **v != 0).map(|(x, y, _)| (x, y)).collect();
        assert_eq!(nonzero, vec![(1, 2), (3, 3)]);
    }

    #[test]
    fn test_region_matches_point_queries() {
        let mut session = WorldSession::new();
        let region = sample_region(&mut session, TileCoord::new(-8, -8), 16, 12);
        let mut fresh = WorldSession::new();
        for (x, y, view) in region.iter() {
            let coord = region.coord(x, y);
            assert_eq!(view.coord, coord);
            assert_eq!(*view, fresh.query_tile(coord));
        }
        let total: usize = terrain_counts(&region).values().sum();
        assert_eq!(total, 16 * 12);
    }

    #[test]
    fn test_sample_around_centers_window() {
        let mut session = WorldSession::new();
        let region = sample_around(&mut session, TileCoord::new(10, 10), 5, 5);
        assert_eq!(region.origin, TileCoord::new(8, 8));
        assert_eq!(region.get(2, 2).coord, TileCoord::new(10, 10));
    }
}
