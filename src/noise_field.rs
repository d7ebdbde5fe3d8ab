//! Coherent noise field used for terrain classification.
//!
//! Wraps a seeded fractal Perlin generator and remaps its output to `[0, 1]`.
//! Each field owns its generator, so sampling terrain never shares state with
//! any other source of randomness.

use std::fmt;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::params::WorldParams;
use crate::seeds::WorldSeed;

pub struct NoiseField {
    seed: WorldSeed,
    octaves: usize,
    persistence: f64,
    fbm: Fbm<Perlin>,
}

impl NoiseField {
    pub fn new(seed: WorldSeed, octaves: usize, persistence: f64) -> Self {
        NoiseField {
            seed,
            octaves,
            persistence,
            fbm: build_fbm(seed, octaves, persistence),
        }
    }

    pub fn from_params(seed: WorldSeed, params: &WorldParams) -> Self {
        Self::new(seed, params.noise_octaves, params.noise_persistence)
    }

    /// Rebuild the generator for a new world seed.
    pub fn reseed(&mut self, seed: WorldSeed) {
        self.seed = seed;
        self.fbm = build_fbm(seed, self.octaves, self.persistence);
    }

    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Sample the field. Output is always within `[0, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let raw = self.fbm.get([x, y]);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

fn build_fbm(seed: WorldSeed, octaves: usize, persistence: f64) -> Fbm<Perlin> {
    Fbm::<Perlin>::new(seed.value())
        .set_octaves(octaves)
        .set_frequency(1.0)
        .set_persistence(persistence)
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .field("octaves", &self.octaves)
            .field("persistence", &self.persistence)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(key: &str) -> NoiseField {
        NoiseField::from_params(WorldSeed::from_key(key), &WorldParams::default())
    }

    #[test]
    fn test_samples_stay_in_unit_range() {
        let field = field("default");
        for y in -40..40 {
            for x in -40..40 {
                let v = field.sample(x as f64 * 0.37, y as f64 * 0.29);
                assert!((0.0..=1.0).contains(&v), "sample out of range: {v}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = field("default");
        let b = field("default");
        for i in 0..200 {
            let (x, y) = (i as f64 * 0.13, i as f64 * -0.21);
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_spatially_coherent() {
        let field = field("default");
        let mut total_step = 0.0;
        for i in 0..500 {
            let x = i as f64 * 0.01;
            total_step += (field.sample(x + 0.01, 0.5) - field.sample(x, 0.5)).abs();
        }
        // Tiny steps in input give tiny steps in output
        assert!(total_step / 500.0 < 0.05);
    }

    #[test]
    fn test_reseed_matches_fresh_field() {
        let mut reseeded = field("default");
        reseeded.reseed(WorldSeed::from_key("alternate"));
        let fresh = field("alternate");
        assert_eq!(reseeded.seed(), fresh.seed());
        for i in 0..100 {
            let (x, y) = (i as f64 * 0.7 + 0.3, i as f64 * 0.4 + 0.1);
            assert_eq!(reseeded.sample(x, y), fresh.sample(x, y));
        }
    }
}
