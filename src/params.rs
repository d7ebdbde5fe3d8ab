//! World generation parameters and configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::PickOffset;
use crate::decor::DecorKind;

/// Key used when no world key has been supplied yet.
pub const DEFAULT_SEED_KEY: &str = "default";

/// Upper bound on fractal octaves accepted by the noise generator.
const MAX_NOISE_OCTAVES: usize = 32;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read params file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse params file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid parameter `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Noise cutoffs, ascending. A sample below `water` is WATER, below `grass`
/// is GRASS and so on; anything at or above `dirt_medium` is DIRT_LARGE.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainThresholds {
    pub water: f64,
    pub grass: f64,
    pub dirt_small: f64,
    pub dirt_medium: f64,
}

impl Default for TerrainThresholds {
    fn default() -> Self {
        TerrainThresholds {
            water: 0.38,
            grass: 0.48,
            dirt_small: 0.65,
            dirt_medium: 0.88,
        }
    }
}

impl TerrainThresholds {
    pub fn as_array(&self) -> [f64; 4] {
        [self.water, self.grass, self.dirt_small, self.dirt_medium]
    }
}

/// Global world generation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    /// Spatial frequency applied to tile coordinates before sampling noise
    pub noise_scale: f64,

    /// Number of noise octaves summed per sample
    pub noise_octaves: usize,

    /// Amplitude falloff between octaves (0.0-1.0)
    pub noise_persistence: f64,

    pub thresholds: TerrainThresholds,

    /// Percentage of eligible tiles that receive decor (0-100)
    pub decor_density: u32,

    /// Decor variants; a tile's variant index points into this list
    pub palette: Vec<DecorKind>,

    /// Correction applied when converting world-space positions to tiles
    pub pick_offset: PickOffset,

    /// Key used for the initial reseed
    pub default_key: String,
}

impl Default for WorldParams {
    fn default() -> Self {
        WorldParams {
            noise_scale: 0.2,
            noise_octaves: 4,
            noise_persistence: 0.5,
            thresholds: TerrainThresholds::default(),
            decor_density: 20,
            palette: DecorKind::default_palette(),
            pick_offset: PickOffset::default(),
            default_key: DEFAULT_SEED_KEY.to_string(),
        }
    }
}

impl WorldParams {
    /// Load parameters from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let params: WorldParams = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.noise_scale.is_finite() || self.noise_scale <= 0.0 {
            return Err(ParamsError::Invalid {
                field: "noise_scale",
                reason: format!("must be a positive number, got {}", self.noise_scale),
            });
        }
        if self.noise_octaves == 0 || self.noise_octaves > MAX_NOISE_OCTAVES {
            return Err(ParamsError::Invalid {
                field: "noise_octaves",
                reason: format!(
                    "must be within 1..={}, got {}",
                    MAX_NOISE_OCTAVES, self.noise_octaves
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.noise_persistence) {
            return Err(ParamsError::Invalid {
                field: "noise_persistence",
                reason: format!("must be within [0, 1], got {}", self.noise_persistence),
            });
        }

        let cutoffs = self.thresholds.as_array();
        if cutoffs.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ParamsError::Invalid {
                field: "thresholds",
                reason: format!("cutoffs must be within [0, 1], got {:?}", cutoffs),
            });
        }
        if cutoffs.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ParamsError::Invalid {
                field: "thresholds",
                reason: format!("cutoffs must be strictly ascending, got {:?}", cutoffs),
            });
        }

        if self.decor_density > 100 {
            return Err(ParamsError::Invalid {
                field: "decor_density",
                reason: format!("is a percentage, got {}", self.decor_density),
            });
        }
        if self.palette.is_empty() {
            return Err(ParamsError::Invalid {
                field: "palette",
                reason: "needs at least one decor variant".to_string(),
            });
        }
        Ok(())
    }
}
