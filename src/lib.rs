//! Infinite camping world library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod coords;
pub mod decor;
pub mod explorer;
pub mod export;
pub mod interaction;
pub mod noise_field;
pub mod params;
pub mod seeds;
pub mod terrain;
pub mod tilemap;
pub mod world;
