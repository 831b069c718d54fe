//! Planet field synthesis library
//!
//! Builds a deterministic stack of 2D scalar fields for a planet surface:
//! tectonic plates, macro shapes, elevation, sea level, morphology and
//! climate. Re-exports modules for use by the binary and tools.

pub mod climate;
pub mod config;
pub mod continent;
pub mod craters;
pub mod error;
pub mod field;
pub mod heightmap;
pub mod morphology;
pub mod plate_bias;
pub mod plates;
pub mod sea_level;
pub mod seeds;
pub mod terrain_noise;
pub mod tilemap;
pub mod timing;
pub mod value_noise;
pub mod volcanoes;
pub mod world;

pub use config::WorldParams;
pub use error::{Result, WorldError};
pub use field::Field;
pub use seeds::WorldSeeds;
pub use tilemap::Tilemap;
pub use world::{build_world_fields, build_world_fields_with_seeds, FieldRange, NamedField, WorldFields};
