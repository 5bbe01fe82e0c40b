pub mod config;
pub mod decor;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod layout;
pub mod rng;
pub mod shadow;
pub mod style;
pub mod tiles;
pub mod zones;

pub use config::{DecorSettings, GenerationParams, StyleOverlap};
pub use error::{GenError, Result};
pub use generator::{Level, generate_level};
pub use tiles::{MapTile, TileClaim, TileGrid, TileType};
