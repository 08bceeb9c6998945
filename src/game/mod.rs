// Game layer: level data, the player and the world that ties them together

pub mod camera;
pub mod characters;
pub mod config;
pub mod tilemap;
pub mod world;

pub use config::{WorldConfig, DEFAULT_ASSET_ROOT};
pub use world::World;
