// Tile maps: map files, tilesets and sheet indexing

pub mod map;
pub mod sheet;
pub mod tileset;

pub use map::TileMap;
pub use sheet::TileSheetIndexer;
pub use tileset::Tilesets;
