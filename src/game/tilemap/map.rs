// Tile map model: layers, tileset references and collider extraction

use crate::core::Rect;
use crate::engine::assets::{AssetLoader, AssetType, LoadError};
use glam::Vec2;
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;

/// Tiled stores flip/rotation flags in the top bits of every gid
const GID_FLAGS_MASK: u32 = 0xE000_0000;

const DEFAULT_TILE_SIZE: u32 = 16;

/// A map object as written by the Tiled editor
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapObject {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub rotation: f32,
}

impl MapObject {
    /// Bounding rectangle in map pixels
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// One layer of the map: a tile grid, an object group, or both
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TileLayer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Row-major gids, 0 meaning empty
    #[serde(default)]
    pub data: Vec<u32>,
    #[serde(default)]
    pub objects: Vec<MapObject>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl TileLayer {
    pub fn has_tiles(&self) -> bool {
        !self.data.is_empty()
    }

    /// Non-empty cells as `(column, row, gid)` with flip flags stripped
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        let width = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .filter_map(move |(i, &raw)| {
                let gid = raw & !GID_FLAGS_MASK;
                (gid != 0).then_some((i as u32 % width, i as u32 / width, gid))
            })
    }
}

/// Reference from a map to an external tileset file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TilesetRef {
    pub source: String,
    #[serde(rename = "firstgid")]
    pub first_gid: u32,
}

/// A loaded map. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TileMap {
    #[serde(rename = "tilewidth", default = "default_tile_size")]
    pub tile_size: u32,
    pub layers: Vec<TileLayer>,
    #[serde(default)]
    pub tilesets: Vec<TilesetRef>,
}

fn default_true() -> bool {
    true
}

fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}

impl TileMap {
    /// Read and validate a map file
    pub fn load(loader: &AssetLoader, path: &Path) -> Result<Self, LoadError> {
        if !AssetType::Map.accepts(path) {
            return Err(LoadError::UnsupportedFormat(path.to_path_buf()));
        }
        let json = loader.read_to_string(path)?;
        Self::parse(&json, path)
    }

    /// Parse and validate map JSON that has already been read
    pub fn parse(json: &str, path: &Path) -> Result<Self, LoadError> {
        let map: TileMap = serde_json::from_str(json).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        map.validate()?;
        Ok(map)
    }

    fn validate(&self) -> Result<(), LoadError> {
        if self.tile_size == 0 {
            return Err(LoadError::InvalidMap("tile size must be positive".to_string()));
        }

        for layer in &self.layers {
            debug!(
                "Layer '{}' ({}): {}x{}, {} objects",
                layer.name,
                layer.kind.as_deref().unwrap_or("tilelayer"),
                layer.width,
                layer.height,
                layer.objects.len()
            );
            for object in layer.objects.iter().filter(|o| o.rotation != 0.0) {
                warn!(
                    "Object {} '{}' in layer '{}' is rotated; its collider ignores rotation",
                    object.id, object.name, layer.name
                );
            }

            if !layer.has_tiles() {
                continue;
            }
            let expected = layer.width as usize * layer.height as usize;
            if layer.data.len() != expected {
                return Err(LoadError::InvalidMap(format!(
                    "layer '{}' has {} tiles, expected {}x{} = {}",
                    layer.name,
                    layer.data.len(),
                    layer.width,
                    layer.height,
                    expected
                )));
            }
        }

        Ok(())
    }

    /// Every object of every layer as a collision rectangle, in layer then object order
    pub fn colliders(&self) -> Vec<Rect> {
        self.layers
            .iter()
            .flat_map(|layer| layer.objects.iter())
            .map(MapObject::rect)
            .collect()
    }

    /// Layers that carry tile data, in draw order
    pub fn tile_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.iter().filter(|l| l.has_tiles())
    }

    /// Extent of the largest tile layer in pixels
    pub fn pixel_size(&self) -> Vec2 {
        let (w, h) = self
            .tile_layers()
            .fold((0, 0), |(w, h), l| (w.max(l.width), h.max(l.height)));
        Vec2::new(w as f32, h as f32) * self.tile_size as f32
    }
}
