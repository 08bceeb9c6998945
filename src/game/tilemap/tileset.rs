// Tileset resolution: global tile id to texture region

use super::map::{TileMap, TilesetRef};
use super::sheet::TileSheetIndexer;
use crate::core::Rect;
use crate::engine::assets::{
    resolve_relative, AssetLoader, AssetType, LoadError, TextureHandle, TextureInfo, TextureLoader,
};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Sheet width assumed for grid tilesets that do not record `columns`
pub const DEFAULT_SHEET_COLUMNS: u32 = 22;

const DEFAULT_TILE_SIZE: u32 = 16;

/// Explicit variant tag a tileset file may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TilesetKind {
    Grid,
    Images,
}

#[derive(Debug, Deserialize)]
struct TilesetFile {
    #[serde(default)]
    kind: Option<TilesetKind>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    columns: Option<u32>,
    #[serde(default = "default_tile_size")]
    tilewidth: u32,
    #[serde(default)]
    tiles: Vec<TileEntryFile>,
}

#[derive(Debug, Deserialize)]
struct TileEntryFile {
    id: u32,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    imagewidth: u32,
    #[serde(default)]
    imageheight: u32,
}

fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}

/// One image of an image-collection tileset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImageEntry {
    pub id: u32,
    pub image: String,
    pub width: u32,
    pub height: u32,
}

/// What a tileset file describes, before any image is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TilesetDescription {
    /// One image cut into equally sized tiles
    UniformGrid {
        image: String,
        columns: u32,
        tile_size: u32,
    },
    /// One image per tile, each with its own size
    PerTileImages { tiles: Vec<TileImageEntry> },
}

impl TilesetDescription {
    /// Decide which variant a parsed tileset file is.
    ///
    /// An explicit `kind` wins. Otherwise a top-level `image` means a grid and a
    /// `tiles` list with images means an image collection.
    fn classify(file: TilesetFile, path: &Path) -> Result<Self, LoadError> {
        let invalid = |reason: &str| LoadError::InvalidTileset {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let kind = match file.kind {
            Some(kind) => kind,
            None if file.image.is_some() => TilesetKind::Grid,
            None if file.tiles.iter().any(|t| t.image.is_some()) => TilesetKind::Images,
            None => return Err(invalid("neither an image nor a list of tile images")),
        };

        match kind {
            TilesetKind::Grid => {
                let image = file
                    .image
                    .ok_or_else(|| invalid("grid tileset has no image"))?;
                if file.tilewidth == 0 {
                    return Err(invalid("tile width must be positive"));
                }
                Ok(Self::UniformGrid {
                    image,
                    columns: file.columns.filter(|&c| c > 0).unwrap_or(DEFAULT_SHEET_COLUMNS),
                    tile_size: file.tilewidth,
                })
            }
            TilesetKind::Images => {
                let tiles = file
                    .tiles
                    .into_iter()
                    .map(|t| match t.image {
                        Some(image) => Ok(TileImageEntry {
                            id: t.id,
                            image,
                            width: t.imagewidth,
                            height: t.imageheight,
                        }),
                        None => Err(invalid(&format!("tile {} has no image", t.id))),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if tiles.is_empty() {
                    return Err(invalid("image collection has no tiles"));
                }
                Ok(Self::PerTileImages { tiles })
            }
        }
    }
}

/// Texture region to draw for one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSprite {
    pub texture: TextureHandle,
    pub source: Rect,
}

/// A tileset with its images loaded
#[derive(Debug, Clone, PartialEq)]
pub enum Tileset {
    UniformGrid {
        first_gid: u32,
        texture: TextureInfo,
        sheet: TileSheetIndexer,
        tile_count: u32,
    },
    PerTileImages {
        first_gid: u32,
        images: HashMap<u32, TextureInfo>,
    },
}

impl Tileset {
    /// Load the tileset file `reference` points at, relative to the map file,
    /// and every image it needs.
    pub fn resolve(
        reference: &TilesetRef,
        map_path: &Path,
        loader: &AssetLoader,
        textures: &mut impl TextureLoader,
    ) -> Result<Self, LoadError> {
        let path = resolve_relative(map_path, &reference.source);
        let file: TilesetFile = loader.read_json(AssetType::Tileset, &path)?;
        let description = TilesetDescription::classify(file, &path)?;
        let tileset = Self::from_description(description, reference.first_gid, &path, textures)?;

        debug!(
            "Loaded tileset {} (first gid {}, {} tiles)",
            path.display(),
            reference.first_gid,
            tileset.tile_count()
        );
        Ok(tileset)
    }

    /// Load the images a description refers to; image paths are relative to `path`
    pub fn from_description(
        description: TilesetDescription,
        first_gid: u32,
        path: &Path,
        textures: &mut impl TextureLoader,
    ) -> Result<Self, LoadError> {
        match description {
            TilesetDescription::UniformGrid {
                image,
                columns,
                tile_size,
            } => {
                let texture = textures.load_texture(&resolve_relative(path, &image))?;
                let rows = texture.height / tile_size;
                Ok(Self::UniformGrid {
                    first_gid,
                    texture,
                    sheet: TileSheetIndexer::new(columns, tile_size),
                    tile_count: columns * rows,
                })
            }
            TilesetDescription::PerTileImages { tiles } => {
                let mut images = HashMap::with_capacity(tiles.len());
                for tile in tiles {
                    let texture = textures.load_texture(&resolve_relative(path, &tile.image))?;
                    let declared = (tile.width, tile.height);
                    if declared != (0, 0) && declared != (texture.width, texture.height) {
                        warn!(
                            "Tile {} of {} is {}x{}, tileset says {}x{}",
                            tile.id,
                            path.display(),
                            texture.width,
                            texture.height,
                            tile.width,
                            tile.height
                        );
                    }
                    images.insert(tile.id, texture);
                }
                Ok(Self::PerTileImages { first_gid, images })
            }
        }
    }

    pub fn first_gid(&self) -> u32 {
        match self {
            Self::UniformGrid { first_gid, .. } | Self::PerTileImages { first_gid, .. } => {
                *first_gid
            }
        }
    }

    pub fn tile_count(&self) -> u32 {
        match self {
            Self::UniformGrid { tile_count, .. } => *tile_count,
            Self::PerTileImages { images, .. } => images.len() as u32,
        }
    }

    /// Texture region for `gid`, or `None` if this tileset does not own it
    pub fn sprite(&self, gid: u32) -> Option<TileSprite> {
        let local = gid.checked_sub(self.first_gid())?;

        match self {
            Self::UniformGrid {
                texture,
                sheet,
                tile_count,
                ..
            } => (local < *tile_count).then(|| TileSprite {
                texture: texture.handle,
                source: sheet.rect_for(local),
            }),
            Self::PerTileImages { images, .. } => images.get(&local).map(|texture| TileSprite {
                texture: texture.handle,
                source: Rect::new(0.0, 0.0, texture.width as f32, texture.height as f32),
            }),
        }
    }
}

/// All tilesets of a map, ordered by first gid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tilesets {
    sets: Vec<Tileset>,
}

impl Tilesets {
    pub fn new(mut sets: Vec<Tileset>) -> Self {
        sets.sort_by_key(Tileset::first_gid);
        Self { sets }
    }

    /// Resolve every tileset a map references
    pub fn load(
        map: &TileMap,
        map_path: &Path,
        loader: &AssetLoader,
        textures: &mut impl TextureLoader,
    ) -> Result<Self, LoadError> {
        let sets = map
            .tilesets
            .iter()
            .map(|reference| Tileset::resolve(reference, map_path, loader, textures))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(sets))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Texture region for `gid`, looked up in the tileset that owns it.
    ///
    /// The owner is the tileset with the greatest first gid not above `gid`.
    pub fn sprite(&self, gid: u32) -> Option<TileSprite> {
        if gid == 0 {
            return None;
        }
        let owners = self.sets.partition_point(|set| set.first_gid() <= gid);
        self.sets[..owners].last()?.sprite(gid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::testing::FakeTextureLoader;
    use std::fs;
    use tempfile::TempDir;
    use std::path::PathBuf;

    fn describe(json: &str) -> Result<TilesetDescription, LoadError> {
        let file: TilesetFile = serde_json::from_str(json).expect("fixture is valid JSON");
        TilesetDescription::classify(file, Path::new("maps/Tileset.json"))
    }

    #[test]
    fn test_image_field_means_grid() {
        let description = describe(r#"{ "image": "../tiles.png", "tilewidth": 16 }"#).unwrap();
        assert_eq!(
            description,
            TilesetDescription::UniformGrid {
                image: "../tiles.png".to_string(),
                columns: DEFAULT_SHEET_COLUMNS,
                tile_size: 16,
            }
        );
    }

    #[test]
    fn test_grid_uses_recorded_columns() {
        let description = describe(r#"{ "image": "tiles.png", "columns": 8 }"#).unwrap();
        assert!(matches!(
            description,
            TilesetDescription::UniformGrid { columns: 8, .. }
        ));
    }

    #[test]
    fn test_tiles_list_means_images() {
        let description = describe(
            r#"{ "tiles": [
                { "id": 0, "image": "../buildings/house.png", "imagewidth": 64, "imageheight": 80 },
                { "id": 3, "image": "../buildings/tower.png", "imagewidth": 32, "imageheight": 96 }
            ] }"#,
        )
        .unwrap();

        match description {
            TilesetDescription::PerTileImages { tiles } => {
                assert_eq!(tiles.len(), 2);
                assert_eq!(tiles[1].id, 3);
                assert_eq!(tiles[1].height, 96);
            }
            other => panic!("expected PerTileImages, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_kind_wins() {
        let result = describe(r#"{ "kind": "images", "image": "tiles.png", "tiles": [] }"#);
        assert!(matches!(result, Err(LoadError::InvalidTileset { .. })));

        let description =
            describe(r#"{ "kind": "grid", "image": "tiles.png", "tiles": [ { "id": 0 } ] }"#)
                .unwrap();
        assert!(matches!(description, TilesetDescription::UniformGrid { .. }));
    }

    #[test]
    fn test_undecidable_description_is_rejected() {
        assert!(matches!(
            describe(r#"{ "name": "mystery" }"#),
            Err(LoadError::InvalidTileset { .. })
        ));
    }

    #[test]
    fn test_tile_without_image_is_rejected() {
        let result = describe(r#"{ "kind": "images", "tiles": [ { "id": 0 } ] }"#);
        assert!(matches!(result, Err(LoadError::InvalidTileset { .. })));
    }

    #[test]
    fn test_grid_sprite_offsets_by_first_gid() {
        let mut textures = FakeTextureLoader::new().with_size("assets/tiles.png", 352, 64);
        let tileset = Tileset::from_description(
            TilesetDescription::UniformGrid {
                image: "../tiles.png".to_string(),
                columns: 22,
                tile_size: 16,
            },
            1,
            Path::new("assets/maps/Tileset.json"),
            &mut textures,
        )
        .unwrap();

        assert_eq!(textures.loaded, vec![PathBuf::from("assets/tiles.png")]);
        assert_eq!(tileset.tile_count(), 88);

        let sprite = tileset.sprite(24).unwrap();
        assert_eq!(sprite.source, Rect::new(16.0, 16.0, 32.0, 32.0));
        assert!(tileset.sprite(0).is_none());
        assert!(tileset.sprite(89).is_none());
    }

    #[test]
    fn test_per_tile_sprite_uses_whole_image() {
        let mut textures = FakeTextureLoader::new()
            .with_size("assets/buildings/house.png", 64, 80)
            .with_size("assets/buildings/tower.png", 32, 96);
        let tileset = Tileset::from_description(
            TilesetDescription::PerTileImages {
                tiles: vec![
                    TileImageEntry {
                        id: 0,
                        image: "../buildings/house.png".to_string(),
                        width: 64,
                        height: 80,
                    },
                    TileImageEntry {
                        id: 3,
                        image: "..\\buildings\\tower.png".to_string(),
                        width: 32,
                        height: 96,
                    },
                ],
            },
            485,
            Path::new("assets/maps/buildings.json"),
            &mut textures,
        )
        .unwrap();

        assert_eq!(
            tileset.sprite(488).unwrap().source,
            Rect::new(0.0, 0.0, 32.0, 96.0)
        );
        assert_eq!(
            tileset.sprite(485).unwrap().source,
            Rect::new(0.0, 0.0, 64.0, 80.0)
        );
        assert!(tileset.sprite(486).is_none());
    }

    #[test]
    fn test_missing_image_fails() {
        let mut textures = FakeTextureLoader::new().with_missing("assets/tiles.png");
        let result = Tileset::from_description(
            TilesetDescription::UniformGrid {
                image: "../tiles.png".to_string(),
                columns: 22,
                tile_size: 16,
            },
            1,
            Path::new("assets/maps/Tileset.json"),
            &mut textures,
        );
        assert!(matches!(result, Err(LoadError::Image { .. })));
    }

    #[test]
    fn test_resolve_reads_file_relative_to_map() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let maps = dir.join("maps");
        fs::create_dir_all(&maps).unwrap();
        fs::write(
            maps.join("Tileset.json"),
            r#"{ "image": "../images/tiles.png", "tilewidth": 16, "columns": 4 }"#,
        )
        .unwrap();

        let mut textures = FakeTextureLoader::new().with_size(dir.join("images/tiles.png"), 64, 64);
        let reference = TilesetRef {
            source: "Tileset.json".to_string(),
            first_gid: 1,
        };
        let tileset = Tileset::resolve(
            &reference,
            &maps.join("maps.json"),
            &AssetLoader::new(dir),
            &mut textures,
        )
        .unwrap();

        assert_eq!(tileset.tile_count(), 16);
        assert_eq!(textures.loaded, vec![dir.join("images/tiles.png")]);
    }

    #[test]
    fn test_resolve_missing_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let reference = TilesetRef {
            source: "missing.json".to_string(),
            first_gid: 1,
        };
        let result = Tileset::resolve(
            &reference,
            &dir.join("maps.json"),
            &AssetLoader::new(dir),
            &mut FakeTextureLoader::new(),
        );
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_tilesets_pick_owner_by_first_gid() {
        let mut textures = FakeTextureLoader::new()
            .with_size("assets/a.png", 32, 16)
            .with_size("assets/b.png", 32, 16);
        let grid = |image: &str, first_gid, textures: &mut FakeTextureLoader| {
            Tileset::from_description(
                TilesetDescription::UniformGrid {
                    image: image.to_string(),
                    columns: 2,
                    tile_size: 16,
                },
                first_gid,
                Path::new("assets/map.json"),
                textures,
            )
            .unwrap()
        };
        let b = grid("b.png", 3, &mut textures);
        let a = grid("a.png", 1, &mut textures);
        let tilesets = Tilesets::new(vec![b, a]);

        let a_handle = textures_handle("assets/a.png");
        let b_handle = textures_handle("assets/b.png");

        assert!(tilesets.sprite(0).is_none());
        assert_eq!(tilesets.sprite(2).unwrap().texture, a_handle);
        assert_eq!(tilesets.sprite(3).unwrap().texture, b_handle);
        assert_eq!(
            tilesets.sprite(4).unwrap().source,
            Rect::new(16.0, 0.0, 32.0, 16.0)
        );
        assert!(tilesets.sprite(5).is_none(), "past the last tile of b");
    }

    fn textures_handle(path: &str) -> TextureHandle {
        use crate::engine::assets::{AssetHandle, AssetId};
        AssetHandle::new(AssetId::from_path(Path::new(path)))
    }
}
