// Asset loading functionality

use super::LoadError;
use serde::de::DeserializeOwned;
use std::path::{Component, Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Map,
    Tileset,
    Texture,
}

impl AssetType {
    /// Get supported file extensions for this asset type
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetType::Map | AssetType::Tileset => &["json"],
            AssetType::Texture => &["png", "jpg", "jpeg"],
        }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                self.extensions().contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}

/// Asset loader responsible for finding and reading asset files
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset named relative to the asset root
    pub fn resolve(&self, name: &str) -> PathBuf {
        normalize(&self.base_path.join(name.replace('\\', "/")))
    }

    /// Read a text asset from disk
    pub fn read_to_string(&self, path: &Path) -> Result<String, LoadError> {
        std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and deserialize a JSON asset, checking its extension first
    pub fn read_json<T: DeserializeOwned>(
        &self,
        asset_type: AssetType,
        path: &Path,
    ) -> Result<T, LoadError> {
        if !asset_type.accepts(path) {
            return Err(LoadError::UnsupportedFormat(path.to_path_buf()));
        }

        let text = self.read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Resolve a path written inside an asset file against that file's directory.
///
/// Editors on Windows write `\` separators and relative hops like
/// `../tiles/grass.png`; both are folded so the result is a clean path.
pub fn resolve_relative(referrer: &Path, reference: &str) -> PathBuf {
    let reference = reference.replace('\\', "/");
    let reference = Path::new(&reference);

    if reference.is_absolute() {
        return normalize(reference);
    }

    let dir = referrer.parent().unwrap_or_else(|| Path::new(""));
    normalize(&dir.join(reference))
}

/// Fold `.` and `..` components without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize)]
    struct Sample {
        value: u32,
    }

    #[test]
    fn test_asset_type_extensions() {
        assert!(AssetType::Texture.extensions().contains(&"png"));
        assert!(AssetType::Map.extensions().contains(&"json"));
        assert!(AssetType::Tileset.accepts(Path::new("tiles/Tileset.JSON")));
        assert!(!AssetType::Map.accepts(Path::new("maps/level.tmx")));
    }

    #[test]
    fn test_loader_path_resolution() {
        let loader = AssetLoader::new("/game/assets");
        let path = loader.resolve("maps/maps.json");

        assert_eq!(path, PathBuf::from("/game/assets/maps/maps.json"));
    }

    #[test]
    fn test_resolve_relative_folds_parent_dirs() {
        let map = Path::new("assets/maps/maps.json");
        let path = resolve_relative(map, "../tilesets/Tileset.json");

        assert_eq!(path, PathBuf::from("assets/tilesets/Tileset.json"));
    }

    #[test]
    fn test_resolve_relative_normalizes_backslashes() {
        let tileset = Path::new("assets/tilesets/Objects.json");
        let path = resolve_relative(tileset, "..\\images\\tree.png");

        assert_eq!(path, PathBuf::from("assets/images/tree.png"));
    }

    #[test]
    fn test_resolve_relative_keeps_leading_parent_dirs() {
        let path = resolve_relative(Path::new("maps.json"), "../shared/tiles.png");
        assert_eq!(path, PathBuf::from("../shared/tiles.png"));
    }

    #[test]
    fn test_read_json() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let path = dir.join("sample.json");
        fs::write(&path, r#"{ "value": 7, "ignored": true }"#).unwrap();

        let loader = AssetLoader::new(dir);
        let sample: Sample = loader.read_json(AssetType::Map, &path).unwrap();
        assert_eq!(sample.value, 7);
    }

    #[test]
    fn test_read_json_missing_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let loader = AssetLoader::new(dir);
        let result: Result<Sample, _> = loader.read_json(AssetType::Map, &dir.join("nope.json"));

        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_read_json_malformed() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let path = dir.join("broken.json");
        fs::write(&path, "{ \"value\": ").unwrap();

        let loader = AssetLoader::new(dir);
        let result: Result<Sample, _> = loader.read_json(AssetType::Map, &path);
        assert!(matches!(result, Err(LoadError::Json { .. })));
    }

    #[test]
    fn test_read_json_rejects_other_formats() {
        let loader = AssetLoader::new(".");
        let result: Result<Sample, _> = loader.read_json(AssetType::Map, Path::new("level.tmx"));

        assert!(matches!(result, Err(LoadError::UnsupportedFormat(_))));
    }
}
