// Type-safe asset handle system

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::path::Path;

/// Stable identifier for an asset, derived from its resolved path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(u64);

impl AssetId {
    pub fn from_path(path: &Path) -> Self {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Identifier for assets that are generated in memory rather than read from disk
    pub fn builtin(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        "builtin:".hash(&mut hasher);
        name.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Type-safe handle to a loaded asset
///
/// The `T` parameter ensures handles can only be used with the correct asset type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle<T> {
    id: AssetId,
    _phantom: PhantomData<T>,
}

impl<T> AssetHandle<T> {
    pub(crate) fn new(id: AssetId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }
}

/// Marker for image assets uploaded as textures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureAsset;

pub type TextureHandle = AssetHandle<TextureAsset>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_from_path() {
        let id1 = AssetId::from_path(Path::new("assets/ninja/Run32x32.png"));
        let id2 = AssetId::from_path(Path::new("assets/ninja/Run32x32.png"));
        let id3 = AssetId::from_path(Path::new("assets/ninja/Jump32x32.png"));

        assert_eq!(id1, id2, "Same paths should produce same IDs");
        assert_ne!(id1, id3, "Different paths should produce different IDs");
    }

    #[test]
    fn test_builtin_ids_do_not_collide_with_paths() {
        assert_ne!(
            AssetId::builtin("white"),
            AssetId::from_path(Path::new("white"))
        );
    }

    #[test]
    fn test_handles_compare_by_id() {
        let id = AssetId::from_path(Path::new("tiles.png"));
        let a: TextureHandle = AssetHandle::new(id);
        let b: TextureHandle = AssetHandle::new(id);
        assert_eq!(a, b);
        assert_eq!(a.id(), id);
    }
}
