// Asset loading system
//
// Resolves asset paths, reads and parses asset files, and defines the texture
// service the game uses to turn image paths into GPU handles.

mod handle;
mod loader;

pub use handle::{AssetHandle, AssetId, TextureHandle};
pub use loader::{resolve_relative, AssetLoader, AssetType};

use std::path::{Path, PathBuf};

/// Errors raised while loading maps, tilesets and images.
///
/// Every variant is fatal at startup; nothing in the frame loop produces one.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to load image {}: {reason}", .path.display())]
    Image { path: PathBuf, reason: String },

    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid map: {0}")]
    InvalidMap(String),

    #[error("Invalid tileset {}: {reason}", .path.display())]
    InvalidTileset { path: PathBuf, reason: String },
}

/// A texture that has been uploaded and can be referenced by draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
}

/// Service that turns an image file into a drawable texture.
///
/// The renderer implements this for real GPU textures; loading code only ever
/// sees the trait so it can run without a window.
pub trait TextureLoader {
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo, LoadError>;
}
