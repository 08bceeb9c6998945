// Sheet indexing: linear tile index to source rectangle

use crate::core::Rect;

/// Lays out equally sized tiles left to right, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSheetIndexer {
    pub tiles_per_row: u32,
    pub tile_size: u32,
}

impl TileSheetIndexer {
    pub fn new(tiles_per_row: u32, tile_size: u32) -> Self {
        Self {
            tiles_per_row,
            tile_size,
        }
    }

    /// Source rectangle of the tile at `index`.
    ///
    /// Indices past the end of the image yield rectangles outside it; callers
    /// bound the index when it matters.
    pub fn rect_for(&self, index: u32) -> Rect {
        let per_row = self.tiles_per_row.max(1);
        let col = index % per_row;
        let row = index / per_row;
        let size = self.tile_size as f32;

        Rect::new(
            col as f32 * size,
            row as f32 * size,
            (col + 1) as f32 * size,
            (row + 1) as f32 * size,
        )
    }
}
