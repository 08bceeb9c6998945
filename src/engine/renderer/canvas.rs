// Drawing boundary between game code and the GPU backend

use crate::core::Rect;
use crate::engine::assets::TextureHandle;
use glam::{Vec2, Vec4};

/// One textured quad in logical screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub texture: TextureHandle,
    /// Region of the texture to sample, in texels
    pub source: Rect,
    /// Top-left corner on screen
    pub dest: Vec2,
    pub size: Vec2,
    /// Mirror horizontally
    pub flip_x: bool,
}

/// Anything game code can draw into
pub trait Canvas {
    fn draw_sprite(&mut self, sprite: SpriteDraw);

    /// Fill a screen rectangle with a solid RGBA color
    fn fill_rect(&mut self, rect: Rect, color: Vec4);

    /// Outline a rectangle with lines `thickness` pixels wide, drawn inside it
    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Vec4) {
        let t = thickness.min(rect.width() / 2.0).min(rect.height() / 2.0);
        let Rect { min, max } = rect;

        self.fill_rect(Rect::new(min.x, min.y, max.x, min.y + t), color);
        self.fill_rect(Rect::new(min.x, max.y - t, max.x, max.y), color);
        self.fill_rect(Rect::new(min.x, min.y + t, min.x + t, max.y - t), color);
        self.fill_rect(Rect::new(max.x - t, min.y + t, max.x, max.y - t), color);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingCanvas;
    use super::*;

    #[test]
    fn test_stroke_rect_draws_four_edges_inside() {
        let mut canvas = RecordingCanvas::default();
        let rect = Rect::new(10.0, 20.0, 30.0, 30.0);
        canvas.stroke_rect(rect, 1.0, Vec4::ONE);

        assert_eq!(canvas.fills.len(), 4);
        for (edge, _) in &canvas.fills {
            assert!(edge.min.x >= rect.min.x && edge.max.x <= rect.max.x);
            assert!(edge.min.y >= rect.min.y && edge.max.y <= rect.max.y);
        }
        assert_eq!(canvas.fills[0].0, Rect::new(10.0, 20.0, 30.0, 21.0));
        assert_eq!(canvas.fills[3].0, Rect::new(29.0, 21.0, 30.0, 29.0));
    }
}
