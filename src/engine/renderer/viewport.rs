// Logical-resolution viewport for pixel-art rendering

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

/// Maps a fixed logical screen onto whatever size the window happens to be
///
/// Game code always draws in logical pixels with the origin at the top-left.
/// The logical screen is scaled by a whole number when the window is big
/// enough, then centered with letterbox bars.
#[derive(Debug, Clone)]
pub struct Viewport {
    logical_size: Vec2,
    window_size: Vec2,
    view_proj: Mat4,
}

impl Viewport {
    /// Create a new viewport
    pub fn new(
        logical_width: f32,
        logical_height: f32,
        window_width: f32,
        window_height: f32,
    ) -> Self {
        Self {
            logical_size: Vec2::new(logical_width, logical_height),
            window_size: Vec2::new(window_width, window_height),
            view_proj: Mat4::orthographic_rh(0.0, logical_width, logical_height, 0.0, -1.0, 1.0),
        }
    }

    /// Resize the window the viewport is presented in
    pub fn resize(&mut self, width: f32, height: f32) {
        self.window_size = Vec2::new(width, height);
    }

    /// Get the view-projection matrix
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.view_proj
    }

    /// Scale from logical to physical pixels
    pub fn scale(&self) -> f32 {
        let ratio = self.window_size / self.logical_size;
        let scale = ratio.x.min(ratio.y);
        if scale >= 1.0 {
            scale.floor()
        } else {
            scale
        }
    }

    /// Physical-pixel rectangle `(x, y, width, height)` the logical screen occupies
    pub fn presentation_rect(&self) -> (f32, f32, f32, f32) {
        let size = self.logical_size * self.scale();
        let offset = ((self.window_size - size) * 0.5).max(Vec2::ZERO);
        (offset.x, offset.y, size.x, size.y)
    }
}

/// View uniform for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ViewUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl ViewUniform {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            view_proj: viewport.view_proj_matrix().to_cols_array_2d(),
        }
    }
}
