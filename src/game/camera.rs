// Scrolling camera that keeps the player in view

use crate::core::math::{centered, clamp};
use glam::Vec2;

/// Screen-space offset added to every world position when drawing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the target at the center of the viewport
    pub fn follow_target(
        &mut self,
        target_x: f32,
        target_y: f32,
        viewport_w: f32,
        viewport_h: f32,
    ) {
        self.x = viewport_w / 2.0 - target_x;
        self.y = viewport_h / 2.0 - target_y;
    }

    /// Keep the viewport inside the map.
    ///
    /// On an axis where the map is smaller than the viewport the map is centered
    /// instead. Depends only on its inputs and the current offset, so calling it
    /// twice changes nothing.
    pub fn constrain(&mut self, map_w: f32, map_h: f32, viewport_w: f32, viewport_h: f32) {
        self.x = constrain_axis(self.x, map_w, viewport_w);
        self.y = constrain_axis(self.y, map_h, viewport_h);
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Convert a world position to screen pixels
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world + self.offset()
    }
}

fn constrain_axis(offset: f32, map: f32, viewport: f32) -> f32 {
    if map < viewport {
        centered(viewport, map)
    } else {
        clamp(offset, viewport - map, 0.0)
    }
}
