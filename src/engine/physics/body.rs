use crate::core::Rect;
use glam::Vec2;

/// Axis-aligned box moved directly by game code
///
/// Horizontal velocity is in pixels per tick and applied as-is; vertical
/// velocity is in pixels per second and integrated with the tick length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    /// Top-left corner in world pixels
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    /// Whether the last vertical pass landed the body on a collider
    pub grounded: bool,
}

impl KinematicBody {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            grounded: false,
        }
    }

    /// Current collision box
    pub fn aabb(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Move by the horizontal velocity, one tick's worth
    pub fn integrate_horizontal(&mut self) {
        self.position.x += self.velocity.x;
    }

    /// Accelerate downwards, never exceeding the terminal fall speed
    pub fn apply_gravity(&mut self, gravity: f32, dt: f32, terminal_speed: f32) {
        self.velocity.y = (self.velocity.y + gravity * dt).min(terminal_speed);
    }

    pub fn integrate_vertical(&mut self, dt: f32) {
        self.position.y += self.velocity.y * dt;
    }
}
