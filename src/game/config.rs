// World configuration - screen, physics constants and asset locations

use crate::engine::game_loop::FIXED_TIMESTEP;
use crate::game::characters::PlayerState;
use glam::Vec2;

/// Default directory asset paths are resolved against
pub const DEFAULT_ASSET_ROOT: &str = "assets";

/// One animation strip inside a sprite sheet image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetConfig {
    /// Image path relative to the asset root
    pub path: &'static str,
    pub tiles_per_row: u32,
    /// Square frame size in pixels
    pub frame_size: u32,
    pub first_frame: u32,
    pub last_frame: u32,
    pub step: u32,
    pub ticks_per_frame: u32,
}

const IDLE_SHEET: SheetConfig = SheetConfig {
    path: "ninja/Idle32x32.png",
    tiles_per_row: 11,
    frame_size: 32,
    first_frame: 0,
    last_frame: 10,
    step: 1,
    ticks_per_frame: 5,
};

const RUN_SHEET: SheetConfig = SheetConfig {
    path: "ninja/Run32x32.png",
    tiles_per_row: 12,
    frame_size: 32,
    first_frame: 0,
    last_frame: 11,
    step: 1,
    ticks_per_frame: 5,
};

const JUMP_SHEET: SheetConfig = SheetConfig {
    path: "ninja/Jump32x32.png",
    tiles_per_row: 1,
    frame_size: 32,
    first_frame: 0,
    last_frame: 0,
    step: 1,
    ticks_per_frame: 5,
};

/// Everything the world needs that is not read from the map file
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    // Screen (logical pixels)
    pub screen_width: u32,
    pub screen_height: u32,
    pub window_width: u32,
    pub window_height: u32,

    // Simulation
    pub tile_size: u32,
    /// Downward acceleration in pixels/second²
    pub gravity: f32,
    /// Tick length in seconds
    pub dt: f32,

    // Level
    /// Map path relative to the asset root
    pub map_path: &'static str,
    pub spawn: Vec2,

    /// Sprite sheet per movement state; states without an entry draw nothing
    pub animations: &'static [(PlayerState, SheetConfig)],
}

/// The standard world setup
pub const BASE_WORLD: WorldConfig = WorldConfig {
    screen_width: 320,
    screen_height: 240,
    window_width: 640,
    window_height: 480,

    tile_size: 16,
    gravity: 800.0,
    dt: FIXED_TIMESTEP,

    map_path: "maps/maps.json",
    spawn: Vec2::new(30.0, 180.0),

    // Falling reuses the jump frame
    animations: &[
        (PlayerState::Idle, IDLE_SHEET),
        (PlayerState::Running, RUN_SHEET),
        (PlayerState::Jumping, JUMP_SHEET),
        (PlayerState::Falling, JUMP_SHEET),
    ],
};

impl Default for WorldConfig {
    fn default() -> Self {
        BASE_WORLD
    }
}

impl WorldConfig {
    pub fn standard() -> Self {
        BASE_WORLD
    }

    /// Logical screen size as a vector
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width as f32, self.screen_height as f32)
    }
}
