// Player stats - movement tuning and body dimensions

/// Movement and health constants for the player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    // Movement
    /// Horizontal speed in pixels per tick
    pub run_speed: f32,
    /// Vertical velocity set when jumping (pixels/second, negative is up)
    pub jump_impulse: f32,
    /// Fastest downward speed gravity can reach (pixels/second)
    pub max_fall_speed: f32,

    // Combat
    pub max_health: i32,

    // Dimensions (collision box, square)
    pub body_size: f32,
}

/// The standard player tuning
pub const BASE_STATS: PlayerStats = PlayerStats {
    run_speed: 2.0,
    jump_impulse: -300.0,
    max_fall_speed: 300.0,

    max_health: 100,

    // One tile
    body_size: 16.0,
};

impl Default for PlayerStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl PlayerStats {
    /// Get the standard player stats
    pub fn standard() -> Self {
        BASE_STATS
    }
}
