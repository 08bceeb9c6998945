// Character system
//
// Everything related to the playable character:
// - Player body and movement rules
// - Stats and tuning
// - Movement state machine
// - Sprite-sheet animation per state

pub mod animation;
pub mod player;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use animation::AnimationPlayer;
pub use player::Player;
pub use state::PlayerState;
pub use stats::PlayerStats;
