// Input handling system
//
// ## Architecture
//
// - `action`: Defines game actions and default key bindings
// - `config`: Input configuration and remapping system
// - `state`: Pressed and edge state per action
// - `manager`: Translates winit keyboard events through the bindings
//
// The simulation only sees the `InputState` trait, so it can be driven by a
// scripted state in tests.

pub mod action;
pub mod config;
pub mod manager;
pub mod state;

// Re-export commonly used types
pub use action::Action;
pub use manager::InputManager;
pub use state::ActionState;

/// Read-only view of the input the simulation consumes each tick
pub trait InputState {
    /// Check if an action is currently held
    fn is_pressed(&self, action: Action) -> bool;

    /// Check if an action was pressed since the last tick
    fn just_pressed(&self, action: Action) -> bool;
}
