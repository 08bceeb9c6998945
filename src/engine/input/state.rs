// Per-tick action state

use super::action::Action;
use super::InputState;
use std::collections::HashSet;

/// Pressed and edge state for every action
///
/// Press edges survive until `end_tick`, so a press that arrives on a frame
/// with no simulation tick is still seen by the next one.
#[derive(Debug, Default)]
pub struct ActionState {
    pressed: HashSet<Action>,
    just_pressed: HashSet<Action>,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        self.pressed.remove(&action);
    }

    /// Consume a press edge, returning whether there was one
    pub fn take_just_pressed(&mut self, action: Action) -> bool {
        self.just_pressed.remove(&action)
    }

    /// Clear edge state after a simulation tick has consumed it
    pub fn end_tick(&mut self) {
        self.just_pressed.clear();
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
    }
}

impl InputState for ActionState {
    fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }
}
