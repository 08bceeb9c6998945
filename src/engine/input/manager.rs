// Input manager - translates window events into action state

use super::action::InputSource;
use super::config::InputConfig;
use super::state::ActionState;
use super::Action;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Owns the key bindings and the resulting action state
#[derive(Debug, Default)]
pub struct InputManager {
    config: InputConfig,
    state: ActionState,
}

impl InputManager {
    /// Create an input manager with the given bindings
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            state: ActionState::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.handle_key(InputSource::key(key_code), event.state, event.repeat);
        }
    }

    fn handle_key(&mut self, source: InputSource, state: ElementState, repeat: bool) {
        let Some(action) = self.config.get_action(source) else {
            return;
        };

        match state {
            // Key repeats would otherwise look like fresh jump presses
            ElementState::Pressed if !repeat => self.state.press(action),
            ElementState::Pressed => {}
            ElementState::Released => self.state.release(action),
        }
    }

    /// Current action state, as seen by the simulation
    pub fn state(&self) -> &ActionState {
        &self.state
    }

    /// Consume a press edge for actions handled outside the simulation tick
    pub fn take_just_pressed(&mut self, action: Action) -> bool {
        self.state.take_just_pressed(action)
    }

    /// Call once after every simulation tick
    pub fn end_tick(&mut self) {
        self.state.end_tick();
    }

    /// Forget all held keys, e.g. when the window loses focus
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Get the key bindings
    pub fn config(&self) -> &InputConfig {
        &self.config
    }
}
