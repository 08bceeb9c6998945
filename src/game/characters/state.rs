// Player movement state machine

/// Movement state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    /// Standing still on ground
    #[default]
    Idle,
    /// Moving horizontally on ground
    Running,
    /// In the air, moving upward
    Jumping,
    /// In the air, moving downward
    Falling,
}

impl PlayerState {
    /// Check if the player is on the ground
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Idle | Self::Running)
    }

    /// Jumping is only allowed with both feet on the ground
    pub fn can_jump(&self) -> bool {
        self.is_grounded()
    }
}

/// State machine that handles player state transitions
#[derive(Debug)]
pub struct PlayerStateMachine {
    current_state: PlayerState,
    previous_state: PlayerState,
    /// Ticks spent in the current state
    state_ticks: u32,
}

impl Default for PlayerStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: PlayerState::Idle,
            previous_state: PlayerState::Idle,
            state_ticks: 0,
        }
    }

    /// Get the current state
    pub fn state(&self) -> PlayerState {
        self.current_state
    }

    /// Get the previous state
    pub fn previous_state(&self) -> PlayerState {
        self.previous_state
    }

    pub fn state_ticks(&self) -> u32 {
        self.state_ticks
    }

    /// Check if the state changed during the last tick
    pub fn state_just_changed(&self) -> bool {
        self.state_ticks == 0
    }

    /// Transition to a new state
    pub fn transition(&mut self, new_state: PlayerState) {
        if self.current_state != new_state {
            self.previous_state = self.current_state;
            self.current_state = new_state;
            self.state_ticks = 0;
        }
    }

    /// Enter `Jumping` if the current state allows it
    pub fn try_jump(&mut self) -> bool {
        if self.current_state.can_jump() {
            self.transition(PlayerState::Jumping);
            true
        } else {
            false
        }
    }

    /// Start a simulation tick
    pub fn tick(&mut self) {
        self.state_ticks = self.state_ticks.saturating_add(1);
    }

    /// Pick the state that matches the outcome of this tick's movement
    ///
    /// `velocity_y` is positive when moving down.
    pub fn settle(&mut self, on_ground: bool, moving: bool, velocity_y: f32) {
        if on_ground {
            self.transition(if moving {
                PlayerState::Running
            } else {
                PlayerState::Idle
            });
        } else {
            match self.current_state {
                PlayerState::Jumping if velocity_y >= 0.0 => {
                    self.transition(PlayerState::Falling);
                }
                // Walked off ledge
                PlayerState::Idle | PlayerState::Running => {
                    self.transition(PlayerState::Falling);
                }
                _ => {}
            }
        }
    }
}
