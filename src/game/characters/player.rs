// The player: body, movement rules and animation state

use super::animation::AnimationPlayer;
use super::state::{PlayerState, PlayerStateMachine};
use super::stats::PlayerStats;
use crate::core::Rect;
use crate::engine::input::{Action, InputState};
use crate::engine::physics::{resolve_horizontal, resolve_vertical, KinematicBody};
use glam::Vec2;
use log::debug;

/// The single player-controlled character
#[derive(Debug)]
pub struct Player {
    pub body: KinematicBody,
    pub stats: PlayerStats,
    pub health: i32,
    /// Facing left; the sprite is mirrored
    pub flip: bool,
    pub state_machine: PlayerStateMachine,
    pub animation: AnimationPlayer,
}

impl Player {
    /// Create a player with its collision box's top-left corner at `spawn`
    pub fn new(spawn: Vec2, stats: PlayerStats, animation: AnimationPlayer) -> Self {
        Self {
            body: KinematicBody::new(spawn, Vec2::splat(stats.body_size)),
            health: stats.max_health,
            stats,
            flip: false,
            state_machine: PlayerStateMachine::new(),
            animation,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state_machine.state()
    }

    /// Run one simulation tick of movement against the static colliders.
    ///
    /// X moves and resolves before Y. A body falling diagonally into the top
    /// corner of a ledge is pushed out sideways against the ledge's wall and
    /// keeps falling instead of landing on the corner.
    pub fn update_movement(
        &mut self,
        input: &impl InputState,
        colliders: &[Rect],
        gravity: f32,
        dt: f32,
    ) {
        self.state_machine.tick();

        // Horizontal
        let left = input.is_pressed(Action::MoveLeft);
        let right = input.is_pressed(Action::MoveRight);
        self.body.velocity.x = if right {
            self.stats.run_speed
        } else if left {
            -self.stats.run_speed
        } else {
            0.0
        };
        if right {
            self.flip = false;
        } else if left {
            self.flip = true;
        }

        self.body.integrate_horizontal();
        resolve_horizontal(&mut self.body, colliders);

        // Vertical
        if input.just_pressed(Action::Jump) && self.body.grounded && self.state_machine.try_jump()
        {
            self.body.velocity.y = self.stats.jump_impulse;
        }
        self.body.apply_gravity(gravity, dt, self.stats.max_fall_speed);
        self.body.integrate_vertical(dt);
        resolve_vertical(&mut self.body, colliders);

        self.state_machine.settle(self.body.grounded, left || right, self.body.velocity.y);
        if self.state_machine.state_just_changed() {
            debug!(
                "Player {:?} -> {:?}",
                self.state_machine.previous_state(),
                self.state_machine.state()
            );
        }
        self.animation.play(self.state_machine.state());
    }

    /// Advance the animation of the current state by one tick
    pub fn update_animation(&mut self) {
        self.animation.advance();
    }
}
