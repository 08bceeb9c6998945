// Player animation system

use super::state::PlayerState;
use crate::core::Rect;
use crate::engine::assets::{AssetLoader, LoadError, TextureHandle, TextureLoader};
use crate::game::config::SheetConfig;
use crate::game::tilemap::TileSheetIndexer;
use log::debug;
use std::collections::HashMap;

/// Frame cursor stepping over `first..=last` at a fixed tick rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationClip {
    first_frame: u32,
    last_frame: u32,
    step: u32,
    ticks_per_frame: u32,
    /// Ticks left before the next frame change
    counter: u32,
    current_frame: u32,
}

impl AnimationClip {
    /// Create a clip positioned on its first frame
    ///
    /// A `ticks_per_frame` of zero is treated as one.
    pub fn new(first_frame: u32, last_frame: u32, step: u32, ticks_per_frame: u32) -> Self {
        let ticks_per_frame = ticks_per_frame.max(1);
        Self {
            first_frame,
            last_frame,
            step,
            ticks_per_frame,
            counter: ticks_per_frame - 1,
            current_frame: first_frame,
        }
    }

    pub fn from_sheet(sheet: &SheetConfig) -> Self {
        Self::new(
            sheet.first_frame,
            sheet.last_frame,
            sheet.step,
            sheet.ticks_per_frame,
        )
    }

    /// Count one tick; every `ticks_per_frame` ticks the frame moves on by `step`,
    /// wrapping to the first frame past the last
    pub fn advance(&mut self) {
        if self.counter > 0 {
            self.counter -= 1;
            return;
        }

        self.counter = self.ticks_per_frame - 1;
        self.current_frame += self.step;
        if self.current_frame > self.last_frame {
            self.current_frame = self.first_frame;
        }
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Rewind to the first frame
    pub fn reset(&mut self) {
        self.counter = self.ticks_per_frame - 1;
        self.current_frame = self.first_frame;
    }
}

/// A clip bound to the sheet image its frames are cut from
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimation {
    pub clip: AnimationClip,
    pub sheet: TileSheetIndexer,
    pub texture: TextureHandle,
}

impl SpriteAnimation {
    /// Load the sheet image and build a clip over it
    pub fn load(
        sheet: &SheetConfig,
        loader: &AssetLoader,
        textures: &mut impl TextureLoader,
    ) -> Result<Self, LoadError> {
        let path = loader.resolve(sheet.path);
        let texture = textures.load_texture(&path)?;
        debug!(
            "Loaded sprite sheet {} ({} frames)",
            path.display(),
            sheet.last_frame.saturating_sub(sheet.first_frame) + 1
        );

        Ok(Self {
            clip: AnimationClip::from_sheet(sheet),
            sheet: TileSheetIndexer::new(sheet.tiles_per_row, sheet.frame_size),
            texture: texture.handle,
        })
    }

    /// Region of the sheet showing the current frame
    pub fn source_rect(&self) -> Rect {
        self.sheet.rect_for(self.clip.current_frame())
    }
}

/// Picks and advances the animation for the player's movement state
#[derive(Debug, Default)]
pub struct AnimationPlayer {
    animations: HashMap<PlayerState, SpriteAnimation>,
    current_state: PlayerState,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one animation per configured state
    pub fn load(
        sheets: &[(PlayerState, SheetConfig)],
        loader: &AssetLoader,
        textures: &mut impl TextureLoader,
    ) -> Result<Self, LoadError> {
        let mut player = Self::new();
        for (state, sheet) in sheets {
            player.add_animation(*state, SpriteAnimation::load(sheet, loader, textures)?);
        }
        Ok(player)
    }

    pub fn add_animation(&mut self, state: PlayerState, animation: SpriteAnimation) {
        self.animations.insert(state, animation);
    }

    /// Switch to the animation for `state`; entering a new state rewinds its clip
    pub fn play(&mut self, state: PlayerState) {
        if self.current_state == state {
            return;
        }
        self.current_state = state;
        if let Some(animation) = self.animations.get_mut(&state) {
            animation.clip.reset();
        }
    }

    /// Advance the active clip by one tick
    pub fn advance(&mut self) {
        if let Some(animation) = self.animations.get_mut(&self.current_state) {
            animation.clip.advance();
        }
    }

    pub fn current_state(&self) -> PlayerState {
        self.current_state
    }

    /// Animation to draw, if the current state has one
    pub fn active(&self) -> Option<&SpriteAnimation> {
        self.animations.get(&self.current_state)
    }
}
