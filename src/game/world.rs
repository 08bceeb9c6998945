// Game world: owns the level and the player, runs ticks and draws frames

use crate::core::Rect;
use crate::engine::assets::{AssetLoader, LoadError, TextureLoader};
use crate::engine::input::InputState;
use crate::engine::renderer::{Canvas, SpriteDraw};
use crate::game::camera::Camera;
use crate::game::characters::{AnimationPlayer, Player, PlayerStats};
use crate::game::config::WorldConfig;
use crate::game::tilemap::{TileMap, Tilesets};
use glam::{Vec2, Vec4};
use log::{info, trace, warn};

const COLLIDER_COLOR: Vec4 = Vec4::new(1.0, 0.2, 0.2, 0.8);
const PLAYER_BOX_COLOR: Vec4 = Vec4::new(0.2, 1.0, 0.2, 0.8);

/// Everything that exists in a running level
#[derive(Debug)]
pub struct World {
    pub map: TileMap,
    pub tilesets: Tilesets,
    /// Static collision rectangles from the map's object layers
    pub colliders: Vec<Rect>,
    pub camera: Camera,
    pub player: Player,
    config: WorldConfig,
    show_colliders: bool,
}

impl World {
    /// Load the map, its tilesets and the player's sprite sheets.
    ///
    /// Any missing or malformed asset fails the whole load.
    pub fn load(
        config: WorldConfig,
        loader: &AssetLoader,
        textures: &mut impl TextureLoader,
    ) -> Result<Self, LoadError> {
        let map_path = loader.resolve(config.map_path);
        let map = TileMap::load(loader, &map_path)?;
        if map.tile_size != config.tile_size {
            warn!(
                "Map {} uses {}px tiles, expected {}px",
                map_path.display(),
                map.tile_size,
                config.tile_size
            );
        }

        let tilesets = Tilesets::load(&map, &map_path, loader, textures)?;
        if tilesets.is_empty() && map.tile_layers().next().is_some() {
            warn!("Map {} has tile layers but no tilesets", map_path.display());
        }
        let colliders = map.colliders();
        let animation = AnimationPlayer::load(config.animations, loader, textures)?;
        let player = Player::new(config.spawn, PlayerStats::standard(), animation);

        info!(
            "Loaded map {}: {} layers, {} tilesets, {} colliders",
            map_path.display(),
            map.layers.len(),
            tilesets.len(),
            colliders.len()
        );

        let mut world = Self {
            map,
            tilesets,
            colliders,
            camera: Camera::new(),
            player,
            config,
            show_colliders: false,
        };
        world.update_camera();
        Ok(world)
    }

    /// Run one simulation tick
    pub fn update(&mut self, input: &impl InputState) {
        self.player.update_movement(
            input,
            &self.colliders,
            self.config.gravity,
            self.config.dt,
        );
        self.update_camera();
        self.player.update_animation();

        trace!(
            "Player {:?} for {} ticks at ({:.1}, {:.1}) velocity ({:.1}, {:.1}), {} hp",
            self.player.state(),
            self.player.state_machine.state_ticks(),
            self.player.body.position.x,
            self.player.body.position.y,
            self.player.body.velocity.x,
            self.player.body.velocity.y,
            self.player.health
        );
    }

    fn update_camera(&mut self) {
        let screen = self.config.screen_size();
        let target = self.player.body.center();
        let map = self.map.pixel_size();

        self.camera.follow_target(target.x, target.y, screen.x, screen.y);
        self.camera.constrain(map.x, map.y, screen.x, screen.y);
    }

    /// Draw the tile layers, then the player, then the collider overlay if enabled
    pub fn draw(&self, canvas: &mut impl Canvas) {
        self.draw_tiles(canvas);
        self.draw_player(canvas);
        if self.show_colliders {
            self.draw_colliders(canvas);
        }
    }

    fn draw_tiles(&self, canvas: &mut impl Canvas) {
        let screen = Rect::from_origin_size(Vec2::ZERO, self.config.screen_size());
        let tile = self.map.tile_size as f32;

        for layer in self.map.tile_layers().filter(|l| l.visible) {
            for (col, row, gid) in layer.tiles() {
                let Some(sprite) = self.tilesets.sprite(gid) else {
                    continue;
                };

                // Tall images stand on their tile's bottom edge
                let size = sprite.source.size();
                let world = Vec2::new(col as f32 * tile, (row + 1) as f32 * tile - size.y);
                let dest = self.camera.world_to_screen(world);
                if !Rect::from_origin_size(dest, size).overlaps(&screen) {
                    continue;
                }

                canvas.draw_sprite(SpriteDraw {
                    texture: sprite.texture,
                    source: sprite.source,
                    dest,
                    size,
                    flip_x: false,
                });
            }
        }
    }

    fn draw_player(&self, canvas: &mut impl Canvas) {
        let Some(animation) = self.player.animation.active() else {
            return;
        };

        // Frame centered on the body, feet on its bottom edge
        let source = animation.source_rect();
        let size = source.size();
        let body = self.player.body.aabb();
        let world = Vec2::new(self.player.body.center().x - size.x / 2.0, body.max.y - size.y);

        canvas.draw_sprite(SpriteDraw {
            texture: animation.texture,
            source,
            dest: self.camera.world_to_screen(world),
            size,
            flip_x: self.player.flip,
        });
    }

    fn draw_colliders(&self, canvas: &mut impl Canvas) {
        let offset = self.camera.offset();
        for collider in &self.colliders {
            canvas.stroke_rect(collider.translate(offset), 1.0, COLLIDER_COLOR);
        }
        canvas.stroke_rect(
            self.player.body.aabb().translate(offset),
            1.0,
            PLAYER_BOX_COLOR,
        );
    }

    /// Show or hide the debug overlay: collider outlines plus the player's box.
    ///
    /// There is no text rendering, so the player's position and velocity are
    /// not printed on screen; they go to the per-tick `trace!` log instead.
    pub fn toggle_collider_overlay(&mut self) {
        self.show_colliders = !self.show_colliders;
        info!(
            "Collider overlay {}",
            if self.show_colliders { "on" } else { "off" }
        );
    }
}
