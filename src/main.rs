use anyhow::{Context, Result};
use engine::assets::AssetLoader;
use engine::game_loop::GameLoop;
use engine::input::{Action, InputManager};
use engine::renderer::Renderer;
use game::{World, WorldConfig, DEFAULT_ASSET_ROOT};
use log::{debug, error, info, warn};
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

/// Frames between FPS reports in the debug log
const FPS_LOG_INTERVAL: u64 = 600;

fn main() -> Result<()> {
    // Initialize logger; RUST_LOG overrides the default level
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting Tile Runner...");

    let asset_root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ASSET_ROOT.to_string());
    let loader = AssetLoader::new(&asset_root);
    info!("Loading assets from {}", loader.base_path().display());
    let config = WorldConfig::standard();

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Tile Runner")
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window_width,
                config.window_height,
            ))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut renderer = pollster::block_on(Renderer::new(
        window.clone(),
        config.screen_width,
        config.screen_height,
    ))
    .context("Failed to initialize renderer")?;

    let mut world = match World::load(config, &loader, &mut renderer) {
        Ok(world) => world,
        Err(e) => {
            error!("Failed to load level: {}", e);
            return Err(e).context("Failed to load level");
        }
    };

    let mut input = InputManager::default();
    for action in Action::ALL {
        debug!("{:?} bound to {:?}", action, input.config().sources_for(action));
    }
    let mut game_loop = GameLoop::new();

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                input.process_keyboard_event(&event);
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => {
                // Key releases are not delivered while unfocused
                input.reset();
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(physical_size),
                ..
            } => {
                renderer.resize(physical_size);
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                if input.take_just_pressed(Action::Quit) {
                    info!("Quit requested, shutting down...");
                    elwt.exit();
                    return;
                }
                if input.take_just_pressed(Action::ToggleColliders) {
                    world.toggle_collider_overlay();
                }

                for _ in 0..game_loop.begin_frame() {
                    world.update(input.state());
                    input.end_tick();
                }
                if game_loop.frame_count() % FPS_LOG_INTERVAL == 0 {
                    debug!(
                        "{:.1} FPS after {} frames, {} ticks",
                        game_loop.fps(),
                        game_loop.frame_count(),
                        game_loop.tick_count()
                    );
                }

                renderer.begin_frame();
                world.draw(renderer.canvas());
                if let Err(e) = renderer.render() {
                    warn!("Render failed: {}", e);
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
