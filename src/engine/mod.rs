// Engine modules: assets, input, physics, renderer, timing

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod renderer;
