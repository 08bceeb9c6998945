// Kinematic collision against static rectangles
//
// Movement is resolved one axis at a time: move along X and push out, then
// move along Y and push out. There is no sub-stepping, so speeds stay well
// below one tile per tick.

pub mod body;
mod collision;

pub use body::KinematicBody;
pub use collision::{resolve_horizontal, resolve_vertical};
