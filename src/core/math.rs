// Math utilities and helper functions

/// Clamp a value between min and max.
///
/// Unlike `f32::clamp` this never panics when `min > max`; the lower bound wins.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Offset that centers `inner` inside `outer` along one axis
pub fn centered(outer: f32, inner: f32) -> f32 {
    (outer - inner) / 2.0
}
