//! Small numeric helpers shared by sampling and fading.

use crate::data::MotionPoint;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation of keyframe points (time and value components).
#[inline]
pub fn lerp_point(a: MotionPoint, b: MotionPoint, t: f32) -> MotionPoint {
    MotionPoint {
        time: lerp_f32(a.time, b.time, t),
        value: lerp_f32(a.value, b.value, t),
    }
}

/// Sine easing used by all fade windows: clamp to [0,1], then
/// `0.5 - 0.5 * cos(x * PI)`. Monotonic, with zero slope at both ends.
#[inline]
pub fn ease_sine(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    0.5 - 0.5 * (x * std::f32::consts::PI).cos()
}
