//! Linear algebra primitives using glam plus local easing kernels.

pub use glam::{Mat4, Quat, Vec3};

/// Wrap an angle into the `(-PI, PI]` range.
///
/// Keeps damped angle interpolation moving along the shortest arc instead
/// of unwinding a full turn when a target crosses the seam.
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}

/// Exponentially damped step from `current` toward `target`.
///
/// `smooth_time` is the time constant in seconds: one time constant covers
/// roughly 63% of the remaining distance. The step is frame-rate
/// independent, so two half-length frames land where one full frame would.
pub fn damp(current: f32, target: f32, smooth_time: f32, dt: f32) -> f32 {
    if smooth_time <= 0.0 {
        return target;
    }
    let blend = 1.0 - (-dt / smooth_time).exp();
    current + (target - current) * blend
}

/// [`damp`] along the shortest angular arc.
pub fn damp_angle(current: f32, target: f32, smooth_time: f32, dt: f32) -> f32 {
    if smooth_time <= 0.0 {
        return target;
    }
    let delta = wrap_angle(target - current);
    let blend = 1.0 - (-dt / smooth_time).exp();
    current + delta * blend
}
