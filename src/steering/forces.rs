//! Steering primitives
//!
//! Pure functions mapping (agent state, target) to a force vector. None
//! of these can fail: degenerate geometry (zero offsets, zero velocity)
//! yields a zero or caller-supplied fallback direction, never NaN.

use crate::core::types::{map_range, Vec2};

/// Steer toward a target at full speed.
///
/// With a working `radius`, targets beyond it produce zero force: this is
/// how attraction is bounded to a neighborhood instead of acting globally.
pub fn seek(
    position: Vec2,
    velocity: Vec2,
    target: Vec2,
    max_speed: f32,
    max_force: f32,
    radius: Option<f32>,
) -> Vec2 {
    let offset = target - position;
    let distance = offset.length();

    if let Some(radius) = radius {
        if distance > radius {
            return Vec2::ZERO;
        }
    }

    let desired = offset.set_magnitude(max_speed);
    (desired - velocity).limit(max_force)
}

/// Steer away from a target: the exact opposite of [`seek`].
pub fn flee(
    position: Vec2,
    velocity: Vec2,
    target: Vec2,
    max_speed: f32,
    max_force: f32,
    radius: Option<f32>,
) -> Vec2 {
    -seek(position, velocity, target, max_speed, max_force, radius)
}

/// Like [`seek`], but desired speed ramps linearly to zero inside
/// `slow_radius`, decelerating into the target instead of overshooting.
pub fn arrive(
    position: Vec2,
    velocity: Vec2,
    target: Vec2,
    max_speed: f32,
    max_force: f32,
    radius: f32,
    slow_radius: f32,
) -> Vec2 {
    let offset = target - position;
    let distance = offset.length();

    if distance > radius {
        return Vec2::ZERO;
    }

    let desired_speed = if distance < slow_radius {
        map_range(distance, 0.0, slow_radius, 0.0, max_speed, true)
    } else {
        max_speed
    };

    let desired = offset.set_magnitude(desired_speed);
    (desired - velocity).limit(max_force)
}

/// Stable circular motion around a (possibly moving) center: a tangential
/// push perpendicular to the radius vector plus a mild radial pull inward.
/// Both components are nonzero whenever the agent is off-center.
pub fn orbit_target(
    position: Vec2,
    center: Vec2,
    orbit_strength: f32,
    pull_strength: f32,
) -> Vec2 {
    let radial = position - center;
    if radial.length_squared() < 1e-8 {
        return Vec2::ZERO;
    }
    let tangential = radial.perp().normalize() * orbit_strength;
    let inward = (-radial).normalize() * pull_strength;
    tangential + inward
}

/// Push away from a point, stronger the nearer the agent is. Strength
/// interpolates linearly from `max_strength` at zero distance down to
/// `min_strength` at `cutoff`; beyond the cutoff there is no force.
/// `fallback` supplies a direction when the agent sits exactly on the point.
pub fn repel_from_point(
    position: Vec2,
    point: Vec2,
    cutoff: f32,
    max_strength: f32,
    min_strength: f32,
    fallback: Vec2,
) -> Vec2 {
    let offset = position - point;
    let distance = offset.length();

    if distance > cutoff {
        return Vec2::ZERO;
    }

    let direction = if distance > 1e-4 {
        offset.normalize()
    } else {
        fallback
    };

    let strength = map_range(distance, 0.0, cutoff, max_strength, min_strength, true);
    direction * strength
}
