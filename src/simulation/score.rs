//! Aggregate score: population count plus total kinetic energy

use crate::core::config::SimulationConfig;
use crate::entity::shape::Shape;

/// `floor(count * shape_weight + total_speed * speed_weight)`.
/// Lines contribute oscillation speed scaled by `line_speed_scale`.
/// No entities means score 0.
pub fn compute_score(shapes: &[Shape], config: &SimulationConfig) -> u64 {
    if shapes.is_empty() {
        return 0;
    }
    let total_speed: f32 = shapes
        .iter()
        .map(|s| s.effective_speed(config.line_speed_scale))
        .sum();
    let raw = shapes.len() as f32 * config.shape_weight + total_speed * config.speed_weight;
    raw.max(0.0).floor() as u64
}

/// Mean effective speed across all entities, 0 when empty
pub fn average_effective_speed(shapes: &[Shape], config: &SimulationConfig) -> f32 {
    if shapes.is_empty() {
        return 0.0;
    }
    let total: f32 = shapes
        .iter()
        .map(|s| s.effective_speed(config.line_speed_scale))
        .sum();
    total / shapes.len() as f32
}
