//! Flocking: separate / align / cohere over a neighbor set
//!
//! One shared algorithm; per-kind weight profiles give each shape kind a
//! distinct group "personality" (tight social clustering vs. loose
//! independent drift).

use crate::core::types::Vec2;
use crate::entity::shape::ShapeKind;
use crate::steering::forces::seek;
use serde::{Deserialize, Serialize};

/// What the flocking terms need to know about a neighbor
#[derive(Debug, Clone, Copy)]
pub struct NeighborView {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Per-kind personality weights applied to each flocking term.
///
/// Tuned ranges: separation 0.8-2.5, alignment 0.5-2.5, cohesion 0.3-2.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlockWeights {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
}

impl FlockWeights {
    /// Personality profile for a shape kind
    pub fn for_kind(kind: &ShapeKind) -> Self {
        match kind {
            // Circles school: they follow and cluster, but separation
            // outweighs cohesion so the school never collapses
            ShapeKind::Circle(_) => Self {
                separation: 1.5,
                alignment: 1.8,
                cohesion: 1.2,
            },
            // Polygons keep their distance and mostly ignore the group
            ShapeKind::Polygon(_) => Self {
                separation: 2.2,
                alignment: 0.6,
                cohesion: 0.4,
            },
            // Lines are axis-constrained and never flock
            ShapeKind::Line(_) => Self {
                separation: 0.0,
                alignment: 0.0,
                cohesion: 0.0,
            },
        }
    }
}

/// Steer away from neighbors inside `separation_radius`, weighted
/// inversely by distance.
pub fn separate(
    position: Vec2,
    velocity: Vec2,
    neighbors: &[NeighborView],
    separation_radius: f32,
    max_speed: f32,
    max_force: f32,
) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0;
    for neighbor in neighbors {
        let distance = position.distance(&neighbor.position);
        if distance > 1e-4 && distance < separation_radius {
            let away = (position - neighbor.position).normalize() * (1.0 / distance);
            sum += away;
            count += 1;
        }
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    let desired = (sum * (1.0 / count as f32)).set_magnitude(max_speed);
    (desired - velocity).limit(max_force)
}

/// Steer velocity toward the average heading of neighbors inside
/// `perception_radius`.
pub fn align(
    position: Vec2,
    velocity: Vec2,
    neighbors: &[NeighborView],
    perception_radius: f32,
    max_speed: f32,
    max_force: f32,
) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0;
    for neighbor in neighbors {
        let distance = position.distance(&neighbor.position);
        if distance > 1e-4 && distance < perception_radius {
            sum += neighbor.velocity;
            count += 1;
        }
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    let desired = (sum * (1.0 / count as f32)).set_magnitude(max_speed);
    (desired - velocity).limit(max_force)
}

/// Seek the centroid of neighbors inside `perception_radius`.
pub fn cohere(
    position: Vec2,
    velocity: Vec2,
    neighbors: &[NeighborView],
    perception_radius: f32,
    max_speed: f32,
    max_force: f32,
) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0;
    for neighbor in neighbors {
        let distance = position.distance(&neighbor.position);
        if distance > 1e-4 && distance < perception_radius {
            sum += neighbor.position;
            count += 1;
        }
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    let centroid = sum * (1.0 / count as f32);
    seek(position, velocity, centroid, max_speed, max_force, None)
}

/// Combined flocking force: the three terms scaled by the agent's weights.
#[allow(clippy::too_many_arguments)]
pub fn flock_force(
    position: Vec2,
    velocity: Vec2,
    neighbors: &[NeighborView],
    weights: FlockWeights,
    separation_radius: f32,
    perception_radius: f32,
    max_speed: f32,
    max_force: f32,
) -> Vec2 {
    let sep = separate(position, velocity, neighbors, separation_radius, max_speed, max_force);
    let ali = align(position, velocity, neighbors, perception_radius, max_speed, max_force);
    let coh = cohere(position, velocity, neighbors, perception_radius, max_speed, max_force);
    sep * weights.separation + ali * weights.alignment + coh * weights.cohesion
}
