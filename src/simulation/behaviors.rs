//! Ambient per-tick forces
//!
//! Runs after integration each tick; accumulated forces are consumed by the
//! next tick's integration step. Three passes:
//! 1. circle-like entities orbit their shared centroid
//! 2. circle-like entities are repelled by nearby lines
//! 3. grouped agents attract to or scatter from their group depending on
//!    the focus signal; different groups always repel
//! plus an optional flocking pass for agent-based variants.

use crate::core::types::{GroupId, Vec2};
use crate::entity::shape::{Orientation, ShapeKind};
use crate::simulation::state::SimulationState;
use crate::steering::flock::{flock_force, FlockWeights, NeighborView};
use crate::steering::forces::{arrive, flee, orbit_target, repel_from_point};
use ahash::AHashMap;

/// Centroid orbit and line repulsion for circle-like entities
pub fn apply_ambient_forces(state: &mut SimulationState) {
    let centroid = circle_like_centroid(state);

    // Snapshot line geometry so the force loop can borrow shapes mutably
    let lines: Vec<(Orientation, f32)> = state
        .shapes
        .iter()
        .filter(|s| !s.is_dying())
        .filter_map(|s| match &s.kind {
            ShapeKind::Line(l) => Some((l.orientation, l.axis_position)),
            _ => None,
        })
        .collect();

    let config = &state.config;
    let rng = &mut state.rng;
    for shape in &mut state.shapes {
        if shape.is_dying() || matches!(shape.kind, ShapeKind::Line(_)) {
            continue;
        }

        if let Some(center) = centroid {
            let orbit = orbit_target(
                shape.position,
                center,
                config.orbit_strength,
                config.orbit_pull_strength,
            );
            shape.apply_force(orbit.limit(config.max_force));
        }

        for (orientation, axis) in &lines {
            // Repel from the nearest point on the line's axis
            let nearest = match orientation {
                Orientation::Horizontal => Vec2::new(shape.position.x, *axis),
                Orientation::Vertical => Vec2::new(*axis, shape.position.y),
            };
            let fallback = Vec2::random_unit(rng);
            let force = repel_from_point(
                shape.position,
                nearest,
                config.repel_cutoff,
                config.repel_max_strength,
                config.repel_min_strength,
                fallback,
            );
            shape.apply_force(force);
        }
    }
}

/// Group focus behavior: members gather toward their group centroid while
/// watched and scatter from it otherwise; members of different groups
/// always repel each other.
pub fn apply_group_forces(state: &mut SimulationState, is_focused: bool) {
    let members: Vec<(GroupId, Vec2)> = state
        .shapes
        .iter()
        .filter(|s| !s.is_dying())
        .filter_map(|s| s.group.map(|g| (g, s.position)))
        .collect();
    if members.is_empty() {
        return;
    }

    let mut sums: AHashMap<GroupId, (Vec2, usize)> = AHashMap::new();
    for (group, position) in &members {
        let entry = sums.entry(*group).or_insert((Vec2::ZERO, 0));
        entry.0 += *position;
        entry.1 += 1;
    }
    let centroids: AHashMap<GroupId, Vec2> = sums
        .into_iter()
        .map(|(g, (sum, n))| (g, sum * (1.0 / n as f32)))
        .collect();

    let config = &state.config;
    let rng = &mut state.rng;
    for shape in &mut state.shapes {
        let Some(group) = shape.group else { continue };
        if shape.is_dying() {
            continue;
        }

        if let Some(&center) = centroids.get(&group) {
            let force = if is_focused {
                // Arrive rather than seek so members settle around the
                // centroid instead of oscillating through it
                arrive(
                    shape.position,
                    shape.velocity,
                    center,
                    shape.max_speed,
                    config.max_force,
                    config.attraction_radius,
                    config.slow_radius,
                )
            } else {
                flee(
                    shape.position,
                    shape.velocity,
                    center,
                    shape.max_speed,
                    config.max_force,
                    Some(config.attraction_radius),
                )
            };
            shape.apply_force(force);
        }

        for (other_group, other_position) in &members {
            if *other_group == group {
                continue;
            }
            let fallback = Vec2::random_unit(rng);
            let force = repel_from_point(
                shape.position,
                *other_position,
                config.repel_cutoff,
                config.repel_max_strength,
                config.repel_min_strength,
                fallback,
            );
            shape.apply_force(force);
        }
    }
}

/// Flocking pass over point entities (skipped unless enabled in config)
pub fn apply_flocking(state: &mut SimulationState) {
    if !state.config.flocking_enabled {
        return;
    }
    let neighbors: Vec<NeighborView> = state
        .shapes
        .iter()
        .filter(|s| !s.is_dying() && !matches!(s.kind, ShapeKind::Line(_)))
        .map(|s| NeighborView {
            position: s.position,
            velocity: s.velocity,
        })
        .collect();

    let config = &state.config;
    for shape in &mut state.shapes {
        if shape.is_dying() || matches!(shape.kind, ShapeKind::Line(_)) {
            continue;
        }
        let weights = FlockWeights::for_kind(&shape.kind);
        let force = flock_force(
            shape.position,
            shape.velocity,
            &neighbors,
            weights,
            config.separation_radius,
            config.perception_radius,
            shape.max_speed,
            config.max_force,
        );
        shape.apply_force(force);
    }
}

/// Centroid of live circle-like entities, None when there are none
fn circle_like_centroid(state: &SimulationState) -> Option<Vec2> {
    let mut sum = Vec2::ZERO;
    let mut count = 0;
    for shape in &state.shapes {
        if !shape.is_dying() && !matches!(shape.kind, ShapeKind::Line(_)) {
            sum += shape.position;
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum * (1.0 / count as f32))
    }
}
