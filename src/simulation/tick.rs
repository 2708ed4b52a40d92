//! Tick system - orchestrates simulation updates
//!
//! One call advances the world one frame:
//! 1. advance the simulated clock
//! 2. lifecycle transitions (Warning entry/decay, recovery, Dying, death
//!    animation with the one-shot drop cue)
//! 3. per-kind update (growth, oscillation, spin) and motion integration
//! 4. ambient forces: centroid orbit, line repulsion, group focus,
//!    optional flocking (accumulated now, consumed by the next
//!    integration step)
//! 5. ambient speed decay, skipped on ticks following a boost
//! 6. removal of entities fallen past the off-screen threshold
//! 7. score update
//!
//! Events generated along the way are returned for the caller's audio
//! dispatcher and logs; the core never plays or draws anything.

use crate::core::types::{map_range, EntityId, ShapeCategory};
use crate::entity::lifecycle::LifecyclePhase;
use crate::entity::shape::ShapeKind;
use crate::simulation::behaviors::{apply_ambient_forces, apply_flocking, apply_group_forces};
use crate::simulation::score::compute_score;
use crate::simulation::state::SimulationState;

/// Named audio cues the external dispatcher may play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    CircleSpawn,
    LineSpawn,
    PolygonSpawn,
    /// A dying entity began its gravity fall
    ShapeDrop,
    SpeedBoost,
    /// Boost requested with no live entities
    Error,
}

/// Events generated during a simulation tick (and by the input methods)
#[derive(Debug, Clone)]
pub enum SimulationEvent {
    Spawned { id: EntityId },
    /// Removed to make room at a category's population cap
    Evicted { id: EntityId },
    WarningStarted { id: EntityId },
    /// Returned from Warning to Active after fresh input
    Recovered { id: EntityId },
    DyingStarted { id: EntityId },
    /// Fell past the off-screen threshold and was removed
    Removed { id: EntityId },
    /// Suggestion for the external audio dispatcher
    AudioCue { cue: CueKind, frequency: f32 },
}

/// Advance the simulation by one tick
pub fn run_simulation_tick(state: &mut SimulationState, is_focused: bool) -> Vec<SimulationEvent> {
    let mut events = Vec::new();

    state.current_tick += 1;
    state.clock_ms += state.config.tick_ms;

    update_lifecycles(state, &mut events);

    let screen = state.screen;
    for shape in &mut state.shapes {
        shape.kind_update(&screen);
        shape.integrate(&screen);
    }

    apply_ambient_forces(state);
    apply_group_forces(state, is_focused);
    apply_flocking(state);

    if !state.boosted_this_tick {
        let fraction = state.config.speed_decay_per_tick;
        let floor = state.config.speed_decay_floor;
        for shape in &mut state.shapes {
            if !shape.is_dying() {
                shape.apply_speed_decay(fraction, floor);
            }
        }
    }
    state.boosted_this_tick = false;

    cull_offscreen(state, &mut events);

    state.score = compute_score(&state.shapes, &state.config);

    tracing::trace!(
        tick = state.current_tick,
        shapes = state.shapes.len(),
        score = state.score,
        "tick complete"
    );
    events
}

/// Phase 2: category-clock driven transitions plus per-phase decay
fn update_lifecycles(state: &mut SimulationState, events: &mut Vec<SimulationEvent>) {
    let elapsed_circle = state.elapsed_since_active(ShapeCategory::CircleLike);
    let elapsed_line = state.elapsed_since_active(ShapeCategory::LineLike);
    let screen = state.screen;
    let config = &state.config;

    for shape in &mut state.shapes {
        if shape.is_dying() {
            if shape.update_death(config) {
                // One-shot: the tick gravity starts. Lines span the full
                // width, so their cue uses the center pitch.
                let x = match &shape.kind {
                    ShapeKind::Line(_) => screen.width / 2.0,
                    _ => shape.position.x,
                };
                let frequency = map_range(
                    x,
                    0.0,
                    screen.width,
                    config.drop_freq_range.0,
                    config.drop_freq_range.1,
                    true,
                );
                events.push(SimulationEvent::AudioCue {
                    cue: CueKind::ShapeDrop,
                    frequency,
                });
            }
            continue;
        }

        let elapsed = match shape.category() {
            ShapeCategory::CircleLike => elapsed_circle,
            ShapeCategory::LineLike => elapsed_line,
        };

        if elapsed > config.warn_threshold_ms {
            if elapsed <= config.warn_threshold_ms + config.warn_duration_ms {
                if shape.lifecycle.phase == LifecyclePhase::Active {
                    shape.start_warning();
                    tracing::debug!(id = ?shape.id, "shape entered warning");
                    events.push(SimulationEvent::WarningStarted { id: shape.id });
                }
                shape.update_warning(config);
            } else {
                shape.start_dying();
                tracing::debug!(id = ?shape.id, "shape started dying");
                events.push(SimulationEvent::DyingStarted { id: shape.id });
            }
        } else if shape.lifecycle.phase == LifecyclePhase::Warning {
            shape.recover_from_warning();
            tracing::debug!(id = ?shape.id, "shape recovered from warning");
            events.push(SimulationEvent::Recovered { id: shape.id });
        }
    }
}

/// Phase 6: drop entities strictly past `screen_height + offscreen_margin`
fn cull_offscreen(state: &mut SimulationState, events: &mut Vec<SimulationEvent>) {
    let screen = state.screen;
    let margin = state.config.offscreen_margin;
    state.shapes.retain(|shape| {
        if shape.is_offscreen(&screen, margin) {
            tracing::debug!(id = ?shape.id, "shape removed offscreen");
            events.push(SimulationEvent::Removed { id: shape.id });
            false
        } else {
            true
        }
    });
}
