//! End-to-end tests for the simulation core
//!
//! Drives the public API the way an embedding front end would: spawn via the
//! input methods, advance with `run_simulation_tick`, observe through
//! events and `RenderView`.

use proptest::prelude::*;
use pulsefield::core::config::SimulationConfig;
use pulsefield::core::types::ShapeCategory;
use pulsefield::entity::lifecycle::LifecyclePhase;
use pulsefield::entity::shape::{Orientation, ShapeKind};
use pulsefield::simulation::score::compute_score;
use pulsefield::simulation::state::SimulationState;
use pulsefield::simulation::tick::{run_simulation_tick, CueKind, SimulationEvent};
use pulsefield::view::RenderView;

fn new_state(seed: u64) -> SimulationState {
    SimulationState::new(SimulationConfig::default(), 800.0, 600.0, seed)
}

/// Ticks it takes a category to cross the warning threshold
fn ticks_to_warn(config: &SimulationConfig) -> u64 {
    (config.warn_threshold_ms / config.tick_ms).ceil() as u64 + 1
}

// ===== Ambient speed decay =====

#[test]
fn speed_decays_half_percent_per_tick_without_boosts() {
    let mut state = new_state(1);
    state.spawn_circle();
    state.shapes[0].speed = 5.0;

    for _ in 0..60 {
        run_simulation_tick(&mut state, false);
    }

    // 5.0 * 0.995^60 = 3.70
    let expected = 5.0 * 0.995_f32.powi(60);
    assert!((state.shapes[0].speed - expected).abs() < 1e-3);
}

#[test]
fn boost_skips_exactly_one_decay_step() {
    let mut state = new_state(2);
    state.spawn_circle();
    state.shapes[0].speed = 5.0;
    state.shapes[0].velocity = state.shapes[0].velocity.set_magnitude(5.0);

    state.boost_speed(1.0);
    run_simulation_tick(&mut state, false);
    assert!((state.shapes[0].speed - 6.0).abs() < 1e-3);

    run_simulation_tick(&mut state, false);
    assert!(state.shapes[0].speed < 6.0);
}

// ===== Lifecycle round trips =====

#[test]
fn warning_recovers_fully_on_fresh_input() {
    let mut state = new_state(3);
    state.spawn_circle();
    state.shapes[0].speed = 5.0;
    let config = state.config.clone();

    // Starve the category into Warning, then decay for 50 ticks
    for _ in 0..ticks_to_warn(&config) + 50 {
        run_simulation_tick(&mut state, false);
    }
    assert_eq!(state.shapes[0].lifecycle.phase, LifecyclePhase::Warning);
    assert!(state.shapes[0].speed < 5.0);

    // Fresh input inside the warning window restores the snapshot
    state.on_category_active(ShapeCategory::CircleLike);
    let events = run_simulation_tick(&mut state, false);
    assert_eq!(state.shapes[0].lifecycle.phase, LifecyclePhase::Active);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimulationEvent::Recovered { .. })));

    // Snapshot was taken after pre-warning ambient decay, so compare
    // against that value, not the spawn speed
    let decayed_at_warn = 5.0 * 0.995_f32.powi(ticks_to_warn(&config) as i32 - 1);
    assert!((state.shapes[0].speed - decayed_at_warn).abs() < 0.1);
}

#[test]
fn starved_shape_warns_dies_drops_and_is_removed() {
    let mut state = new_state(4);
    state.spawn_circle();
    let id = state.shapes[0].id;

    let mut saw_warning = false;
    let mut drop_cues = 0;
    let mut removed = false;

    for _ in 0..4000 {
        for event in run_simulation_tick(&mut state, false) {
            match event {
                SimulationEvent::WarningStarted { .. } => saw_warning = true,
                SimulationEvent::AudioCue {
                    cue: CueKind::ShapeDrop,
                    frequency,
                } => {
                    drop_cues += 1;
                    // Pitch maps x in 0..800 onto 100..300
                    assert!((100.0..=300.0).contains(&frequency));
                }
                SimulationEvent::Removed { id: removed_id } => {
                    assert_eq!(removed_id, id);
                    removed = true;
                }
                _ => {}
            }
        }
        if removed {
            break;
        }
    }

    assert!(saw_warning);
    assert_eq!(drop_cues, 1);
    assert!(removed);
    assert_eq!(state.shape_count(), 0);
    assert_eq!(state.score, 0);
}

#[test]
fn line_lifecycle_matches_point_lifecycle() {
    let mut state = new_state(5);
    state.spawn_line(Orientation::Horizontal);

    let mut removed = false;
    for _ in 0..4000 {
        for event in run_simulation_tick(&mut state, false) {
            if matches!(event, SimulationEvent::Removed { .. }) {
                removed = true;
            }
        }
        if removed {
            break;
        }
    }
    assert!(removed);
}

// ===== Score =====

#[test]
fn score_counts_shapes_and_speed() {
    let config = SimulationConfig::default();
    let mut state = new_state(6);
    for _ in 0..3 {
        state.spawn_circle();
    }
    let speeds = [1.0, 2.0, 3.0];
    for (shape, speed) in state.shapes.iter_mut().zip(speeds) {
        shape.speed = speed;
    }
    // floor(3 * 10 + 6 * 5) = 60
    assert_eq!(compute_score(&state.shapes, &config), 60);
}

#[test]
fn score_follows_population_through_ticks() {
    let mut state = new_state(7);
    assert_eq!(state.score, 0);

    state.spawn_circle();
    run_simulation_tick(&mut state, false);
    assert!(state.score > 0);

    state.shapes.clear();
    run_simulation_tick(&mut state, false);
    assert_eq!(state.score, 0);
}

#[test]
fn line_score_contribution_uses_configured_scale() {
    let mut state = new_state(8);
    state.spawn_line(Orientation::Vertical);
    let oscillation = match &state.shapes[0].kind {
        ShapeKind::Line(l) => l.oscillation_speed,
        _ => unreachable!(),
    };
    let expected = (1.0 * state.config.shape_weight
        + oscillation * state.config.line_speed_scale * state.config.speed_weight)
        .floor() as u64;
    assert_eq!(compute_score(&state.shapes, &state.config), expected);
}

// ===== Events and cues =====

#[test]
fn boost_cue_pitch_tracks_average_speed() {
    let mut state = new_state(9);
    state.spawn_circle();
    state.shapes[0].speed = 0.0;
    state.shapes[0].velocity = pulsefield::core::types::Vec2::ZERO;

    let low = boost_frequency(state.boost_speed(1.0));
    let mut state = new_state(9);
    state.spawn_circle();
    state.shapes[0].speed = 0.0;
    state.shapes[0].velocity = pulsefield::core::types::Vec2::ZERO;
    let high = boost_frequency(state.boost_speed(30.0));
    assert!(high > low);
}

fn boost_frequency(events: Vec<SimulationEvent>) -> f32 {
    events
        .iter()
        .find_map(|e| match e {
            SimulationEvent::AudioCue {
                cue: CueKind::SpeedBoost,
                frequency,
            } => Some(*frequency),
            _ => None,
        })
        .expect("boost should emit a cue")
}

#[test]
fn boost_on_empty_world_only_errors() {
    let mut state = new_state(10);
    let events = state.boost_speed(2.0);
    assert!(matches!(
        events[..],
        [SimulationEvent::AudioCue {
            cue: CueKind::Error,
            ..
        }]
    ));
    run_simulation_tick(&mut state, false);
    assert_eq!(state.shape_count(), 0);
}

// ===== Determinism =====

#[test]
fn identical_seeds_give_identical_runs() {
    let run = |seed: u64| {
        let mut state = new_state(seed);
        for tick in 1..=600u64 {
            if tick % 40 == 0 {
                state.spawn_circle();
            }
            if tick % 90 == 0 {
                state.spawn_line(Orientation::Horizontal);
            }
            if tick % 200 == 0 {
                state.boost_speed(2.0);
            }
            run_simulation_tick(&mut state, tick % 2 == 0);
        }
        (
            state.score,
            state
                .shapes
                .iter()
                .map(|s| (s.position.x, s.position.y))
                .collect::<Vec<_>>(),
        )
    };
    assert_eq!(run(77), run(77));
}

// ===== View =====

#[test]
fn view_reflects_simulation_state() {
    let mut state = new_state(11);
    state.spawn_circle();
    state.spawn_line(Orientation::Horizontal);
    run_simulation_tick(&mut state, false);

    let view = RenderView::capture(&state);
    assert_eq!(view.shapes.len(), 2);
    assert_eq!(view.score, state.score);
    // Lines never request wrap duplicates
    let line_view = view
        .shapes
        .iter()
        .find(|s| matches!(s.kind, ShapeKind::Line(_)))
        .expect("line present");
    assert!(line_view.wrap_offsets.is_empty());
}

// ===== Invariants =====

proptest! {
    #[test]
    fn speed_never_negative_under_any_boost_sequence(
        boosts in prop::collection::vec(0.0f32..10.0, 1..20),
        ticks_between in 1u64..30,
    ) {
        let mut state = new_state(99);
        state.spawn_circle();
        state.spawn_line(Orientation::Vertical);

        for boost in boosts {
            state.boost_speed(boost);
            for _ in 0..ticks_between {
                run_simulation_tick(&mut state, false);
            }
            for shape in &state.shapes {
                prop_assert!(shape.speed >= 0.0);
                if let ShapeKind::Line(l) = &shape.kind {
                    prop_assert!(l.oscillation_speed >= 0.0);
                    prop_assert!(l.oscillation_speed <= state.config.max_oscillation_speed);
                    prop_assert!(l.amplitude >= 0.0);
                }
            }
        }
    }

    #[test]
    fn dying_phase_is_terminal(extra_ticks in 1u64..200) {
        let mut state = new_state(100);
        state.spawn_circle();
        state.shapes[0].start_dying();

        for _ in 0..extra_ticks {
            state.on_category_active(ShapeCategory::CircleLike);
            run_simulation_tick(&mut state, true);
            if state.shape_count() == 0 {
                return Ok(());
            }
            prop_assert_eq!(state.shapes[0].lifecycle.phase, LifecyclePhase::Dying);
        }
    }
}
