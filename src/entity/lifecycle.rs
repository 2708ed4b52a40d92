//! Per-entity lifecycle state machine
//!
//! Active -> Warning -> Dying, driven by elapsed time since the entity's
//! category last saw input. Warning is reversible and decays gently with a
//! pulsing alpha; Dying is terminal: a fast energy-loss phase, then an
//! accelerating gravity fall until the entity drops past the removal
//! threshold.

use crate::core::config::SimulationConfig;
use crate::core::types::{map_range, ScreenBounds};
use crate::entity::shape::{Shape, ShapeKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecyclePhase {
    Active,
    Warning,
    /// Terminal: no transition back to Warning or Active
    Dying,
}

/// Lifecycle bookkeeping carried by every shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lifecycle {
    pub phase: LifecyclePhase,
    /// Pulse animation phase while Warning
    pub warning_pulse: f32,
    /// Snapshot taken on Warning entry, restored on recovery
    original_speed: f32,
    original_amplitude: f32,
    original_oscillation_speed: f32,
    /// Ticks spent Dying
    pub death_timer: u64,
    /// Accumulated fall speed during the gravity phase
    pub fall_velocity: f32,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: LifecyclePhase::Active,
            warning_pulse: 0.0,
            original_speed: 0.0,
            original_amplitude: 0.0,
            original_oscillation_speed: 0.0,
            death_timer: 0,
            fall_velocity: 0.0,
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Shape {
    /// Enter the Warning phase, snapshotting current values for recovery.
    /// No-op unless currently Active.
    pub fn start_warning(&mut self) {
        if self.lifecycle.phase != LifecyclePhase::Active {
            return;
        }
        self.lifecycle.phase = LifecyclePhase::Warning;
        match &self.kind {
            ShapeKind::Line(line) => {
                self.lifecycle.original_amplitude = line.amplitude;
                self.lifecycle.original_oscillation_speed = line.oscillation_speed;
            }
            _ => {
                self.lifecycle.original_speed = self.speed;
            }
        }
    }

    /// Return to Active, restoring the snapshot and resetting the pulse.
    /// No-op unless currently Warning, so calling it twice cannot
    /// double-restore.
    pub fn recover_from_warning(&mut self) {
        if self.lifecycle.phase != LifecyclePhase::Warning {
            return;
        }
        self.lifecycle.phase = LifecyclePhase::Active;
        self.lifecycle.warning_pulse = 0.0;
        match &mut self.kind {
            ShapeKind::Line(line) => {
                if self.lifecycle.original_amplitude > 0.0 {
                    line.amplitude = self.lifecycle.original_amplitude;
                }
                if self.lifecycle.original_oscillation_speed > 0.0 {
                    line.oscillation_speed = self.lifecycle.original_oscillation_speed;
                }
            }
            _ => {
                if self.lifecycle.original_speed > 0.0 {
                    self.speed = self.lifecycle.original_speed;
                    self.velocity = self.velocity.set_magnitude(self.speed);
                }
            }
        }
    }

    /// One tick of Warning decay: gradual, reversible energy loss plus
    /// pulse advance.
    pub fn update_warning(&mut self, config: &SimulationConfig) {
        if self.lifecycle.phase != LifecyclePhase::Warning {
            return;
        }
        match &mut self.kind {
            ShapeKind::Line(line) => {
                line.amplitude = (line.amplitude * config.warning_energy_decay).max(0.0);
                line.oscillation_speed =
                    (line.oscillation_speed * config.warning_oscillation_decay).max(0.0);
            }
            _ => {
                self.velocity = self.velocity * config.warning_energy_decay;
                self.speed = (self.speed * config.warning_energy_decay).max(0.0);
            }
        }
        self.lifecycle.warning_pulse += config.warning_pulse_speed;
    }

    /// Pulsing alpha in 0.3..1.0 for the Warning visual
    pub fn warning_alpha(&self) -> f32 {
        map_range(self.lifecycle.warning_pulse.sin(), -1.0, 1.0, 0.3, 1.0, false)
    }

    /// Enter the terminal Dying phase. Idempotent; clears Warning state.
    pub fn start_dying(&mut self) {
        if self.lifecycle.phase == LifecyclePhase::Dying {
            return;
        }
        self.lifecycle.phase = LifecyclePhase::Dying;
        self.lifecycle.warning_pulse = 0.0;
        self.lifecycle.death_timer = 0;
        self.lifecycle.fall_velocity = 0.0;
    }

    /// One tick of the death animation. Returns true exactly once, on the
    /// tick the gravity phase begins (the audio-cue trigger).
    pub fn update_death(&mut self, config: &SimulationConfig) -> bool {
        if self.lifecycle.phase != LifecyclePhase::Dying {
            return false;
        }
        self.lifecycle.death_timer += 1;
        let timer = self.lifecycle.death_timer;

        if timer < config.loss_phase_ticks {
            match &mut self.kind {
                ShapeKind::Line(line) => {
                    line.amplitude = (line.amplitude * config.death_energy_decay).max(0.0);
                    line.oscillation_speed =
                        (line.oscillation_speed * config.death_oscillation_decay).max(0.0);
                }
                _ => {
                    self.velocity = self.velocity * config.death_energy_decay;
                    self.speed = (self.speed * config.death_energy_decay).max(0.0);
                }
            }
        }

        if timer >= config.loss_phase_ticks {
            let ramp = (timer - config.loss_phase_ticks) as f32;
            let gravity = config.gravity_base + ramp * config.gravity_growth;
            self.lifecycle.fall_velocity += gravity;
            match &mut self.kind {
                ShapeKind::Line(line) => {
                    line.vertical_offset += self.lifecycle.fall_velocity;
                }
                _ => {
                    self.position.y += self.lifecycle.fall_velocity;
                }
            }
        }

        timer == config.loss_phase_ticks
    }

    /// Removal condition: strictly past the bottom edge plus the margin.
    /// An entity sitting exactly on the threshold is kept.
    pub fn is_offscreen(&self, screen: &ScreenBounds, margin: f32) -> bool {
        self.vertical_coordinate() > screen.height + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Hsb, Vec2};
    use crate::entity::shape::{CircleData, LineData, Orientation};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config() -> SimulationConfig {
        SimulationConfig::default()
    }

    fn circle() -> Shape {
        Shape::new(
            ShapeKind::Circle(CircleData {
                radius: 10.0,
                target_radius: None,
                growth_speed: 0.5,
            }),
            Vec2::new(100.0, 100.0),
            Hsb::new(0.0, 100.0, 100.0),
            8.0,
            0,
        )
    }

    fn line() -> Shape {
        Shape::new(
            ShapeKind::Line(LineData {
                orientation: Orientation::Horizontal,
                axis_position: 50.0,
                amplitude: 100.0,
                frequency: 0.5,
                phase: 0.0,
                oscillation_speed: 0.02,
                drift_speed: 0.4,
                drift_direction: -1.0,
                vertical_offset: 0.0,
                stroke_weight: 80.0,
            }),
            Vec2::ZERO,
            Hsb::new(0.0, 100.0, 100.0),
            8.0,
            0,
        )
    }

    #[test]
    fn test_warning_snapshot_and_recovery_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let config = config();
        let mut shape = circle();
        shape.set_speed(5.0, &mut rng);

        shape.start_warning();
        for _ in 0..100 {
            shape.update_warning(&config);
        }
        assert!(shape.speed < 5.0);

        shape.recover_from_warning();
        assert_eq!(shape.lifecycle.phase, LifecyclePhase::Active);
        assert!((shape.speed - 5.0).abs() < 1e-5);
        assert!((shape.velocity.length() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_recovery_twice_is_a_no_op() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let config = config();
        let mut shape = circle();
        shape.set_speed(4.0, &mut rng);

        shape.start_warning();
        shape.update_warning(&config);
        shape.recover_from_warning();
        let speed_after_first = shape.speed;
        shape.recover_from_warning();
        assert_eq!(shape.speed, speed_after_first);
        assert_eq!(shape.lifecycle.phase, LifecyclePhase::Active);
    }

    #[test]
    fn test_line_warning_restores_amplitude_and_oscillation() {
        let config = config();
        let mut shape = line();
        shape.start_warning();
        for _ in 0..200 {
            shape.update_warning(&config);
        }
        shape.recover_from_warning();
        if let ShapeKind::Line(l) = &shape.kind {
            assert!((l.amplitude - 100.0).abs() < 1e-4);
            assert!((l.oscillation_speed - 0.02).abs() < 1e-6);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_dying_is_irreversible() {
        let mut shape = circle();
        shape.start_dying();
        shape.recover_from_warning();
        assert_eq!(shape.lifecycle.phase, LifecyclePhase::Dying);
        shape.start_warning();
        assert_eq!(shape.lifecycle.phase, LifecyclePhase::Dying);
    }

    #[test]
    fn test_gravity_signal_fires_exactly_once() {
        let config = config();
        let mut shape = circle();
        shape.start_dying();

        let mut fired_at = Vec::new();
        for tick in 1..=config.loss_phase_ticks + 30 {
            if shape.update_death(&config) {
                fired_at.push(tick);
            }
        }
        assert_eq!(fired_at, vec![config.loss_phase_ticks]);
    }

    #[test]
    fn test_fall_velocity_is_monotonic() {
        let config = config();
        let mut shape = circle();
        shape.start_dying();

        let mut previous = 0.0;
        for _ in 0..200 {
            shape.update_death(&config);
            assert!(shape.lifecycle.fall_velocity >= previous);
            previous = shape.lifecycle.fall_velocity;
        }
        assert!(previous > 0.0);
    }

    #[test]
    fn test_speed_never_negative_through_death() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let config = config();
        let mut shape = circle();
        shape.set_speed(3.0, &mut rng);
        shape.start_dying();
        for _ in 0..500 {
            shape.update_death(&config);
            assert!(shape.speed >= 0.0);
        }
    }

    #[test]
    fn test_offscreen_boundary_is_strict() {
        let screen = ScreenBounds::new(800.0, 600.0);
        let mut shape = circle();

        shape.position.y = 800.0; // exactly height + margin
        assert!(!shape.is_offscreen(&screen, 200.0));

        shape.position.y = 800.1;
        assert!(shape.is_offscreen(&screen, 200.0));
    }

    #[test]
    fn test_line_offscreen_uses_vertical_offset() {
        let screen = ScreenBounds::new(800.0, 600.0);
        let mut shape = line();
        if let ShapeKind::Line(l) = &mut shape.kind {
            l.vertical_offset = 801.0;
        }
        assert!(shape.is_offscreen(&screen, 200.0));
    }

    #[test]
    fn test_warning_alpha_stays_in_band() {
        let config = config();
        let mut shape = circle();
        shape.start_warning();
        for _ in 0..500 {
            shape.update_warning(&config);
            let alpha = shape.warning_alpha();
            assert!((0.3..=1.0).contains(&alpha));
        }
    }
}
