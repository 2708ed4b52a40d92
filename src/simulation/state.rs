//! Simulation state: the single owner of all live entities
//!
//! Everything mutable lives here; only the orchestrator in
//! [`crate::simulation::tick`] and the explicit input methods below touch
//! it, and never concurrently.

use crate::core::config::SimulationConfig;
use crate::core::types::{map_range, ScreenBounds, ShapeCategory, Tick, Vec2};
use crate::entity::shape::Shape;
use crate::simulation::score::average_effective_speed;
use crate::simulation::tick::{CueKind, SimulationEvent};
use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The world the tick loop runs against
pub struct SimulationState {
    pub config: SimulationConfig,
    pub screen: ScreenBounds,
    pub shapes: Vec<Shape>,
    /// Simulated-clock timestamp of the last input per category
    pub last_active: AHashMap<ShapeCategory, f64>,
    pub score: u64,
    pub current_tick: Tick,
    /// Simulated milliseconds, advanced by `tick_ms` per tick
    pub clock_ms: f64,
    pub rng: ChaCha8Rng,
    /// Set by `boost_speed`, consumed by the tick's speed-decay step
    pub(crate) boosted_this_tick: bool,
}

impl SimulationState {
    pub fn new(config: SimulationConfig, width: f32, height: f32, seed: u64) -> Self {
        let mut last_active = AHashMap::new();
        last_active.insert(ShapeCategory::CircleLike, 0.0);
        last_active.insert(ShapeCategory::LineLike, 0.0);

        Self {
            config,
            screen: ScreenBounds::new(width, height),
            shapes: Vec::new(),
            last_active,
            score: 0,
            current_tick: 0,
            clock_ms: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            boosted_this_tick: false,
        }
    }

    /// Stamp a category's activity clock with the current simulated time.
    /// Entities of that category in Warning recover on the next tick.
    pub fn on_category_active(&mut self, category: ShapeCategory) {
        self.last_active.insert(category, self.clock_ms);
    }

    /// External input surface: map an input label onto a category stamp.
    /// Unrecognized labels are ignored and return false.
    pub fn on_input(&mut self, label: &str) -> bool {
        let category = match label {
            "circle" | "polygon" => ShapeCategory::CircleLike,
            "line" => ShapeCategory::LineLike,
            _ => return false,
        };
        self.on_category_active(category);
        true
    }

    /// Milliseconds since the category last saw input
    pub fn elapsed_since_active(&self, category: ShapeCategory) -> f64 {
        self.clock_ms - self.last_active.get(&category).copied().unwrap_or(0.0)
    }

    /// Boost every non-Dying entity's speed. With no live entities this
    /// only emits the error cue; otherwise it emits a boost cue whose
    /// pitch tracks the post-boost average speed.
    pub fn boost_speed(&mut self, amount: f32) -> Vec<SimulationEvent> {
        let live = self.shapes.iter().filter(|s| !s.is_dying()).count();
        if live == 0 {
            return vec![SimulationEvent::AudioCue {
                cue: CueKind::Error,
                frequency: self.config.error_freq,
            }];
        }

        for shape in &mut self.shapes {
            if !shape.is_dying() {
                shape.add_speed(amount, self.config.max_oscillation_speed, &mut self.rng);
            }
        }
        self.boosted_this_tick = true;

        let avg = average_effective_speed(&self.shapes, &self.config);
        let frequency = map_range(
            avg,
            0.0,
            self.config.boost_freq_speed_span,
            self.config.boost_freq_range.0,
            self.config.boost_freq_range.1,
            true,
        );
        tracing::debug!(amount, avg, frequency, "speed boost");
        vec![SimulationEvent::AudioCue {
            cue: CueKind::SpeedBoost,
            frequency,
        }]
    }

    /// Rescale every entity proportionally into the new bounds
    pub fn resize(&mut self, width: f32, height: f32) {
        let old = self.screen;
        let new = ScreenBounds::new(width, height);
        for shape in &mut self.shapes {
            shape.rescale(&old, &new);
        }
        self.screen = new;
        tracing::info!(width, height, "screen resized");
    }

    /// Rotate every entity's hue 180 degrees
    pub fn invert_colors(&mut self) {
        for shape in &mut self.shapes {
            shape.color = shape.color.invert_hue();
        }
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn count_in_category(&self, category: ShapeCategory) -> usize {
        self.shapes.iter().filter(|s| s.category() == category).count()
    }

    /// Random spawn position inside the screen with an edge inset
    pub(crate) fn random_position(&mut self, inset: f32) -> Vec2 {
        use rand::Rng;
        let x = self.rng.gen_range(inset..self.screen.width - inset);
        let y = self.rng.gen_range(inset..self.screen.height - inset);
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::tick::{CueKind, SimulationEvent};

    fn state() -> SimulationState {
        SimulationState::new(SimulationConfig::default(), 800.0, 600.0, 42)
    }

    #[test]
    fn test_boost_with_no_shapes_emits_error_cue() {
        let mut state = state();
        let events = state.boost_speed(2.0);
        assert_eq!(events.len(), 1);
        match &events[0] {
            SimulationEvent::AudioCue { cue, frequency } => {
                assert_eq!(*cue, CueKind::Error);
                assert_eq!(*frequency, state.config.error_freq);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(!state.boosted_this_tick);
    }

    #[test]
    fn test_unknown_input_label_is_ignored() {
        let mut state = state();
        state.clock_ms = 5000.0;
        assert!(!state.on_input("drum"));
        assert_eq!(state.elapsed_since_active(ShapeCategory::CircleLike), 5000.0);

        assert!(state.on_input("circle"));
        assert_eq!(state.elapsed_since_active(ShapeCategory::CircleLike), 0.0);
    }

    #[test]
    fn test_hue_inversion_applies_to_all_shapes() {
        let mut state = state();
        state.spawn_circle();
        state.spawn_circle();
        let hues: Vec<f32> = state.shapes.iter().map(|s| s.color.hue).collect();
        state.invert_colors();
        for (shape, hue) in state.shapes.iter().zip(hues) {
            assert_eq!(shape.color.hue, (hue + 180.0) % 360.0);
        }
    }

    #[test]
    fn test_resize_rescales_positions() {
        let mut state = state();
        state.spawn_circle();
        let before = state.shapes[0].position;
        state.resize(1600.0, 1200.0);
        let after = state.shapes[0].position;
        assert!((after.x - before.x * 2.0).abs() < 1e-3);
        assert!((after.y - before.y * 2.0).abs() < 1e-3);
    }
}
