//! Externally-requested spawns with randomized parameters
//!
//! Spawn ranges reproduce the shipped tuning: circles start small and grow
//! to a large target, lines start mid-amplitude with a slow drift. Each
//! category has a population cap; the oldest entity is evicted first.

use crate::core::types::{EntityId, Hsb, ShapeCategory, Vec2};
use crate::entity::shape::{
    CircleData, LineData, Orientation, PolygonData, Shape, ShapeKind, SHAPE_BRIGHTNESS,
    SHAPE_SATURATION,
};
use crate::simulation::state::SimulationState;
use crate::simulation::tick::{CueKind, SimulationEvent};
use rand::Rng;

impl SimulationState {
    /// Spawn a growing circle at a random position
    pub fn spawn_circle(&mut self) -> Vec<SimulationEvent> {
        let position = self.random_position(50.0);
        let kind = ShapeKind::Circle(CircleData {
            radius: self.rng.gen_range(5.0..15.0),
            target_radius: Some(self.rng.gen_range(80.0..140.0)),
            growth_speed: self.rng.gen_range(0.3..0.8),
        });
        let speed = self.rng.gen_range(2.0..5.0);
        let frequency = self.rng.gen_range(400.0..800.0);
        self.insert_shape(kind, position, speed, CueKind::CircleSpawn, frequency)
    }

    /// Spawn an oscillating line across the given axis
    pub fn spawn_line(&mut self, orientation: Orientation) -> Vec<SimulationEvent> {
        let axis_span = match orientation {
            Orientation::Horizontal => self.screen.height,
            Orientation::Vertical => self.screen.width,
        };
        let kind = ShapeKind::Line(LineData {
            orientation,
            axis_position: self.rng.gen_range(0.0..axis_span),
            amplitude: self.rng.gen_range(50.0..200.0),
            frequency: self.rng.gen_range(0.3..0.8),
            phase: 0.0,
            oscillation_speed: self.rng.gen_range(0.01..0.02),
            drift_speed: self.rng.gen_range(0.3..0.8),
            drift_direction: if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            vertical_offset: 0.0,
            stroke_weight: 80.0,
        });
        // Cue pitch identifies the axis: horizontal low, vertical mid
        let frequency = match orientation {
            Orientation::Horizontal => self.rng.gen_range(100.0..200.0),
            Orientation::Vertical => self.rng.gen_range(200.0..400.0),
        };
        self.insert_shape(kind, Vec2::ZERO, 0.0, CueKind::LineSpawn, frequency)
    }

    /// Spawn a spinning polygon (triangle or square)
    pub fn spawn_polygon(&mut self, sides: u32) -> Vec<SimulationEvent> {
        let position = self.random_position(50.0);
        let width = self.rng.gen_range(40.0..120.0);
        let kind = ShapeKind::Polygon(PolygonData {
            sides,
            width,
            height: self.rng.gen_range(40.0..120.0),
            spin_angle: 0.0,
            spin_speed: self.rng.gen_range(0.01..0.05),
        });
        let speed = self.rng.gen_range(2.0..5.0);
        let frequency = self.rng.gen_range(400.0..800.0);
        self.insert_shape(kind, position, speed, CueKind::PolygonSpawn, frequency)
    }

    fn insert_shape(
        &mut self,
        kind: ShapeKind,
        position: Vec2,
        speed: f32,
        cue: CueKind,
        frequency: f32,
    ) -> Vec<SimulationEvent> {
        let category = kind.category();
        let mut events = Vec::with_capacity(2);

        if let Some(evicted) = self.evict_if_full(category) {
            events.push(SimulationEvent::Evicted { id: evicted });
        }

        let color = Hsb::new(
            self.rng.gen_range(0.0..360.0),
            SHAPE_SATURATION,
            SHAPE_BRIGHTNESS,
        );
        let mut shape = Shape::new(
            kind,
            position,
            color,
            self.config.shape_max_speed,
            self.current_tick,
        );
        if speed > 0.0 {
            shape.set_speed(speed, &mut self.rng);
        }
        tracing::debug!(id = ?shape.id, ?category, "spawned shape");
        events.push(SimulationEvent::Spawned { id: shape.id });
        events.push(SimulationEvent::AudioCue { cue, frequency });
        self.shapes.push(shape);

        // Spawning is input: it also refreshes the category clock
        self.on_category_active(category);
        events
    }

    /// Remove the oldest entity of the category when it is at its cap
    fn evict_if_full(&mut self, category: ShapeCategory) -> Option<EntityId> {
        let cap = match category {
            ShapeCategory::CircleLike => self.config.max_circle_like,
            ShapeCategory::LineLike => self.config.max_line_like,
        };
        if self.count_in_category(category) < cap {
            return None;
        }
        let oldest = self
            .shapes
            .iter()
            .enumerate()
            .filter(|(_, s)| s.category() == category)
            .min_by_key(|(_, s)| s.spawned_tick)
            .map(|(i, _)| i)?;
        let removed = self.shapes.remove(oldest);
        tracing::debug!(id = ?removed.id, ?category, "evicted oldest shape at cap");
        Some(removed.id)
    }
}
