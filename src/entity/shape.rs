//! Shape entities: moving visual elements managed by the simulation
//!
//! The kinds form a closed enum rather than a trait-object hierarchy: every
//! update site needs to know the concrete kind anyway, and the enum keeps
//! entities cheap to copy into render snapshots.

use crate::core::types::{EntityId, GroupId, Hsb, ScreenBounds, ShapeCategory, Tick, Vec2};
use crate::entity::lifecycle::{Lifecycle, LifecyclePhase};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default saturation/brightness for spawned shapes (full HSB intensity)
pub const SHAPE_SATURATION: f32 = 100.0;
pub const SHAPE_BRIGHTNESS: f32 = 100.0;

/// Factor mapping a generic speed value onto line oscillation speed
const LINE_SPEED_FACTOR: f32 = 0.01;

/// Axis a line entity runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Circle-specific state: radius with an optional growth target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleData {
    pub radius: f32,
    /// When set, the radius grows toward this value each tick
    pub target_radius: Option<f32>,
    pub growth_speed: f32,
}

/// Line-specific state. Lines are axis-constrained: one scalar coordinate
/// plus an oscillation, never the general position vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineData {
    pub orientation: Orientation,
    /// Position along the cross axis (y for horizontal lines, x for vertical)
    pub axis_position: f32,
    pub amplitude: f32,
    pub frequency: f32,
    /// Oscillation phase, advanced by `oscillation_speed` each tick
    pub phase: f32,
    pub oscillation_speed: f32,
    pub drift_speed: f32,
    /// +1 or -1
    pub drift_direction: f32,
    /// Accumulated fall distance while Dying
    pub vertical_offset: f32,
    pub stroke_weight: f32,
}

/// Spinning polygon state (triangles, squares, rectangles)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonData {
    pub sides: u32,
    pub width: f32,
    pub height: f32,
    pub spin_angle: f32,
    pub spin_speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle(CircleData),
    Line(LineData),
    Polygon(PolygonData),
}

impl ShapeKind {
    pub fn category(&self) -> ShapeCategory {
        match self {
            ShapeKind::Line(_) => ShapeCategory::LineLike,
            ShapeKind::Circle(_) | ShapeKind::Polygon(_) => ShapeCategory::CircleLike,
        }
    }
}

/// A single simulated shape or agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: EntityId,
    pub kind: ShapeKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Nominal speed, decoupled from `velocity` magnitude so decay and
    /// boosts apply independently. Never negative.
    pub speed: f32,
    /// Soft cap: `speed` may exceed it, velocity is clamped to
    /// `max(speed, max_speed)`
    pub max_speed: f32,
    pub color: Hsb,
    /// Flock membership for agent-based variants
    pub group: Option<GroupId>,
    pub lifecycle: Lifecycle,
    pub spawned_tick: Tick,
}

impl Shape {
    pub fn new(kind: ShapeKind, position: Vec2, color: Hsb, max_speed: f32, tick: Tick) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            speed: 0.0,
            max_speed,
            color,
            group: None,
            lifecycle: Lifecycle::new(),
            spawned_tick: tick,
        }
    }

    pub fn category(&self) -> ShapeCategory {
        self.kind.category()
    }

    pub fn is_dying(&self) -> bool {
        self.lifecycle.phase == LifecyclePhase::Dying
    }

    /// Set nominal speed. Point entities get a fresh random direction;
    /// a zero speed zeroes the velocity. Lines map speed onto oscillation.
    pub fn set_speed(&mut self, speed: f32, rng: &mut impl Rng) {
        match &mut self.kind {
            ShapeKind::Line(line) => {
                line.oscillation_speed = (speed * LINE_SPEED_FACTOR).max(0.0);
            }
            _ => {
                self.speed = speed.max(0.0);
                if self.speed > 0.0 {
                    self.velocity = Vec2::random_unit(rng) * self.speed;
                } else {
                    self.velocity = Vec2::ZERO;
                }
            }
        }
    }

    /// Boost speed. From a standstill there is no direction to preserve,
    /// so a random unit direction is substituted. Line boosts are capped
    /// at `max_oscillation_speed`.
    pub fn add_speed(&mut self, amount: f32, max_oscillation_speed: f32, rng: &mut impl Rng) {
        match &mut self.kind {
            ShapeKind::Line(line) => {
                line.oscillation_speed = (line.oscillation_speed + amount * LINE_SPEED_FACTOR)
                    .clamp(0.0, max_oscillation_speed);
            }
            _ => {
                if self.speed == 0.0 {
                    self.velocity = Vec2::random_unit(rng) * amount;
                    self.speed = amount.max(0.0);
                } else {
                    self.speed = (self.speed + amount).max(0.0);
                    self.velocity = self.velocity.set_magnitude(self.speed);
                }
            }
        }
    }

    /// Speed as used for scoring and cue pitch: lines contribute their
    /// oscillation speed scaled into point-entity units.
    pub fn effective_speed(&self, line_speed_scale: f32) -> f32 {
        match &self.kind {
            ShapeKind::Line(line) => line.oscillation_speed * line_speed_scale,
            _ => self.speed,
        }
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Ambient "use it or lose it" decay, clamped at the floor
    pub fn apply_speed_decay(&mut self, fraction: f32, floor: f32) {
        match &mut self.kind {
            ShapeKind::Line(line) => {
                let line_floor = floor * LINE_SPEED_FACTOR;
                if line.oscillation_speed > line_floor {
                    line.oscillation_speed =
                        (line.oscillation_speed * (1.0 - fraction)).max(line_floor);
                }
            }
            _ => {
                if self.speed > floor {
                    self.speed = (self.speed * (1.0 - fraction)).max(floor);
                    self.velocity = self.velocity.set_magnitude(self.speed.min(self.velocity.length()));
                }
            }
        }
    }

    /// Kind-specific per-tick update: growth, oscillation + drift, spin
    pub fn kind_update(&mut self, screen: &ScreenBounds) {
        let dying = self.is_dying();
        match &mut self.kind {
            ShapeKind::Circle(circle) => {
                if let Some(target) = circle.target_radius {
                    if circle.radius < target {
                        circle.radius += circle.growth_speed;
                        if circle.radius >= target {
                            circle.radius = target;
                            circle.target_radius = None;
                        }
                    }
                }
            }
            ShapeKind::Line(line) => {
                line.phase += line.oscillation_speed;
                line.axis_position += line.drift_speed * line.drift_direction;

                // Wrap along the cross axis only while alive
                if !dying {
                    let max_pos = match line.orientation {
                        Orientation::Horizontal => screen.height,
                        Orientation::Vertical => screen.width,
                    };
                    if line.axis_position > max_pos {
                        line.axis_position = 0.0;
                    } else if line.axis_position < 0.0 {
                        line.axis_position = max_pos;
                    }
                }
            }
            ShapeKind::Polygon(polygon) => {
                polygon.spin_angle += polygon.spin_speed;
            }
        }
    }

    /// Integrate motion for point entities. Lines move through
    /// [`Shape::kind_update`] instead and never use velocity.
    pub fn integrate(&mut self, screen: &ScreenBounds) {
        if matches!(self.kind, ShapeKind::Line(_)) {
            return;
        }
        self.velocity += self.acceleration;
        self.velocity = self.velocity.limit(self.speed.max(self.max_speed));
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
        self.wrap_edges(screen);
    }

    /// Wrap position modulo the screen bounds. Suspended while Dying so
    /// the entity falls through the bottom edge instead of reappearing.
    fn wrap_edges(&mut self, screen: &ScreenBounds) {
        if self.is_dying() {
            return;
        }
        if self.position.x > screen.width {
            self.position.x = 0.0;
        } else if self.position.x < 0.0 {
            self.position.x = screen.width;
        }
        if self.position.y > screen.height {
            self.position.y = 0.0;
        } else if self.position.y < 0.0 {
            self.position.y = screen.height;
        }
    }

    /// The coordinate checked against the removal threshold
    pub fn vertical_coordinate(&self) -> f32 {
        match &self.kind {
            ShapeKind::Line(line) => line.vertical_offset,
            _ => self.position.y,
        }
    }

    /// Visual extent, used to decide wrap-duplicate drawing
    pub fn size(&self) -> f32 {
        match &self.kind {
            ShapeKind::Circle(circle) => circle.radius,
            ShapeKind::Line(line) => line.amplitude + line.stroke_weight,
            ShapeKind::Polygon(polygon) => polygon.width.max(polygon.height) * 0.5,
        }
    }

    /// Rescale position proportionally after a screen resize
    pub fn rescale(&mut self, old: &ScreenBounds, new: &ScreenBounds) {
        self.position.x = self.position.x / old.width * new.width;
        self.position.y = self.position.y / old.height * new.height;
        if let ShapeKind::Line(line) = &mut self.kind {
            match line.orientation {
                Orientation::Horizontal => {
                    line.axis_position = line.axis_position / old.height * new.height;
                }
                Orientation::Vertical => {
                    line.axis_position = line.axis_position / old.width * new.width;
                }
            }
        }
    }
}
