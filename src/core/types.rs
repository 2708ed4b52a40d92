//! Core type definitions used throughout the codebase

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes and agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulation tick counter (one tick per rendered frame)
pub type Tick = u64;

/// Identifier for an agent group sharing a cohesion target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Inactivity category. All entities in a category share one
/// "last active" timestamp that drives their lifecycle clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeCategory {
    /// Circles and polygons: point entities with full 2D motion
    CircleLike,
    /// Oscillating lines: axis-constrained entities
    LineLike,
}

/// 2D position / direction / force
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction. Zero vectors stay zero
    /// rather than dividing by zero.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 1e-4 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::ZERO
        }
    }

    /// Rescale to the given magnitude, preserving direction.
    /// A zero vector has no direction and stays zero; callers that need
    /// a direction in that case must substitute one (see [`Vec2::random_unit`]).
    pub fn set_magnitude(&self, magnitude: f32) -> Self {
        self.normalize() * magnitude
    }

    /// Clamp magnitude to `max` without changing direction.
    pub fn limit(&self, max: f32) -> Self {
        let len_sq = self.length_squared();
        if len_sq > max * max && len_sq > 0.0 {
            self.normalize() * max
        } else {
            *self
        }
    }

    /// Angle of the vector in radians (for rotation alignment)
    pub fn heading(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Perpendicular vector (rotated 90 degrees counterclockwise)
    pub fn perp(&self) -> Self {
        Self { x: -self.y, y: self.x }
    }

    /// Uniformly random unit vector. The documented fallback for any
    /// direction computation on a degenerate (zero-magnitude) vector.
    pub fn random_unit(rng: &mut impl Rng) -> Self {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        Self { x: angle.cos(), y: angle.sin() }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

/// Color in HSB space (hue 0-360, saturation 0-100, brightness 0-100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsb {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl Hsb {
    pub fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self { hue, saturation, brightness }
    }

    /// Rotate hue to the opposite side of the color wheel
    pub fn invert_hue(&self) -> Self {
        Self {
            hue: (self.hue + 180.0) % 360.0,
            ..*self
        }
    }
}

/// Canvas dimensions the simulation runs against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl ScreenBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Linear remap of `value` from `[in_min, in_max]` to `[out_min, out_max]`.
/// When `clamp` is set the result never leaves the output range.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32, clamp: bool) -> f32 {
    let span = in_max - in_min;
    if span.abs() < f32::EPSILON {
        return out_min;
    }
    let t = (value - in_min) / span;
    let t = if clamp { t.clamp(0.0, 1.0) } else { t };
    out_min + t * (out_max - out_min)
}
