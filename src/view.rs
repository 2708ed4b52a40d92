//! Renderer boundary: read-only snapshots of the simulation
//!
//! The core never draws. An external renderer calls [`RenderView::capture`]
//! once per frame and gets everything visual the simulation knows:
//! per-entity geometry, colors with the warning pulse and the score-driven
//! desaturation/darkening already folded in, and wrap-duplicate offsets for
//! entities straddling a screen edge.

use crate::core::types::{map_range, EntityId, Hsb, ScreenBounds, Vec2};
use crate::entity::lifecycle::LifecyclePhase;
use crate::entity::shape::{Shape, ShapeKind};
use crate::simulation::state::SimulationState;

/// One drawable entity
#[derive(Debug, Clone)]
pub struct RenderShape {
    pub id: EntityId,
    /// Geometry to draw; lines carry their axis and oscillation state here
    pub kind: ShapeKind,
    pub position: Vec2,
    /// Spin angle for polygons, motion heading otherwise
    pub rotation: f32,
    /// Color with score multipliers applied
    pub color: Hsb,
    /// Warning pulse alpha in 0.3..1.0, or 1.0 outside Warning
    pub alpha: f32,
    /// Extra positions at which to draw duplicates so entities straddling
    /// an edge appear on both sides. Empty for lines and dying entities.
    pub wrap_offsets: Vec<Vec2>,
}

/// Full visual snapshot of one frame
#[derive(Debug, Clone)]
pub struct RenderView {
    pub shapes: Vec<RenderShape>,
    pub score: u64,
    /// 1.0 at low score fading to 0.0 as the score saturates the canvas
    pub saturation_multiplier: f32,
    pub brightness_multiplier: f32,
}

impl RenderView {
    pub fn capture(state: &SimulationState) -> Self {
        let score = state.score as f32;
        let config = &state.config;
        let saturation_multiplier = map_range(
            score,
            config.desaturation_start,
            config.desaturation_end,
            1.0,
            0.0,
            true,
        );
        let brightness_multiplier = map_range(
            score,
            config.brightness_start,
            config.brightness_end,
            1.0,
            0.0,
            true,
        );

        let shapes = state
            .shapes
            .iter()
            .map(|shape| {
                render_shape(shape, &state.screen, saturation_multiplier, brightness_multiplier)
            })
            .collect();

        Self {
            shapes,
            score: state.score,
            saturation_multiplier,
            brightness_multiplier,
        }
    }
}

fn render_shape(
    shape: &Shape,
    screen: &ScreenBounds,
    saturation_multiplier: f32,
    brightness_multiplier: f32,
) -> RenderShape {
    let rotation = match &shape.kind {
        ShapeKind::Polygon(polygon) => polygon.spin_angle,
        _ => shape.velocity.heading(),
    };
    let alpha = if shape.lifecycle.phase == LifecyclePhase::Warning {
        shape.warning_alpha()
    } else {
        1.0
    };
    let color = Hsb::new(
        shape.color.hue,
        shape.color.saturation * saturation_multiplier,
        shape.color.brightness * brightness_multiplier,
    );
    RenderShape {
        id: shape.id,
        kind: shape.kind.clone(),
        position: shape.position,
        rotation,
        color,
        alpha,
        wrap_offsets: wrap_offsets(shape, screen),
    }
}

/// Offsets for drawing duplicates of an entity straddling screen edges.
/// Corner overlaps get a diagonal duplicate too. Lines span the canvas and
/// dying entities fall straight out, so neither wraps.
fn wrap_offsets(shape: &Shape, screen: &ScreenBounds) -> Vec<Vec2> {
    if matches!(shape.kind, ShapeKind::Line(_)) || shape.is_dying() {
        return Vec::new();
    }
    let size = shape.size();
    let mut x_offsets = vec![0.0];
    if shape.position.x - size < 0.0 {
        x_offsets.push(screen.width);
    } else if shape.position.x + size > screen.width {
        x_offsets.push(-screen.width);
    }
    let mut y_offsets = vec![0.0];
    if shape.position.y - size < 0.0 {
        y_offsets.push(screen.height);
    } else if shape.position.y + size > screen.height {
        y_offsets.push(-screen.height);
    }

    let mut offsets = Vec::new();
    for &dx in &x_offsets {
        for &dy in &y_offsets {
            if dx != 0.0 || dy != 0.0 {
                offsets.push(Vec2::new(dx, dy));
            }
        }
    }
    offsets
}
