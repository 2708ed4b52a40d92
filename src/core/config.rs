//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other.

use crate::core::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the simulation systems
///
/// Defaults reproduce the tuning of the shipped variants. Several
/// constants differed slightly between variants; those are deliberately
/// exposed as fields rather than hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === TIME ===
    /// Simulated milliseconds per tick
    ///
    /// The lifecycle clock compares elapsed milliseconds against the
    /// thresholds below. At the default (1000/60), thresholds expressed
    /// in milliseconds match a 60Hz frame cadence.
    pub tick_ms: f64,

    // === LIFECYCLE ===
    /// Milliseconds of category inactivity before entities enter Warning
    ///
    /// At 6000ms / 60Hz that is 360 ticks of grace before decay begins.
    pub warn_threshold_ms: f64,

    /// Milliseconds of Warning before entities start Dying
    ///
    /// Input arriving inside this window fully recovers the entity;
    /// once it expires the transition to Dying is irreversible.
    pub warn_duration_ms: f64,

    /// Per-tick velocity/speed multiplier during Warning (circle-like)
    ///
    /// Close to 1.0 so the slowdown reads as a gradual fade, and because
    /// the Warning phase is reversible the loss must stay recoverable.
    pub warning_energy_decay: f32,

    /// Per-tick oscillation-speed multiplier during Warning (line-like)
    ///
    /// Slightly gentler than the energy decay; lines read as "dying"
    /// faster than circles at equal decay because amplitude compounds.
    pub warning_oscillation_decay: f32,

    /// Pulse phase advance per tick during Warning
    ///
    /// Drives the sinusoidal alpha pulse (0.3..1.0) that signals danger.
    pub warning_pulse_speed: f32,

    /// Ticks of the Dying energy-loss phase before gravity begins
    pub loss_phase_ticks: u64,

    /// Per-tick velocity/speed multiplier during the energy-loss phase
    ///
    /// Much steeper than the Warning decay: death should read as a
    /// collapse, not a fade.
    pub death_energy_decay: f32,

    /// Per-tick oscillation-speed multiplier during the energy-loss phase
    pub death_oscillation_decay: f32,

    /// Initial per-tick fall acceleration when the gravity phase begins
    pub gravity_base: f32,

    /// Additional fall acceleration per tick into the gravity phase
    ///
    /// Gravity accelerating over time guarantees every dying entity
    /// clears the removal threshold in bounded time.
    pub gravity_growth: f32,

    /// Pixels beyond the bottom edge before a falling entity is removed
    ///
    /// Removal triggers strictly beyond `screen_height + offscreen_margin`
    /// so entities finish falling out of view before they disappear.
    pub offscreen_margin: f32,

    // === MOTION ===
    /// Soft cap on entity velocity
    ///
    /// `speed` may exceed this (chaos effects); velocity is clamped to
    /// `max(speed, shape_max_speed)` so boosts still take effect.
    pub shape_max_speed: f32,

    /// Clamp on any single steering force
    pub max_force: f32,

    /// Hard cap on line oscillation speed
    ///
    /// Speed boosts map onto oscillation speed through a 0.01 factor;
    /// without a cap repeated boosts make lines strobe unreadably.
    pub max_oscillation_speed: f32,

    /// Fraction of speed lost per tick by non-Dying entities (0.005 = 0.5%)
    ///
    /// The "use it or lose it" mechanic: independent of the lifecycle
    /// decay, energy bleeds away unless the player keeps boosting.
    pub speed_decay_per_tick: f32,

    /// Floor below which ambient speed decay stops
    pub speed_decay_floor: f32,

    // === STEERING ===
    /// Working radius for seek/arrive: beyond it, zero force
    ///
    /// Bounds attraction to a local neighborhood instead of acting
    /// globally across the whole canvas.
    pub attraction_radius: f32,

    /// Distance inside which arrive ramps desired speed linearly to zero
    pub slow_radius: f32,

    /// Cutoff distance for point repulsion
    pub repel_cutoff: f32,

    /// Repulsion strength at zero distance
    pub repel_max_strength: f32,

    /// Repulsion strength at the cutoff distance
    pub repel_min_strength: f32,

    /// Tangential force factor for centroid orbiting
    pub orbit_strength: f32,

    /// Radial pull factor toward the orbit center
    ///
    /// Small relative to orbit_strength so entities circle the centroid
    /// instead of converging onto it.
    pub orbit_pull_strength: f32,

    // === FLOCKING ===
    /// Whether the flocking pass runs each tick (agent-based variants)
    pub flocking_enabled: bool,

    /// Radius within which neighbors repel each other
    pub separation_radius: f32,

    /// Radius within which neighbors are seen for align/cohere
    pub perception_radius: f32,

    // === POPULATION ===
    /// Maximum simultaneous circle-like entities; oldest is evicted first
    pub max_circle_like: usize,

    /// Maximum simultaneous line-like entities; oldest is evicted first
    ///
    /// Lines are visually heavy (full-width strokes), so the cap is much
    /// lower than for circles.
    pub max_line_like: usize,

    // === SCORE ===
    /// Score contribution per live entity
    pub shape_weight: f32,

    /// Score contribution per unit of total speed
    pub speed_weight: f32,

    /// Factor scaling line oscillation speed into score-comparable units
    ///
    /// Oscillation speeds are ~0.01-0.02 rad/tick while circle speeds are
    /// ~2-8 px/tick; the scale brings them into the same order. Variants
    /// disagreed between 10x and 100x, hence a field.
    pub line_speed_scale: f32,

    // === VISUAL RESPONSE ===
    /// Score at which desaturation begins
    pub desaturation_start: f32,
    /// Score at which desaturation reaches full (saturation multiplier 0)
    pub desaturation_end: f32,
    /// Score at which brightness reduction begins
    pub brightness_start: f32,
    /// Score at which brightness reaches full black
    pub brightness_end: f32,

    // === AUDIO CUES ===
    /// Frequency range for the shape-drop cue, mapped from x position
    pub drop_freq_range: (f32, f32),
    /// Frequency range for the speed-boost cue, mapped from average speed
    pub boost_freq_range: (f32, f32),
    /// Average speed mapped to the top of `boost_freq_range`
    pub boost_freq_speed_span: f32,
    /// Frequency of the error cue
    pub error_freq: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000.0 / 60.0,

            // Lifecycle (6s grace, 4s reversible warning)
            warn_threshold_ms: 6000.0,
            warn_duration_ms: 4000.0,
            warning_energy_decay: 0.985,
            warning_oscillation_decay: 0.99,
            warning_pulse_speed: 0.9,
            loss_phase_ticks: 30,
            death_energy_decay: 0.92,
            death_oscillation_decay: 0.95,
            gravity_base: 0.4,
            gravity_growth: 0.05,
            offscreen_margin: 200.0,

            // Motion
            shape_max_speed: 8.0,
            max_force: 0.4,
            max_oscillation_speed: 0.1,
            speed_decay_per_tick: 0.005,
            speed_decay_floor: 0.1,

            // Steering
            attraction_radius: 200.0,
            slow_radius: 100.0,
            repel_cutoff: 300.0,
            repel_max_strength: 0.5,
            repel_min_strength: 0.05,
            orbit_strength: 1.0,
            orbit_pull_strength: 0.6,

            // Flocking
            flocking_enabled: false,
            separation_radius: 30.0,
            perception_radius: 60.0,

            // Population
            max_circle_like: 64,
            max_line_like: 16,

            // Score
            shape_weight: 10.0,
            speed_weight: 5.0,
            line_speed_scale: 100.0,

            // Visual response
            desaturation_start: 25_000.0,
            desaturation_end: 50_000.0,
            brightness_start: 40_000.0,
            brightness_end: 100_000.0,

            // Audio cues
            drop_freq_range: (100.0, 300.0),
            boost_freq_range: (100.0, 2000.0),
            boost_freq_speed_span: 50.0,
            error_freq: 300.0,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms <= 0.0 {
            return Err(SimError::InvalidConfig("tick_ms must be positive".into()));
        }

        for (name, value) in [
            ("warning_energy_decay", self.warning_energy_decay),
            ("warning_oscillation_decay", self.warning_oscillation_decay),
            ("death_energy_decay", self.death_energy_decay),
            ("death_oscillation_decay", self.death_oscillation_decay),
        ] {
            if !(0.0 < value && value < 1.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{} ({}) must be in (0, 1)",
                    name, value
                )));
            }
        }

        // Warning decay must be gentler than death decay: Warning is the
        // reversible phase.
        if self.warning_energy_decay <= self.death_energy_decay {
            return Err(SimError::InvalidConfig(format!(
                "warning_energy_decay ({}) should be > death_energy_decay ({})",
                self.warning_energy_decay, self.death_energy_decay
            )));
        }

        if self.gravity_base <= 0.0 || self.gravity_growth < 0.0 {
            return Err(SimError::InvalidConfig(
                "gravity_base must be positive and gravity_growth non-negative".into(),
            ));
        }

        if self.repel_min_strength > self.repel_max_strength {
            return Err(SimError::InvalidConfig(format!(
                "repel_min_strength ({}) should be <= repel_max_strength ({})",
                self.repel_min_strength, self.repel_max_strength
            )));
        }

        if self.separation_radius > self.perception_radius {
            return Err(SimError::InvalidConfig(format!(
                "separation_radius ({}) should be <= perception_radius ({})",
                self.separation_radius, self.perception_radius
            )));
        }

        if self.max_circle_like == 0 || self.max_line_like == 0 {
            return Err(SimError::InvalidConfig(
                "per-category population caps must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Warning threshold expressed in ticks
    pub fn warn_threshold_ticks(&self) -> u64 {
        (self.warn_threshold_ms / self.tick_ms).ceil() as u64
    }
}
