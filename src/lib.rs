//! Pulsefield - headless simulation core for generative shape toys
//!
//! Animated shapes (growing circles, oscillating lines, spinning polygons)
//! and steering agents decay through an Active -> Warning -> Dying
//! lifecycle driven by input inactivity. The crate owns all simulation
//! state and emits audio-cue events; rendering and sound are the caller's
//! problem.

pub mod core;
pub mod entity;
pub mod simulation;
pub mod steering;
pub mod view;
