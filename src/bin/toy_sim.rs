//! Headless simulation driver
//!
//! Runs the core with synthetic input: periodic spawns and speed boosts
//! standing in for key presses, plus a focus signal that flips halfway
//! through. Logs lifecycle events and the score curve.

use clap::Parser;
use pulsefield::core::config::SimulationConfig;
use pulsefield::core::error::Result;
use pulsefield::entity::shape::Orientation;
use pulsefield::simulation::state::SimulationState;
use pulsefield::simulation::tick::{run_simulation_tick, SimulationEvent};
use pulsefield::view::RenderView;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "toy_sim", about = "Run the shape simulation headless")]
struct Args {
    /// Number of ticks to run
    #[arg(long, default_value_t = 1800)]
    ticks: u64,

    /// RNG seed; identical seeds give identical runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 720.0)]
    height: f32,

    /// Spawn a shape every N ticks
    #[arg(long, default_value_t = 45)]
    spawn_every: u64,

    /// Boost speed every N ticks (0 disables)
    #[arg(long, default_value_t = 300)]
    boost_every: u64,

    /// Optional TOML config overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let mut state = SimulationState::new(config, args.width, args.height, args.seed);
    tracing::info!(
        ticks = args.ticks,
        seed = args.seed,
        "starting headless simulation"
    );

    for tick in 1..=args.ticks {
        let mut events = Vec::new();

        // Synthetic input: rotate through the shape kinds
        if args.spawn_every > 0 && tick % args.spawn_every == 0 {
            events.extend(match (tick / args.spawn_every) % 4 {
                0 => state.spawn_circle(),
                1 => state.spawn_line(Orientation::Horizontal),
                2 => state.spawn_polygon(4),
                _ => state.spawn_line(Orientation::Vertical),
            });
        }
        if args.boost_every > 0 && tick % args.boost_every == 0 {
            events.extend(state.boost_speed(2.0));
        }

        let is_focused = tick < args.ticks / 2;
        events.extend(run_simulation_tick(&mut state, is_focused));

        for event in &events {
            if let SimulationEvent::AudioCue { cue, frequency } = event {
                tracing::debug!(?cue, frequency, "audio cue");
            }
        }

        if tick % 60 == 0 {
            let view = RenderView::capture(&state);
            tracing::info!(
                tick,
                shapes = state.shape_count(),
                score = state.score,
                saturation = view.saturation_multiplier,
                "status"
            );
        }
    }

    tracing::info!(score = state.score, shapes = state.shape_count(), "run complete");
    Ok(())
}
