//! Gridbound Demo
//!
//! Headless run of the simulation core: loads a small built-in level,
//! scripts a few seconds of hero input at a fixed 60 Hz step and logs
//! the events the world produces along the way.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use gridbound::sim::step::{render, step};
use gridbound::{InputState, OccupancyGrid, Tuning, World, NOMINAL_FRAME_RATE, VERSION};

/// Floored corridor with the hero on the left, a coin in the middle and
/// a patrolling enemy near the right wall.
const LEVEL: &str = "\
Width 12
Height 5
0 0 0 0 0 0 0 0 0 0 0 0
1 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 4 0 0 0 0 0 1
1 2 0 4 0 0 0 0 3 0 0 1
1 1 1 1 1 1 1 1 1 1 1 1
";

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
        )
        .init();

    info!("gridbound demo v{}", VERSION);

    let grid = OccupancyGrid::load(LEVEL.as_bytes())?;
    let mut world = World::new(grid, Tuning::default());

    let dt = 1.0 / NOMINAL_FRAME_RATE as f32;
    let frames = NOMINAL_FRAME_RATE * 10;

    for frame in 0..frames {
        // Walk right for the first half, jumping once a second, then idle
        // and let the patrol play out.
        let input = if frame < frames / 2 {
            InputState {
                right: true,
                jump: frame % NOMINAL_FRAME_RATE == 0,
                ..InputState::IDLE
            }
        } else {
            InputState::IDLE
        };

        step(&mut world, input, dt);

        for event in world.take_events() {
            info!(frame, ?event, "simulation event");
        }
    }

    let draw_calls = render(&world).count();
    info!(
        frames,
        draw_calls,
        lives = world.lives,
        coins_collected = world.coins_collected,
        coins_remaining = world.coins_remaining,
        "demo finished"
    );

    Ok(())
}
