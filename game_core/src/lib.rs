pub mod ai;
pub mod components;
pub mod config;
pub mod error;
pub mod fsm;
pub mod game_state;
pub mod geometry;
pub mod params;
pub mod resources;
pub mod scheduler;
pub mod session;
pub mod snapshot;
pub mod systems;

pub use ai::*;
pub use components::*;
pub use config::*;
pub use error::*;
pub use fsm::*;
pub use game_state::*;
pub use geometry::*;
pub use params::*;
pub use resources::*;
pub use scheduler::*;
pub use session::*;
pub use snapshot::*;

use hecs::World;
use systems::*;

/// Run one fixed-step tick of the simulation.
///
/// Order: inputs, human paddles, AI paddles, ball. Returns the side that
/// scored this tick, if any.
pub fn step(
    world: &mut World,
    config: &Config,
    inputs: &InputState,
    events: &mut Events,
    rng: &mut GameRng,
) -> Option<Side> {
    // Clear events at start of tick
    events.clear();

    // 1. Ingest inputs (apply to human paddle intents)
    ingest_inputs(world, inputs);

    // 2. Move human paddles based on intents
    move_paddles(world, config);

    // 3. Let the AI steer its paddle
    drive_ai_paddles(world, config, rng);

    // 4. Move ball, bounce, detect scoring
    advance_ball(world, config, events)
}

/// Helper to create a paddle entity, driven by the AI or by held inputs
pub fn create_paddle(world: &mut World, side: Side, config: &Config) -> hecs::Entity {
    let paddle = Paddle::new(side, config);
    if config.is_ai_side(side) {
        world.spawn((paddle, AiController::new(config.difficulty)))
    } else {
        world.spawn((paddle, PaddleIntent::new()))
    }
}

/// Helper to create the ball entity, resting on `server`'s paddle
pub fn create_ball(world: &mut World, server: Side, config: &Config) -> hecs::Entity {
    world.spawn((Ball::new(server, config),))
}
