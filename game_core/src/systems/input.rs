use hecs::World;

use crate::components::*;
use crate::resources::*;

/// Copy this tick's sampled inputs onto the human-driven paddles.
///
/// AI paddles carry no `PaddleIntent`, so they never pick up human input.
pub fn ingest_inputs(world: &mut World, inputs: &InputState) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&Paddle, &mut PaddleIntent)>() {
        *intent = inputs.get(paddle.side);
    }
}
