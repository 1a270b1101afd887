use hecs::World;

use crate::{AiController, Ball, Config, GameRng, Paddle};

/// Let every AI controller steer its paddle toward the ball
pub fn drive_ai_paddles(world: &mut World, config: &Config, rng: &mut GameRng) {
    let ball = {
        let mut query = world.query::<&Ball>();
        query.iter().map(|(_, ball)| *ball).next()
    };
    let Some(ball) = ball else {
        return;
    };

    for (_entity, (paddle, ai)) in world.query_mut::<(&mut Paddle, &mut AiController)>() {
        ai.update(paddle, &ball, config, rng);
    }
}
