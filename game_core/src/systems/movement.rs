use hecs::World;

use crate::{Ball, Config, Events, Paddle, PaddleIntent, Side};

/// Apply held intents to human paddles
pub fn move_paddles(world: &mut World, config: &Config) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&mut Paddle, &PaddleIntent)>() {
        paddle.update(intent, config.arena_height);
    }
}

/// Snapshot of both paddles, looked up by side
pub fn paddles_by_side(world: &World) -> (Option<Paddle>, Option<Paddle>) {
    let mut left = None;
    let mut right = None;
    for (_entity, paddle) in world.query::<&Paddle>().iter() {
        match paddle.side {
            Side::Left => left = Some(*paddle),
            Side::Right => right = Some(*paddle),
        }
    }
    (left, right)
}

/// Move the ball, resolve walls and paddles, and report a score.
///
/// Sets `events.scored` when the ball leaves the arena.
pub fn advance_ball(world: &mut World, config: &Config, events: &mut Events) -> Option<Side> {
    let (left, right) = paddles_by_side(world);

    let mut scored = None;
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if let Some(side) = ball.update(left.as_ref(), right.as_ref(), config, events) {
            scored = Some(side);
        }
    }

    if scored.is_some() {
        events.scored = scored;
    }
    scored
}
