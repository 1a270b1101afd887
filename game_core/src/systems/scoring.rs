use hecs::World;

use crate::{Ball, Config, GameRng, Paddle, Side};

/// Re-centre both paddles, straighten them, and park the ball on `server`'s paddle
pub fn reset_round(world: &mut World, config: &Config, server: Side) {
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        paddle.reset(config.arena_height);
    }
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.reset_for_serve(server, config);
    }
}

/// Launch a waiting ball. Returns the server when a serve happened.
pub fn serve_ball(
    world: &mut World,
    config: &Config,
    rng: &mut GameRng,
    now_ms: f64,
) -> Option<Side> {
    let mut served = None;
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if ball.is_serving {
            ball.serve(config, rng, now_ms);
            served = Some(ball.serving);
        }
    }
    served
}

/// Whether the ball is parked waiting for a serve
pub fn ball_waiting(world: &World) -> bool {
    world
        .query::<&Ball>()
        .iter()
        .any(|(_entity, ball)| ball.is_serving)
}

/// Apply a new speed setting to the ball in play
pub fn set_ball_speed(world: &mut World, config: &Config, speed: f32) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.set_speed(speed, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle};
    use glam::Vec2;

    fn setup_world() -> (World, Config, GameRng) {
        let mut world = World::new();
        let config = Config::new();
        create_paddle(&mut world, Side::Left, &config);
        create_paddle(&mut world, Side::Right, &config);
        (world, config, GameRng::new(12345))
    }

    #[test]
    fn test_reset_round_restores_paddles_and_ball() {
        let (mut world, config, mut rng) = setup_world();
        let ball = create_ball(&mut world, Side::Left, &config);
        for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
            paddle.move_by(-100.0, config.arena_height);
            paddle.tilt_by(20.0);
        }
        serve_ball(&mut world, &config, &mut rng, 0.0);
        {
            let mut b = world.get::<&mut Ball>(ball).unwrap();
            b.speed = 12.0;
            b.pos = Vec2::new(500.0, 30.0);
        }

        reset_round(&mut world, &config, Side::Right);

        for (_entity, paddle) in world.query::<&Paddle>().iter() {
            assert_eq!(paddle.tilt, 0.0, "Tilt resets");
            assert_eq!(paddle.y, config.paddle_spawn_y(), "Paddle re-centred");
        }
        let b = world.get::<&Ball>(ball).unwrap();
        assert!(b.is_serving);
        assert_eq!(b.serving, Side::Right);
        assert_eq!(b.speed, config.ball_speed, "Speed back to base");
        assert_eq!(b.vel, Vec2::ZERO);
    }

    #[test]
    fn test_serve_ball_only_once() {
        let (mut world, config, mut rng) = setup_world();
        create_ball(&mut world, Side::Right, &config);
        assert!(ball_waiting(&world));

        assert_eq!(serve_ball(&mut world, &config, &mut rng, 5.0), Some(Side::Right));
        assert!(!ball_waiting(&world));
        assert_eq!(serve_ball(&mut world, &config, &mut rng, 6.0), None);
    }

    #[test]
    fn test_set_ball_speed_rescales_velocity() {
        let (mut world, config, mut rng) = setup_world();
        let ball = create_ball(&mut world, Side::Left, &config);
        serve_ball(&mut world, &config, &mut rng, 0.0);

        set_ball_speed(&mut world, &config, 10.0);

        let b = world.get::<&Ball>(ball).unwrap();
        assert!((b.vel.length() - 10.0).abs() < 1e-4);
        assert_eq!(b.base_speed, 10.0);
    }
}
