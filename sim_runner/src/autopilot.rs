use game_core::{InputSource, PaddleIntent, Params, RenderSnapshot, Side};

/// Stand-in for a human player: chases the ball, meeting it off-centre so
/// returns are angled toward the far half of the arena, and keeps the
/// paddle level.
pub struct Autopilot {
    dead_zone: f32,
    edge_offset: f32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self {
            dead_zone: Params::AI_DEAD_ZONE,
            edge_offset: Params::PADDLE_HEIGHT / 4.0,
        }
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for Autopilot {
    fn sample(&mut self, side: Side, snapshot: &RenderSnapshot) -> PaddleIntent {
        let (Some(ball), Some(paddle)) = (snapshot.ball, snapshot.paddle(side)) else {
            return PaddleIntent::new();
        };

        // Lower half of the paddle sends the ball down, upper half sends it up
        let target = if ball.y < snapshot.arena_height / 2.0 {
            ball.y - self.edge_offset
        } else {
            ball.y + self.edge_offset
        };
        let offset = target - (paddle.y + paddle.height / 2.0);

        PaddleIntent {
            up: offset < -self.dead_zone,
            down: offset > self.dead_zone,
            tilt_left: paddle.tilt > 0.0,
            tilt_right: paddle.tilt < 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Config, GameState};

    #[test]
    fn test_chases_ball() {
        let gs = GameState::new(Config::new(), 1);
        let mut snapshot = gs.snapshot(false);
        let mut pilot = Autopilot::new();

        if let Some(ball) = snapshot.ball.as_mut() {
            ball.y = 20.0;
        }
        let intent = pilot.sample(Side::Left, &snapshot);
        assert!(intent.up && !intent.down);

        if let Some(ball) = snapshot.ball.as_mut() {
            ball.y = 380.0;
        }
        let intent = pilot.sample(Side::Left, &snapshot);
        assert!(intent.down && !intent.up);
    }

    #[test]
    fn test_levels_tilted_paddle() {
        let gs = GameState::new(Config::new(), 1);
        let mut snapshot = gs.snapshot(false);
        if let Some(paddle) = snapshot.left.as_mut() {
            paddle.tilt = 10.0;
        }
        let intent = Autopilot::new().sample(Side::Left, &snapshot);
        assert!(intent.tilt_left && !intent.tilt_right);
    }
}
