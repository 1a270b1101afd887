//! AI opponent: trajectory prediction with wall-bounce unfolding, difficulty
//! scaled reaction time, aim error, movement speed and tilt mimicry.

use rand::Rng;

use crate::geometry::{approach_angle_deg, unfold_wall_bounces};
use crate::{Ball, Config, Difficulty, GameRng, Paddle, Params};

/// Tuning bundle for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyParams {
    /// Ticks between decisions
    pub reaction_delay: u32,
    /// Fraction of the paddle's base speed used per step
    pub speed_multiplier: f32,
    /// Scale on the positional aim error
    pub error_scale: f32,
    /// Fraction of the paddle's tilt speed used per step
    pub tilt_speed_multiplier: f32,
    /// Chance of deliberately whiffing a return
    pub miss_chance: f64,
}

const DIFFICULTY_TABLE: [DifficultyParams; 3] = [
    // Easy
    DifficultyParams {
        reaction_delay: 15,
        speed_multiplier: 0.7,
        error_scale: 2.0,
        tilt_speed_multiplier: 0.5,
        miss_chance: 0.15,
    },
    // Medium
    DifficultyParams {
        reaction_delay: 8,
        speed_multiplier: 0.85,
        error_scale: 1.0,
        tilt_speed_multiplier: 0.8,
        miss_chance: 0.05,
    },
    // Hard
    DifficultyParams {
        reaction_delay: 2,
        speed_multiplier: 1.0,
        error_scale: 0.3,
        tilt_speed_multiplier: 1.0,
        miss_chance: 0.01,
    },
];

impl Difficulty {
    pub fn params(self) -> DifficultyParams {
        DIFFICULTY_TABLE[self as usize]
    }
}

/// Drives the paddle it is attached to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiController {
    difficulty: Difficulty,
    params: DifficultyParams,
    reaction_counter: u32,
}

impl AiController {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            params: difficulty.params(),
            reaction_counter: 0,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn params(&self) -> &DifficultyParams {
        &self.params
    }

    pub fn reaction_counter(&self) -> u32 {
        self.reaction_counter
    }

    /// Switch tiers; the reaction counter carries over
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.params = difficulty.params();
    }

    /// Run one tick. Returns true when the controller made a decision this tick.
    pub fn update(
        &mut self,
        paddle: &mut Paddle,
        ball: &Ball,
        config: &Config,
        rng: &mut GameRng,
    ) -> bool {
        self.reaction_counter += 1;
        if self.reaction_counter < self.params.reaction_delay {
            return false;
        }
        self.reaction_counter = 0;

        let target_y = self.predict_ball_y(paddle, ball, config.arena_height) + self.aim_error(rng);
        self.move_paddle(paddle, target_y, config.arena_height);
        self.tilt_paddle(paddle, ball, rng);
        true
    }

    /// Where the ball will cross this paddle's x, with wall bounces unfolded.
    /// A ball with no horizontal motion predicts the arena's vertical centre.
    pub fn predict_ball_y(&self, paddle: &Paddle, ball: &Ball, arena_height: f32) -> f32 {
        if ball.vel.x == 0.0 {
            return arena_height / 2.0;
        }

        let time_to_paddle = (paddle.x - ball.pos.x).abs() / ball.vel.x.abs();
        let projected = ball.pos.y + ball.vel.y * time_to_paddle;
        unfold_wall_bounces(projected, arena_height)
    }

    /// Uniform, zero-mean aim error sized by difficulty
    fn aim_error(&self, rng: &mut GameRng) -> f32 {
        (rng.0.gen::<f32>() - 0.5) * Params::AI_BASE_ERROR * self.params.error_scale
    }

    fn move_paddle(&self, paddle: &mut Paddle, target_y: f32, arena_height: f32) {
        let distance = target_y - paddle.center_y();
        if distance.abs() <= Params::AI_DEAD_ZONE {
            return;
        }
        let step = paddle.speed * self.params.speed_multiplier;
        paddle.move_by(step.copysign(distance), arena_height);
    }

    /// Lean into the ball's approach angle
    fn tilt_paddle(&self, paddle: &mut Paddle, ball: &Ball, rng: &mut GameRng) {
        let optimal = approach_angle_deg(ball.vel) * Params::AI_TILT_FOLLOW;
        let target = optimal + self.aim_error(rng) * Params::AI_TILT_ERROR_SCALE;
        let step = paddle.tilt_speed * self.params.tilt_speed_multiplier;

        if paddle.tilt < target - Params::AI_TILT_DEAD_ZONE {
            paddle.tilt_by(step);
        } else if paddle.tilt > target + Params::AI_TILT_DEAD_ZONE {
            paddle.tilt_by(-step);
        }
    }

    /// Roll for a deliberate miss
    pub fn should_miss(&self, rng: &mut GameRng) -> bool {
        rng.0.gen_bool(self.params.miss_chance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;
    use glam::Vec2;

    fn setup(difficulty: Difficulty) -> (AiController, Paddle, Ball, Config, GameRng) {
        let config = Config::new();
        let paddle = Paddle::new(Side::Right, &config);
        let mut ball = Ball::new(Side::Left, &config);
        ball.is_serving = false;
        (
            AiController::new(difficulty),
            paddle,
            ball,
            config,
            GameRng::new(99),
        )
    }

    #[test]
    fn test_difficulty_table_is_monotonic() {
        let easy = Difficulty::Easy.params();
        let medium = Difficulty::Medium.params();
        let hard = Difficulty::Hard.params();

        assert!(hard.reaction_delay < medium.reaction_delay);
        assert!(medium.reaction_delay < easy.reaction_delay);
        assert!(hard.speed_multiplier > medium.speed_multiplier);
        assert!(medium.speed_multiplier > easy.speed_multiplier);
        assert!(hard.error_scale < medium.error_scale);
        assert!(medium.error_scale < easy.error_scale);
        assert!(hard.tilt_speed_multiplier > easy.tilt_speed_multiplier);
        assert!(hard.miss_chance < easy.miss_chance);
    }

    #[test]
    fn test_reaction_delay_throttles_decisions() {
        let (mut ai, mut paddle, mut ball, config, mut rng) = setup(Difficulty::Medium);
        ball.pos = Vec2::new(400.0, 20.0);
        ball.vel = Vec2::new(5.0, 0.0);
        let delay = ai.params().reaction_delay;

        for tick in 1..delay {
            assert!(!ai.update(&mut paddle, &ball, &config, &mut rng), "tick {tick}");
            assert_eq!(paddle.y, config.paddle_spawn_y());
        }
        assert!(ai.update(&mut paddle, &ball, &config, &mut rng));
        assert_eq!(ai.reaction_counter(), 0);
        assert!(paddle.y < config.paddle_spawn_y(), "Moved toward the ball");
    }

    #[test]
    fn test_prediction_straight_line() {
        let (ai, paddle, mut ball, config, _) = setup(Difficulty::Hard);
        ball.pos = Vec2::new(400.0, 100.0);
        ball.vel = Vec2::new(5.0, 1.0);
        // 355 px away at 5 px/tick = 71 ticks
        let y = ai.predict_ball_y(&paddle, &ball, config.arena_height);
        assert!((y - 171.0).abs() < 1e-3, "got {y}");
    }

    #[test]
    fn test_prediction_unfolds_bottom_wall() {
        let (ai, paddle, mut ball, config, _) = setup(Difficulty::Hard);
        ball.pos = Vec2::new(400.0, 390.0);
        ball.vel = Vec2::new(5.0, 5.0);

        let y = ai.predict_ball_y(&paddle, &ball, config.arena_height);

        // Linear projection would be 745; one bounce mirrors it to 55
        assert!((y - 55.0).abs() < 1e-3, "got {y}");
    }

    #[test]
    fn test_prediction_defaults_to_center_without_horizontal_motion() {
        let (ai, paddle, mut ball, config, _) = setup(Difficulty::Hard);
        ball.pos = Vec2::new(400.0, 30.0);
        ball.vel = Vec2::ZERO;
        assert_eq!(
            ai.predict_ball_y(&paddle, &ball, config.arena_height),
            config.arena_height / 2.0
        );
    }

    #[test]
    fn test_dead_zone_prevents_jitter() {
        let (ai, mut paddle, _, config, _) = setup(Difficulty::Hard);
        let y = paddle.y;
        let near = paddle.center_y() + 4.0;
        ai.move_paddle(&mut paddle, near, config.arena_height);
        assert_eq!(paddle.y, y);
        let far = paddle.center_y() + 40.0;
        ai.move_paddle(&mut paddle, far, config.arena_height);
        assert_eq!(paddle.y, y + paddle.speed);
    }

    #[test]
    fn test_movement_speed_scales_with_difficulty() {
        let (easy, mut slow, _, config, _) = setup(Difficulty::Easy);
        let (hard, mut fast, _, _, _) = setup(Difficulty::Hard);
        let start = slow.y;
        easy.move_paddle(&mut slow, 0.0, config.arena_height);
        hard.move_paddle(&mut fast, 0.0, config.arena_height);
        assert!((start - slow.y - slow.speed * 0.7).abs() < 1e-4);
        assert!((start - fast.y - fast.speed).abs() < 1e-4);
    }

    #[test]
    fn test_tilt_follows_approach_angle() {
        let (ai, mut paddle, mut ball, config, mut rng) = setup(Difficulty::Hard);
        // Steep downward approach: 45 degrees -> target tilt ~22.5
        ball.vel = Vec2::new(5.0, 5.0);
        for _ in 0..30 {
            ai.tilt_paddle(&mut paddle, &ball, &mut rng);
            paddle.clamp(config.arena_height);
        }
        assert!(paddle.tilt > 15.0 && paddle.tilt < 30.0, "tilt {}", paddle.tilt);
        assert!(paddle.tilt <= paddle.max_tilt);
    }

    #[test]
    fn test_paddle_stays_in_bounds_under_ai() {
        let (mut ai, mut paddle, mut ball, config, mut rng) = setup(Difficulty::Hard);
        ball.pos = Vec2::new(400.0, 5.0);
        ball.vel = Vec2::new(5.0, -0.01);
        for _ in 0..500 {
            ai.update(&mut paddle, &ball, &config, &mut rng);
            assert!(paddle.y >= 0.0 && paddle.y <= config.arena_height - paddle.height);
            assert!(paddle.tilt.abs() <= paddle.max_tilt);
        }
    }

    #[test]
    fn test_set_difficulty_keeps_counter() {
        let (mut ai, mut paddle, ball, config, mut rng) = setup(Difficulty::Easy);
        ai.update(&mut paddle, &ball, &config, &mut rng);
        ai.update(&mut paddle, &ball, &config, &mut rng);
        ai.set_difficulty(Difficulty::Hard);
        assert_eq!(ai.difficulty(), Difficulty::Hard);
        assert_eq!(ai.reaction_counter(), 2);
        assert_eq!(ai.params().reaction_delay, 2);
    }

    #[test]
    fn test_should_miss_rate_tracks_difficulty() {
        let mut rng = GameRng::new(5);
        let easy = AiController::new(Difficulty::Easy);
        let hard = AiController::new(Difficulty::Hard);
        let easy_misses = (0..2000).filter(|_| easy.should_miss(&mut rng)).count();
        let hard_misses = (0..2000).filter(|_| hard.should_miss(&mut rng)).count();
        assert!(easy_misses > hard_misses);
    }
}
