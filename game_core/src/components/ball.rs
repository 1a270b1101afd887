use glam::Vec2;
use rand::Rng;
use tracing::debug;

use super::{Paddle, Side};
use crate::geometry::launch_velocity;
use crate::{Aabb, Config, Events, GameRng};

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Speed every serve starts from
    pub base_speed: f32,
    /// Speed of the current rally
    pub speed: f32,
    pub serving: Side,
    pub is_serving: bool,
    pub serve_time_ms: Option<f64>,
}

impl Ball {
    /// Ball resting on `server`'s paddle, waiting to be served
    pub fn new(server: Side, config: &Config) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: config.ball_radius,
            base_speed: config.ball_speed,
            speed: config.ball_speed,
            serving: server,
            is_serving: true,
            serve_time_ms: None,
        };
        ball.reset_for_serve(server, config);
        ball
    }

    /// Stop the ball on the face of `server`'s paddle and restore the base speed
    pub fn reset_for_serve(&mut self, server: Side, config: &Config) {
        self.speed = self.base_speed;
        self.vel = Vec2::ZERO;
        let x = match server {
            Side::Left => config.paddle_x(Side::Left) + config.paddle_width + self.radius,
            Side::Right => config.paddle_x(Side::Right) - self.radius,
        };
        self.pos = Vec2::new(x, config.arena_height / 2.0);
        self.serving = server;
        self.is_serving = true;
    }

    /// Launch the ball toward the serving side's opponent
    pub fn serve(&mut self, config: &Config, rng: &mut GameRng, now_ms: f64) {
        if !self.is_serving {
            return;
        }

        let angle = rng
            .0
            .gen_range(-config.serve_max_angle..=config.serve_max_angle);
        let min_dy = self.speed * config.serve_min_dy_fraction;
        self.vel = launch_velocity(self.speed, angle, self.serving.direction(), min_dy);
        self.serve_time_ms = Some(now_ms);
        self.is_serving = false;

        debug!(
            server = ?self.serving,
            angle,
            dx = self.vel.x,
            dy = self.vel.y,
            speed = self.speed,
            "Ball served"
        );
    }

    /// Advance one tick. Returns the side that scored, if the ball left the arena.
    ///
    /// Missing paddles are skipped; a serving ball only follows its server.
    pub fn update(
        &mut self,
        left: Option<&Paddle>,
        right: Option<&Paddle>,
        config: &Config,
        events: &mut Events,
    ) -> Option<Side> {
        if self.is_serving {
            let server = match self.serving {
                Side::Left => left,
                Side::Right => right,
            };
            if let Some(paddle) = server {
                self.pos.y = paddle.center_y();
            }
            return None;
        }

        self.pos += self.vel;

        // Top/bottom walls
        let r = self.radius;
        if self.pos.y - r <= 0.0 {
            self.vel.y = self.vel.y.abs();
            self.pos.y = r;
            events.ball_hit_wall = true;
        } else if self.pos.y + r >= config.arena_height {
            self.vel.y = -self.vel.y.abs();
            self.pos.y = config.arena_height - r;
            events.ball_hit_wall = true;
        }

        for paddle in [left, right].into_iter().flatten() {
            if self.check_paddle_collision(paddle, config) {
                events.ball_hit_paddle = Some(paddle.side);
            }
        }

        if self.pos.x - r <= 0.0 {
            Some(Side::Right)
        } else if self.pos.x + r >= config.arena_width {
            Some(Side::Left)
        } else {
            None
        }
    }

    /// Rebound off `paddle` if the ball overlaps it while travelling toward it.
    ///
    /// The rebound angle comes from where the ball struck the paddle face
    /// (top edge -45, centre 0, bottom edge +45) plus the paddle's tilt.
    pub fn check_paddle_collision(&mut self, paddle: &Paddle, config: &Config) -> bool {
        let ball_box = Aabb::from_center_size(self.pos, Vec2::splat(self.radius * 2.0));
        if !ball_box.overlaps(&paddle.bounds()) {
            return false;
        }

        // Already heading away: it was handled on an earlier tick
        let out = paddle.side.direction();
        if self.vel.x * out > 0.0 {
            return false;
        }

        // Flush against the face so the ball cannot sink in
        self.pos.x = match paddle.side {
            Side::Left => paddle.x + paddle.width + self.radius,
            Side::Right => paddle.x - self.radius,
        };

        let collision_point = ((self.pos.y - paddle.y) / paddle.height).clamp(0.0, 1.0);
        let base_angle = (collision_point - 0.5) * 2.0 * config.ball_max_bounce_angle;
        let total_angle = base_angle + paddle.tilt;

        let previous = self.speed;
        self.speed = (self.speed * config.ball_speed_increase)
            .min(config.ball_speed_max)
            .max(previous);
        self.vel = launch_velocity(self.speed, total_angle, out, config.ball_min_bounce_dy);

        debug!(
            paddle = ?paddle.side,
            collision_point,
            tilt = paddle.tilt,
            total_angle,
            "Paddle hit, speed {:.2} -> {:.2}",
            previous,
            self.speed
        );
        true
    }

    /// Change the speed setting, keeping the current direction of travel.
    ///
    /// Also becomes the base speed for later serves. The value is clamped to
    /// what the physics supports.
    pub fn set_speed(&mut self, new_speed: f32, config: &Config) {
        let new_speed = config.clamp_ball_speed(new_speed);
        let current = self.vel.length();
        if current > 0.0 {
            self.vel = self.vel / current * new_speed;
        }
        debug!("Ball speed {:.2} -> {:.2}", self.speed, new_speed);
        self.base_speed = new_speed;
        self.speed = new_speed;
    }
}
