use glam::Vec2;

use super::Side;
use crate::{Aabb, Config};

/// Paddle component
///
/// `x`/`y` is the top-left corner in canvas coordinates. `tilt` is in degrees;
/// positive tilt sends rebounds downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub tilt: f32,
    pub max_tilt: f32,
    pub speed: f32,
    pub tilt_speed: f32,
}

impl Paddle {
    pub fn new(side: Side, config: &Config) -> Self {
        Self {
            side,
            x: config.paddle_x(side),
            y: config.paddle_spawn_y(),
            width: config.paddle_width,
            height: config.paddle_height,
            tilt: 0.0,
            max_tilt: config.paddle_max_tilt,
            speed: config.paddle_speed,
            tilt_speed: config.paddle_tilt_speed,
        }
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(
            Vec2::new(self.x, self.y),
            Vec2::new(self.width, self.height),
        )
    }

    /// Apply one tick of held movement/tilt intents
    pub fn update(&mut self, intent: &PaddleIntent, arena_height: f32) {
        if intent.up {
            self.y -= self.speed;
        }
        if intent.down {
            self.y += self.speed;
        }
        if intent.tilt_left {
            self.tilt -= self.tilt_speed;
        }
        if intent.tilt_right {
            self.tilt += self.tilt_speed;
        }
        self.clamp(arena_height);
    }

    /// Move vertically by `dy`, saturating at the arena edges
    pub fn move_by(&mut self, dy: f32, arena_height: f32) {
        self.y += dy;
        self.clamp(arena_height);
    }

    /// Rotate by `degrees`, saturating at `max_tilt`
    pub fn tilt_by(&mut self, degrees: f32) {
        self.tilt = (self.tilt + degrees).clamp(-self.max_tilt, self.max_tilt);
    }

    pub fn clamp(&mut self, arena_height: f32) {
        self.y = self.y.clamp(0.0, (arena_height - self.height).max(0.0));
        self.tilt = self.tilt.clamp(-self.max_tilt, self.max_tilt);
    }

    /// Re-centre and straighten the paddle
    pub fn reset(&mut self, arena_height: f32) {
        self.y = arena_height / 2.0 - self.height / 2.0;
        self.tilt = 0.0;
    }
}

/// Held inputs for a human paddle, sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleIntent {
    pub up: bool,
    pub down: bool,
    pub tilt_left: bool,
    pub tilt_right: bool,
}

impl PaddleIntent {
    pub fn new() -> Self {
        Self::default()
    }
}
