use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Params, Side};

/// Who drives the right paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Left paddle is human, right paddle is the AI
    #[default]
    OnePlayer,
    TwoPlayer,
}

impl FromStr for GameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-player" | "1p" => Ok(GameMode::OnePlayer),
            "two-player" | "2p" => Ok(GameMode::TwoPlayer),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// AI difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ConfigError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Game configuration, fixed for the duration of a match except `ball_speed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub ball_speed: f32,
    pub arena_width: f32,
    pub arena_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_margin: f32,
    pub paddle_max_tilt: f32,
    pub paddle_tilt_speed: f32,
    pub ball_radius: f32,
    pub ball_speed_max: f32,
    pub ball_speed_increase: f32,
    pub ball_min_bounce_dy: f32,
    pub ball_max_bounce_angle: f32,
    pub serve_max_angle: f32,
    pub serve_min_dy_fraction: f32,
    pub win_score: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            difficulty: Difficulty::default(),
            ball_speed: Params::BALL_SPEED_INITIAL,
            arena_width: Params::ARENA_WIDTH,
            arena_height: Params::ARENA_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_speed: Params::PADDLE_SPEED,
            paddle_margin: Params::PADDLE_MARGIN,
            paddle_max_tilt: Params::PADDLE_MAX_TILT,
            paddle_tilt_speed: Params::PADDLE_TILT_SPEED,
            ball_radius: Params::BALL_RADIUS,
            ball_speed_max: Params::BALL_SPEED_MAX,
            ball_speed_increase: Params::BALL_SPEED_INCREASE,
            ball_min_bounce_dy: Params::BALL_MIN_BOUNCE_DY,
            ball_max_bounce_angle: Params::BALL_MAX_BOUNCE_ANGLE,
            serve_max_angle: Params::SERVE_MAX_ANGLE,
            serve_min_dy_fraction: Params::SERVE_MIN_DY_FRACTION,
            win_score: Params::WIN_SCORE,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the left edge X of a side's paddle
    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.paddle_margin,
            Side::Right => self.arena_width - self.paddle_margin - self.paddle_width,
        }
    }

    /// Top edge of a vertically centred paddle
    pub fn paddle_spawn_y(&self) -> f32 {
        self.arena_height / 2.0 - self.paddle_height / 2.0
    }

    /// Whether the AI drives this side
    pub fn is_ai_side(&self, side: Side) -> bool {
        self.mode == GameMode::OnePlayer && side == Side::Right
    }

    /// Clamp a requested ball speed into the range the physics supports
    pub fn clamp_ball_speed(&self, speed: f32) -> f32 {
        speed.clamp(self.ball_min_bounce_dy, self.ball_speed_max)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("paddle_tilt_speed", self.paddle_tilt_speed),
            ("ball_radius", self.ball_radius),
            ("ball_speed_max", self.ball_speed_max),
            ("ball_min_bounce_dy", self.ball_min_bounce_dy),
            ("serve_max_angle", self.serve_max_angle),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.paddle_height > self.arena_height {
            return Err(ConfigError::PaddleTallerThanArena {
                paddle_height: self.paddle_height,
                arena_height: self.arena_height,
            });
        }

        if !(self.ball_speed >= self.ball_min_bounce_dy && self.ball_speed <= self.ball_speed_max) {
            return Err(ConfigError::BallSpeedOutOfRange {
                speed: self.ball_speed,
                min: self.ball_min_bounce_dy,
                max: self.ball_speed_max,
            });
        }

        if !(self.ball_speed_increase >= 1.0) {
            return Err(ConfigError::SpeedIncreaseBelowOne(self.ball_speed_increase));
        }

        if self.win_score == 0 {
            return Err(ConfigError::ZeroWinScore);
        }

        Ok(())
    }
}
