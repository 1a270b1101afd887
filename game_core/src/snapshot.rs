use serde::Serialize;

use crate::{Ball, CountdownStep, MatchState, Paddle, Side};

/// What a renderer needs to draw the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl From<&Ball> for BallView {
    fn from(ball: &Ball) -> Self {
        Self {
            x: ball.pos.x,
            y: ball.pos.y,
            radius: ball.radius,
        }
    }
}

/// What a renderer needs to draw one paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaddleView {
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub tilt: f32,
}

impl From<&Paddle> for PaddleView {
    fn from(paddle: &Paddle) -> Self {
        Self {
            side: paddle.side,
            x: paddle.x,
            y: paddle.y,
            width: paddle.width,
            height: paddle.height,
            tilt: paddle.tilt,
        }
    }
}

/// Read-only view of a match handed to render sinks and input sources
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tick: u32,
    pub arena_width: f32,
    pub arena_height: f32,
    pub ball: Option<BallView>,
    pub left: Option<PaddleView>,
    pub right: Option<PaddleView>,
    pub score_left: u8,
    pub score_right: u8,
    pub match_state: MatchState,
    /// Countdown step currently on screen, if any
    pub countdown: Option<CountdownStep>,
    pub paused: bool,
}

impl RenderSnapshot {
    pub fn paddle(&self, side: Side) -> Option<&PaddleView> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }
}
