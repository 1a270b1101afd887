/// Game tuning parameters for Tilt Pong
///
/// Distances are in canvas pixels, speeds in pixels per tick, angles in degrees.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Arena
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 400.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 15.0;
    pub const PADDLE_HEIGHT: f32 = 80.0;
    pub const PADDLE_SPEED: f32 = 6.0;
    pub const PADDLE_MARGIN: f32 = 30.0; // Gap between arena edge and paddle
    pub const PADDLE_MAX_TILT: f32 = 30.0;
    pub const PADDLE_TILT_SPEED: f32 = 2.0;

    // Ball
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_SPEED_INITIAL: f32 = 7.0;
    pub const BALL_SPEED_MAX: f32 = 15.0;
    pub const BALL_SPEED_INCREASE: f32 = 1.05; // Multiply speed on paddle hit
    pub const BALL_MIN_BOUNCE_DY: f32 = 1.0;
    pub const BALL_MAX_BOUNCE_ANGLE: f32 = 45.0; // Edge hits leave at +-45 before tilt

    // Serve
    pub const SERVE_MAX_ANGLE: f32 = 22.5;
    pub const SERVE_MIN_DY_FRACTION: f32 = 0.2;

    // Score
    pub const WIN_SCORE: u8 = 11;

    // AI
    pub const AI_DEAD_ZONE: f32 = 5.0;
    pub const AI_TILT_DEAD_ZONE: f32 = 2.0;
    pub const AI_TILT_FOLLOW: f32 = 0.5; // Fraction of the ball's approach angle mirrored as tilt
    pub const AI_BASE_ERROR: f32 = 20.0;
    pub const AI_TILT_ERROR_SCALE: f32 = 0.1;

    // Timing
    pub const TICK_INTERVAL_MS: f64 = 1000.0 / 60.0; // ~60 Hz
    pub const TICK_JITTER_MS: f64 = 1.0; // Early frames within this still tick
    pub const COUNTDOWN_STEP_MS: f64 = 500.0;
    pub const COUNTDOWN_FROM: u8 = 3;
}
