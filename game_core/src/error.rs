use std::fmt;

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownMode(String),
    UnknownDifficulty(String),
    /// A dimension or speed that must be strictly positive was not
    NonPositive { field: &'static str, value: f32 },
    PaddleTallerThanArena { paddle_height: f32, arena_height: f32 },
    BallSpeedOutOfRange { speed: f32, min: f32, max: f32 },
    SpeedIncreaseBelowOne(f32),
    ZeroWinScore,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownMode(mode) => {
                write!(f, "unknown game mode '{mode}' (expected one-player or two-player)")
            }
            ConfigError::UnknownDifficulty(difficulty) => {
                write!(f, "unknown AI difficulty '{difficulty}' (expected easy, medium or hard)")
            }
            ConfigError::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            ConfigError::PaddleTallerThanArena {
                paddle_height,
                arena_height,
            } => write!(
                f,
                "paddle height {paddle_height} does not fit in arena height {arena_height}"
            ),
            ConfigError::BallSpeedOutOfRange { speed, min, max } => {
                write!(f, "ball speed {speed} outside {min}..={max}")
            }
            ConfigError::SpeedIncreaseBelowOne(factor) => {
                write!(f, "ball speed increase {factor} would slow the ball on hits")
            }
            ConfigError::ZeroWinScore => write!(f, "winning score must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}
