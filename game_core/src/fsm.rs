//! Session State Machine
//!
//! Tracks where a play session is in its start/pause/game-over lifecycle,
//! independently of the match phase inside the simulation.

use serde::Serialize;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Match created, waiting for the player to start it
    AwaitingStart,
    Running,
    Paused,
    GameOver,
}

/// Actions that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Start,
    Pause,
    Resume,
    MatchEnded,
    Restart,
}

/// Result of a state transition
#[derive(Debug, Clone)]
pub struct TransitionResult {
    success: bool,
    from_state: SessionState,
    to_state: SessionState,
    action: SessionAction,
}

impl TransitionResult {
    pub fn success(&self) -> bool {
        self.success
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn from_state(&self) -> SessionState {
        self.from_state
    }

    pub fn to_state(&self) -> SessionState {
        self.to_state
    }

    pub fn action(&self) -> SessionAction {
        self.action
    }
}

/// Session Finite State Machine
pub struct SessionFsm {
    state: SessionState,
}

impl SessionFsm {
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingStart,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if a transition is valid
    pub fn can_transition(&self, action: SessionAction) -> bool {
        self.get_next_state(action).is_some()
    }

    /// Attempt a transition
    pub fn transition(&mut self, action: SessionAction) -> TransitionResult {
        let from_state = self.state;

        if let Some(next_state) = self.get_next_state(action) {
            self.state = next_state;
            TransitionResult {
                success: true,
                from_state,
                to_state: next_state,
                action,
            }
        } else {
            TransitionResult {
                success: false,
                from_state,
                to_state: from_state,
                action,
            }
        }
    }

    fn get_next_state(&self, action: SessionAction) -> Option<SessionState> {
        match (self.state, action) {
            (SessionState::AwaitingStart, SessionAction::Start) => Some(SessionState::Running),

            (SessionState::Running, SessionAction::Pause) => Some(SessionState::Paused),
            (SessionState::Running, SessionAction::MatchEnded) => Some(SessionState::GameOver),
            (SessionState::Running, SessionAction::Restart) => Some(SessionState::AwaitingStart),

            (SessionState::Paused, SessionAction::Resume) => Some(SessionState::Running),
            (SessionState::Paused, SessionAction::Restart) => Some(SessionState::AwaitingStart),

            (SessionState::GameOver, SessionAction::Restart) => Some(SessionState::AwaitingStart),

            // Invalid transition
            _ => None,
        }
    }

    /// Frames should be requested only while running
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state == SessionState::GameOver
    }
}

impl Default for SessionFsm {
    fn default() -> Self {
        Self::new()
    }
}
