use tracing::{debug, info};

use crate::{
    Config, ConfigError, Difficulty, FrameOutcome, FrameToken, GameState, InputState, MatchEvent,
    PaddleIntent, RenderSnapshot, SessionAction, SessionFsm, SessionState, Side, TickScheduler,
};

/// Wall clock the session reads once per frame
pub trait Clock {
    fn now_ms(&self) -> f64; // ms
}

/// Held inputs for a human-driven side
pub trait InputSource {
    fn sample(&mut self, side: Side, snapshot: &RenderSnapshot) -> PaddleIntent;
}

/// Drawing surface fed one snapshot per drawn frame
pub trait RenderSink {
    fn draw(&mut self, snapshot: &RenderSnapshot);
}

/// A play session: one match at a time, its frame loop and its lifecycle
pub struct GameSession {
    clock: Box<dyn Clock>,
    input: Box<dyn InputSource>,
    renderer: Box<dyn RenderSink>,
    game: GameState,
    scheduler: TickScheduler,
    fsm: SessionFsm,
    seed: u64,
    paused_at: Option<f64>,
    events: Vec<MatchEvent>,
}

impl GameSession {
    pub fn new(
        config: Config,
        seed: u64,
        clock: Box<dyn Clock>,
        input: Box<dyn InputSource>,
        renderer: Box<dyn RenderSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut session = Self {
            clock,
            input,
            renderer,
            game: GameState::new(config, seed),
            scheduler: TickScheduler::new(),
            fsm: SessionFsm::new(),
            seed,
            paused_at: None,
            events: Vec::new(),
        };
        session.draw();
        Ok(session)
    }

    /// Leave the waiting screen and open the match with its countdown.
    /// Returns the first frame to deliver.
    pub fn start(&mut self) -> Option<FrameToken> {
        if !self.fsm.transition(SessionAction::Start).success() {
            return None;
        }

        let now = self.clock.now_ms();
        info!(seed = self.seed, "Session started");
        self.game.begin(now);
        self.collect_events();
        self.draw();
        Some(self.scheduler.schedule())
    }

    /// Handle a delivered frame. Returns the next frame to deliver, if the
    /// loop should keep going.
    pub fn on_frame(&mut self, token: FrameToken) -> Option<FrameToken> {
        let now = self.clock.now_ms();

        match self.scheduler.fire(token, now) {
            FrameOutcome::Stale => {
                debug!(token = token.id(), "Ignoring stale frame");
                return None;
            }
            FrameOutcome::Skipped => return Some(self.scheduler.schedule()),
            FrameOutcome::Tick => {}
        }

        let inputs = self.sample_inputs();
        self.game.tick(now, &inputs);
        self.collect_events();
        self.draw();

        if self.game.is_over() {
            self.fsm.transition(SessionAction::MatchEnded);
            info!(
                winner = ?self.game.winner(),
                left = self.game.score.left,
                right = self.game.score.right,
                "Session over"
            );
            return None;
        }

        Some(self.scheduler.schedule())
    }

    fn sample_inputs(&mut self) -> InputState {
        let snapshot = self.snapshot();
        let mut inputs = InputState::new();
        let sides: Vec<Side> = self.game.human_sides().collect();
        for side in sides {
            inputs.set(side, self.input.sample(side, &snapshot));
        }
        inputs
    }

    /// Stop the frame loop. Returns true if the session was running.
    pub fn pause(&mut self) -> bool {
        if !self.fsm.transition(SessionAction::Pause).success() {
            return false;
        }
        self.scheduler.cancel();
        self.paused_at = Some(self.clock.now_ms());
        info!("Paused");
        self.draw();
        true
    }

    /// Restart the frame loop after a pause
    pub fn resume(&mut self) -> Option<FrameToken> {
        if !self.fsm.transition(SessionAction::Resume).success() {
            return None;
        }
        let now = self.clock.now_ms();
        if let Some(paused_at) = self.paused_at.take() {
            self.game.postpone_countdown(now - paused_at);
        }
        info!("Resumed");
        self.draw();
        Some(self.scheduler.schedule())
    }

    pub fn toggle_pause(&mut self) -> Option<FrameToken> {
        match self.fsm.state() {
            SessionState::Running => {
                self.pause();
                None
            }
            SessionState::Paused => self.resume(),
            SessionState::AwaitingStart | SessionState::GameOver => None,
        }
    }

    /// Throw the current match away and wait for a new start.
    ///
    /// The new match keeps the current settings, ball speed included.
    pub fn restart(&mut self) -> bool {
        if !self.fsm.transition(SessionAction::Restart).success() {
            return false;
        }
        self.scheduler.reset();
        self.paused_at = None;
        self.seed = self.seed.wrapping_add(1);
        self.game = GameState::new(self.game.config.clone(), self.seed);
        info!(seed = self.seed, "Session restarted");
        self.draw();
        true
    }

    pub fn set_ball_speed(&mut self, speed: f32) {
        self.game.set_ball_speed(speed);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.game.set_difficulty(difficulty);
    }

    pub fn state(&self) -> SessionState {
        self.fsm.state()
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        self.game.snapshot(self.fsm.is_paused())
    }

    /// Take the match events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    fn collect_events(&mut self) {
        let events = self.game.drain_events();
        self.events.extend(events);
    }

    fn draw(&mut self) {
        let snapshot = self.snapshot();
        self.renderer.draw(&snapshot);
    }
}
