use hecs::World;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::systems::{ball_waiting, paddles_by_side, reset_round, serve_ball, set_ball_speed};
use crate::{
    create_ball, create_paddle, step, AiController, Ball, BallView, Config, Difficulty, Events,
    GameRng, InputState, Params, RenderSnapshot, Score, Side, Time,
};

/// Match lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchState {
    /// Ball rests on the server's paddle; the next tick serves it
    Serving,
    /// Ball in play
    Rallying,
    /// Counting down before a serve, no physics
    Countdown,
    /// A side reached the winning score
    GameOver,
}

/// One step of the on-screen countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CountdownStep {
    Number(u8),
    Start,
}

impl CountdownStep {
    /// Step shown after this one, `None` once "Start" has been shown
    pub fn next(self) -> Option<CountdownStep> {
        match self {
            CountdownStep::Number(n) if n > 1 => Some(CountdownStep::Number(n - 1)),
            CountdownStep::Number(_) => Some(CountdownStep::Start),
            CountdownStep::Start => None,
        }
    }
}

/// Result of advancing a countdown against the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownProgress {
    /// Deadline not reached yet
    Waiting,
    /// A new step is now showing
    Showing(CountdownStep),
    /// The last step has elapsed
    Finished,
}

/// Suspended countdown, advanced by frames against absolute deadlines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    step: CountdownStep,
    next_deadline_ms: f64,
}

impl Countdown {
    pub fn start(now_ms: f64) -> Self {
        Self {
            step: CountdownStep::Number(Params::COUNTDOWN_FROM),
            next_deadline_ms: now_ms + Params::COUNTDOWN_STEP_MS,
        }
    }

    pub fn step(&self) -> CountdownStep {
        self.step
    }

    pub fn next_deadline_ms(&self) -> f64 {
        self.next_deadline_ms
    }

    /// Move past at most one elapsed deadline
    pub fn advance(&mut self, now_ms: f64) -> CountdownProgress {
        if now_ms < self.next_deadline_ms {
            return CountdownProgress::Waiting;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                self.next_deadline_ms += Params::COUNTDOWN_STEP_MS;
                CountdownProgress::Showing(next)
            }
            None => CountdownProgress::Finished,
        }
    }

    /// Push the remaining deadlines back, e.g. by the time spent paused
    pub fn postpone(&mut self, delta_ms: f64) {
        self.next_deadline_ms += delta_ms.max(0.0);
    }
}

/// Things that happened in the match that the outside world cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchEvent {
    ScoreChanged { left: u8, right: u8 },
    MatchEnded { winner: Side, left: u8, right: u8 },
    Served(Side),
    Countdown(CountdownStep),
}

/// One match: the world, its score and the serve/rally/countdown lifecycle
pub struct GameState {
    pub world: World,
    pub config: Config,
    pub score: Score,
    pub events: Events,
    pub rng: GameRng,
    pub time: Time,
    pub match_state: MatchState,
    pub countdown: Option<Countdown>,
    outbox: Vec<MatchEvent>,
}

impl GameState {
    /// Fresh match with a randomly chosen first server
    pub fn new(config: Config, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let first_server = if rng.0.gen_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };

        let mut world = World::new();
        for side in Side::BOTH {
            create_paddle(&mut world, side, &config);
        }
        create_ball(&mut world, first_server, &config);

        info!(
            mode = ?config.mode,
            difficulty = ?config.difficulty,
            ball_speed = config.ball_speed,
            ?first_server,
            "Match created"
        );

        Self {
            world,
            config,
            score: Score::new(),
            events: Events::new(),
            rng,
            time: Time::new(),
            match_state: MatchState::Serving,
            countdown: None,
            outbox: Vec::new(),
        }
    }

    /// Open the match with the "get ready" countdown
    pub fn begin(&mut self, now_ms: f64) {
        if self.match_state != MatchState::Serving {
            return;
        }
        info!("Starting opening countdown");
        self.start_countdown(now_ms);
    }

    fn start_countdown(&mut self, now_ms: f64) {
        let countdown = Countdown::start(now_ms);
        self.match_state = MatchState::Countdown;
        self.countdown = Some(countdown);
        self.announce_countdown(countdown.step());
    }

    fn announce_countdown(&mut self, step: CountdownStep) {
        info!("Countdown: {:?}", step);
        self.outbox.push(MatchEvent::Countdown(step));
    }

    /// Advance the match by one frame at `now_ms`.
    ///
    /// Returns true when a physics tick ran.
    pub fn tick(&mut self, now_ms: f64, inputs: &InputState) -> bool {
        match self.match_state {
            MatchState::GameOver => return false,
            MatchState::Countdown => {
                if !self.advance_countdown(now_ms) {
                    return false;
                }
            }
            MatchState::Serving | MatchState::Rallying => {}
        }

        let scored = step(
            &mut self.world,
            &self.config,
            inputs,
            &mut self.events,
            &mut self.rng,
        );
        self.time.advance(now_ms);

        if let Some(scorer) = scored {
            self.handle_score(scorer, now_ms);
        } else if self.match_state == MatchState::Serving {
            if let Some(server) = serve_ball(&mut self.world, &self.config, &mut self.rng, now_ms)
            {
                self.outbox.push(MatchEvent::Served(server));
            }
            self.match_state = MatchState::Rallying;
        }
        true
    }

    /// Returns true once the countdown has run out and play resumes
    fn advance_countdown(&mut self, now_ms: f64) -> bool {
        let Some(mut countdown) = self.countdown else {
            self.match_state = MatchState::Serving;
            return true;
        };

        loop {
            match countdown.advance(now_ms) {
                CountdownProgress::Waiting => {
                    self.countdown = Some(countdown);
                    return false;
                }
                CountdownProgress::Showing(step) => self.announce_countdown(step),
                CountdownProgress::Finished => break,
            }
        }

        info!("Countdown complete, serving");
        self.countdown = None;
        self.match_state = MatchState::Serving;
        true
    }

    /// Apply a point to `scorer` and move on to game over or the next serve
    pub fn handle_score(&mut self, scorer: Side, now_ms: f64) {
        if self.match_state == MatchState::GameOver {
            return;
        }

        if let Some(served_at) = self.ball().and_then(|ball| ball.serve_time_ms) {
            debug!(rally_ms = now_ms - served_at, "Rally over");
        }

        self.score.increment(scorer);
        let (left, right) = (self.score.left, self.score.right);
        info!(?scorer, left, right, "Point scored");
        self.outbox.push(MatchEvent::ScoreChanged { left, right });

        if let Some(winner) = self.score.has_winner(self.config.win_score) {
            info!(?winner, left, right, "Game over");
            self.match_state = MatchState::GameOver;
            self.countdown = None;
            self.outbox.push(MatchEvent::MatchEnded {
                winner,
                left,
                right,
            });
            return;
        }

        // Loser serves
        let server = scorer.opponent();
        reset_round(&mut self.world, &self.config, server);

        if self.config.is_ai_side(server) {
            self.start_countdown(now_ms);
        } else {
            self.countdown = None;
            self.match_state = MatchState::Serving;
        }
    }

    /// Change the ball speed setting for the rest of the match
    pub fn set_ball_speed(&mut self, speed: f32) {
        let speed = self.config.clamp_ball_speed(speed);
        self.config.ball_speed = speed;
        set_ball_speed(&mut self.world, &self.config, speed);
        info!(speed, "Ball speed changed");
    }

    /// Retune every AI paddle; reaction counters carry over
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
        for (_entity, ai) in self.world.query_mut::<&mut AiController>() {
            ai.set_difficulty(difficulty);
        }
        info!(?difficulty, "AI difficulty changed");
    }

    /// Shift pending countdown deadlines after a pause
    pub fn postpone_countdown(&mut self, delta_ms: f64) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.postpone(delta_ms);
        }
    }

    pub fn ball(&self) -> Option<Ball> {
        self.world
            .query::<&Ball>()
            .iter()
            .map(|(_entity, ball)| *ball)
            .next()
    }

    pub fn ball_waiting(&self) -> bool {
        ball_waiting(&self.world)
    }

    pub fn is_over(&self) -> bool {
        self.match_state == MatchState::GameOver
    }

    pub fn winner(&self) -> Option<Side> {
        self.score.has_winner(self.config.win_score)
    }

    /// Sides driven by held inputs rather than the AI
    pub fn human_sides(&self) -> impl Iterator<Item = Side> + '_ {
        Side::BOTH
            .into_iter()
            .filter(|side| !self.config.is_ai_side(*side))
    }

    pub fn is_ai_controlled(&self, side: Side) -> bool {
        self.config.is_ai_side(side)
    }

    pub fn snapshot(&self, paused: bool) -> RenderSnapshot {
        let (left, right) = paddles_by_side(&self.world);
        RenderSnapshot {
            tick: self.time.tick,
            arena_width: self.config.arena_width,
            arena_height: self.config.arena_height,
            ball: self.ball().as_ref().map(BallView::from),
            left: left.as_ref().map(Into::into),
            right: right.as_ref().map(Into::into),
            score_left: self.score.left,
            score_right: self.score.right,
            match_state: self.match_state,
            countdown: self.countdown.map(|countdown| countdown.step()),
            paused,
        }
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameMode, Paddle};
    use glam::Vec2;

    fn two_player() -> Config {
        Config {
            mode: GameMode::TwoPlayer,
            ..Config::new()
        }
    }

    #[test]
    fn test_countdown_sequence() {
        let mut countdown = Countdown::start(1000.0);
        assert_eq!(countdown.step(), CountdownStep::Number(3));
        assert_eq!(countdown.advance(1499.0), CountdownProgress::Waiting);
        assert_eq!(
            countdown.advance(1500.0),
            CountdownProgress::Showing(CountdownStep::Number(2))
        );
        assert_eq!(
            countdown.advance(2000.0),
            CountdownProgress::Showing(CountdownStep::Number(1))
        );
        assert_eq!(
            countdown.advance(2500.0),
            CountdownProgress::Showing(CountdownStep::Start)
        );
        assert_eq!(countdown.advance(2999.0), CountdownProgress::Waiting);
        assert_eq!(countdown.advance(3000.0), CountdownProgress::Finished);
    }

    #[test]
    fn test_countdown_postpone() {
        let mut countdown = Countdown::start(0.0);
        countdown.postpone(250.0);
        assert_eq!(countdown.advance(600.0), CountdownProgress::Waiting);
        assert_eq!(
            countdown.advance(750.0),
            CountdownProgress::Showing(CountdownStep::Number(2))
        );
    }

    #[test]
    fn test_new_match_waits_to_serve() {
        let gs = GameState::new(Config::new(), 1);
        assert_eq!(gs.match_state, MatchState::Serving);
        assert!(gs.ball_waiting());
        assert_eq!(gs.score, Score::new());
        assert_eq!(gs.human_sides().collect::<Vec<_>>(), vec![Side::Left]);
        assert!(gs.is_ai_controlled(Side::Right));
    }

    #[test]
    fn test_first_server_varies_with_seed() {
        let servers: Vec<Side> = (0..32)
            .filter_map(|seed| GameState::new(Config::new(), seed).ball().map(|b| b.serving))
            .collect();
        assert!(servers.contains(&Side::Left));
        assert!(servers.contains(&Side::Right));
    }

    #[test]
    fn test_opening_countdown_then_serve() {
        let mut gs = GameState::new(two_player(), 7);
        let inputs = InputState::new();
        gs.begin(0.0);
        assert_eq!(gs.match_state, MatchState::Countdown);

        assert!(!gs.tick(100.0, &inputs), "No physics during countdown");
        assert!(!gs.tick(1600.0, &inputs));
        assert!(gs.tick(2000.0, &inputs), "Countdown over, serving tick runs");
        assert_eq!(gs.match_state, MatchState::Rallying);
        assert!(!gs.ball_waiting());

        let events = gs.drain_events();
        assert_eq!(
            events[..4],
            [
                MatchEvent::Countdown(CountdownStep::Number(3)),
                MatchEvent::Countdown(CountdownStep::Number(2)),
                MatchEvent::Countdown(CountdownStep::Number(1)),
                MatchEvent::Countdown(CountdownStep::Start),
            ]
        );
        assert!(matches!(events[4], MatchEvent::Served(_)));
        assert!(gs.drain_events().is_empty());
    }

    #[test]
    fn test_score_resets_round_and_loser_serves() {
        let mut gs = GameState::new(two_player(), 3);
        let inputs = InputState::new();
        gs.tick(0.0, &inputs);
        for (_entity, paddle) in gs.world.query_mut::<&mut Paddle>() {
            paddle.tilt_by(12.0);
        }
        for (_entity, ball) in gs.world.query_mut::<&mut Ball>() {
            ball.speed = 11.0;
        }

        gs.handle_score(Side::Left, 500.0);

        assert_eq!(gs.score.left, 1);
        assert_eq!(gs.match_state, MatchState::Serving, "Human server, no countdown");
        let ball = gs.ball().unwrap();
        assert!(ball.is_serving);
        assert_eq!(ball.serving, Side::Right);
        assert_eq!(ball.speed, ball.base_speed);
        for (_entity, paddle) in gs.world.query::<&Paddle>().iter() {
            assert_eq!(paddle.tilt, 0.0);
        }
    }

    #[test]
    fn test_ai_server_gets_countdown() {
        let mut gs = GameState::new(Config::new(), 3);
        gs.drain_events();

        // Left scores, so the AI on the right serves
        gs.handle_score(Side::Left, 1000.0);

        assert_eq!(gs.match_state, MatchState::Countdown);
        assert_eq!(
            gs.drain_events(),
            vec![
                MatchEvent::ScoreChanged { left: 1, right: 0 },
                MatchEvent::Countdown(CountdownStep::Number(3)),
            ]
        );

        // AI scores, the human serves straight away
        let mut gs = GameState::new(Config::new(), 3);
        gs.handle_score(Side::Right, 1000.0);
        assert_eq!(gs.match_state, MatchState::Serving);
    }

    #[test]
    fn test_game_over_freezes_match() {
        let mut gs = GameState::new(two_player(), 9);
        gs.score.right = 10;
        gs.tick(0.0, &InputState::new());

        gs.handle_score(Side::Right, 100.0);
        assert_eq!(gs.match_state, MatchState::GameOver);
        assert_eq!(gs.winner(), Some(Side::Right));

        gs.handle_score(Side::Right, 200.0);
        assert_eq!(gs.score.right, 11, "Score frozen after game over");

        let ball_before = gs.ball();
        assert!(!gs.tick(300.0, &InputState::new()));
        assert_eq!(gs.ball(), ball_before, "No physics after game over");
        assert!(gs.drain_events().contains(&MatchEvent::MatchEnded {
            winner: Side::Right,
            left: 0,
            right: 11
        }));
    }

    #[test]
    fn test_set_ball_speed_through_handle() {
        let mut gs = GameState::new(two_player(), 4);
        gs.tick(0.0, &InputState::new());

        gs.set_ball_speed(12.0);

        let ball = gs.ball().unwrap();
        assert!((ball.vel.length() - 12.0).abs() < 1e-4);
        assert_eq!(gs.config.ball_speed, 12.0);

        gs.set_ball_speed(100.0);
        assert_eq!(gs.config.ball_speed, gs.config.ball_speed_max);
    }

    #[test]
    fn test_set_difficulty_retunes_ai() {
        let mut gs = GameState::new(Config::new(), 4);
        gs.set_difficulty(Difficulty::Hard);
        assert_eq!(gs.config.difficulty, Difficulty::Hard);
        for (_entity, ai) in gs.world.query::<&AiController>().iter() {
            assert_eq!(ai.difficulty(), Difficulty::Hard);
        }
    }

    #[test]
    fn test_snapshot_reflects_world() {
        let mut gs = GameState::new(two_player(), 4);
        for (_entity, ball) in gs.world.query_mut::<&mut Ball>() {
            ball.pos = Vec2::new(123.0, 45.0);
        }
        gs.score.left = 2;

        let snapshot = gs.snapshot(true);

        assert_eq!(snapshot.ball.unwrap().x, 123.0);
        assert_eq!(snapshot.paddle(Side::Left).unwrap().x, 30.0);
        assert_eq!(snapshot.paddle(Side::Right).unwrap().x, 755.0);
        assert_eq!(snapshot.score_left, 2);
        assert!(snapshot.paused);
        assert_eq!(snapshot.countdown, None);
    }
}
