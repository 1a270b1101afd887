//! Headless Tilt Pong: plays one match against a virtual clock with an
//! autopilot standing in for the human side(s), then prints a JSON summary.
//!
//! Usage:
//!   cargo run -p sim_runner -- --difficulty hard --seed 7
//!   RUST_LOG=game_core=debug cargo run -p sim_runner -- --mode two-player

mod autopilot;

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use game_core::{
    Clock, Config, Difficulty, GameMode, GameSession, MatchEvent, RenderSink, RenderSnapshot,
    SessionState, Side,
};

use crate::autopilot::Autopilot;

#[derive(Parser)]
#[command(name = "tilt-pong-sim")]
#[command(about = "Play a headless Tilt Pong match and print a JSON summary")]
struct Args {
    /// JSON file with match settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// one-player | two-player
    #[arg(long)]
    mode: Option<GameMode>,

    /// easy | medium | hard
    #[arg(long)]
    difficulty: Option<Difficulty>,

    #[arg(long)]
    ball_speed: Option<f32>,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Display refresh rate driving the frame loop
    #[arg(long, default_value_t = 60.0)]
    refresh_hz: f64,

    /// Give up after this many delivered frames
    #[arg(long, default_value_t = 500_000)]
    max_frames: u64,

    /// Pretty-print the summary
    #[arg(long)]
    pretty: bool,
}

/// Clock advanced by the frame loop, not by the wall
struct VirtualClock {
    time_ms: Rc<Cell<f64>>,
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> f64 {
        self.time_ms.get()
    }
}

#[derive(Default)]
struct FrameStats {
    drawn: u64,
    longest_countdown_frames: u64,
    countdown_run: u64,
    last: Option<RenderSnapshot>,
}

/// Counts drawn frames instead of putting pixels anywhere
struct StatsSink {
    stats: Rc<RefCell<FrameStats>>,
}

impl RenderSink for StatsSink {
    fn draw(&mut self, snapshot: &RenderSnapshot) {
        let stats = &mut *self.stats.borrow_mut();
        stats.drawn += 1;
        if snapshot.countdown.is_some() {
            stats.countdown_run += 1;
            stats.longest_countdown_frames = stats.longest_countdown_frames.max(stats.countdown_run);
        } else {
            stats.countdown_run = 0;
        }
        stats.last = Some(snapshot.clone());
    }
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    config: Config,
    finished: bool,
    winner: Option<Side>,
    score_left: u8,
    score_right: u8,
    frames_delivered: u64,
    frames_drawn: u64,
    ticks: u32,
    simulated_ms: f64,
    serves: usize,
    longest_countdown_frames: u64,
    final_frame: Option<RenderSnapshot>,
    events: Vec<MatchEvent>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed reading {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => Config::new(),
    };

    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(speed) = args.ball_speed {
        config.ball_speed = speed;
    }

    config.validate().context("invalid match configuration")?;
    Ok(config)
}

fn run(args: &Args) -> Result<Summary> {
    if !(args.refresh_hz > 0.0) {
        bail!("refresh rate must be > 0, got {}", args.refresh_hz);
    }
    if args.max_frames == 0 {
        bail!("max_frames must be > 0");
    }

    let config = load_config(args)?;
    let frame_ms = 1000.0 / args.refresh_hz;
    let time = Rc::new(Cell::new(0.0));
    let stats = Rc::new(RefCell::new(FrameStats::default()));

    let mut session = GameSession::new(
        config.clone(),
        args.seed,
        Box::new(VirtualClock {
            time_ms: time.clone(),
        }),
        Box::new(Autopilot::new()),
        Box::new(StatsSink {
            stats: stats.clone(),
        }),
    )
    .context("failed creating session")?;

    info!(
        mode = ?config.mode,
        difficulty = ?config.difficulty,
        seed = args.seed,
        refresh_hz = args.refresh_hz,
        "Starting simulated match"
    );

    let mut token = session.start();
    let mut delivered = 0;
    while let Some(t) = token {
        if delivered >= args.max_frames {
            warn!(delivered, "Frame limit reached before the match ended");
            break;
        }
        time.set(time.get() + frame_ms);
        token = session.on_frame(t);
        delivered += 1;
    }

    let events = session.drain_events();
    let game = session.game();
    let stats = stats.borrow();
    Ok(Summary {
        seed: args.seed,
        config: game.config.clone(),
        finished: session.state() == SessionState::GameOver,
        winner: game.winner(),
        score_left: game.score.left,
        score_right: game.score.right,
        frames_delivered: delivered,
        frames_drawn: stats.drawn,
        ticks: game.time.tick,
        simulated_ms: time.get(),
        serves: events
            .iter()
            .filter(|event| matches!(event, MatchEvent::Served(_)))
            .count(),
        longest_countdown_frames: stats.longest_countdown_frames,
        final_frame: stats.last.clone(),
        events,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let summary = run(&args)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&summary)
    } else {
        serde_json::to_string(&summary)
    }
    .context("failed encoding summary")?;
    println!("{json}");

    if let Some(winner) = summary.winner {
        info!(
            ?winner,
            left = summary.score_left,
            right = summary.score_right,
            "Match finished"
        );
    }
    Ok(())
}
