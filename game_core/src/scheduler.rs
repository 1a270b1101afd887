use tracing::warn;

use crate::Params;

/// Handle for one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// What a delivered frame should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Token was cancelled or superseded; do nothing
    Stale,
    /// Too soon since the last tick; draw only
    Skipped,
    /// Run a simulation tick
    Tick,
}

/// Gates display frames down to the fixed simulation rate and keeps a
/// single frame chain alive.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval_ms: f64,
    jitter_ms: f64,
    next_id: u64,
    pending: Option<FrameToken>,
    last_tick_ms: Option<f64>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::with_interval(Params::TICK_INTERVAL_MS, Params::TICK_JITTER_MS)
    }

    pub fn with_interval(interval_ms: f64, jitter_ms: f64) -> Self {
        Self {
            interval_ms,
            jitter_ms,
            next_id: 0,
            pending: None,
            last_tick_ms: None,
        }
    }

    /// Request the next frame. Any frame still pending is cancelled first.
    pub fn schedule(&mut self) -> FrameToken {
        if let Some(previous) = self.pending.take() {
            warn!(
                token = previous.id(),
                "Duplicate frame loop detected, cancelling previous"
            );
        }
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.pending = Some(token);
        token
    }

    /// Drop the pending frame. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Cancel the pending frame and forget the last tick, so the next chain
    /// ticks on its first frame. Token ids keep counting up, so tokens from
    /// the old chain stay stale.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_tick_ms = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_tick_ms(&self) -> Option<f64> {
        self.last_tick_ms
    }

    /// Deliver a frame. Consumes the pending token.
    ///
    /// Missed intervals are not caught up: at most one tick per frame.
    pub fn fire(&mut self, token: FrameToken, now_ms: f64) -> FrameOutcome {
        if self.pending != Some(token) {
            return FrameOutcome::Stale;
        }
        self.pending = None;

        let due = match self.last_tick_ms {
            None => true,
            Some(last) => now_ms - last >= self.interval_ms - self.jitter_ms,
        };
        if !due {
            return FrameOutcome::Skipped;
        }

        self.last_tick_ms = Some(now_ms);
        FrameOutcome::Tick
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}
