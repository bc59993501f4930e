use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event};

/// Input for a single frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Milliseconds since the loop started, monotonic.
    pub now_ms: u64,
    /// Terminal events received since the previous frame, in arrival order.
    pub events: Vec<Event>,
}

/// Fixed-rate frame clock that batches terminal events between frames.
#[derive(Debug)]
pub struct FrameLoop {
    frame_interval: Duration,
    started_at: Instant,
    next_frame_at: Instant,
    pending: Vec<Event>,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(Duration::from_secs_f64(1.0 / 60.0))
    }
}

impl FrameLoop {
    #[must_use]
    pub fn new(frame_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            frame_interval,
            started_at: now,
            next_frame_at: now,
            pending: Vec::new(),
        }
    }

    pub fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    /// Milliseconds elapsed since `started_at`, saturating.
    #[must_use]
    pub fn millis_since_start(&self, now: Instant) -> u64 {
        u64::try_from(now.duration_since(self.started_at).as_millis()).unwrap_or(u64::MAX)
    }

    /// Collects terminal events until the next frame is due, then returns them.
    ///
    /// Frames never bunch up: if the caller falls behind, the next deadline is scheduled
    /// from the current time instead of replaying missed frames.
    pub fn next_frame(&mut self) -> io::Result<FrameInput> {
        loop {
            let now = Instant::now();
            if now >= self.next_frame_at {
                self.next_frame_at = schedule_next(self.next_frame_at, now, self.frame_interval);
                return Ok(FrameInput {
                    now_ms: self.millis_since_start(now),
                    events: std::mem::take(&mut self.pending),
                });
            }
            if event::poll(self.next_frame_at - now)? {
                self.pending.push(event::read()?);
            }
        }
    }
}

fn schedule_next(deadline: Instant, now: Instant, interval: Duration) -> Instant {
    let next = deadline + interval;
    if next <= now { now + interval } else { next }
}
