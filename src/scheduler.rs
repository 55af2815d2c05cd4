// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use crate::runtime::tick_interval;

/// Time gate between frame opportunities and renderer passes.
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    last_tick: Duration,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when at least one tick interval for `speed` has elapsed since
    /// the last committed tick.
    pub fn is_due(&self, now: Duration, speed: i32) -> bool {
        now.saturating_sub(self.last_tick) >= tick_interval(speed)
    }

    pub fn commit(&mut self, now: Duration) {
        self.last_tick = now;
    }
}

/// Cancellable repeating deadline standing in for the host's
/// frame-presentation signal.
#[derive(Clone, Debug)]
pub struct FrameLoop {
    period: Duration,
    pending: Option<Instant>,
}

impl FrameLoop {
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self {
            period: Duration::from_secs_f64(1.0 / fps),
            pending: None,
        }
    }

    #[allow(dead_code)]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[allow(dead_code)]
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Requests a frame opportunity as soon as possible.
    pub fn start(&mut self, now: Instant) {
        if self.pending.is_none() {
            self.pending = Some(now);
        }
    }

    /// Requests the next opportunity one period after the previous one. A
    /// loop that fell behind resumes from `now` instead of bursting.
    pub fn reschedule(&mut self, now: Instant) {
        let next = self.pending.map_or(now, |p| p + self.period);
        self.pending = Some(if next < now { now } else { next });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// True once the pending opportunity's deadline has passed. The
    /// opportunity stays pending until the caller reschedules or cancels.
    pub fn is_due(&self, now: Instant) -> bool {
        self.pending.is_some_and(|at| at <= now)
    }
}
