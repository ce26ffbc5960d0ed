// Pause/resume elapsed-time clock
//
// Elapsed time is the sum of completed run segments plus the open segment
// when running. It is recomputed from the time source on every read.

use crate::scheduler::{Scheduler, TickToken};
use crate::time::TimeSource;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default tick interval: one second
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Result of polling the clock for ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Nothing due (or not running)
    Idle,
    /// This many ticks came due since the last poll
    Due(u32),
    /// The scheduler dropped our timer; the clock stopped itself
    Lost,
}

pub struct Clock {
    time: Arc<dyn TimeSource>,
    scheduler: Box<dyn Scheduler>,
    running: bool,
    anchor: Option<Instant>,
    accumulated: Duration,
    tick_interval: Duration,
    token: Option<TickToken>,
}

impl Clock {
    /// Create an idle clock with zero accumulated time
    pub fn new(time: Arc<dyn TimeSource>, scheduler: Box<dyn Scheduler>) -> Self {
        Self {
            time,
            scheduler,
            running: false,
            anchor: None,
            accumulated: Duration::ZERO,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            token: None,
        }
    }

    /// Start a new run segment. No-op if already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }

        let now = self.time.now();
        self.running = true;
        self.anchor = Some(now);
        self.token = Some(self.scheduler.schedule(self.tick_interval, now));
        tracing::debug!(interval_ms = self.tick_interval_ms(), "clock started");
    }

    /// Fold the open segment into the accumulated total and cancel ticking.
    /// No-op if not running.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.fold_open_segment();
        self.running = false;
        if let Some(token) = self.token.take() {
            self.scheduler.cancel(token);
        }
        tracing::debug!(elapsed_secs = self.elapsed_seconds(), "clock stopped");
    }

    /// Stop if running, then zero the accumulated time
    pub fn reset(&mut self) {
        self.stop();
        self.accumulated = Duration::ZERO;
        self.anchor = None;
    }

    /// Seed the accumulated time of a stopped clock, e.g. from a saved session.
    ///
    /// Returns false (and changes nothing) while running.
    pub fn restore(&mut self, accumulated: Duration) -> bool {
        if self.running {
            return false;
        }
        self.accumulated = accumulated;
        true
    }

    /// Total elapsed time, including the open segment
    pub fn elapsed(&self) -> Duration {
        match (self.running, self.anchor) {
            (true, Some(anchor)) => {
                self.accumulated + self.time.now().saturating_duration_since(anchor)
            }
            _ => self.accumulated,
        }
    }

    /// Whole elapsed seconds, floored
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed().as_secs()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn tick_interval_ms(&self) -> u64 {
        u64::try_from(self.tick_interval.as_millis()).unwrap_or(u64::MAX)
    }

    /// Change the tick interval. Zero is ignored and returns false.
    ///
    /// While running this stops and restarts the clock: the open segment is
    /// folded into the accumulated total and a new segment is anchored at
    /// now, so no time is lost but the segment boundary moves.
    pub fn set_tick_interval_ms(&mut self, ms: u64) -> bool {
        if ms == 0 {
            tracing::debug!("ignoring zero tick interval");
            return false;
        }

        self.tick_interval = Duration::from_millis(ms);
        if self.running {
            self.stop();
            self.start();
        }
        true
    }

    /// When the next tick is due, if running
    pub fn next_tick_at(&self) -> Option<Instant> {
        self.token
            .and_then(|token| self.scheduler.next_deadline(token))
    }

    /// Ask the scheduler whether ticks came due.
    ///
    /// If the scheduler no longer holds our timer the clock stops itself
    /// rather than sitting in a running state that never ticks.
    pub fn poll_ticks(&mut self) -> TickStatus {
        if !self.running {
            return TickStatus::Idle;
        }

        let Some(token) = self.token else {
            return self.lose_schedule();
        };

        if !self.scheduler.is_scheduled(token) {
            return self.lose_schedule();
        }

        match self.scheduler.poll(token, self.time.now()) {
            0 => TickStatus::Idle,
            due => TickStatus::Due(due),
        }
    }

    fn lose_schedule(&mut self) -> TickStatus {
        tracing::warn!("tick schedule disappeared, stopping clock");
        // The token is already gone, don't cancel it twice
        self.token = None;
        self.stop();
        TickStatus::Lost
    }

    fn fold_open_segment(&mut self) {
        if let Some(anchor) = self.anchor.take() {
            self.accumulated += self.time.now().saturating_duration_since(anchor);
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            self.scheduler.cancel(token);
        }
    }
}
