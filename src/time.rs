// Time source abstraction so the clock can be driven by hand in tests
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Where "now" comes from, plus a way to wait for the next tick
pub trait TimeSource: Send + Sync {
    /// Get the current instant
    fn now(&self) -> Instant;

    /// Block for the given duration
    fn sleep(&self, duration: Duration);
}

/// Real wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Time source that only moves when told to.
///
/// Clones share the same instant, so a test can hand one clone to the
/// coordinator and keep another to advance time.
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    time: Arc<Mutex<Instant>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self {
            time: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Advance the shared instant by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
        *time += duration;
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sleep(&self, duration: Duration) {
        // Sleeping just moves time forward
        self.advance(duration);
    }
}
