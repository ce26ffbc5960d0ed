// Earnings accumulator
//
// Accrued amount is always rate_per_second * elapsed_seconds, recomputed in
// full on every update. Changing the rate mid-session therefore reprices the
// whole elapsed duration at the new rate.

use crate::time::TimeSource;
use std::sync::Arc;
use std::time::Instant;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

pub struct EarningsAccumulator {
    time: Arc<dyn TimeSource>,
    hourly_rate: f64,
    rate_per_second: f64,
    elapsed_seconds: u64,
    accrued_amount: f64,
    running: bool,
    session_start: Option<Instant>,
}

impl EarningsAccumulator {
    /// Create an accumulator with a zero rate and no progress
    pub fn new(time: Arc<dyn TimeSource>) -> Self {
        Self {
            time,
            hourly_rate: 0.0,
            rate_per_second: 0.0,
            elapsed_seconds: 0,
            accrued_amount: 0.0,
            running: false,
            session_start: None,
        }
    }

    /// Set the hourly rate. Negative or non-finite rates become zero.
    pub fn set_hourly_rate(&mut self, rate: f64) {
        let rate = if rate.is_finite() && rate >= 0.0 {
            rate
        } else {
            tracing::debug!(rate, "clamping invalid hourly rate to zero");
            0.0
        };

        self.hourly_rate = rate;
        self.rate_per_second = rate / SECONDS_PER_HOUR;
        self.recompute();
    }

    /// Record the total elapsed seconds and recompute the accrued amount.
    ///
    /// Negative or non-finite input is ignored and yields 0.0; fractional
    /// seconds are floored. Returns the accrued amount otherwise.
    pub fn update_elapsed_seconds(&mut self, seconds: f64) -> f64 {
        if !seconds.is_finite() || seconds < 0.0 {
            tracing::debug!(seconds, "ignoring invalid elapsed seconds");
            return 0.0;
        }

        self.elapsed_seconds = seconds.floor() as u64;
        self.recompute();
        self.accrued_amount
    }

    /// Mark the session running. The first start of a session records its
    /// start instant; later resumes keep it.
    pub fn start(&mut self) {
        self.running = true;
        if self.session_start.is_none() {
            self.session_start = Some(self.time.now());
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Clear session progress. The configured rate survives.
    pub fn reset(&mut self) {
        self.elapsed_seconds = 0;
        self.accrued_amount = 0.0;
        self.running = false;
        self.session_start = None;
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn accrued_amount(&self) -> f64 {
        self.accrued_amount
    }

    pub fn hourly_rate(&self) -> f64 {
        self.hourly_rate
    }

    pub fn rate_per_second(&self) -> f64 {
        self.rate_per_second
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session_start(&self) -> Option<Instant> {
        self.session_start
    }

    fn recompute(&mut self) {
        self.accrued_amount = self.rate_per_second * self.elapsed_seconds as f64;
    }
}
