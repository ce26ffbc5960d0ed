// Coordinator: keeps the clock and the earnings accumulator in lockstep
//
// Data flows one way. The clock reports due ticks, the coordinator reads
// the clock's elapsed seconds and hands them to the accumulator, then
// notifies listeners with a fresh snapshot.

use crate::clock::{Clock, TickStatus};
use crate::earnings::EarningsAccumulator;
use crate::errors::{EarnError, Result};
use crate::format::format_elapsed;
use crate::scheduler::Scheduler;
use crate::time::TimeSource;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle phase of the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    /// Stopped with no progress (fresh or just reset)
    Idle,
    Running,
    /// Stopped with progress retained
    Paused,
}

/// Immutable view of the whole system at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub running: bool,
    pub hourly_rate: f64,
    pub accrued_amount: f64,
    pub elapsed_seconds: u64,
    pub formatted_elapsed_time: String,
    pub rate_per_second: f64,
}

/// What a listener wants after seeing a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    /// Stop the coordinator once this tick has been delivered
    Stop,
}

/// Observer notified after every tick that updated earnings
pub trait TickListener: Send {
    fn on_tick(&mut self, state: &StateSnapshot) -> anyhow::Result<TickFlow>;
}

impl<F> TickListener for F
where
    F: FnMut(&StateSnapshot) -> anyhow::Result<TickFlow> + Send,
{
    fn on_tick(&mut self, state: &StateSnapshot) -> anyhow::Result<TickFlow> {
        self(state)
    }
}

/// Result of one pump of the coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum PumpOutcome {
    /// No tick was due
    Idle,
    /// A tick was delivered
    Ticked(StateSnapshot),
    /// The run ended during this pump (listener request or lost schedule)
    Stopped(StateSnapshot),
}

pub struct Coordinator {
    clock: Clock,
    earnings: EarningsAccumulator,
    initialized: bool,
    phase: Phase,
    listeners: Vec<Box<dyn TickListener>>,
}

impl Coordinator {
    /// Build a coordinator over a time source and tick scheduler
    pub fn new(time: Arc<dyn TimeSource>, scheduler: Box<dyn Scheduler>) -> Self {
        Self {
            clock: Clock::new(Arc::clone(&time), scheduler),
            earnings: EarningsAccumulator::new(time),
            initialized: false,
            phase: Phase::Uninitialized,
            listeners: Vec::new(),
        }
    }

    /// Enable tick forwarding. Safe to call repeatedly.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        // Progress survives teardown
        self.phase = if self.clock.elapsed() > Duration::ZERO {
            Phase::Paused
        } else {
            Phase::Idle
        };
        tracing::debug!("coordinator initialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Start both components. Refused while the hourly rate is not positive.
    pub fn start(&mut self) -> Result<()> {
        self.initialize();

        let rate = self.earnings.hourly_rate();
        if rate <= 0.0 {
            tracing::debug!(rate, "start refused");
            return Err(EarnError::NonPositiveRate(rate));
        }

        if self.clock.is_running() && self.earnings.is_running() {
            return Ok(());
        }

        self.earnings.start();
        self.clock.start();
        self.phase = Phase::Running;
        self.update_earnings();
        Ok(())
    }

    /// Stop the clock first so the final elapsed value is captured, then
    /// the accumulator.
    pub fn stop(&mut self) {
        if !self.initialized {
            return;
        }

        self.clock.stop();
        self.update_earnings();
        self.earnings.stop();
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    /// Clear all session progress, keeping the rate
    pub fn reset(&mut self) {
        if !self.initialized {
            return;
        }

        self.clock.reset();
        self.earnings.reset();
        self.phase = Phase::Idle;
    }

    /// Seed a stopped coordinator with previously recorded elapsed time.
    ///
    /// Fails while running.
    pub fn restore(&mut self, elapsed_seconds: u64) -> Result<()> {
        self.initialize();
        if self.clock.is_running() {
            return Err(EarnError::StateError(
                "cannot restore a running session".to_string(),
            ));
        }

        self.clock.restore(Duration::from_secs(elapsed_seconds));
        self.update_earnings();
        self.phase = if elapsed_seconds > 0 {
            Phase::Paused
        } else {
            Phase::Idle
        };
        Ok(())
    }

    /// Stop ticking and drop listeners. The coordinator goes back to
    /// uninitialized; progress is kept.
    pub fn teardown(&mut self) {
        self.stop();
        self.listeners.clear();
        self.initialized = false;
        self.phase = Phase::Uninitialized;
    }

    pub fn set_hourly_rate(&mut self, rate: f64) {
        self.earnings.set_hourly_rate(rate);
    }

    /// Change how often ticks fire. Accrual does not depend on it.
    pub fn set_tick_interval_ms(&mut self, ms: u64) -> bool {
        self.clock.set_tick_interval_ms(ms)
    }

    pub fn tick_interval(&self) -> Duration {
        self.clock.tick_interval()
    }

    /// Push the clock's current elapsed seconds into the accumulator
    pub fn update_earnings(&mut self) -> f64 {
        let elapsed = self.clock.elapsed_seconds();
        self.earnings.update_elapsed_seconds(elapsed as f64)
    }

    /// Register a listener for tick snapshots
    pub fn subscribe<L>(&mut self, listener: L)
    where
        L: TickListener + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver any due tick.
    ///
    /// Due ticks coalesce into one update since elapsed time is re-read
    /// rather than counted. Listener errors are logged and do not stop
    /// later listeners or later ticks.
    pub fn pump(&mut self) -> PumpOutcome {
        if !self.initialized {
            return PumpOutcome::Idle;
        }

        match self.clock.poll_ticks() {
            TickStatus::Idle => PumpOutcome::Idle,
            TickStatus::Lost => {
                // Clock already stopped itself; bring the accumulator along
                self.stop();
                PumpOutcome::Stopped(self.state())
            }
            TickStatus::Due(due) => {
                if due > 1 {
                    tracing::trace!(missed = due - 1, "coalescing late ticks");
                }
                self.update_earnings();
                let state = self.state();

                let mut stop_requested = false;
                for listener in &mut self.listeners {
                    match listener.on_tick(&state) {
                        Ok(TickFlow::Continue) => {}
                        Ok(TickFlow::Stop) => stop_requested = true,
                        Err(e) => tracing::warn!("tick listener failed: {:#}", e),
                    }
                }

                if stop_requested {
                    self.stop();
                    PumpOutcome::Stopped(self.state())
                } else {
                    PumpOutcome::Ticked(state)
                }
            }
        }
    }

    /// Time until the next tick, if running
    pub fn time_to_next_tick(&self, time: &dyn TimeSource) -> Option<Duration> {
        self.clock
            .next_tick_at()
            .map(|at| at.saturating_duration_since(time.now()))
    }

    pub fn state(&self) -> StateSnapshot {
        let elapsed_seconds = self.earnings.elapsed_seconds();
        StateSnapshot {
            running: self.earnings.is_running(),
            hourly_rate: self.earnings.hourly_rate(),
            accrued_amount: self.earnings.accrued_amount(),
            elapsed_seconds,
            formatted_elapsed_time: format_elapsed(elapsed_seconds),
            rate_per_second: self.earnings.rate_per_second(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.initialized && self.clock.is_running()
    }

    /// Clock and accumulator agree on running. Vacuously true before
    /// initialization.
    pub fn is_synchronized(&self) -> bool {
        !self.initialized || self.clock.is_running() == self.earnings.is_running()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn earnings(&self) -> &EarningsAccumulator {
        &self.earnings
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.clock.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::IntervalScheduler;
    use crate::time::ManualTimeSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn coordinator() -> (ManualTimeSource, IntervalScheduler, Coordinator) {
        let time = ManualTimeSource::new();
        let scheduler = IntervalScheduler::new();
        let coordinator = Coordinator::new(Arc::new(time.clone()), Box::new(scheduler.clone()));
        (time, scheduler, coordinator)
    }

    #[test]
    fn test_uninitialized_operations_are_noops() {
        let (_time, _scheduler, mut coordinator) = coordinator();

        coordinator.stop();
        coordinator.reset();
        assert_eq!(coordinator.phase(), Phase::Uninitialized);
        assert!(coordinator.is_synchronized());
        assert_eq!(coordinator.pump(), PumpOutcome::Idle);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_time, _scheduler, mut coordinator) = coordinator();
        coordinator.initialize();
        coordinator.initialize();
        assert!(coordinator.is_initialized());
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn test_start_refused_without_rate() {
        let (_time, scheduler, mut coordinator) = coordinator();

        let err = coordinator.start().unwrap_err();
        assert!(matches!(err, EarnError::NonPositiveRate(r) if r == 0.0));
        assert!(!coordinator.state().running);
        assert!(!coordinator.clock().is_running());
        assert_eq!(scheduler.active_count(), 0);
        // Start still initializes
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn test_start_runs_both_components() {
        let (_time, _scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(60.0);

        coordinator.start().unwrap();
        assert!(coordinator.clock().is_running());
        assert!(coordinator.earnings().is_running());
        assert!(coordinator.is_synchronized());
        assert_eq!(coordinator.phase(), Phase::Running);
    }

    #[test]
    fn test_double_start_same_as_once() {
        let (time, scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(3600.0);

        coordinator.start().unwrap();
        time.advance_secs(5);
        coordinator.start().unwrap();
        time.advance_secs(5);
        coordinator.stop();

        assert_eq!(coordinator.state().elapsed_seconds, 10);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_ticks_drive_earnings() {
        let (time, _scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(3600.0);
        coordinator.start().unwrap();

        time.advance_secs(1);
        match coordinator.pump() {
            PumpOutcome::Ticked(state) => {
                assert_eq!(state.elapsed_seconds, 1);
                assert_eq!(state.accrued_amount, 1.0);
                assert_eq!(state.formatted_elapsed_time, "00:00:01");
            }
            other => panic!("expected tick, got {:?}", other),
        }

        time.advance(Duration::from_millis(500));
        assert_eq!(coordinator.pump(), PumpOutcome::Idle);
    }

    #[test]
    fn test_stop_captures_final_elapsed() {
        let (time, _scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(3600.0);
        coordinator.start().unwrap();

        // No pump in between: stop alone must fold the time in
        time.advance_secs(42);
        coordinator.stop();

        let state = coordinator.state();
        assert!(!state.running);
        assert_eq!(state.elapsed_seconds, 42);
        assert_eq!(state.accrued_amount, 42.0);
        assert_eq!(coordinator.phase(), Phase::Paused);
        assert!(coordinator.is_synchronized());
    }

    #[test]
    fn test_pause_does_not_accrue() {
        let (time, _scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(3600.0);
        coordinator.start().unwrap();
        time.advance_secs(10);
        coordinator.stop();

        time.advance_secs(1000);
        assert_eq!(coordinator.pump(), PumpOutcome::Idle);

        coordinator.start().unwrap();
        time.advance_secs(5);
        coordinator.pump();
        assert_eq!(coordinator.state().elapsed_seconds, 15);
        assert_eq!(coordinator.state().accrued_amount, 15.0);
    }

    #[test]
    fn test_reset_preserves_rate() {
        let (time, _scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(1000.0);
        coordinator.start().unwrap();
        time.advance_secs(120);
        coordinator.pump();
        coordinator.reset();

        let state = coordinator.state();
        assert_eq!(state.hourly_rate, 1000.0);
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.accrued_amount, 0.0);
        assert!(!state.running);
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn test_listener_errors_do_not_stop_ticks() {
        let (time, _scheduler, mut coordinator) = coordinator();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_by_listener = Arc::clone(&seen);

        coordinator.subscribe(|_: &StateSnapshot| -> anyhow::Result<TickFlow> {
            anyhow::bail!("display went away")
        });
        coordinator.subscribe(move |_: &StateSnapshot| -> anyhow::Result<TickFlow> {
            seen_by_listener.fetch_add(1, Ordering::SeqCst);
            Ok(TickFlow::Continue)
        });

        coordinator.set_hourly_rate(3600.0);
        coordinator.start().unwrap();
        for _ in 0..3 {
            time.advance_secs(1);
            assert!(matches!(coordinator.pump(), PumpOutcome::Ticked(_)));
        }

        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert!(coordinator.is_running());
    }

    #[test]
    fn test_listener_can_stop_from_tick() {
        let (time, scheduler, mut coordinator) = coordinator();
        coordinator.subscribe(|state: &StateSnapshot| -> anyhow::Result<TickFlow> {
            Ok(if state.accrued_amount >= 3.0 {
                TickFlow::Stop
            } else {
                TickFlow::Continue
            })
        });

        coordinator.set_hourly_rate(3600.0);
        coordinator.start().unwrap();

        let mut outcome = PumpOutcome::Idle;
        for _ in 0..5 {
            time.advance_secs(1);
            outcome = coordinator.pump();
            if matches!(outcome, PumpOutcome::Stopped(_)) {
                break;
            }
        }

        match outcome {
            PumpOutcome::Stopped(state) => assert_eq!(state.elapsed_seconds, 3),
            other => panic!("expected stop, got {:?}", other),
        }
        assert!(!coordinator.is_running());
        assert!(coordinator.is_synchronized());
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_lost_schedule_keeps_components_in_sync() {
        let (time, scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(3600.0);
        coordinator.start().unwrap();
        time.advance_secs(7);
        scheduler.clear();

        match coordinator.pump() {
            PumpOutcome::Stopped(state) => {
                assert!(!state.running);
                assert_eq!(state.elapsed_seconds, 7);
            }
            other => panic!("expected stop, got {:?}", other),
        }
        assert!(coordinator.is_synchronized());
        assert_eq!(coordinator.phase(), Phase::Paused);
    }

    #[test]
    fn test_rate_change_mid_session_reprices_history() {
        let (time, _scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(3600.0);
        coordinator.start().unwrap();
        time.advance_secs(10);
        coordinator.pump();
        assert_eq!(coordinator.state().accrued_amount, 10.0);

        coordinator.set_hourly_rate(7200.0);
        time.advance_secs(10);
        coordinator.pump();
        assert_eq!(coordinator.state().accrued_amount, 40.0);
    }

    #[test]
    fn test_tick_interval_change_keeps_elapsed_monotonic() {
        let (time, _scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(3600.0);
        coordinator.start().unwrap();
        time.advance(Duration::from_millis(2600));
        coordinator.pump();
        let before = coordinator.state().elapsed_seconds;

        assert!(coordinator.set_tick_interval_ms(200));
        time.advance(Duration::from_millis(200));
        coordinator.pump();
        assert!(coordinator.state().elapsed_seconds >= before);
        assert_eq!(coordinator.state().elapsed_seconds, 2);
        assert_eq!(coordinator.tick_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_restore_then_resume() {
        let (time, _scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(3600.0);
        coordinator.restore(100).unwrap();
        assert_eq!(coordinator.phase(), Phase::Paused);
        assert_eq!(coordinator.state().accrued_amount, 100.0);

        coordinator.start().unwrap();
        assert!(coordinator.restore(0).is_err());
        time.advance_secs(20);
        coordinator.stop();
        assert_eq!(coordinator.state().elapsed_seconds, 120);
    }

    #[test]
    fn test_teardown_cancels_ticks() {
        let (time, scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(3600.0);
        coordinator.start().unwrap();
        time.advance_secs(3);

        coordinator.teardown();
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(coordinator.phase(), Phase::Uninitialized);
        assert_eq!(coordinator.state().elapsed_seconds, 3);
        assert!(coordinator.is_synchronized());
    }

    #[test]
    fn test_reinitialize_after_teardown_keeps_paused() {
        let (time, _scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(3600.0);
        coordinator.start().unwrap();
        time.advance_secs(3);
        coordinator.teardown();

        coordinator.initialize();
        assert_eq!(coordinator.phase(), Phase::Paused);
        assert_eq!(coordinator.state().elapsed_seconds, 3);

        coordinator.reset();
        coordinator.teardown();
        coordinator.initialize();
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn test_snapshot_serializes() {
        let (_time, _scheduler, mut coordinator) = coordinator();
        coordinator.set_hourly_rate(2500.0);
        coordinator.restore(28_800).unwrap();

        let json = serde_json::to_value(coordinator.state()).unwrap();
        assert_eq!(json["accrued_amount"], 20000.0);
        assert_eq!(json["formatted_elapsed_time"], "08:00:00");
        assert_eq!(json["running"], false);
    }
}
