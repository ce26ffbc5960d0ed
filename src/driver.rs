// Host loop that waits for ticks and pumps the coordinator

use crate::coordinator::{Coordinator, PumpOutcome, StateSnapshot};
use crate::time::TimeSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a driven run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunEnd {
    /// The time limit was reached; the coordinator was stopped
    LimitReached(StateSnapshot),
    /// The coordinator stopped on its own (listener or lost schedule)
    Stopped(StateSnapshot),
    /// The stop flag was raised; the coordinator was stopped
    Interrupted(StateSnapshot),
    /// The coordinator was not running to begin with
    NotRunning(StateSnapshot),
}

impl RunEnd {
    pub fn state(&self) -> &StateSnapshot {
        match self {
            RunEnd::LimitReached(state)
            | RunEnd::Stopped(state)
            | RunEnd::Interrupted(state)
            | RunEnd::NotRunning(state) => state,
        }
    }
}

pub struct Driver {
    time: Arc<dyn TimeSource>,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl Driver {
    pub fn new(time: Arc<dyn TimeSource>) -> Self {
        Self {
            time,
            stop_flag: None,
        }
    }

    /// End the run once `flag` is set, e.g. from a signal handler.
    /// Checked before and after every sleep.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    fn stop_requested(&self) -> bool {
        self.stop_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn interrupt(&self, coordinator: &mut Coordinator) -> RunEnd {
        coordinator.stop();
        tracing::debug!("run interrupted");
        RunEnd::Interrupted(coordinator.state())
    }

    /// Pump a running coordinator until it stops or `limit` has passed.
    ///
    /// Sleeps on the time source until the next tick (or the limit,
    /// whichever is sooner). Without a limit this only returns once the
    /// coordinator stops or the stop flag is raised. A limit too large to
    /// represent as an instant is treated as no limit.
    pub fn run(&self, coordinator: &mut Coordinator, limit: Option<Duration>) -> RunEnd {
        if !coordinator.is_running() {
            return RunEnd::NotRunning(coordinator.state());
        }

        let deadline = limit.and_then(|limit| self.time.now().checked_add(limit));

        loop {
            if self.stop_requested() {
                return self.interrupt(coordinator);
            }

            if let Some(deadline) = deadline {
                if self.time.now() >= deadline {
                    coordinator.stop();
                    tracing::debug!("run limit reached");
                    return RunEnd::LimitReached(coordinator.state());
                }
            }

            self.time.sleep(self.wait_for(coordinator, deadline));
            if self.stop_requested() {
                return self.interrupt(coordinator);
            }

            match coordinator.pump() {
                PumpOutcome::Stopped(state) => return RunEnd::Stopped(state),
                PumpOutcome::Idle if !coordinator.is_running() => {
                    return RunEnd::Stopped(coordinator.state())
                }
                PumpOutcome::Idle | PumpOutcome::Ticked(_) => {}
            }
        }
    }

    fn wait_for(&self, coordinator: &Coordinator, deadline: Option<Instant>) -> Duration {
        let until_tick = coordinator
            .time_to_next_tick(self.time.as_ref())
            .unwrap_or_else(|| coordinator.tick_interval());

        match deadline {
            Some(deadline) => until_tick.min(deadline.saturating_duration_since(self.time.now())),
            None => until_tick,
        }
    }
}
