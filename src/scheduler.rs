// Repeating tick scheduling
//
// The clock registers one repeating timer while it runs and polls it for
// due ticks. Nothing here calls back into the clock: the host pumps.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Handle for one repeating timer, used to poll and cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// Trait every tick scheduler implements
pub trait Scheduler: Send {
    /// Register a repeating tick every `interval`, first due at `now + interval`
    fn schedule(&mut self, interval: Duration, now: Instant) -> TickToken;

    /// Cancel a timer. Returns false if it was not scheduled.
    fn cancel(&mut self, token: TickToken) -> bool;

    /// Whether the timer is still registered
    fn is_scheduled(&self, token: TickToken) -> bool;

    /// Number of ticks that came due since the last poll.
    ///
    /// Advances the timer's deadline past `now`. Returns 0 for unknown tokens.
    fn poll(&mut self, token: TickToken, now: Instant) -> u32;

    /// When the timer fires next
    fn next_deadline(&self, token: TickToken) -> Option<Instant>;
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    interval: Duration,
    next_due: Instant,
}

#[derive(Debug, Default)]
struct TimerTable {
    next_id: u64,
    timers: HashMap<TickToken, Timer>,
}

/// In-process scheduler backed by a shared timer table
#[derive(Debug, Clone, Default)]
pub struct IntervalScheduler {
    table: Arc<Mutex<TimerTable>>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered timers
    pub fn active_count(&self) -> usize {
        self.table().timers.len()
    }

    /// Drop every registered timer, as if the host lost its timer handles
    pub fn clear(&self) {
        self.table().timers.clear();
    }

    fn table(&self) -> MutexGuard<'_, TimerTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule(&mut self, interval: Duration, now: Instant) -> TickToken {
        let mut table = self.table();
        table.next_id += 1;
        let token = TickToken(table.next_id);
        table.timers.insert(
            token,
            Timer {
                interval,
                next_due: now + interval,
            },
        );
        token
    }

    fn cancel(&mut self, token: TickToken) -> bool {
        self.table().timers.remove(&token).is_some()
    }

    fn is_scheduled(&self, token: TickToken) -> bool {
        self.table().timers.contains_key(&token)
    }

    fn poll(&mut self, token: TickToken, now: Instant) -> u32 {
        let mut table = self.table();
        let Some(timer) = table.timers.get_mut(&token) else {
            return 0;
        };

        if now < timer.next_due {
            return 0;
        }

        let behind = now.duration_since(timer.next_due).as_nanos();
        let interval = timer.interval.as_nanos().max(1);
        let due = (behind / interval).saturating_add(1);
        let due = u32::try_from(due).unwrap_or(u32::MAX);

        // Jump the deadline past now instead of replaying every missed tick
        if let Some(next) = timer
            .next_due
            .checked_add(timer.interval.saturating_mul(due))
        {
            timer.next_due = next;
        }

        due
    }

    fn next_deadline(&self, token: TickToken) -> Option<Instant> {
        self.table().timers.get(&token).map(|t| t.next_due)
    }
}
