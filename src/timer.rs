//! Virtual-time timer queue
//!
//! Every deferred action on the page (typing cadence, cursor blink, simulated
//! submission, notice dismissal, scroll-depth debounce) is a [`Task`] queued
//! here. Time never advances on its own: the runtime pops due tasks while the
//! host moves the clock forward. Ties on the due time fire in scheduling order.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Ticks an interval may owe before the backlog is skipped
const MAX_CATCH_UP_TICKS: u64 = 1000;

/// Handle returned when scheduling, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

/// Deferred work items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Reveal the next character of the typing effect
    TypeNextChar,
    /// Toggle the typing cursor border
    BlinkCursor,
    /// Simulated submission latency elapsed
    CompleteSubmission,
    /// Hide the success notice
    DismissSuccess,
    /// Trailing edge of the scroll-depth debounce
    RecomputeScrollDepth,
}

#[derive(Debug, Clone)]
struct Scheduled {
    id: TimerId,
    task: Task,
    /// Re-arm period for repeating timers
    period: Option<u64>,
}

/// Single-threaded timer queue driven by an explicit clock
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Rc<Cell<u64>>,
    next_seq: u64,
    next_id: u64,
    queue: BTreeMap<(u64, u64), Scheduled>,
    index: HashMap<TimerId, (u64, u64)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed milliseconds since the page loaded
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Shared view of the clock, read by [`crate::tracker::VirtualClock`]
    pub fn clock_handle(&self) -> Rc<Cell<u64>> {
        Rc::clone(&self.now)
    }

    /// Run `task` once after `delay_ms`
    pub fn set_timeout(&mut self, delay_ms: u64, task: Task) -> TimerId {
        let id = self.allocate_id();
        self.enqueue(self.now().saturating_add(delay_ms), Scheduled { id, task, period: None });
        id
    }

    /// Run `task` every `period_ms` until cleared; a zero period is treated as 1ms.
    pub fn set_interval(&mut self, period_ms: u64, task: Task) -> TimerId {
        let period = period_ms.max(1);
        let id = self.allocate_id();
        self.enqueue(
            self.now().saturating_add(period),
            Scheduled {
                id,
                task,
                period: Some(period),
            },
        );
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or never existed.
    pub fn clear(&mut self, id: TimerId) -> bool {
        match self.index.remove(&id) {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the earliest pending timer
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its
    /// due time. Repeating timers are re-armed before returning.
    ///
    /// An interval more than `MAX_CATCH_UP_TICKS` behind `until` drops the
    /// excess in whole pairs of ticks, so toggling tasks end in the state a full
    /// catch-up would leave. An interval whose next tick would overflow the
    /// clock is retired.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, Task)> {
        let (&key, _) = self.queue.iter().next()?;
        if key.0 > until {
            return None;
        }

        let entry = self.queue.remove(&key)?;
        self.index.remove(&entry.id);
        self.now.set(self.now().max(key.0));

        if let Some(period) = entry.period {
            if let Some(mut next) = key.0.checked_add(period) {
                if next <= until {
                    let behind = (until - next) / period;
                    if behind > MAX_CATCH_UP_TICKS {
                        let skipped = (behind - MAX_CATCH_UP_TICKS) & !1;
                        next += skipped * period;
                    }
                }
                self.enqueue(next, entry.clone());
            }
        }

        Some((entry.id, entry.task))
    }

    /// Move the clock forward without firing anything. Never moves it back.
    pub fn set_now(&mut self, at_ms: u64) {
        self.now.set(self.now().max(at_ms));
    }

    fn allocate_id(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }

    fn enqueue(&mut self, due: u64, entry: Scheduled) {
        self.next_seq += 1;
        let key = (due, self.next_seq);
        self.index.insert(entry.id, key);
        self.queue.insert(key, entry);
    }
}

/// Trailing-edge debounce over a [`Scheduler`]
#[derive(Debug)]
pub struct Debouncer {
    delay_ms: u64,
    task: Task,
    pending: Option<TimerId>,
}

impl Debouncer {
    pub fn new(delay_ms: u64, task: Task) -> Self {
        Self {
            delay_ms,
            task,
            pending: None,
        }
    }

    /// Restart the quiet period; only the last call within it fires.
    pub fn trigger(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.pending.take() {
            scheduler.clear(id);
        }
        self.pending = Some(scheduler.set_timeout(self.delay_ms, self.task));
    }

    /// Acknowledge that the debounced timer fired
    pub fn fired(&mut self, id: TimerId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
