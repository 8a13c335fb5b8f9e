//! Cancellable timers
//!
//! Timers are plain deadlines stored in a slotmap. Nothing runs on its own:
//! the owner polls with the current time and reacts to expired handles. A
//! handle that was cancelled never matches a later timer, even if the slot is
//! reused, because slotmap keys are versioned.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

/// Monotonic time source, measured from an arbitrary origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock for tests and headless replay
///
/// Clones share the same time, so a test can keep one handle and give another
/// to the scrubber.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get().saturating_add(by));
    }

    /// Jump to an absolute time; earlier times are ignored
    pub fn set(&self, to: Duration) {
        if to > self.now.get() {
            self.now.set(to);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone)]
struct PendingTimer<T> {
    deadline: Duration,
    payload: T,
}

/// Set of pending deadlines
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, PendingTimer<T>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
        }
    }

    /// Schedule `payload` to expire at `deadline`
    pub fn schedule(&mut self, deadline: Duration, payload: T) -> TimerId {
        self.timers.insert(PendingTimer { deadline, payload })
    }

    /// Cancel a timer, returning its payload if it was still pending
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|t| t.payload)
    }

    /// Check if a timer is still pending
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Deadline of a pending timer
    pub fn deadline(&self, id: TimerId) -> Option<Duration> {
        self.timers.get(id).map(|t| t.deadline)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|t| t.deadline).min()
    }

    /// Remove and return every timer whose deadline is at or before `now`,
    /// earliest first
    pub fn pop_expired(&mut self, now: Duration) -> Vec<(TimerId, T)> {
        let mut expired: Vec<(TimerId, Duration)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= now)
            .map(|(id, t)| (id, t.deadline))
            .collect();
        expired.sort_by_key(|&(_, deadline)| deadline);

        expired
            .into_iter()
            .filter_map(|(id, _)| self.timers.remove(id).map(|t| (id, t.payload)))
            .collect()
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Check if no timers are pending
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Cancel every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Debounced auto-hide timer
///
/// At most one deadline is pending. Arming cancels the previous deadline
/// before scheduling the new one, so the last arm always wins.
#[derive(Debug, Clone)]
pub struct AutoHideTimer {
    queue: TimerQueue<()>,
    handle: Option<TimerId>,
    delay: Duration,
}

impl AutoHideTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            queue: TimerQueue::new(),
            handle: None,
            delay,
        }
    }

    /// Delay between arming and firing
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)arm the timer to fire `delay` after `now`
    pub fn arm(&mut self, now: Duration) -> TimerId {
        self.cancel();
        let id = self.queue.schedule(now.saturating_add(self.delay), ());
        self.handle = Some(id);
        id
    }

    /// Cancel the pending deadline, if any
    ///
    /// Returns true if something was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(id) => self.queue.cancel(id).is_some(),
            None => false,
        }
    }

    /// Check if a deadline is pending
    pub fn is_armed(&self) -> bool {
        self.handle.is_some_and(|id| self.queue.is_pending(id))
    }

    /// Handle of the pending deadline
    pub fn handle(&self) -> Option<TimerId> {
        self.handle
    }

    /// Pending deadline
    pub fn deadline(&self) -> Option<Duration> {
        self.handle.and_then(|id| self.queue.deadline(id))
    }

    /// Number of pending deadlines (never more than one)
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Consume the deadline if it has passed
    ///
    /// Returns true exactly once per armed deadline.
    pub fn poll(&mut self, now: Duration) -> bool {
        let fired = self.queue.pop_expired(now);
        if fired.is_empty() {
            return false;
        }
        self.handle = None;
        true
    }
}
