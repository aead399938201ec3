//! Cooperative timer queue for the hero section.
//!
//! All animation and response delays run through a [`Scheduler`]. Timers are
//! not callbacks: each one carries a typed event that is handed back to the
//! owner by [`Scheduler::fire_next`], and the owner routes it to whichever
//! component scheduled it. Time comes from a [`Clock`], so tests can drive the
//! queue with a [`ManualClock`] instead of the wall clock.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of monotonic time, measured from the clock's own origin.
pub trait Clock: Send {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the current instant.
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

/// Virtual clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the scheduler.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    #[allow(clippy::cast_possible_truncation)]
    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Move the clock forward by a number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that has come due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<E> {
    /// Which timer fired.
    pub id: TimerId,
    /// The event it was scheduled with.
    pub event: E,
    /// The virtual time at which it fired.
    pub at: Duration,
}

#[derive(Debug)]
struct Entry<E> {
    event: E,
    every: Option<Duration>,
}

/// Shortest period accepted for repeating timers.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Single-threaded timer queue.
///
/// Deadlines are computed from the scheduler's own virtual "now", which
/// advances to each timer's deadline as it fires and to the clock's time once
/// nothing more is due. Timers with equal deadlines fire in scheduling order.
pub struct Scheduler<E> {
    clock: Box<dyn Clock>,
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, TimerId), Entry<E>>,
    deadlines: HashMap<TimerId, Duration>,
}

impl<E: Clone> Scheduler<E> {
    /// Create an empty scheduler driven by the given clock.
    pub fn new(clock: Box<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            clock,
            now,
            next_id: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `event` to fire once after `delay`.
    pub fn schedule_once(&mut self, delay: Duration, event: E) -> TimerId {
        self.insert(delay, event, None)
    }

    /// Schedule `event` to fire every `period`, first after one period.
    pub fn schedule_every(&mut self, period: Duration, event: E) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.insert(period, event, Some(period))
    }

    /// Cancel a timer.
    ///
    /// Returns `false` if it already fired or was already cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.queue.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    /// Whether a timer is still waiting to fire.
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pop the earliest timer whose deadline has passed on the clock.
    ///
    /// Repeating timers are re-armed from their own deadline before being
    /// returned. When nothing is due the virtual time catches up to the clock
    /// and `None` is returned.
    pub fn fire_next(&mut self) -> Option<Fired<E>> {
        let limit = self.clock.now();
        let key = match self.queue.keys().next() {
            Some(&key) if key.0 <= limit => key,
            _ => {
                self.now = self.now.max(limit);
                return None;
            }
        };

        let (deadline, id) = key;
        let entry = self.queue.remove(&key)?;
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);

        if let Some(period) = entry.every {
            let next = deadline + period;
            self.queue.insert(
                (next, id),
                Entry {
                    event: entry.event.clone(),
                    every: Some(period),
                },
            );
            self.deadlines.insert(id, next);
        }

        Some(Fired {
            id,
            event: entry.event,
            at: deadline,
        })
    }

    /// Cancel every pending timer.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }

    fn insert(&mut self, delay: Duration, event: E, every: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        self.queue.insert((deadline, id), Entry { event, every });
        self.deadlines.insert(id, deadline);
        id
    }
}

impl<E> std::fmt::Debug for Scheduler<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("pending", &self.queue.len())
            .finish_non_exhaustive()
    }
}
