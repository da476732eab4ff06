//! Flow control and throttling of data, sample and redraw requests
//!
//! An [`OperationTracker`] accepts operations faster than its consumer can
//! handle them. At most one operation is in flight, at most one replacement
//! waits behind it, and dispatches are spaced at least `interval` apart.
//! The consumer must call [`OperationTracker::complete`] once it has
//! finished with each dispatched operation.

mod phase;

pub use phase::{Dispatch, Phase, Schedule, TrackerStats};

use crate::constants::tracker::{TIMER_THREAD_NAME, TIMER_TICK};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

type Action<T> = Box<dyn Fn(T) + Send + Sync>;

struct Shared<T> {
    schedule: Mutex<Schedule<T>>,
    wake: Condvar,
    shutdown: AtomicBool,
    action: Action<T>,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, Schedule<T>> {
        self.schedule.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self) {
        let promoted = self.lock().complete();
        if promoted {
            self.wake.notify_one();
        }
    }
}

impl<T: Clone> Shared<T> {
    /// Dispatch the current operation on this thread if it is eligible now
    fn try_dispatch(&self) {
        let (operation, seq) = match self.lock().try_dispatch(Instant::now()) {
            Dispatch::Ready(operation, seq) => (operation, seq),
            Dispatch::Wait(_) | Dispatch::NotPending => return,
        };
        self.run(operation, seq);
    }

    fn run(&self, operation: T, seq: u64) {
        profiling::scope!("operation_dispatch");

        let result = panic::catch_unwind(AssertUnwindSafe(|| (self.action)(operation)));
        if result.is_err() {
            // The consumer may have completed before panicking
            let released = self.lock().complete_dispatch(seq);
            if released {
                log::error!("Operation consumer panicked; completing the operation");
                self.wake.notify_one();
            } else {
                log::error!("Operation consumer panicked after completing its operation");
            }
        }
    }

    fn timer_loop(&self) {
        let mut schedule = self.lock();
        while !self.shutdown.load(Ordering::Acquire) {
            match schedule.try_dispatch(Instant::now()) {
                Dispatch::Ready(operation, seq) => {
                    drop(schedule);
                    self.run(operation, seq);
                    schedule = self.lock();
                }
                Dispatch::Wait(remaining) => {
                    schedule = self
                        .wake
                        .wait_timeout(schedule, remaining.min(TIMER_TICK))
                        .unwrap_or_else(PoisonError::into_inner)
                        .0;
                }
                Dispatch::NotPending => {
                    schedule = self
                        .wake
                        .wait(schedule)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }
}

/// Rate-limiting, coalescing scheduler for one stream of requests.
///
/// Each distinct request stream (per parameter, per display) owns its own
/// tracker. The consumer runs either on the thread calling [`add`] or on
/// the tracker's timer thread, never while the internal lock is held, so it
/// may call back into the tracker.
///
/// [`add`]: OperationTracker::add
pub struct OperationTracker<T> {
    shared: Arc<Shared<T>>,
    timer: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + 'static> OperationTracker<T> {
    /// Create a tracker dispatching to `action` at most once per `interval`
    pub fn new<F>(interval: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let shared = Arc::new(Shared {
            schedule: Mutex::new(Schedule::new(interval)),
            wake: Condvar::new(),
            shutdown: AtomicBool::new(false),
            action: Box::new(action),
        });

        let timer_shared = Arc::clone(&shared);
        let timer = thread::Builder::new()
            .name(TIMER_THREAD_NAME.to_string())
            .spawn(move || timer_shared.timer_loop());

        let timer = match timer {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("Failed to start operation tracker timer: {}", e);
                None
            }
        };

        Self { shared, timer }
    }

    /// Add an operation. It becomes current if the tracker is idle,
    /// otherwise it replaces any operation waiting behind the current one.
    pub fn add(&self, operation: T) {
        {
            let mut schedule = self.shared.lock();
            schedule.add(operation);
        }
        self.shared.wake.notify_one();
        self.shared.try_dispatch();
    }

    /// Indicate that the current operation has finished executing
    pub fn complete(&self) {
        self.shared.complete();
    }

    /// Clear the current and next operations without dispatching either
    pub fn abort(&self) {
        let dropped = self.shared.lock().abort();
        if dropped > 0 {
            log::debug!("Aborted {} tracked operation(s)", dropped);
        }
    }

    /// The operation in the current slot, whether dispatched or not
    pub fn current(&self) -> Option<T> {
        self.shared.lock().current().cloned()
    }

    /// Returns a guard that calls [`complete`](Self::complete) when dropped
    pub fn completion(&self) -> Completion<'_, T> {
        Completion { tracker: self }
    }
}

impl<T> OperationTracker<T> {
    pub fn interval(&self) -> Duration {
        self.shared.lock().interval()
    }

    pub fn stats(&self) -> TrackerStats {
        self.shared.lock().stats()
    }

    /// Whether any operation is held (in flight or waiting)
    pub fn is_active(&self) -> bool {
        !matches!(self.shared.lock().phase(), Phase::Idle)
    }
}

impl<T> Drop for OperationTracker<T> {
    fn drop(&mut self) {
        {
            let _schedule = self.shared.lock();
            self.shared.shutdown.store(true, Ordering::Release);
        }
        self.shared.wake.notify_all();

        if let Some(handle) = self.timer.take() {
            // Dropped from inside the consumer on the timer thread
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                log::warn!("Operation tracker timer thread panicked");
            }
        }
    }
}

/// Completes the tracker's current operation when dropped.
///
/// Hold one for the whole of a result handler so that every exit path,
/// including early returns and panics, releases the slot.
pub struct Completion<'a, T> {
    tracker: &'a OperationTracker<T>,
}

impl<T> Drop for Completion<'_, T> {
    fn drop(&mut self) {
        self.tracker.shared.complete();
    }
}
