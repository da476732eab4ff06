//! Slot state machine behind [`OperationTracker`](super::OperationTracker)
//!
//! Holds at most one current operation and at most one replacement. No
//! locking or timers here, callers pass in the current instant so every
//! transition can be tested without threads.

use std::time::{Duration, Instant};

/// Where the tracker is in its current/next cycle
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    /// No operation is held
    Idle,
    /// `current` is waiting to be handed to the consumer
    Pending { current: T },
    /// `current` has been handed to the consumer and awaits completion
    Dispatched { current: T },
    /// A replacement arrived while `current` was still held.
    /// `in_flight` tells whether `current` has already been dispatched.
    PendingWithReplacement { current: T, in_flight: bool, next: T },
}

/// Result of a dispatch attempt
#[derive(Debug, PartialEq)]
pub enum Dispatch<T> {
    /// Nothing is waiting, or the current operation is still in flight
    NotPending,
    /// The current operation becomes eligible after this long
    Wait(Duration),
    /// Hand this operation to the consumer now, under this dispatch number
    Ready(T, u64),
}

/// Counters describing what a tracker has done with its operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Operations passed to `add`
    pub added: u64,
    /// Operations handed to the consumer
    pub dispatched: u64,
    /// Replacements overwritten by a newer replacement before dispatch
    pub coalesced: u64,
    /// Operations discarded by `abort`
    pub aborted: u64,
}

/// Two-slot coalescing schedule with a minimum dispatch interval
#[derive(Debug)]
pub struct Schedule<T> {
    phase: Phase<T>,
    interval: Duration,
    /// `None` means "long ago": the next pending operation is eligible at once
    last_dispatch: Option<Instant>,
    /// Number of the dispatch holding the current slot, if it is in flight
    in_flight_seq: Option<u64>,
    stats: TrackerStats,
}

impl<T> Schedule<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            interval,
            last_dispatch: None,
            in_flight_seq: None,
            stats: TrackerStats::default(),
        }
    }

    pub fn phase(&self) -> &Phase<T> {
        &self.phase
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// The operation occupying the current slot, dispatched or not
    pub fn current(&self) -> Option<&T> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Pending { current }
            | Phase::Dispatched { current }
            | Phase::PendingWithReplacement { current, .. } => Some(current),
        }
    }

    /// Whether the current slot holds an operation not yet dispatched
    pub fn is_pending(&self) -> bool {
        matches!(
            self.phase,
            Phase::Pending { .. }
                | Phase::PendingWithReplacement {
                    in_flight: false,
                    ..
                }
        )
    }

    /// Place an operation into the current slot, or replace the next one.
    ///
    /// An operation added to an idle schedule is eligible immediately.
    pub fn add(&mut self, operation: T) {
        self.stats.added += 1;
        self.phase = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {
                self.last_dispatch = None;
                Phase::Pending { current: operation }
            }
            Phase::Pending { current } => Phase::PendingWithReplacement {
                current,
                in_flight: false,
                next: operation,
            },
            Phase::Dispatched { current } => Phase::PendingWithReplacement {
                current,
                in_flight: true,
                next: operation,
            },
            Phase::PendingWithReplacement {
                current, in_flight, ..
            } => {
                self.stats.coalesced += 1;
                Phase::PendingWithReplacement {
                    current,
                    in_flight,
                    next: operation,
                }
            }
        };
    }

    /// Release the current slot and promote the replacement, if any.
    ///
    /// Returns true when a promoted operation is now waiting for dispatch.
    pub fn complete(&mut self) -> bool {
        self.in_flight_seq = None;
        self.phase = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::PendingWithReplacement { next, .. } => Phase::Pending { current: next },
            _ => Phase::Idle,
        };
        self.is_pending()
    }

    /// Complete only if dispatch `seq` still holds the current slot.
    ///
    /// Returns false, changing nothing, once that dispatch has already been
    /// completed or aborted.
    pub fn complete_dispatch(&mut self, seq: u64) -> bool {
        if self.in_flight_seq != Some(seq) {
            return false;
        }
        self.complete();
        true
    }

    /// Discard both slots. Returns how many operations were dropped.
    pub fn abort(&mut self) -> usize {
        self.in_flight_seq = None;
        let dropped = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => 0,
            Phase::Pending { .. } | Phase::Dispatched { .. } => 1,
            Phase::PendingWithReplacement { .. } => 2,
        };
        self.stats.aborted += dropped as u64;
        dropped
    }

    /// Time left before a pending operation may be dispatched at `now`
    fn remaining(&self, now: Instant) -> Duration {
        match self.last_dispatch {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }
}

impl<T: Clone> Schedule<T> {
    /// Mark the current operation as in flight if it is pending and the
    /// interval since the previous dispatch has elapsed.
    pub fn try_dispatch(&mut self, now: Instant) -> Dispatch<T> {
        if !self.is_pending() {
            return Dispatch::NotPending;
        }

        let remaining = self.remaining(now);
        if !remaining.is_zero() {
            return Dispatch::Wait(remaining);
        }

        let (phase, operation) = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Pending { current } => {
                let operation = current.clone();
                (Phase::Dispatched { current }, operation)
            }
            Phase::PendingWithReplacement { current, next, .. } => {
                let operation = current.clone();
                (
                    Phase::PendingWithReplacement {
                        current,
                        in_flight: true,
                        next,
                    },
                    operation,
                )
            }
            other => {
                self.phase = other;
                return Dispatch::NotPending;
            }
        };

        self.phase = phase;
        self.last_dispatch = Some(now);
        self.stats.dispatched += 1;
        let seq = self.stats.dispatched;
        self.in_flight_seq = Some(seq);
        Dispatch::Ready(operation, seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn test_first_add_is_immediately_ready() {
        let mut schedule = Schedule::new(INTERVAL);
        schedule.add(1);

        assert_eq!(schedule.current(), Some(&1));
        assert_eq!(schedule.try_dispatch(Instant::now()), Dispatch::Ready(1, 1));
        assert_eq!(schedule.phase(), &Phase::Dispatched { current: 1 });
    }

    #[test]
    fn test_last_replacement_wins() {
        let mut schedule = Schedule::new(INTERVAL);
        let t0 = Instant::now();
        schedule.add("a");
        assert_eq!(schedule.try_dispatch(t0), Dispatch::Ready("a", 1));

        schedule.add("b");
        schedule.add("c");
        assert_eq!(schedule.current(), Some(&"a"));
        assert_eq!(schedule.stats().coalesced, 1);

        assert!(schedule.complete());
        assert_eq!(schedule.current(), Some(&"c"));
        assert_eq!(schedule.phase(), &Phase::Pending { current: "c" });
    }

    #[test]
    fn test_complete_on_idle_is_noop() {
        let mut schedule: Schedule<u32> = Schedule::new(INTERVAL);
        for _ in 0..3 {
            assert!(!schedule.complete());
        }
        assert_eq!(schedule.phase(), &Phase::Idle);
        assert_eq!(schedule.try_dispatch(Instant::now()), Dispatch::NotPending);
        assert_eq!(schedule.stats(), TrackerStats::default());
    }

    #[test]
    fn test_promoted_operation_waits_for_interval() {
        let mut schedule = Schedule::new(INTERVAL);
        let t0 = Instant::now();
        schedule.add(1);
        assert_eq!(schedule.try_dispatch(t0), Dispatch::Ready(1, 1));
        schedule.add(2);
        schedule.complete();

        let t1 = t0 + Duration::from_millis(30);
        assert_eq!(schedule.try_dispatch(t1), Dispatch::Wait(Duration::from_millis(70)));

        let t2 = t0 + INTERVAL;
        assert_eq!(schedule.try_dispatch(t2), Dispatch::Ready(2, 2));
    }

    #[test]
    fn test_add_to_idle_resets_interval() {
        let mut schedule = Schedule::new(INTERVAL);
        let t0 = Instant::now();
        schedule.add(1);
        assert_eq!(schedule.try_dispatch(t0), Dispatch::Ready(1, 1));
        schedule.complete();

        schedule.add(2);
        assert_eq!(
            schedule.try_dispatch(t0 + Duration::from_millis(1)),
            Dispatch::Ready(2, 2)
        );
    }

    #[test]
    fn test_in_flight_operation_is_not_redispatched() {
        let mut schedule = Schedule::new(INTERVAL);
        let t0 = Instant::now();
        schedule.add(1);
        assert_eq!(schedule.try_dispatch(t0), Dispatch::Ready(1, 1));
        schedule.add(2);

        assert_eq!(schedule.try_dispatch(t0 + INTERVAL * 5), Dispatch::NotPending);
    }

    #[test]
    fn test_pending_current_dispatches_with_replacement_queued() {
        let mut schedule = Schedule::new(INTERVAL);
        let t0 = Instant::now();
        schedule.add(1);
        assert_eq!(schedule.try_dispatch(t0), Dispatch::Ready(1, 1));
        schedule.add(2);
        schedule.complete();
        schedule.add(3);

        assert_eq!(
            schedule.phase(),
            &Phase::PendingWithReplacement {
                current: 2,
                in_flight: false,
                next: 3
            }
        );
        assert_eq!(schedule.try_dispatch(t0 + INTERVAL), Dispatch::Ready(2, 2));
        assert!(schedule.complete());
        assert_eq!(schedule.try_dispatch(t0 + INTERVAL * 2), Dispatch::Ready(3, 3));
    }

    #[test]
    fn test_abort_clears_both_slots() {
        let mut schedule = Schedule::new(INTERVAL);
        schedule.add(1);
        schedule.add(2);

        assert_eq!(schedule.abort(), 2);
        assert_eq!(schedule.current(), None);
        assert_eq!(schedule.try_dispatch(Instant::now()), Dispatch::NotPending);
        assert_eq!(schedule.stats().aborted, 2);
        assert!(!schedule.complete());
    }

    #[test]
    fn test_stale_dispatch_completion_is_ignored() {
        let mut schedule = Schedule::new(INTERVAL);
        let t0 = Instant::now();
        schedule.add(1);
        assert_eq!(schedule.try_dispatch(t0), Dispatch::Ready(1, 1));
        schedule.add(2);

        // Dispatch 1 completed by its consumer, promoting 2
        assert!(schedule.complete());
        assert!(!schedule.complete_dispatch(1));
        assert_eq!(schedule.phase(), &Phase::Pending { current: 2 });

        // Once 2 is in flight, a late release of dispatch 1 must not free it
        assert_eq!(schedule.try_dispatch(t0 + INTERVAL), Dispatch::Ready(2, 2));
        assert!(!schedule.complete_dispatch(1));
        assert_eq!(schedule.phase(), &Phase::Dispatched { current: 2 });

        assert!(schedule.complete_dispatch(2));
        assert_eq!(schedule.phase(), &Phase::Idle);
    }

    #[test]
    fn test_complete_dispatch_after_abort_is_noop() {
        let mut schedule = Schedule::new(INTERVAL);
        schedule.add(1);
        assert_eq!(schedule.try_dispatch(Instant::now()), Dispatch::Ready(1, 1));
        schedule.abort();
        schedule.add(2);

        assert!(!schedule.complete_dispatch(1));
        assert_eq!(schedule.current(), Some(&2));
    }
}
