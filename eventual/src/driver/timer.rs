use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{self, AtomicBool};
use std::task::Waker;
use std::time::Instant;

/// An entry in the driver timer queue.
///
/// `TimerEntry` represents a scheduled wake-up at a specific deadline.
/// Entries live in a `BinaryHeap` ordered so the earliest deadline is
/// popped first.
///
/// The entry may be cancelled before it fires.
pub(crate) struct TimerEntry {
    /// The time at which the timer should fire.
    pub(crate) deadline: Instant,

    /// Waker to notify when the deadline is reached.
    pub(crate) waker: Waker,

    /// Cancellation flag shared with the associated sleep future.
    pub(crate) cancelled: Arc<AtomicBool>,
}

impl TimerEntry {
    /// Returns `true` once the associated sleep has been dropped.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(atomic::Ordering::Acquire)
    }

    /// Wakes the waiting task unless the timer was cancelled.
    pub(crate) fn fire(self) {
        if !self.is_cancelled() {
            self.waker.wake();
        }
    }
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline.eq(&other.deadline)
    }
}

impl Ord for TimerEntry {
    /// Orders timer entries by deadline.
    ///
    /// The comparison is **reversed** so that a `BinaryHeap<TimerEntry>`
    /// behaves as a min-heap.
    fn cmp(&self, other: &Self) -> Ordering {
        other.deadline.cmp(&self.deadline)
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::TimerEntry;

    use std::collections::BinaryHeap;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use std::task::Waker;
    use std::time::{Duration, Instant};

    fn entry(deadline: Instant) -> TimerEntry {
        TimerEntry {
            deadline,
            waker: Waker::noop().clone(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[test]
    fn heap_pops_earliest_deadline_first() {
        let now = Instant::now();
        let mut heap = BinaryHeap::new();

        heap.push(entry(now + Duration::from_millis(30)));
        heap.push(entry(now + Duration::from_millis(10)));
        heap.push(entry(now + Duration::from_millis(20)));

        let order: Vec<_> = std::iter::from_fn(|| heap.pop())
            .map(|t| t.deadline - now)
            .collect();

        assert_eq!(
            order,
            vec![
                Duration::from_millis(10),
                Duration::from_millis(20),
                Duration::from_millis(30),
            ]
        );
    }
}
