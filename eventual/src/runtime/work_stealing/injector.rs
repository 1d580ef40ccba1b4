use crate::runtime::task::Runnable;

use parking_lot::{Condvar, Mutex};

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Shared handle to the global task injector.
pub(crate) type InjectorHandle = Arc<Injector>;

/// Longest time a parked worker sleeps before re-checking for work.
const PARK_TIMEOUT: Duration = Duration::from_millis(1);

/// Global task injector for the work-stealing scheduler.
///
/// The injector is the central queue where tasks spawned from outside a
/// worker, and tasks rescheduled by their wakers, are pushed before being
/// picked up by worker threads.
///
/// It also coordinates worker parking using a condition variable,
/// allowing workers to sleep when no work is available.
pub(crate) struct Injector {
    /// Queue holding globally injected tasks.
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Lock paired with `condvar` for parking.
    parked: Mutex<usize>,

    /// Condition variable used to wake parked workers.
    condvar: Condvar,

    /// Indicates whether the executor is shutting down.
    shutdown: AtomicBool,
}

impl Injector {
    /// Creates a new empty injector.
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            parked: Mutex::new(0),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Signals shutdown and wakes all parked workers.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.condvar.notify_all();
    }

    /// Returns `true` once shutdown has been signalled.
    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Pushes a task into the global injector and wakes a parked worker.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.queue.lock().push_back(task);
        self.notify();
    }

    /// Wakes one parked worker, if any.
    ///
    /// Used after pushing into a worker-local queue so idle workers get a
    /// chance to steal.
    pub(crate) fn notify(&self) {
        if *self.parked.lock() > 0 {
            self.condvar.notify_one();
        }
    }

    /// Parks the current worker thread until work becomes available, a
    /// shutdown signal is received, or the park timeout elapses.
    ///
    /// Workers only park if the injector queue is empty.
    pub(crate) fn park(&self) {
        if self.is_shutdown() {
            return;
        }

        if !self.queue.lock().is_empty() {
            return;
        }

        let mut parked = self.parked.lock();
        *parked += 1;

        self.condvar.wait_for(&mut parked, PARK_TIMEOUT);

        *parked -= 1;
    }

    /// Steals a task from the front of the global queue.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        self.queue.lock().pop_front()
    }
}
