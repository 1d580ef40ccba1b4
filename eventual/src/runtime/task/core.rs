use super::JoinHandle;
use super::state::{COMPLETED, IDLE, NOTIFIED, PANICKED, QUEUED, RUNNING};
use crate::runtime::context::{CURRENT_INJECTOR, CURRENT_LOCALS, CURRENT_WORKER_ID};
use crate::runtime::task::waker::make_waker;
use crate::runtime::work_stealing::injector::{Injector, InjectorHandle};

use parking_lot::Mutex;

use std::cell::UnsafeCell;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll, Waker};
use std::thread;

/// A runnable unit of work that can be executed by the scheduler.
///
/// The `Runnable` trait abstracts the specific return type of a task,
/// allowing the executor to manage a heterogeneous collection of tasks
/// through `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    /// Executes the task. This is typically called by a worker thread.
    fn run(self: Arc<Self>);
}

/// A spawned asynchronous task managed by the runtime.
///
/// A `Task` acts as the container for a `Future`. It coordinates the
/// lifecycle of that future, including its execution state, waker
/// registration and result storage.
pub(crate) struct Task<T> {
    /// The underlying future.
    ///
    /// Wrapped in `UnsafeCell` for interior mutability during `poll`, and
    /// `Pin<Box<...>>` to ensure the future remains pinned in memory.
    future: UnsafeCell<Pin<Box<dyn Future<Output = T> + Send>>>,

    /// The output of the future, or the panic payload if polling it
    /// panicked.
    pub(crate) output: Mutex<Option<thread::Result<T>>>,

    /// The current lifecycle state of the task (IDLE, RUNNING, etc.).
    pub(crate) state: AtomicUsize,

    /// Reference to the global injector queue for rescheduling.
    injector: Arc<Injector>,

    /// Wakers belonging to `JoinHandle`s awaiting this task.
    pub(crate) waiters: Mutex<Vec<Waker>>,
}

// Safety: the future is only accessed by the worker that moved the state
// to RUNNING, so it is never polled from two threads at once.
unsafe impl<T> Send for Task<T> {}
unsafe impl<T> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    /// Creates a new task instance from a future.
    ///
    /// The task is initialized in the `QUEUED` state, indicating it is
    /// ready to be processed by the scheduler.
    pub(crate) fn new<F>(future: F, injector: Arc<Injector>) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            future: UnsafeCell::new(Box::pin(future)),
            output: Mutex::new(None),
            state: AtomicUsize::new(QUEUED),
            injector,
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Performs one execution slice of the task.
    ///
    /// This method transitions the task to `RUNNING`, polls the inner
    /// future, and handles the outcome:
    /// - `Poll::Pending`: back to `IDLE`, or re-queued if notified.
    /// - `Poll::Ready`: stores the result and wakes every join handle.
    /// - panic: stores the payload, moves to `PANICKED` and wakes every
    ///   join handle. The worker thread survives.
    pub(crate) fn run(self: Arc<Self>) {
        let current = self.state.load(Ordering::Acquire);

        if current != QUEUED && current != NOTIFIED {
            return;
        }

        // Transition to RUNNING. This ensures exclusive access to the UnsafeCell.
        if self
            .state
            .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = make_waker(self.clone());
        let mut cx = Context::from_waker(&waker);

        // Safety: The RUNNING state guarantees that no other thread is polling this future.
        let poll = panic::catch_unwind(AssertUnwindSafe(|| unsafe {
            (&mut *self.future.get()).as_mut().poll(&mut cx)
        }));

        match poll {
            Ok(Poll::Pending) => {
                // Return to IDLE state unless a wake-up occurred during execution (NOTIFIED).
                if self
                    .state
                    .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    self.state.store(QUEUED, Ordering::Release);
                    self.injector.push(self.clone());
                }
            }
            Ok(Poll::Ready(value)) => self.finish(Ok(value), COMPLETED),
            Err(payload) => {
                tracing::debug!("task panicked while being polled");
                self.finish(Err(payload), PANICKED);
            }
        }
    }

    /// Stores the final outcome and wakes every join handle.
    fn finish(&self, output: thread::Result<T>, state: usize) {
        *self.output.lock() = Some(output);
        self.state.store(state, Ordering::Release);

        let waiters = std::mem::take(&mut *self.waiters.lock());
        for w in waiters {
            w.wake();
        }
    }

    /// Signals the task to be rescheduled.
    ///
    /// If the task is `IDLE`, it moves to `QUEUED` and is pushed to the
    /// scheduler. If the task is `RUNNING`, it moves to `NOTIFIED` so it
    /// is re-polled right after its current execution slice.
    pub(crate) fn schedule(self: Arc<Self>) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            match state {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.injector.push(self.clone());
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                // Already queued, notified, or finished: nothing to do.
                _ => return,
            }
        }
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::run(self)
    }
}

/// Spawns a future as a task onto the current runtime.
///
/// On a worker thread the task is pushed to that worker's local queue
/// for better cache locality. On any other thread that entered the
/// runtime (see [`Runtime::enter`](crate::Runtime::enter)) it is pushed
/// to the global injector queue.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let injector = CURRENT_INJECTOR.with(|cell| {
        cell.borrow()
            .as_ref()
            .expect("spawn must be called within the context of a runtime")
            .clone()
    });

    let task = Arc::new(Task::new(future, injector.clone()));

    let pushed_locally = CURRENT_WORKER_ID.with(|id_cell| {
        let Some(id) = *id_cell.borrow() else {
            return false;
        };

        CURRENT_LOCALS.with(|locals_cell| match locals_cell.borrow().as_ref() {
            Some(locals) => {
                locals[id].push(task.clone());
                true
            }
            None => false,
        })
    });

    if pushed_locally {
        injector.notify();
    } else {
        injector.push(task.clone());
    }

    JoinHandle { task }
}

/// Spawns a detached task onto the runtime owning `injector`.
///
/// Unlike [`spawn`], this works from any thread, including threads that
/// never entered a runtime.
pub(crate) fn spawn_on<F>(injector: &InjectorHandle, future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let task = Arc::new(Task::new(future, injector.clone()));
    injector.push(task);
}
