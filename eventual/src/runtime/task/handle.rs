use crate::task::Task;
use crate::task::state::{COMPLETED, PANICKED};

use std::panic;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::task::{Context, Poll};

/// A handle to a spawned task.
///
/// A `JoinHandle` allows awaiting the result of a task spawned onto the
/// runtime. It implements [`Future`] and resolves once the task has
/// completed.
///
/// Dropping the `JoinHandle` does **not** cancel the task; it only
/// discards the ability to observe its result.
pub struct JoinHandle<T> {
    /// Shared reference to the underlying task.
    pub(crate) task: Arc<Task<T>>,
}

impl<T> JoinHandle<T> {
    /// Returns `true` once the task has run to completion or panicked.
    pub fn is_finished(&self) -> bool {
        matches!(self.task.state.load(Ordering::Acquire), COMPLETED | PANICKED)
    }

    fn take_output(&self) -> Poll<T> {
        match self.task.output.lock().take() {
            Some(Ok(value)) => Poll::Ready(value),
            Some(Err(payload)) => panic::resume_unwind(payload),
            None => panic!("JoinHandle polled after completion"),
        }
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = T;

    /// Polls the join handle.
    ///
    /// The waker is registered **before** re-checking the task state to
    /// avoid missed wake-ups. If the task panicked, the panic is resumed
    /// in the awaiting task.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        if self.is_finished() {
            return self.take_output();
        }

        self.task.waiters.lock().push(cx.waker().clone());

        if self.is_finished() {
            return self.take_output();
        }

        Poll::Pending
    }
}
