use crate::runtime::task::Runnable;

use parking_lot::Mutex;

use std::collections::VecDeque;
use std::sync::Arc;

/// A per-worker local task queue.
///
/// The owning worker pushes and pops at the back (LIFO) for cache
/// locality; other workers steal from the front (FIFO).
pub(crate) struct LocalQueue {
    inner: Mutex<VecDeque<Arc<dyn Runnable>>>,
}

impl LocalQueue {
    /// Creates an empty local task queue.
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Pushes a runnable task to the back of the queue.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.inner.lock().push_back(task);
    }

    /// Pops a runnable task from the back of the queue.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        self.inner.lock().pop_back()
    }

    /// Steals a runnable task from the front of the queue.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        self.inner.lock().pop_front()
    }
}
