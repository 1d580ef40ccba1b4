use crate::runtime::task::Task;

use std::sync::Arc;
use std::task::{Wake, Waker};

/// Waking a task reschedules it on the executor.
impl<T: Send + 'static> Wake for Task<T> {
    fn wake(self: Arc<Self>) {
        self.schedule();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.clone().schedule();
    }
}

/// Creates a [`Waker`] associated with a runtime task.
///
/// The returned waker keeps the task alive and reschedules it when woken.
pub(crate) fn make_waker<T: Send + 'static>(task: Arc<Task<T>>) -> Waker {
    Waker::from(task)
}
