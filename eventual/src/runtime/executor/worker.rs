use crate::driver::DriverHandle;
use crate::runtime::context::{CURRENT_LOCALS, CURRENT_WORKER_ID, enter_context};
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;
use crate::task::Runnable;

use std::sync::Arc;

/// A worker thread in the executor.
///
/// The execution order is:
/// 1. Pop from the local queue
/// 2. Steal from the global injector
/// 3. Steal from other workers
/// 4. Park if no work is available
pub(crate) struct Worker {
    /// Unique identifier of the worker.
    id: usize,

    /// All local queues (one per worker), used for stealing.
    locals: Arc<Vec<Arc<LocalQueue>>>,

    /// Handle to the global injector queue.
    injector: InjectorHandle,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        locals: Arc<Vec<Arc<LocalQueue>>>,
        injector: InjectorHandle,
    ) -> Self {
        Self {
            id,
            locals,
            injector,
        }
    }

    /// Runs the worker loop until the injector signals shutdown.
    ///
    /// The runtime context stays installed for the whole lifetime of the
    /// worker, so tasks can spawn and set timers.
    pub(crate) fn run(&self, driver: DriverHandle) {
        CURRENT_WORKER_ID.with(|id| *id.borrow_mut() = Some(self.id));
        CURRENT_LOCALS.with(|locals| *locals.borrow_mut() = Some(self.locals.clone()));

        tracing::trace!(worker = self.id, "worker started");

        enter_context(driver, self.injector.clone(), || {
            while !self.injector.is_shutdown() {
                match self.next_task() {
                    Some(task) => task.run(),
                    None => self.injector.park(),
                }
            }
        });

        tracing::trace!(worker = self.id, "worker stopped");
    }

    /// Finds the next task to run, local queue first.
    fn next_task(&self) -> Option<Arc<dyn Runnable>> {
        self.locals[self.id]
            .pop()
            .or_else(|| self.injector.steal())
            .or_else(|| self.try_steal())
    }

    /// Attempts to steal a task from another worker's local queue.
    ///
    /// Workers are visited in a round-robin fashion starting after this
    /// one to spread the load.
    fn try_steal(&self) -> Option<Arc<dyn Runnable>> {
        let len = self.locals.len();

        if len <= 1 {
            return None;
        }

        (1..len)
            .map(|i| (self.id + i) % len)
            .find_map(|victim| self.locals[victim].steal())
    }
}
