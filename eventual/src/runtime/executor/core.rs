use crate::driver::DriverHandle;
use crate::runtime::executor::worker::Worker;
use crate::runtime::task::Task;
use crate::runtime::work_stealing::injector::{Injector, InjectorHandle};
use crate::runtime::work_stealing::queue::LocalQueue;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Multi-threaded task executor.
///
/// The `Executor` is responsible for:
/// - spawning worker threads,
/// - coordinating task execution via work-stealing,
/// - managing orderly shutdown and thread joining.
///
/// It owns the global task injector and all worker threads.
pub(crate) struct Executor {
    /// Global injector queue shared by all workers.
    injector: InjectorHandle,

    /// Join handles for worker threads.
    handles: Vec<JoinHandle<()>>,
}

impl Executor {
    /// Creates a new executor with `threads` worker threads.
    ///
    /// Each worker gets its own local queue and runs with the runtime
    /// context (driver and injector) installed.
    pub(crate) fn new(driver: DriverHandle, threads: usize) -> Self {
        let injector = Arc::new(Injector::new());

        let locals: Arc<Vec<Arc<LocalQueue>>> =
            Arc::new((0..threads).map(|_| Arc::new(LocalQueue::new())).collect());

        let handles = (0..threads)
            .map(|id| {
                let worker = Worker::new(id, locals.clone(), injector.clone());
                let driver = driver.clone();

                thread::Builder::new()
                    .name(format!("eventual-worker-{id}"))
                    .spawn(move || worker.run(driver))
                    .expect("failed to spawn an executor worker thread")
            })
            .collect();

        Self { injector, handles }
    }

    /// Returns the injector shared with the workers.
    pub(crate) fn injector(&self) -> InjectorHandle {
        self.injector.clone()
    }

    /// Signals all workers to shut down and wakes the parked ones.
    pub(crate) fn shutdown(&self) {
        self.injector.shutdown();
    }

    /// Spawns a new asynchronous task onto the executor.
    ///
    /// Tasks spawned after shutdown has begun are silently ignored.
    pub(crate) fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.injector.is_shutdown() {
            return;
        }

        let task = Arc::new(Task::new(future, self.injector.clone()));
        self.injector.push(task);
    }

    /// Waits for all worker threads to terminate.
    ///
    /// This should be called after initiating shutdown.
    pub(crate) fn join(&mut self) {
        for h in self.handles.drain(..) {
            let _ = h.join();
        }
    }
}
