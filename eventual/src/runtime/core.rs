use super::context::enter_context;
use super::executor::core::Executor;
use crate::driver::command::Command;
use crate::driver::{Driver, DriverHandle};

use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::mpsc;
use std::task::{Context, Poll};
use std::thread::{self, JoinHandle};

/// The main runtime handle.
///
/// `Runtime` is responsible for:
/// - spawning asynchronous tasks,
/// - driving task execution via the executor,
/// - running the timer driver,
/// - providing a synchronous entry point via [`block_on`](Self::block_on).
///
/// Dropping the runtime shuts down all internal components in an orderly
/// fashion.
pub struct Runtime {
    /// Task executor responsible for scheduling and running futures.
    executor: Executor,

    /// Handle to the timer driver thread.
    driver_handle: DriverHandle,

    /// Join handle of the timer driver thread.
    driver_thread: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Creates a new runtime with `worker_threads` executor threads.
    ///
    /// The timer driver is started automatically.
    pub(crate) fn new(worker_threads: usize) -> Self {
        let (driver_handle, driver_thread) = Driver::start();
        let executor = Executor::new(driver_handle.clone(), worker_threads);

        tracing::debug!(worker_threads, "runtime started");

        Self {
            executor,
            driver_handle,
            driver_thread: Some(driver_thread),
        }
    }

    /// Spawns a future onto the runtime.
    ///
    /// The future is executed asynchronously and runs until completion.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.executor.spawn(future);
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// The future is spawned onto the executor and its result is sent
    /// back through a channel. If the future panics, the panic is resumed
    /// on the calling thread.
    ///
    /// # Panics
    ///
    /// Panics if the future panics, or if the runtime shuts down before
    /// the future completes.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async {
    ///     42
    /// });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (transmitter, receiver) = mpsc::channel();

        self.spawn(async move {
            let result = CatchUnwind(Box::pin(future)).await;
            let _ = transmitter.send(result);
        });

        match receiver.recv().expect("runtime shut down before block_on completed") {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Runs `f` with this runtime's context installed on the current
    /// thread.
    ///
    /// Inside `f`, [`task::spawn`](crate::task::spawn) works and futures
    /// or streams can be completed from a thread that is not one of the
    /// runtime's workers.
    pub fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        enter_context(self.driver_handle.clone(), self.executor.injector(), f)
    }
}

impl Drop for Runtime {
    /// Shuts down the runtime.
    ///
    /// 1. Signals the executor to shut down
    /// 2. Sends a shutdown command to the timer driver
    /// 3. Joins all worker threads and the driver thread
    fn drop(&mut self) {
        self.executor.shutdown();

        let _ = self.driver_handle.send(Command::Shutdown);

        self.executor.join();

        if let Some(driver) = self.driver_thread.take() {
            let _ = driver.join();
        }

        tracing::debug!("runtime stopped");
    }
}

/// Polls the inner future and turns a panic into an `Err` payload.
struct CatchUnwind<F: Future>(Pin<Box<F>>);

impl<F: Future> Future for CatchUnwind<F> {
    type Output = thread::Result<F::Output>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let inner = self.0.as_mut();

        match panic::catch_unwind(AssertUnwindSafe(|| inner.poll(cx))) {
            Ok(Poll::Pending) => Poll::Pending,
            Ok(Poll::Ready(value)) => Poll::Ready(Ok(value)),
            Err(payload) => Poll::Ready(Err(payload)),
        }
    }
}
