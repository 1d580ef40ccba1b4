use crate::driver::DriverHandle;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Thread-local handle to the current timer driver.
    ///
    /// This is set when entering the runtime context and allows
    /// timers to reach the driver without explicit parameter passing.
    pub(crate) static CURRENT_DRIVER: RefCell<Option<DriverHandle>> =
        const { RefCell::new(None) };

    /// Thread-local handle to the global injector queue.
    ///
    /// Used to schedule tasks from any thread that entered the runtime.
    pub(crate) static CURRENT_INJECTOR: RefCell<Option<InjectorHandle>> =
        const { RefCell::new(None) };

    /// Thread-local identifier of the current worker thread.
    ///
    /// `None` on threads that entered the runtime without being a worker.
    pub(crate) static CURRENT_WORKER_ID: RefCell<Option<usize>> =
        const { RefCell::new(None) };

    /// Thread-local references to all local worker queues.
    ///
    /// Only installed on worker threads.
    pub(crate) static CURRENT_LOCALS: RefCell<Option<Arc<Vec<Arc<LocalQueue>>>>> =
        const { RefCell::new(None) };
}

/// Enters the runtime execution context for the current thread.
///
/// This temporarily installs the driver and injector handles for the
/// duration of `f`, then restores whatever context was installed
/// before. Nested calls are therefore safe.
pub(crate) fn enter_context<R>(
    driver: DriverHandle,
    injector: InjectorHandle,
    f: impl FnOnce() -> R,
) -> R {
    let prev_driver = CURRENT_DRIVER.with(|d| d.replace(Some(driver)));
    let prev_injector = CURRENT_INJECTOR.with(|i| i.replace(Some(injector)));

    let guard = RestoreContext {
        driver: prev_driver,
        injector: prev_injector,
    };

    let out = f();
    drop(guard);

    out
}

/// Returns the injector of the runtime the current thread runs in.
pub(crate) fn current_injector() -> Option<InjectorHandle> {
    CURRENT_INJECTOR.with(|i| i.borrow().clone())
}

/// Restores the previous context, including when `f` unwinds.
struct RestoreContext {
    driver: Option<DriverHandle>,
    injector: Option<InjectorHandle>,
}

impl Drop for RestoreContext {
    fn drop(&mut self) {
        let driver = self.driver.take();
        let injector = self.injector.take();

        CURRENT_INJECTOR.with(|i| i.replace(injector));
        CURRENT_DRIVER.with(|d| d.replace(driver));
    }
}
