//! Coordinated shutdown of several components.

use crate::error::Error;
use crate::future::Future;
use crate::reactor::Reactor;
use crate::wait_group::FutureWaitGroup;

use parking_lot::Mutex;

use std::fmt;
use std::hash::Hash;

/// A component that can be asked to shut down.
pub trait Shutdowner<D>: Send + Sync + 'static {
    /// Starts shutting down with `data`.
    ///
    /// Returns a future completed once the component has stopped, or
    /// failed with the reason it could not.
    fn shutdown(&self, data: D) -> Future<()>;
}

impl<C, T> Shutdowner<T> for Reactor<C, T>
where
    C: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn shutdown(&self, data: T) -> Future<()> {
        Reactor::shutdown(self, data);
        self.shutdown_future().then(|_| ())
    }
}

/// Fans a shutdown signal out to registered components.
pub struct ShutdownRegistry<D> {
    registered: Mutex<Vec<Box<dyn Shutdowner<D>>>>,
}

impl<D> ShutdownRegistry<D>
where
    D: Clone + Send + Sync + 'static,
{
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            registered: Mutex::new(Vec::new()),
        }
    }

    /// Registers a component.
    pub fn register(&self, shutdowner: impl Shutdowner<D>) {
        self.registered.lock().push(Box::new(shutdowner));
    }

    /// Shuts every registered component down with `data` and waits for
    /// all of them.
    ///
    /// Returns the errors of the components that failed. Components are
    /// handed over to the shutdown, so a second run only reaches
    /// components registered since.
    pub async fn run(&self, data: D) -> Vec<Error> {
        let registered = std::mem::take(&mut *self.registered.lock());
        tracing::debug!(components = registered.len(), "shutting down");

        let group = FutureWaitGroup::new();
        let outcomes: Vec<Future<()>> = registered
            .iter()
            .map(|component| component.shutdown(data.clone()))
            .collect();

        for outcome in &outcomes {
            group.add(outcome);
        }
        group.wait().await;

        outcomes
            .iter()
            .filter_map(Future::err_result)
            .collect()
    }
}

impl<D> Default for ShutdownRegistry<D>
where
    D: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for ShutdownRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownRegistry")
            .field("registered", &self.registered.lock().len())
            .finish()
    }
}
