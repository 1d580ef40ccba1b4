//! A single value whose changes can be observed.

use crate::future::Future;
use crate::stream::{Stream, StreamController, Subscription};

use parking_lot::RwLock;

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc;

/// A value updated in change order, with change notifications.
///
/// Changes are published on a stream; an internal blocking subscriber
/// applies them to the stored value one after the other. [`value`]
/// therefore lags slightly behind [`change`], but never observes changes
/// out of order.
///
/// [`value`]: Self::value
/// [`change`]: Self::change
pub struct Observable<T> {
    value: Arc<RwLock<T>>,
    changes: StreamController<T>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            changes: self.changes.clone(),
        }
    }
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an observable holding `initial`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn new(initial: T) -> Self {
        let value = Arc::new(RwLock::new(initial));
        let changes = StreamController::new();

        let store = value.clone();
        changes.stream().listen(move |next| *store.write() = next);

        Self { value, changes }
    }

    /// Returns the current value.
    pub fn value(&self) -> T {
        self.value.read().clone()
    }

    /// Publishes a new value.
    pub fn change(&self, value: T) {
        self.changes.add(value);
    }

    /// Calls `f` with every future change.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn on_change<F>(&self, f: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.changes.stream().listen(f)
    }

    /// Returns the stream of changes.
    pub fn stream(&self) -> Stream<T> {
        self.changes.stream()
    }

    /// Returns a future completed with the next change.
    pub fn next_change(&self) -> Future<T> {
        self.changes.stream().first()
    }

    /// Bridges the changes to a channel.
    pub fn as_receiver(&self) -> (mpsc::Receiver<T>, Subscription) {
        self.changes.stream().as_receiver()
    }
}

impl<T> fmt::Debug for Observable<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable").field(&*self.value.read()).finish()
    }
}
