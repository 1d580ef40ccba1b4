//! Adapters forwarding foreign sources into a reactor.
//!
//! Every adapter holds the reactor weakly and stops forwarding once the
//! reactor has shut down.

use super::core::Reactor;
use crate::error::Error;
use crate::future::Future;
use crate::observable::Observable;
use crate::stream::{Stream, Subscription};
use crate::task;
use crate::time;

use std::hash::Hash;
use std::time::Duration;

impl<C, T> Reactor<C, T>
where
    C: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Fires an event once `delay` has elapsed, unless the reactor shuts
    /// down first.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn fire_in(&self, classifier: C, data: T, delay: Duration) {
        let reactor = self.downgrade();
        let shut_down = self.shutdown_future();

        drop(task::spawn(async move {
            if time::timeout(delay, shut_down.wait()).await.is_ok() {
                return;
            }

            if let Some(inner) = reactor.upgrade() {
                inner.fire(classifier, data);
            }
        }));
    }

    /// Fires an event every `interval` until the reactor shuts down.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn fire_every(&self, classifier: C, data: T, interval: Duration) {
        let reactor = self.downgrade();
        let shut_down = self.shutdown_future();

        drop(task::spawn(async move {
            while time::timeout(interval, shut_down.wait()).await.is_err() {
                let Some(inner) = reactor.upgrade() else {
                    break;
                };
                inner.fire(classifier.clone(), data.clone());
            }

            tracing::trace!("periodic event stopped");
        }));
    }

    /// Fires an event for every element of `stream` until the reactor
    /// shuts down.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn add_stream(&self, classifier: C, stream: &Stream<T>) -> Subscription {
        let reactor = self.downgrade();

        let subscription = stream.listen(move |data| {
            if let Some(inner) = reactor.upgrade() {
                inner.fire(classifier.clone(), data);
            }
        });
        subscription.close_on_future(&self.shutdown_future());

        subscription
    }

    /// Fires an event with the value of `future` once it completes
    /// successfully.
    pub fn add_future(&self, classifier: C, future: &Future<T>) {
        let reactor = self.downgrade();

        future.shared.on_value(Box::new(move |data| {
            if let Some(inner) = reactor.upgrade() {
                inner.fire(classifier, data);
            }
        }));
    }

    /// Fires an event with the error of `future` if it fails.
    pub fn add_future_error<U>(&self, classifier: C, future: &Future<U>)
    where
        U: Clone + Send + Sync + 'static,
        T: From<Error>,
    {
        let reactor = self.downgrade();

        future.shared.on_error(Box::new(move |err| {
            if let Some(inner) = reactor.upgrade() {
                inner.fire(classifier, T::from(err));
            }
        }));
    }

    /// Fires an event for every change of `observable` until the reactor
    /// shuts down.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn add_observable(&self, classifier: C, observable: &Observable<T>) -> Subscription {
        self.add_stream(classifier, &observable.stream())
    }
}
