use super::listen::{self, Delivery};
use super::node::Link;
use super::subscription::Subscription;
use crate::future::{Completer, Future};

use parking_lot::Mutex;

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc;

/// Consumer side of a stream.
///
/// A `Stream` points at the tail of its chain: subscribers attached now
/// observe every element added from now on, in order. Handles are cheap
/// to clone.
///
/// Elements are obtained by listening, or by deriving new streams with
/// [`filter`](Self::filter), [`transform`](Self::transform) and friends.
pub struct Stream<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    /// Link the next subscriber starts from.
    head: Mutex<Link<T>>,
    /// Completed when the stream ends.
    close: Completer<()>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Stream<T> {
    /// Closes the stream, ending every subscription on it.
    ///
    /// Closing twice is harmless.
    pub fn close(&self) {
        if self.inner.close.try_complete(()) {
            tracing::trace!("stream closed");
        }
    }

    /// Returns a future completed once the stream is closed.
    pub fn closed(&self) -> Future<()> {
        self.inner.close.future()
    }

    /// Returns `true` once the stream is closed.
    pub fn is_closed(&self) -> bool {
        self.inner.close.is_completed()
    }
}

impl<T> Stream<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(head: Link<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                head: Mutex::new(head),
                close: Completer::new(),
            }),
        }
    }

    /// Moves the attachment point to `next`. Called under the
    /// controller's lock.
    pub(crate) fn advance(&self, next: Link<T>) {
        *self.inner.head.lock() = next;
    }

    pub(crate) fn head(&self) -> Link<T> {
        self.inner.head.lock().clone()
    }

    /// Calls `f` with every element, one at a time, in order.
    ///
    /// The subscription does not move to the next element until `f` has
    /// returned, so a slow subscriber only slows itself down.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn listen<F>(&self, f: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.listen_with(f, Delivery::Blocking)
    }

    /// Calls `f` with every element, each call in its own task.
    ///
    /// Elements are picked up in order, but calls may overlap and finish
    /// in any order.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn listen_non_blocking<F>(&self, f: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.listen_with(f, Delivery::NonBlocking)
    }

    /// Calls `f` with every element using the given delivery mode.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn listen_with<F>(&self, f: F, delivery: Delivery) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        listen::spawn(self, f, delivery)
    }

    /// Bridges the stream to a channel.
    ///
    /// Every element is sent in order. The receiver disconnects once the
    /// subscription ends, either because it was cancelled or because the
    /// stream closed.
    pub fn as_receiver(&self) -> (mpsc::Receiver<T>, Subscription) {
        let (transmitter, receiver) = mpsc::channel();

        let subscription = self.listen(move |value| {
            let _ = transmitter.send(value);
        });

        (receiver, subscription)
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("closed", &self.is_closed())
            .finish()
    }
}
