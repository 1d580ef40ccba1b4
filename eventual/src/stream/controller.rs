use super::node::{Link, Node};
use super::handle::Stream;
use crate::future::{Completer, Future};

use parking_lot::Mutex;

use std::fmt;
use std::mem;
use std::sync::{Arc, Weak};

/// Producer side of a [`Stream`].
///
/// Handles are cheap to clone and share the same chain. Dropping the last
/// handle closes the stream.
///
/// # Examples
///
/// ```rust,ignore
/// let controller = StreamController::new();
/// let subscription = controller.stream().listen(|v: u32| println!("{v}"));
///
/// controller.add(1);
/// controller.add(2);
/// controller.close();
/// subscription.closed().await?;
/// ```
pub struct StreamController<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    /// Completer of the node the next `add` publishes.
    tail: Mutex<Completer<Arc<Node<T>>>>,
    stream: Stream<T>,
}

impl<T> Clone for StreamController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> StreamController<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a controller with an empty, open stream.
    pub fn new() -> Self {
        let tail = Completer::new();
        let stream = Stream::new(tail.future());

        Self {
            inner: Arc::new(Inner {
                tail: Mutex::new(tail),
                stream,
            }),
        }
    }

    /// Publishes `value` to every current subscriber.
    ///
    /// Never waits for subscribers. Concurrent calls are serialized; the
    /// one that takes the lock first comes first in the chain. Adding to
    /// a closed stream does nothing.
    pub fn add(&self, value: T) {
        self.inner.add(value);
    }

    /// Returns the stream fed by this controller.
    pub fn stream(&self) -> Stream<T> {
        self.inner.stream.clone()
    }

    /// Re-publishes every element of `source` until this stream closes.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn join(&self, source: &Stream<T>) {
        let sink = self.downgrade();
        let subscription = source.listen(move |value| {
            if let Some(inner) = sink.upgrade() {
                inner.add(value);
            }
        });

        subscription.close_on_future(&self.closed());
    }

    /// Publishes the value of `future` once it completes successfully.
    pub fn join_future(&self, future: &Future<T>) {
        let sink = self.downgrade();
        future.shared.on_value(Box::new(move |value| {
            if let Some(inner) = sink.upgrade() {
                inner.add(value);
            }
        }));
    }

    /// Closes the stream and ends every subscription on it.
    ///
    /// Closing twice is harmless.
    pub fn close(&self) {
        self.inner.stream.close();
    }

    /// Returns a future completed once the stream is closed.
    pub fn closed(&self) -> Future<()> {
        self.inner.stream.closed()
    }

    /// Closes the stream once `future` is terminal, whatever its outcome.
    pub fn close_on_future<U>(&self, future: &Future<U>)
    where
        U: Clone + Send + Sync + 'static,
    {
        let stream = self.inner.stream.clone();
        future.on_complete(move || stream.close());
    }

    fn downgrade(&self) -> Weak<Inner<T>> {
        Arc::downgrade(&self.inner)
    }
}

impl<T> Inner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn add(&self, value: T) {
        if self.stream.is_closed() {
            tracing::debug!("add on a closed stream, dropping element");
            return;
        }

        let (previous, next): (Completer<Arc<Node<T>>>, Link<T>) = {
            let mut tail = self.tail.lock();
            let fresh = Completer::new();
            let next = fresh.future();

            self.stream.advance(next.clone());
            (mem::replace(&mut *tail, fresh), next)
        };

        previous.complete(Arc::new(Node { data: value, next }));
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        self.stream.close();
    }
}

impl<T> Default for StreamController<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for StreamController<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamController")
            .field("closed", &self.inner.stream.is_closed())
            .finish()
    }
}
