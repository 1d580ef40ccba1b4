//! Streams derived from other streams.
//!
//! Every derived stream is fed by a blocking subscription on its source,
//! so it preserves the source order. The two ends are tied together:
//! closing the derived stream cancels the upstream subscription, and the
//! upstream subscription ending closes the derived stream.

use super::controller::StreamController;
use super::handle::Stream;
use crate::error::Error;
use crate::future::{Completer, Future};

use std::sync::Arc;

impl<T> Stream<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Returns a stream of the elements for which `predicate` holds.
    pub fn filter<P>(&self, predicate: P) -> Stream<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.derive(move |value, sink| {
            if predicate(&value) {
                sink.add(value);
            }
        })
    }

    /// Returns a stream of the elements for which `predicate` does not
    /// hold.
    pub fn filter_not<P>(&self, predicate: P) -> Stream<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter(move |value| !predicate(value))
    }

    /// Returns a stream of `f` applied to every element.
    pub fn transform<U, F>(&self, f: F) -> Stream<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.derive(move |value, sink| sink.add(f(value)))
    }

    /// Returns a stream of `f` applied to every element, skipping the
    /// elements for which `f` returns `None`.
    pub fn transform_where<U, F>(&self, f: F) -> Stream<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> Option<U> + Send + Sync + 'static,
    {
        self.derive(move |value, sink| {
            if let Some(mapped) = f(value) {
                sink.add(mapped);
            }
        })
    }

    /// Splits the stream in two: the elements for which `predicate` holds,
    /// and the rest.
    pub fn split<P>(&self, predicate: P) -> (Stream<T>, Stream<T>)
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        let negated = predicate.clone();

        (
            self.filter(move |value| predicate(value)),
            self.filter_not(move |value| negated(value)),
        )
    }

    /// Returns a future completed with the next element.
    ///
    /// The listener stops once the future completes. If the stream closes
    /// first, the future fails with [`Error::StreamClosed`].
    pub fn first(&self) -> Future<T> {
        let first = Completer::new();

        let sink = first.clone();
        let subscription = self.listen(move |value| {
            sink.try_complete(value);
        });
        subscription.close_on_future(&first.future());

        let closed = first.clone();
        subscription.closed().on_complete(move || {
            closed.try_complete_error(Error::StreamClosed);
        });

        first.future()
    }

    /// Returns a future completed with the next element for which
    /// `predicate` holds.
    pub fn first_where<P>(&self, predicate: P) -> Future<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::first_of(self.filter(predicate))
    }

    /// Returns a future completed with the next element for which
    /// `predicate` does not hold.
    pub fn first_where_not<P>(&self, predicate: P) -> Future<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::first_of(self.filter_not(predicate))
    }

    /// Takes the first element of a helper stream, then closes it.
    fn first_of(helper: Stream<T>) -> Future<T> {
        let first = helper.first();
        first.on_complete(move || helper.close());
        first
    }

    /// Builds a stream fed by `f` from a blocking subscription on `self`.
    fn derive<U, F>(&self, f: F) -> Stream<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T, &StreamController<U>) + Send + Sync + 'static,
    {
        let controller = StreamController::new();
        let derived = controller.stream();

        let sink = controller.clone();
        let subscription = self.listen(move |value| f(value, &sink));
        subscription.close_on_future(&derived.closed());

        subscription.closed().on_complete(move || controller.close());

        derived
    }
}
