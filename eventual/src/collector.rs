//! A reactor-backed sink collecting data for later retrieval.

use crate::error::Error;
use crate::future::{Completer, Future};
use crate::observable::Observable;
use crate::reactor::Reactor;
use crate::stream::{Stream, Subscription};

use parking_lot::Mutex;

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// The only event a collector's reactor handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Collect;

/// Collects data in the order it was added.
///
/// Additions go through a [`Reactor`], so data added from several tasks
/// lands in the pile in fire order and adding never blocks on a reader.
/// Handles are cheap to clone and share the same pile.
///
/// # Examples
///
/// ```rust,ignore
/// let collector = Collector::new();
/// collector.add("tick");
///
/// collector.stop();
/// collector.stopped().await?;
/// assert_eq!(collector.get(), Some("tick"));
/// ```
pub struct Collector<T> {
    // `None` is the stop marker.
    reactor: Reactor<Collect, Option<T>>,
    pile: Arc<Mutex<VecDeque<T>>>,
    stopped: Completer<()>,
}

impl<T> Clone for Collector<T> {
    fn clone(&self) -> Self {
        Self {
            reactor: self.reactor.clone(),
            pile: self.pile.clone(),
            stopped: self.stopped.clone(),
        }
    }
}

impl<T> Collector<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty collector.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn new() -> Self {
        let reactor = Reactor::new();
        let pile = Arc::new(Mutex::new(VecDeque::new()));
        let stopped = Completer::new();

        let sink = pile.clone();
        reactor.react(Collect, move |data: Option<T>| {
            if let Some(data) = data {
                sink.lock().push_back(data);
            }
        });

        let done = stopped.clone();
        reactor.on_shutdown(move |_| {
            done.try_complete(());
        });

        Self {
            reactor,
            pile,
            stopped,
        }
    }

    /// Adds `data` to the collector. Does nothing once stopped.
    pub fn add(&self, data: T) {
        self.reactor.fire(Collect, Some(data));
    }

    /// Collects every element of `stream` until the collector stops.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn add_stream(&self, stream: &Stream<T>) -> Subscription {
        let collector = self.clone();

        let subscription = stream.listen(move |data| collector.add(data));
        subscription.close_on_future(&self.stopped());

        subscription
    }

    /// Collects the value of `future` if it completes successfully.
    pub fn add_future(&self, future: &Future<T>) {
        let collector = self.clone();
        future.shared.on_value(Box::new(move |data| collector.add(data)));
    }

    /// Collects the error of `future` if it fails.
    pub fn add_future_error<U>(&self, future: &Future<U>)
    where
        U: Clone + Send + Sync + 'static,
        T: From<Error>,
    {
        let collector = self.clone();
        future
            .shared
            .on_error(Box::new(move |err| collector.add(T::from(err))));
    }

    /// Collects every change of `observable` until the collector stops.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn add_observable(&self, observable: &Observable<T>) -> Subscription {
        self.add_stream(&observable.stream())
    }

    /// Removes and returns the oldest element.
    pub fn get(&self) -> Option<T> {
        self.pile.lock().pop_front()
    }

    /// Returns the oldest element without removing it.
    pub fn preview(&self) -> Option<T> {
        self.pile.lock().front().cloned()
    }

    /// Returns `true` if nothing is collected.
    pub fn is_empty(&self) -> bool {
        self.pile.lock().is_empty()
    }

    /// Returns the number of collected elements.
    pub fn len(&self) -> usize {
        self.pile.lock().len()
    }

    /// Stops collecting. Data added before the call is still collected.
    pub fn stop(&self) {
        self.reactor.shutdown(None);
    }

    /// Returns a future completed once everything added before
    /// [`stop`](Self::stop) has been collected.
    pub fn stopped(&self) -> Future<()> {
        self.stopped.future()
    }
}

impl<C, T> Reactor<C, T>
where
    C: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Registers `collector` as the handler for `classifier`: the data
    /// of every such event is collected.
    ///
    /// Replaces any previous handler. Returns whether one was replaced.
    pub fn collect_event(&self, classifier: C, collector: &Collector<T>) -> bool {
        let collector = collector.clone();
        self.react(classifier, move |data| collector.add(data))
    }
}

impl<T> Default for Collector<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Collector<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("len", &self.len())
            .field("stopped", &self.stopped.is_completed())
            .finish()
    }
}
