use super::event::{Classifier, Event};
use crate::error::Error;
use crate::future::{Completer, Future};
use crate::stream::StreamController;

use parking_lot::Mutex;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Weak};

/// Handler invoked with the data of a dispatched event.
type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// A classifier-keyed event dispatcher with a total handling order.
///
/// `C` classifies events, `T` is the data they carry. Handles are cheap
/// to clone and drive the same dispatch loop.
///
/// A handler that panics takes the dispatch loop down with it; keep
/// handlers total.
///
/// # Examples
///
/// ```rust,ignore
/// let reactor = Reactor::new();
/// reactor.react("tick", |n: u64| println!("tick {n}"));
///
/// reactor.fire("tick", 1);
/// reactor.shutdown(0);
/// reactor.shutdown_future().await?;
/// ```
pub struct Reactor<C, T> {
    pub(super) inner: Arc<Inner<C, T>>,
}

pub(super) struct Inner<C, T> {
    events: StreamController<Event<C, T>>,
    handlers: Mutex<HashMap<Classifier<C>, Handler<T>>>,
    shut_down: Completer<T>,
}

impl<C, T> Clone for Reactor<C, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C, T> Reactor<C, T>
where
    C: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates a reactor and starts its dispatch loop.
    ///
    /// The loop stops at shutdown, or once every handle is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn new() -> Self {
        let inner = Arc::new(Inner {
            events: StreamController::new(),
            handlers: Mutex::new(HashMap::new()),
            shut_down: Completer::new(),
        });

        let dispatcher = Arc::downgrade(&inner);
        inner.events.stream().listen(move |event| {
            if let Some(inner) = dispatcher.upgrade() {
                inner.dispatch(event);
            }
        });

        tracing::debug!("reactor started");

        Self { inner }
    }

    /// Enqueues an event. Does nothing once the reactor has shut down.
    pub fn fire(&self, classifier: C, data: T) {
        self.inner.fire(classifier, data);
    }

    /// Registers `handler` for `classifier`, replacing any previous one.
    ///
    /// Takes effect for events dispatched after the call. Returns whether
    /// a handler was replaced.
    pub fn react<F>(&self, classifier: C, handler: F) -> bool
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let replaced = self
            .inner
            .handlers
            .lock()
            .insert(Classifier::User(classifier), Arc::new(handler))
            .is_some();

        if replaced {
            tracing::debug!("reactor handler replaced");
        }

        replaced
    }

    /// Registers `handler` for `classifier` unless one is already
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HandlerExists`] if the classifier already has a
    /// handler.
    pub fn try_react<F>(&self, classifier: C, handler: F) -> Result<(), Error>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        match self
            .inner
            .handlers
            .lock()
            .entry(Classifier::User(classifier))
        {
            Entry::Occupied(_) => Err(Error::HandlerExists),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(handler));
                Ok(())
            }
        }
    }

    /// Registers the handler run when the shutdown event is dispatched,
    /// before the reactor completes its shutdown future.
    pub fn on_shutdown<F>(&self, handler: F)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.inner
            .handlers
            .lock()
            .insert(Classifier::Shutdown, Arc::new(handler));
    }

    /// Enqueues the shutdown event.
    ///
    /// Events fired before it are still handled. Once it has been
    /// dispatched, [`fire`](Self::fire) does nothing and the shutdown
    /// future completes with `data`.
    pub fn shutdown(&self, data: T) {
        self.inner.enqueue(Classifier::Shutdown, data);
    }

    /// Returns a future completed with the shutdown data once the
    /// reactor has fully shut down.
    pub fn shutdown_future(&self) -> Future<T> {
        self.inner.shut_down.future()
    }

    /// Returns `true` once the reactor has fully shut down.
    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.is_completed()
    }

    pub(super) fn downgrade(&self) -> Weak<Inner<C, T>> {
        Arc::downgrade(&self.inner)
    }
}

impl<C, T> Inner<C, T>
where
    C: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub(super) fn fire(&self, classifier: C, data: T) {
        self.enqueue(Classifier::User(classifier), data);
    }

    fn is_shut_down(&self) -> bool {
        self.shut_down.is_completed()
    }

    fn enqueue(&self, classifier: Classifier<C>, data: T) {
        if self.is_shut_down() {
            tracing::trace!("reactor shut down, dropping event");
            return;
        }

        self.events.add(Event { classifier, data });
    }

    /// Handles one event. Only ever called from the dispatch loop.
    fn dispatch(&self, event: Event<C, T>) {
        // Events queued behind the shutdown event.
        if self.is_shut_down() {
            return;
        }

        let handler = self.handlers.lock().get(&event.classifier).cloned();

        match event.classifier {
            Classifier::User(_) => match handler {
                Some(handler) => handler(event.data),
                None => tracing::debug!("no handler registered for event"),
            },
            Classifier::Shutdown => {
                if let Some(handler) = handler {
                    handler(event.data.clone());
                }

                self.shut_down.try_complete(event.data);
                self.events.close();

                tracing::debug!("reactor shut down");
            }
        }
    }
}

impl<C, T> Default for Reactor<C, T>
where
    C: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, T> fmt::Debug for Reactor<C, T>
where
    C: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactor")
            .field("handlers", &self.inner.handlers.lock().len())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}
