use crate::future::{Completer, Future};

use std::fmt;

/// Handle to an active listener on a [`Stream`](crate::Stream).
///
/// Cancelling stops delivery; an element already being handled still
/// runs to completion. Dropping the handle does not cancel.
#[derive(Clone)]
pub struct Subscription {
    cancel: Completer<()>,
    closed: Future<()>,
}

impl Subscription {
    pub(crate) fn new(cancel: Completer<()>, closed: Future<()>) -> Self {
        Self { cancel, closed }
    }

    /// Stops delivering elements. Cancelling twice is harmless.
    pub fn cancel(&self) {
        if self.cancel.try_complete(()) {
            tracing::trace!("subscription cancelled");
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_completed()
    }

    /// Returns a future completed once the listener has stopped, whether
    /// it was cancelled or its stream closed.
    pub fn closed(&self) -> Future<()> {
        self.closed.clone()
    }

    /// Cancels the subscription once `future` is terminal, whatever its
    /// outcome.
    pub fn close_on_future<U>(&self, future: &Future<U>)
    where
        U: Clone + Send + Sync + 'static,
    {
        let subscription = self.clone();
        future.on_complete(move || subscription.cancel());
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.is_cancelled())
            .field("closed", &self.closed.is_completed())
            .finish()
    }
}
