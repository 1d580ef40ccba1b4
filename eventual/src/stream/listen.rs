use super::node::Node;
use super::handle::Stream;
use super::subscription::Subscription;
use crate::future::{Completer, Wait};
use crate::task;

use std::future::poll_fn;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Poll;

/// How a subscriber receives elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delivery {
    /// One element at a time, in order. The next element is only
    /// delivered after the handler returned.
    #[default]
    Blocking,

    /// Every element is handed to its own task as soon as it arrives.
    NonBlocking,
}

/// Starts the task walking `stream` on behalf of a new subscriber.
pub(super) fn spawn<T, F>(stream: &Stream<T>, f: F, delivery: Delivery) -> Subscription
where
    T: Clone + Send + Sync + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    let cancel = Completer::new();
    let done = Completer::new();

    let walk = Walk {
        pending: stream.head().wait(),
        cancel: cancel.future().wait(),
        closed: stream.closed().wait(),
    };

    drop(task::spawn(run(walk, f, delivery, done.clone())));

    Subscription::new(cancel, done.future())
}

async fn run<T, F>(mut walk: Walk<T>, f: F, delivery: Delivery, done: Completer<()>)
where
    T: Clone + Send + Sync + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    let f = Arc::new(f);

    while let Some(data) = walk.next_element().await {
        match delivery {
            Delivery::Blocking => f(data),
            Delivery::NonBlocking => {
                let f = f.clone();
                drop(task::spawn(async move { f(data) }));
            }
        }
    }

    // Release the handler before announcing the end, so resources it owns
    // (a channel sender, say) are gone once `closed` fires.
    drop(f);
    drop(walk);

    done.complete(());
}

/// A subscriber's position in the chain.
struct Walk<T> {
    /// Link to the node not yet delivered.
    pending: Wait<Arc<Node<T>>>,
    cancel: Wait<()>,
    closed: Wait<()>,
}

impl<T> Walk<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Returns the next element, or `None` once the subscription ends.
    ///
    /// Cancellation wins over a ready element. Closing does not: elements
    /// published before the close are still delivered.
    async fn next_element(&mut self) -> Option<T> {
        let node = poll_fn(|cx| {
            if Pin::new(&mut self.cancel).poll(cx).is_ready() {
                return Poll::Ready(None);
            }

            if let Poll::Ready(outcome) = Pin::new(&mut self.pending).poll(cx) {
                return Poll::Ready(outcome.ok());
            }

            if Pin::new(&mut self.closed).poll(cx).is_ready() {
                return Poll::Ready(None);
            }

            Poll::Pending
        })
        .await?;

        self.pending = node.next.wait();
        Some(node.data.clone())
    }
}
