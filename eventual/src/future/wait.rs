use super::shared::Shared;
use crate::error::Error;

use std::pin::{Pin, pin};
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};
use std::thread::{self, Thread};

/// Future returned by [`Future::wait`](crate::Future::wait) and by
/// awaiting a [`Future`](crate::Future) directly.
///
/// Resolves with the terminal outcome of the cell. Dropping it before
/// completion unregisters its waker.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Wait<T> {
    shared: Arc<Shared<T>>,
    key: Option<usize>,
}

impl<T> Wait<T> {
    pub(crate) fn new(shared: Arc<Shared<T>>) -> Self {
        Self { shared, key: None }
    }
}

impl<T> std::future::Future for Wait<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Result<T, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;

        let poll = this.shared.poll_outcome(&mut this.key, cx.waker());
        if poll.is_ready() {
            this.key = None;
        }

        poll
    }
}

impl<T> Drop for Wait<T> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.shared.remove_waiter(key);
        }
    }
}

/// Unparks the blocked thread on wake.
struct ThreadWaker(Thread);

impl Wake for ThreadWaker {
    fn wake(self: Arc<Self>) {
        self.0.unpark();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.unpark();
    }
}

/// Drives `wait` to completion on the calling thread.
pub(crate) fn block_on_wait<T>(wait: Wait<T>) -> Result<T, Error>
where
    T: Clone + Send + Sync + 'static,
{
    let waker = Waker::from(Arc::new(ThreadWaker(thread::current())));
    let mut cx = Context::from_waker(&waker);
    let mut wait = pin!(wait);

    loop {
        if let Poll::Ready(outcome) = wait.as_mut().poll(&mut cx) {
            return outcome;
        }
        thread::park();
    }
}
