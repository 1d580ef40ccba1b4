use super::completer::Completer;
use super::shared::Shared;
use super::wait::{Wait, block_on_wait};
use crate::error::Error;
use crate::time;

use parking_lot::Mutex;

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

/// Read side of a single-assignment cell.
///
/// A `Future` eventually holds either a value or an [`Error`], exactly
/// once. Handles are cheap to clone; every clone observes the same
/// outcome.
///
/// A `Future` can be awaited (it implements [`IntoFuture`]) or observed
/// through continuations.
///
/// # Examples
///
/// ```rust,ignore
/// let completer = Completer::new();
/// let doubled = completer.future().then(|v: i32| v * 2);
///
/// completer.complete(21);
/// assert_eq!(doubled.await.unwrap(), 42);
/// ```
pub struct Future<T> {
    pub(crate) shared: Arc<Shared<T>>,
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Future<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a future that already holds `value`.
    pub fn ready(value: T) -> Self {
        Self {
            shared: Arc::new(Shared::settled(Ok(value))),
        }
    }

    /// Creates a future that already failed with `err`.
    pub fn failed(err: Error) -> Self {
        Self {
            shared: Arc::new(Shared::settled(Err(err))),
        }
    }

    /// Registers a success continuation.
    ///
    /// `f` runs exactly once, as its own task, with the value. The
    /// returned future completes with the result of `f`. If this future
    /// fails, `f` is skipped and the returned future fails with the same
    /// error.
    ///
    /// The continuation is spawned on the runtime current at
    /// registration, so the future may be settled from any thread. When
    /// no runtime is running at all it runs inline on the settling thread.
    pub fn then<U, F>(&self, f: F) -> Future<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let next = Completer::new();

        let on_value = next.clone();
        self.shared
            .on_value(Box::new(move |value| on_value.complete(f(value))));

        let on_error = next.clone();
        self.shared
            .on_error(Box::new(move |err| on_error.complete_error(err)));

        next.future()
    }

    /// Registers an error continuation.
    ///
    /// `f` runs exactly once, as its own task, with the error. Its result
    /// decides the outcome of the returned future: `Ok` recovers, `Err`
    /// fails it. If this future succeeds, `f` is skipped and the returned
    /// future completes with the same value.
    pub fn err<F>(&self, f: F) -> Future<T>
    where
        F: FnOnce(Error) -> Result<T, Error> + Send + 'static,
    {
        let next = Completer::new();

        let on_error = next.clone();
        self.shared.on_error(Box::new(move |err| match f(err) {
            Ok(value) => on_error.complete(value),
            Err(err) => on_error.complete_error(err),
        }));

        let on_value = next.clone();
        self.shared
            .on_value(Box::new(move |value| on_value.complete(value)));

        next.future()
    }

    /// Runs `f` as its own task once the future is terminal, whatever the
    /// outcome.
    pub(crate) fn on_complete<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let slot = Arc::new(Mutex::new(Some(f)));
        let on_error = slot.clone();

        self.shared.on_value(Box::new(move |_| {
            if let Some(f) = slot.lock().take() {
                f();
            }
        }));
        self.shared.on_error(Box::new(move |_| {
            if let Some(f) = on_error.lock().take() {
                f();
            }
        }));
    }

    /// Returns `true` once the future holds a value or an error.
    pub fn is_completed(&self) -> bool {
        self.shared.is_terminal()
    }

    /// Returns the value, or `None` while pending or after a failure.
    pub fn result(&self) -> Option<T> {
        self.shared.outcome().and_then(Result::ok)
    }

    /// Returns the error, or `None` while pending or after a success.
    pub fn err_result(&self) -> Option<Error> {
        self.shared.outcome().and_then(Result::err)
    }

    /// Returns the terminal outcome without blocking.
    pub fn outcome(&self) -> Option<Result<T, Error>> {
        self.shared.outcome()
    }

    /// Returns a future that resolves with the outcome.
    ///
    /// This is the asynchronous equivalent of blocking until complete;
    /// only the awaiting task is suspended.
    pub fn wait(&self) -> Wait<T> {
        Wait::new(self.shared.clone())
    }

    /// Waits until the future is terminal or `duration` elapses.
    ///
    /// Returns whether the future became terminal in time.
    pub async fn wait_timeout(&self, duration: Duration) -> bool {
        time::timeout(duration, self.wait()).await.is_ok()
    }

    /// Blocks the current thread until the future is terminal.
    ///
    /// Intended for threads outside the runtime. Calling it on a worker
    /// thread blocks that worker.
    pub fn wait_blocking(&self) -> Result<T, Error> {
        block_on_wait(self.wait())
    }

    /// Bridges the future to a channel.
    ///
    /// The receiver gets the value once on success. On failure the
    /// sending side is dropped, so the receiver observes a disconnect.
    pub fn as_receiver(&self) -> mpsc::Receiver<T> {
        let (transmitter, receiver) = mpsc::sync_channel(1);

        self.shared.on_value(Box::new(move |value| {
            let _ = transmitter.send(value);
        }));

        receiver
    }
}

impl<T> IntoFuture for Future<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Result<T, Error>;
    type IntoFuture = Wait<T>;

    fn into_future(self) -> Self::IntoFuture {
        Wait::new(self.shared)
    }
}

impl<T> fmt::Debug for Future<T>
where
    T: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shared.outcome() {
            None => f.write_str("Future(<pending>)"),
            Some(Ok(value)) => f.debug_tuple("Future").field(&value).finish(),
            Some(Err(err)) => f.debug_tuple("Future").field(&err).finish(),
        }
    }
}
